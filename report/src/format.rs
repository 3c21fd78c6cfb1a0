use std::{collections::BTreeSet, str::FromStr};

use strum::{Display, EnumIter, IntoEnumIterator};
use thiserror::Error;

const ILLEGAL_CHARACTERS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Table printed to stdout.
    Text,
    Csv,
    /// SVG and PNG bar chart.
    Chart,
    Html,
    All,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("output format {0:?} contains a character that is not allowed in file names")]
    IllegalCharacter(String),
    #[error("unknown output format {0:?}, expected one of text, csv, chart, html, all")]
    Unknown(String),
    #[error("no output format given")]
    Empty,
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.contains(ILLEGAL_CHARACTERS) {
            return Err(FormatError::IllegalCharacter(token.to_string()));
        }

        OutputFormat::iter()
            .find(|format| format.to_string().eq_ignore_ascii_case(token))
            .ok_or_else(|| FormatError::Unknown(token.to_string()))
    }
}

/// Parses repeated and comma-separated format arguments. `all` expands to every
/// concrete format, so the result never contains [`OutputFormat::All`].
pub fn parse_formats<S: AsRef<str>>(args: &[S]) -> Result<BTreeSet<OutputFormat>, FormatError> {
    let mut formats = BTreeSet::new();
    for token in args
        .iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .filter(|token| !token.trim().is_empty())
    {
        match token.parse::<OutputFormat>()? {
            OutputFormat::All => formats.extend(
                OutputFormat::iter().filter(|format| *format != OutputFormat::All),
            ),
            format => {
                formats.insert(format);
            }
        }
    }

    if formats.is_empty() {
        return Err(FormatError::Empty);
    }
    Ok(formats)
}
