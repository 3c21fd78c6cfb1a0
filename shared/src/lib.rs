//! Score model and analysis shared by the collector, the renderers and the CLI.

use std::collections::BTreeMap;

mod activity;
mod item;
mod labels;
mod ranking;
mod rates;
mod repo;
mod score;
mod stats;
mod user_info;

#[cfg(feature = "github")]
pub mod github;

pub use activity::*;
pub use item::*;
pub use labels::*;
pub use ranking::*;
pub use rates::*;
pub use repo::*;
pub use score::*;
pub use stats::*;
pub use user_info::*;

pub type GithubHandle = String;

/// Raw activity per user for a single repository.
pub type ActivityMap = BTreeMap<GithubHandle, ActivityRecord>;

/// Scores per user, either for a single repository or aggregated across several.
pub type ScoreMap = BTreeMap<GithubHandle, ScoreModel>;
