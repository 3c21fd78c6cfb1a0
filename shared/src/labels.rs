use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Category, ItemKind};

/// Label names used to classify tracker items. Comparisons ignore ASCII case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSet {
    pub feature_fix: Vec<String>,
    pub documentation: Vec<String>,
    pub typo: Vec<String>,
    /// Items carrying any of these labels are not counted at all.
    pub reject: Vec<String>,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            feature_fix: vec!["bug".to_string(), "enhancement".to_string()],
            documentation: vec!["documentation".to_string()],
            typo: vec!["typo".to_string()],
            reject: vec![
                "wontfix".to_string(),
                "invalid".to_string(),
                "duplicate".to_string(),
            ],
        }
    }
}

fn contains(names: &[String], label: &str) -> bool {
    names.iter().any(|name| name.eq_ignore_ascii_case(label.trim()))
}

impl LabelSet {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read label file {}: {e}", path.display()))?;
        let labels: LabelSet = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse label file {}: {e}", path.display()))?;
        Ok(labels)
    }

    pub fn is_rejected<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        labels
            .iter()
            .any(|label| contains(&self.reject, label.as_ref()))
    }

    pub fn category(&self, label: &str) -> Option<Category> {
        if contains(&self.feature_fix, label) {
            Some(Category::FeatureFix)
        } else if contains(&self.documentation, label) {
            Some(Category::Doc)
        } else if contains(&self.typo, label) {
            Some(Category::Typo)
        } else {
            None
        }
    }
}

/// Decides which category, if any, an item's labels map to.
pub type LabelPolicy = fn(&LabelSet, &[String]) -> Option<Category>;

/// Only the first label of an item is looked at. An item labelled `bug` and
/// `documentation` (in that order) counts as feature/fix only.
pub fn first_label_wins(labels: &LabelSet, item_labels: &[String]) -> Option<Category> {
    item_labels
        .first()
        .and_then(|label| labels.category(label))
}

/// Rejection check followed by the label policy.
pub fn classify(
    labels: &LabelSet,
    policy: LabelPolicy,
    kind: ItemKind,
    item_labels: &[String],
) -> Option<Category> {
    if labels.is_rejected(item_labels) {
        return None;
    }

    match policy(labels, item_labels)? {
        Category::Typo if kind == ItemKind::Issue => None,
        category => Some(category),
    }
}
