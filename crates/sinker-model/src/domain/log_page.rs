use serde::{Deserialize, Serialize};

/// A window of sinker log lines (`/api/v1/log`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LogPage {
    /// Number of matching lines in the whole log file.
    pub total: usize,
    #[serde(deserialize_with = "null_as_empty")]
    pub lines: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
