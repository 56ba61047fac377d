use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::matching::{Matcher, DEFAULT_MAX_SCORE};

pub const DEFAULT_FALLBACK_FOLDER: &str = "Assets/Materials/Relinked";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings shared by every relink operation. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelinkConfig {
    /// Folder receiving materials created for unresolvable names.
    pub fallback_material_folder: String,
    /// Nearest-neighbour matches must score strictly below this.
    pub max_match_score: f64,
    /// Written into captured snapshots.
    pub producer_version: String,
}

impl Default for RelinkConfig {
    fn default() -> Self {
        Self {
            fallback_material_folder: DEFAULT_FALLBACK_FOLDER.to_string(),
            max_match_score: DEFAULT_MAX_SCORE,
            producer_version: concat!("relink ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl RelinkConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn matcher(&self) -> Matcher {
        Matcher::new(self.max_match_score)
    }
}

#[cfg(test)]
mod tests {
    use super::RelinkConfig;

    #[test]
    fn missing_fields_take_defaults() {
        let config: RelinkConfig = serde_json::from_str(r#"{ "max_match_score": 12.5 }"#).unwrap();
        assert_eq!(config.max_match_score, 12.5);
        assert_eq!(config.fallback_material_folder, "Assets/Materials/Relinked");
        assert!(config.producer_version.starts_with("relink "));
    }

    #[test]
    fn matcher_uses_threshold() {
        let config = RelinkConfig {
            max_match_score: 3.0,
            ..RelinkConfig::default()
        };
        assert_eq!(config.matcher().max_score(), 3.0);
    }
}
