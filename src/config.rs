//! TOML configuration for spam-detect.
//!
//! Every section and field is optional; missing values take their defaults.
//!
//! ```toml
//! [dataset]
//! text_column = "v2"
//! label_column = "v1"
//! spam_value = "spam"
//!
//! [split]
//! test_size = 0.25
//! seed = 42
//!
//! [vectorizer]
//! lowercase = true
//! min_token_len = 2
//!
//! [model]
//! alpha = 1.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bayes::ModelConfig;
use crate::dataset::DatasetConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::explore::ExploreConfig;
use crate::pipeline::PipelineConfig;
use crate::split::SplitConfig;
use crate::text::VectorizerConfig;

/// Complete configuration, one field per TOML table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub split: SplitConfig,
    pub vectorizer: VectorizerConfig,
    pub model: ModelConfig,
    pub explore: ExploreConfig,
}

impl Config {
    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Write as pretty TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Check value ranges that the type system cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |field: &str, message: String| {
            Err(ConfigError::Invalid {
                field: field.into(),
                message,
            })
        };

        let test_size = self.split.test_size;
        if !(test_size > 0.0 && test_size < 1.0) {
            return invalid(
                "split.test_size",
                format!("{test_size} is not strictly between 0 and 1"),
            );
        }
        let alpha = self.model.alpha;
        if !alpha.is_finite() || alpha < 0.0 {
            return invalid(
                "model.alpha",
                format!("{alpha} is not a finite non-negative number"),
            );
        }
        let max_df = self.vectorizer.max_df;
        if !(max_df > 0.0 && max_df <= 1.0) {
            return invalid("vectorizer.max_df", format!("{max_df} is not in (0, 1]"));
        }
        if self.vectorizer.min_token_len == 0 {
            return invalid("vectorizer.min_token_len", "must be at least 1".into());
        }
        if self.dataset.text_column == self.dataset.label_column {
            return invalid(
                "dataset.label_column",
                format!("same as text_column ({})", self.dataset.text_column),
            );
        }
        Ok(())
    }

    /// Settings for building a [`SpamPipeline`](crate::pipeline::SpamPipeline).
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            vectorizer: self.vectorizer.clone(),
            model: self.model.clone(),
        }
    }
}
