//! Analysis configuration loaded from TOML
//!
//! ```toml
//! [suggestions]
//! min_confidence = 0.6
//! current_pch_headers = ["include/common.h"]
//!
//! [header_split]
//! seed = 42
//! ```

use crate::engine::SuggestionOptions;
use crate::header_split::HeaderSplitConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything the `suggest` pipeline can be tuned with; missing tables use defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub suggestions: SuggestionOptions,
    pub header_split: HeaderSplitConfig,
}

impl AnalysisConfig {
    /// Load and validate a configuration file
    ///
    /// # Example
    /// ```no_run
    /// use buildlens::config::AnalysisConfig;
    ///
    /// let config = AnalysisConfig::from_toml("buildlens.toml")?;
    /// println!("min confidence: {}", config.suggestions.min_confidence);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AnalysisConfig =
            toml::from_str(content).context("Failed to parse TOML analysis config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Err(e) = self.suggestions.validate() {
            anyhow::bail!("[suggestions] {}", e);
        }
        if let Err(e) = self.header_split.validate() {
            anyhow::bail!("[header_split] {}", e);
        }
        Ok(())
    }
}
