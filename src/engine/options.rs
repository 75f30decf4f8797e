// Suggestion generation options

use serde::{Deserialize, Serialize};

/// Which sources run and which suggestions survive ranking
///
/// # Example
/// ```
/// use buildlens::engine::SuggestionOptions;
///
/// let options = SuggestionOptions::default();
/// assert_eq!(options.min_confidence, 0.5);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionOptions {
    pub enable_forward_declarations: bool,
    pub enable_header_splits: bool,
    pub enable_pch: bool,
    pub enable_pimpl: bool,
    /// Explicit template instantiation suggestions (off unless requested)
    pub enable_template_instantiations: bool,

    /// Suggestions below this confidence are dropped
    pub min_confidence: f64,

    /// Suggestions saving less than this are dropped
    pub min_time_savings_ms: f64,

    /// Maximum number of suggestions returned
    pub max_suggestions: usize,

    /// Headers with at least this many reverse dependencies are split candidates
    pub header_split_fanout_threshold: usize,

    /// Minimum symbols per proposed header
    pub header_split_min_symbols: usize,

    pub pch_top_n: usize,

    /// Share of units that must include a header for it to be a PCH candidate
    pub pch_min_inclusion_ratio: f64,

    /// Headers already in the project's PCH
    pub current_pch_headers: Vec<String>,

    /// Instantiations needed before explicit instantiation is suggested
    pub template_min_instantiations: usize,
}

impl Default for SuggestionOptions {
    fn default() -> Self {
        Self {
            enable_forward_declarations: true,
            enable_header_splits: true,
            enable_pch: true,
            enable_pimpl: true,
            enable_template_instantiations: false,
            min_confidence: 0.5,
            min_time_savings_ms: 10.0,
            max_suggestions: 50,
            header_split_fanout_threshold: 5,
            header_split_min_symbols: 3,
            pch_top_n: 10,
            pch_min_inclusion_ratio: 0.3,
            current_pch_headers: Vec::new(),
            template_min_instantiations: 3,
        }
    }
}

impl SuggestionOptions {
    /// Only confident, high-value suggestions
    pub fn strict() -> Self {
        Self {
            min_confidence: 0.75,
            min_time_savings_ms: 100.0,
            max_suggestions: 20,
            pch_min_inclusion_ratio: 0.5,
            ..Self::default()
        }
    }

    /// Surface everything that might help
    pub fn permissive() -> Self {
        Self {
            enable_template_instantiations: true,
            min_confidence: 0.1,
            min_time_savings_ms: 0.0,
            max_suggestions: 500,
            header_split_fanout_threshold: 2,
            pch_min_inclusion_ratio: 0.1,
            template_min_instantiations: 2,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "min_confidence must be in [0, 1], got {}",
                self.min_confidence
            ));
        }

        if self.min_time_savings_ms < 0.0 {
            return Err(format!(
                "min_time_savings_ms must be non-negative, got {}",
                self.min_time_savings_ms
            ));
        }

        if !(0.0..=1.0).contains(&self.pch_min_inclusion_ratio) {
            return Err(format!(
                "pch_min_inclusion_ratio must be in [0, 1], got {}",
                self.pch_min_inclusion_ratio
            ));
        }

        if self.header_split_min_symbols == 0 {
            return Err("header_split_min_symbols must be >= 1".to_string());
        }

        Ok(())
    }
}
