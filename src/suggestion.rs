//! Uniform suggestion shape shared by every suggestion source

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// What kind of change a suggestion proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionType {
    ForwardDeclaration,
    HeaderSplit,
    PimplPattern,
    PchAddition,
    PchRemoval,
    ExplicitTemplateInstantiation,
}

impl fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SuggestionType::ForwardDeclaration => "Forward declaration",
            SuggestionType::HeaderSplit => "Header split",
            SuggestionType::PimplPattern => "PIMPL pattern",
            SuggestionType::PchAddition => "PCH addition",
            SuggestionType::PchRemoval => "PCH removal",
            SuggestionType::ExplicitTemplateInstantiation => "Explicit template instantiation",
        };
        f.write_str(name)
    }
}

/// Urgency of a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Bucket an estimated saving
    pub fn from_savings(savings_ms: f64) -> Self {
        if savings_ms >= 1000.0 {
            Priority::Critical
        } else if savings_ms >= 250.0 {
            Priority::High
        } else if savings_ms >= 50.0 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

/// One actionable build-speed suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub priority: Priority,
    /// Reliability estimate in [0, 1]
    pub confidence: f64,
    pub title: String,
    pub description: String,
    pub file_path: String,
    #[serde(default)]
    pub related_files: Vec<String>,
    #[serde(default)]
    pub affected_files: Vec<String>,
    pub estimated_time_savings_ms: f64,
    pub is_safe: bool,
}

impl Suggestion {
    /// Ranking key: confidence × estimated savings
    pub fn composite_score(&self) -> f64 {
        self.confidence * self.estimated_time_savings_ms
    }

    pub fn to_report_string(&self) -> String {
        let safety = if self.is_safe { "safe" } else { "review" };
        format!(
            "[{:?}] {} ({}, {:.0}% confidence, ~{:.1} ms, {})\n   {}\n   {}",
            self.priority,
            self.title,
            self.suggestion_type,
            self.confidence * 100.0,
            self.estimated_time_savings_ms,
            safety,
            self.file_path,
            self.description
        )
    }
}

/// Source of suggestion identifiers
pub trait IdGenerator: Send + Sync {
    /// A new identifier, unique for the lifetime of the process
    fn new_id(&self) -> String;
}

/// Process-wide counter; identifiers look like `sugg-000001`
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    prefix: Option<String>,
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn new_id(&self) -> String {
        let n = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:06}", self.prefix.as_deref().unwrap_or("sugg"), n)
    }
}
