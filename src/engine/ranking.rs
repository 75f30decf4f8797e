// Ranking and threshold filtering

use crate::error::{AnalysisError, Result};
use crate::suggestion::Suggestion;

/// Keep suggestions that meet both thresholds (inclusive)
pub fn should_include_suggestion(
    suggestion: &Suggestion,
    min_confidence: f64,
    min_time_savings_ms: f64,
) -> bool {
    suggestion.confidence >= min_confidence
        && suggestion.estimated_time_savings_ms >= min_time_savings_ms
}

/// Sort by composite score (confidence × savings), highest first; ties keep input order
pub fn rank_suggestions(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(|a, b| b.composite_score().total_cmp(&a.composite_score()));
}

/// Rank, drop suggestions below either threshold, keep at most `max_count`
pub fn rank_and_filter(
    mut suggestions: Vec<Suggestion>,
    min_confidence: f64,
    min_time_savings_ms: f64,
    max_count: usize,
) -> Vec<Suggestion> {
    rank_suggestions(&mut suggestions);
    suggestions
        .into_iter()
        .filter(|s| should_include_suggestion(s, min_confidence, min_time_savings_ms))
        .take(max_count)
        .collect()
}

/// First suggestion of an already ranked list
pub fn take_top(suggestions: &[Suggestion]) -> Option<&Suggestion> {
    suggestions.first()
}

/// Replace `suggestions` with its ranked, filtered, truncated form and return the best one
///
/// The list is replaced even when nothing survives.
///
/// # Errors
/// `Analysis` when no suggestion meets the thresholds.
pub fn filter_and_rank(
    suggestions: &mut Vec<Suggestion>,
    min_confidence: f64,
    min_time_savings_ms: f64,
    max_count: usize,
) -> Result<Suggestion> {
    let kept = rank_and_filter(
        std::mem::take(suggestions),
        min_confidence,
        min_time_savings_ms,
        max_count,
    );
    *suggestions = kept;

    take_top(suggestions).cloned().ok_or_else(|| {
        AnalysisError::analysis(format!(
            "no suggestion meets confidence >= {} and savings >= {} ms",
            min_confidence, min_time_savings_ms
        ))
    })
}
