// Suggestion Engine
//
// Runs every enabled suggestion source over a build trace, then ranks and
// filters the combined list.
//
// Run order is fixed by `SourceKind::ALL`:
//   forward declaration → header split → PCH → PIMPL → template instantiation
//
// Ranking key is confidence × estimated savings (highest first, stable).
// A suggestion survives when confidence >= min_confidence AND
// savings >= min_time_savings_ms; at most max_suggestions are kept.
//
// A source that fails is logged and skipped; the remaining sources still run.

mod options;
mod ranking;
mod source;

pub use options::SuggestionOptions;
pub use ranking::{
    filter_and_rank, rank_and_filter, rank_suggestions, should_include_suggestion, take_top,
};
pub use source::{
    AnalysisContext, HeaderSplitSource, PchSource, SourceKind, SuggestionSource,
    TemplateInstantiationSource,
};

use crate::error::{AnalysisError, Result};
use crate::header_split::HeaderSplitter;
use crate::suggestion::{IdGenerator, SequentialIdGenerator, Suggestion};
use crate::trace::BuildTrace;
use std::sync::Arc;

/// Orchestrates suggestion sources
///
/// One engine per concurrent analysis; sources hold no per-call state.
pub struct SuggestionEngine {
    sources: Vec<Box<dyn SuggestionSource>>,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for SuggestionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("SuggestionEngine")
            .field("sources", &names)
            .finish_non_exhaustive()
    }
}

impl SuggestionEngine {
    /// Engine with the built-in header split, PCH and template sources
    pub fn new(splitter: HeaderSplitter) -> Self {
        Self::empty()
            .with_source(Box::new(HeaderSplitSource::new(splitter)))
            .with_source(Box::new(PchSource::new()))
            .with_source(Box::new(TemplateInstantiationSource::new()))
    }

    /// Engine with no sources registered
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
            ids: Arc::new(SequentialIdGenerator::new()),
        }
    }

    /// Register an additional source, e.g. a forward-declaration or PIMPL producer
    pub fn with_source(mut self, source: Box<dyn SuggestionSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn sources(&self) -> impl Iterator<Item = &dyn SuggestionSource> {
        self.sources.iter().map(|s| s.as_ref())
    }

    /// Suggestions from every enabled source, unranked, in run order
    pub fn collect_suggestions(
        &self,
        trace: &BuildTrace,
        options: &SuggestionOptions,
    ) -> Vec<Suggestion> {
        let ctx = AnalysisContext {
            trace,
            options,
            ids: self.ids.as_ref(),
        };

        let mut all = Vec::new();
        for kind in SourceKind::ALL {
            if !kind.is_enabled(options) {
                continue;
            }
            for source in self.sources.iter().filter(|s| s.kind() == kind) {
                match source.produce(&ctx) {
                    Ok(suggestions) => {
                        tracing::debug!(
                            "{} produced {} suggestions",
                            source.name(),
                            suggestions.len()
                        );
                        all.extend(suggestions);
                    }
                    Err(e) => {
                        tracing::warn!("Suggestion source {} failed: {}", source.name(), e);
                    }
                }
            }
        }
        all
    }

    /// Suggestions of a single kind, unranked; ignores the enable flags
    pub fn generate_for(
        &self,
        kind: SourceKind,
        trace: &BuildTrace,
        options: &SuggestionOptions,
    ) -> Result<Vec<Suggestion>> {
        let ctx = AnalysisContext {
            trace,
            options,
            ids: self.ids.as_ref(),
        };

        let mut all = Vec::new();
        for source in self.sources.iter().filter(|s| s.kind() == kind) {
            all.extend(source.produce(&ctx)?);
        }
        Ok(all)
    }

    /// Run all enabled sources, then rank, filter and truncate per `options`
    ///
    /// # Errors
    /// `Analysis` when `options` fail validation. Source failures are logged,
    /// not returned.
    pub fn generate_all_suggestions(
        &self,
        trace: &BuildTrace,
        options: &SuggestionOptions,
    ) -> Result<Vec<Suggestion>> {
        options.validate().map_err(AnalysisError::Analysis)?;

        let all = self.collect_suggestions(trace, options);
        let total = all.len();
        let kept = rank_and_filter(
            all,
            options.min_confidence,
            options.min_time_savings_ms,
            options.max_suggestions,
        );

        tracing::info!(
            "Generated {} suggestions, {} kept after filtering",
            total,
            kept.len()
        );
        Ok(kept)
    }

    /// See [`filter_and_rank`](ranking::filter_and_rank)
    pub fn filter_and_rank(
        &self,
        suggestions: &mut Vec<Suggestion>,
        min_confidence: f64,
        min_time_savings_ms: f64,
        max_count: usize,
    ) -> Result<Suggestion> {
        filter_and_rank(suggestions, min_confidence, min_time_savings_ms, max_count)
    }
}
