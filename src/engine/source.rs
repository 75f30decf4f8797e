// Pluggable suggestion sources

use crate::engine::options::SuggestionOptions;
use crate::error::Result;
use crate::header_split::{HeaderSplitSuggestion, HeaderSplitter};
use crate::pch::{estimate_header_compile_times, usage_ratio, PchAnalyzer, PchCandidate};
use crate::suggestion::{IdGenerator, Priority, Suggestion, SuggestionType};
use crate::templates::{TemplateAnalyzer, TemplateHotspot};
use crate::trace::BuildTrace;
use std::collections::BTreeSet;

/// Share of a header's per-file cost charged to each unit that carries it in
/// the PCH without using it
const UNUSED_PCH_HEADER_COST_FACTOR: f64 = 0.1;

/// Category of a source, used for enable flags and run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    ForwardDeclaration,
    HeaderSplit,
    Pch,
    Pimpl,
    TemplateInstantiation,
}

impl SourceKind {
    /// Run order used by the engine
    pub const ALL: [SourceKind; 5] = [
        SourceKind::ForwardDeclaration,
        SourceKind::HeaderSplit,
        SourceKind::Pch,
        SourceKind::Pimpl,
        SourceKind::TemplateInstantiation,
    ];

    pub fn is_enabled(self, options: &SuggestionOptions) -> bool {
        match self {
            SourceKind::ForwardDeclaration => options.enable_forward_declarations,
            SourceKind::HeaderSplit => options.enable_header_splits,
            SourceKind::Pch => options.enable_pch,
            SourceKind::Pimpl => options.enable_pimpl,
            SourceKind::TemplateInstantiation => options.enable_template_instantiations,
        }
    }
}

/// Everything a source may read while producing suggestions
pub struct AnalysisContext<'a> {
    pub trace: &'a BuildTrace,
    pub options: &'a SuggestionOptions,
    pub ids: &'a dyn IdGenerator,
}

/// Producer of suggestions of one kind
///
/// Forward-declaration and PIMPL producers live outside this crate and are
/// registered through [`SuggestionEngine::with_source`](crate::engine::SuggestionEngine::with_source).
pub trait SuggestionSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    fn name(&self) -> &str;

    /// Suggestions for the trace; candidates that fail individually are skipped
    fn produce(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Suggestion>>;
}

fn dedup_paths(paths: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    paths
        .iter()
        .filter(|p| seen.insert(p.as_str()))
        .cloned()
        .collect()
}

/// Header split proposals for every widely included header
#[derive(Debug)]
pub struct HeaderSplitSource {
    splitter: HeaderSplitter,
}

impl HeaderSplitSource {
    pub fn new(splitter: HeaderSplitter) -> Self {
        Self { splitter }
    }

    pub fn splitter(&self) -> &HeaderSplitter {
        &self.splitter
    }

    fn to_suggestion(
        split: HeaderSplitSuggestion,
        dependents: Vec<String>,
        ids: &dyn IdGenerator,
    ) -> Suggestion {
        let mut description = split.rationale.clone();
        for part in &split.proposed_headers {
            description.push_str(&format!("\n  {}: {}", part.name, part.symbols.join(", ")));
        }

        Suggestion {
            id: ids.new_id(),
            suggestion_type: SuggestionType::HeaderSplit,
            priority: Priority::from_savings(split.estimated_benefit_ms),
            confidence: split.confidence,
            title: format!(
                "Split {} into {} headers",
                split.original_header,
                split.proposed_headers.len()
            ),
            description,
            file_path: split.original_header,
            related_files: split.proposed_headers.into_iter().map(|p| p.name).collect(),
            affected_files: dependents,
            estimated_time_savings_ms: split.estimated_benefit_ms,
            is_safe: false,
        }
    }
}

impl SuggestionSource for HeaderSplitSource {
    fn kind(&self) -> SourceKind {
        SourceKind::HeaderSplit
    }

    fn name(&self) -> &str {
        "header-split"
    }

    fn produce(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Suggestion>> {
        let graph = &ctx.trace.dependency_graph;
        let mut suggestions = Vec::new();

        for node in graph.get_all_nodes() {
            let reverse = graph.get_reverse_dependencies(node);
            if reverse.len() < ctx.options.header_split_fanout_threshold {
                continue;
            }

            match self
                .splitter
                .analyze_header(node, reverse, ctx.options.header_split_min_symbols)
            {
                Ok(split) => {
                    suggestions.push(Self::to_suggestion(split, dedup_paths(reverse), ctx.ids));
                }
                Err(e) => {
                    tracing::debug!("No split proposed for {}: {}", node, e);
                }
            }
        }

        Ok(suggestions)
    }
}

/// PCH additions, plus removals when a current PCH header list is configured
#[derive(Debug, Default)]
pub struct PchSource {
    analyzer: PchAnalyzer,
}

impl PchSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn addition(
        candidate: PchCandidate,
        total_files: usize,
        affected_files: Vec<String>,
        ids: &dyn IdGenerator,
    ) -> Suggestion {
        let ratio = candidate.inclusion_count as f64 / total_files as f64;
        Suggestion {
            id: ids.new_id(),
            suggestion_type: SuggestionType::PchAddition,
            priority: Priority::from_savings(candidate.potential_savings_ms),
            confidence: ratio.clamp(0.0, 1.0),
            title: format!("Add {} to the precompiled header", candidate.header),
            description: format!(
                "Depended upon {} times across {} units, costing ~{:.1} ms of preprocessing \
                 per including file (benefit score {:.2})",
                candidate.inclusion_count,
                total_files,
                candidate.average_compile_time_ms,
                candidate.benefit_score
            ),
            file_path: candidate.header,
            related_files: Vec::new(),
            affected_files,
            estimated_time_savings_ms: candidate.potential_savings_ms,
            is_safe: true,
        }
    }
}

impl SuggestionSource for PchSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Pch
    }

    fn name(&self) -> &str {
        "pch"
    }

    fn produce(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Suggestion>> {
        let trace = ctx.trace;
        let graph = &trace.dependency_graph;
        let options = ctx.options;
        let total_files = trace.compilation_units.len();
        if total_files == 0 {
            return Ok(Vec::new());
        }

        let mut suggestions: Vec<Suggestion> = self
            .analyzer
            .suggest_pch_additions(
                trace,
                graph,
                &options.current_pch_headers,
                options.pch_top_n,
                options.pch_min_inclusion_ratio,
            )
            .into_iter()
            .map(|candidate| {
                let affected = dedup_paths(graph.get_reverse_dependencies(&candidate.header));
                Self::addition(candidate, total_files, affected, ctx.ids)
            })
            .collect();

        if options.current_pch_headers.is_empty() {
            return Ok(suggestions);
        }

        let compile_times = estimate_header_compile_times(trace, graph);
        for header in self
            .analyzer
            .suggest_pch_removals(trace, graph, &options.current_pch_headers)
        {
            let ratio = usage_ratio(graph, &header, total_files);
            let compile_time = compile_times.get(header.as_str()).copied().unwrap_or(0.0);
            let non_users = total_files.saturating_sub(graph.get_reverse_dependencies(&header).len());
            let savings = compile_time * non_users as f64 * UNUSED_PCH_HEADER_COST_FACTOR;

            suggestions.push(Suggestion {
                id: ctx.ids.new_id(),
                suggestion_type: SuggestionType::PchRemoval,
                priority: Priority::from_savings(savings),
                confidence: (1.0 - ratio).clamp(0.0, 1.0),
                title: format!("Remove {} from the precompiled header", header),
                description: format!(
                    "Only {:.1}% of units depend on it; every other unit pays to load it",
                    ratio * 100.0
                ),
                file_path: header,
                related_files: options.current_pch_headers.clone(),
                affected_files: Vec::new(),
                estimated_time_savings_ms: savings,
                is_safe: true,
            });
        }

        Ok(suggestions)
    }
}

/// Explicit instantiation for templates instantiated in many units
#[derive(Debug, Default)]
pub struct TemplateInstantiationSource {
    analyzer: TemplateAnalyzer,
}

impl TemplateInstantiationSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_suggestion(hotspot: TemplateHotspot, ids: &dyn IdGenerator) -> Suggestion {
        let count = hotspot.instantiation_count.max(1) as f64;
        // One instantiation stays; the repeats are what explicit instantiation removes
        let savings = hotspot.time_ms * (count - 1.0) / count;

        Suggestion {
            id: ids.new_id(),
            suggestion_type: SuggestionType::ExplicitTemplateInstantiation,
            priority: Priority::from_savings(savings),
            confidence: (1.0 - 1.0 / count).clamp(0.0, 1.0),
            title: format!("Explicitly instantiate {}", hotspot.name),
            description: format!(
                "Instantiated {} times for {:.1} ms in total; instantiate once and declare \
                 `extern template` elsewhere",
                hotspot.instantiation_count, hotspot.time_ms
            ),
            file_path: hotspot.first_unit,
            related_files: hotspot.call_stack,
            affected_files: Vec::new(),
            estimated_time_savings_ms: savings,
            is_safe: false,
        }
    }
}

impl SuggestionSource for TemplateInstantiationSource {
    fn kind(&self) -> SourceKind {
        SourceKind::TemplateInstantiation
    }

    fn name(&self) -> &str {
        "template-instantiation"
    }

    fn produce(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Suggestion>> {
        Ok(self
            .analyzer
            .suggest_explicit_instantiations(ctx.trace, ctx.options.template_min_instantiations)
            .into_iter()
            .map(|hotspot| Self::to_suggestion(hotspot, ctx.ids))
            .collect())
    }
}
