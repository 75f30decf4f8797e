// Precompiled-header candidate scoring
//
// Headers are scored by how often they are depended upon and how much
// preprocessing time they are estimated to contribute per including file.

use crate::dependency_graph::DependencyGraph;
use crate::error::{AnalysisError, Result};
use crate::headers::is_system_header;
use crate::trace::BuildTrace;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Fraction of a header's compile time assumed recoverable through a PCH
pub const PCH_SAVINGS_FACTOR: f64 = 0.8;

/// Headers of the current PCH used by fewer than this share of files are dropped
pub const PCH_REMOVAL_USAGE_RATIO: f64 = 0.10;

/// A header scored as a precompiled-header candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PchCandidate {
    pub header: String,
    pub inclusion_count: usize,
    /// Estimated per-file preprocessing cost of the header
    pub average_compile_time_ms: f64,
    pub potential_savings_ms: f64,
    pub benefit_score: f64,
}

/// How well an existing PCH is being used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PchEffectiveness {
    pub pch_file: String,
    pub pch_build_time_ms: f64,
    pub users: usize,
    /// Percentage of units that include the PCH (0-100)
    pub hit_rate: f64,
    pub total_time_saved_ms: f64,
    pub average_time_saved_per_file_ms: f64,
}

/// Scores headers as PCH candidates
#[derive(Debug, Clone, Copy, Default)]
pub struct PchAnalyzer;

impl PchAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Rank non-system headers included by at least `min_inclusion_ratio` of the units
    ///
    /// A header counts as a system header when its path says so or when any
    /// edge into it carries the trace's system flag. The ratio boundary is inclusive. An empty trace yields no candidates.
    ///
    /// # Example
    /// ```
    /// use buildlens::dependency_graph::EdgeType;
    /// use buildlens::pch::PchAnalyzer;
    /// use buildlens::trace::{BuildTrace, CompilationUnit};
    ///
    /// let mut trace = BuildTrace::default();
    /// for name in ["a.cpp", "b.cpp"] {
    ///     let mut unit = CompilationUnit::new(name, 1000.0);
    ///     unit.preprocessing_time_ms = 400.0;
    ///     trace.compilation_units.push(unit);
    ///     trace.dependency_graph.add_edge(name, "common.h", EdgeType::DirectInclude);
    /// }
    ///
    /// let graph = trace.dependency_graph.clone();
    /// let candidates = PchAnalyzer::new().identify_pch_candidates(&trace, &graph, 10, 0.5);
    /// assert_eq!(candidates[0].header, "common.h");
    /// assert_eq!(candidates[0].inclusion_count, 2);
    /// ```
    pub fn identify_pch_candidates(
        &self,
        trace: &BuildTrace,
        graph: &DependencyGraph,
        top_n: usize,
        min_inclusion_ratio: f64,
    ) -> Vec<PchCandidate> {
        let total_files = trace.compilation_units.len();
        if total_files == 0 {
            return Vec::new();
        }

        let inclusion_counts = count_inclusions(graph);
        let compile_times = estimate_header_compile_times(trace, graph);
        let flagged_system = graph.flagged_system_headers();
        let min_inclusions = total_files as f64 * min_inclusion_ratio;

        let mut candidates: Vec<PchCandidate> = inclusion_counts
            .into_iter()
            .filter(|(header, count)| {
                *count as f64 >= min_inclusions
                    && !is_system_header(header)
                    && !flagged_system.contains(header)
            })
            .map(|(header, inclusion_count)| {
                let compile_time = compile_times.get(header).copied().unwrap_or(0.0);
                let ratio = inclusion_count as f64 / total_files as f64;
                PchCandidate {
                    header: header.to_string(),
                    inclusion_count,
                    average_compile_time_ms: compile_time,
                    potential_savings_ms: compile_time
                        * inclusion_count as f64
                        * PCH_SAVINGS_FACTOR,
                    benefit_score: ratio * (compile_time / 1000.0) * inclusion_count as f64,
                }
            })
            .collect();

        candidates.sort_by(|a, b| b.benefit_score.total_cmp(&a.benefit_score));
        candidates.truncate(top_n);
        candidates
    }

    /// Measure how an existing PCH is used across the trace
    ///
    /// # Errors
    /// `NotFound` when the PCH has no compilation unit of its own in the trace.
    pub fn analyze_pch_effectiveness(
        &self,
        trace: &BuildTrace,
        pch_file: &str,
    ) -> Result<PchEffectiveness> {
        let pch_unit = trace.find_unit(pch_file).ok_or_else(|| {
            AnalysisError::NotFound(format!("PCH '{}' is not built in this trace", pch_file))
        })?;
        let pch_build_time_ms = pch_unit.total_time_ms;

        let users = trace
            .compilation_units
            .iter()
            .filter(|u| u.direct_includes.iter().any(|inc| inc == pch_file))
            .count();

        let total_units = trace.compilation_units.len();
        let hit_rate = users as f64 / total_units as f64 * 100.0;
        let total_time_saved_ms = users as f64 * pch_build_time_ms * PCH_SAVINGS_FACTOR;
        let average_time_saved_per_file_ms = if users > 0 {
            total_time_saved_ms / users as f64
        } else {
            0.0
        };

        Ok(PchEffectiveness {
            pch_file: pch_file.to_string(),
            pch_build_time_ms,
            users,
            hit_rate,
            total_time_saved_ms,
            average_time_saved_per_file_ms,
        })
    }

    /// Candidates that are not already part of the current PCH
    pub fn suggest_pch_additions(
        &self,
        trace: &BuildTrace,
        graph: &DependencyGraph,
        current_pch_headers: &[String],
        top_n: usize,
        min_inclusion_ratio: f64,
    ) -> Vec<PchCandidate> {
        let current: BTreeSet<&str> = current_pch_headers.iter().map(String::as_str).collect();
        self.identify_pch_candidates(trace, graph, top_n, min_inclusion_ratio)
            .into_iter()
            .filter(|c| !current.contains(c.header.as_str()))
            .collect()
    }

    /// Headers of the current PCH that too few files depend on
    pub fn suggest_pch_removals(
        &self,
        trace: &BuildTrace,
        graph: &DependencyGraph,
        current_pch_headers: &[String],
    ) -> Vec<String> {
        let total_files = trace.compilation_units.len();
        if total_files == 0 {
            return Vec::new();
        }

        current_pch_headers
            .iter()
            .filter(|header| usage_ratio(graph, header, total_files) < PCH_REMOVAL_USAGE_RATIO)
            .cloned()
            .collect()
    }

    /// Total projected savings of precompiling `headers`
    pub fn estimate_pch_savings(
        &self,
        headers: &[String],
        trace: &BuildTrace,
        graph: &DependencyGraph,
    ) -> f64 {
        if headers.is_empty() {
            return 0.0;
        }

        let inclusion_counts = count_inclusions(graph);
        let compile_times = estimate_header_compile_times(trace, graph);

        headers
            .iter()
            .map(|header| {
                let count = inclusion_counts.get(header.as_str()).copied().unwrap_or(0);
                let time = compile_times.get(header.as_str()).copied().unwrap_or(0.0);
                time * count as f64 * PCH_SAVINGS_FACTOR
            })
            .sum()
    }
}

/// Number of edges pointing at each target, duplicates included
pub(crate) fn count_inclusions(graph: &DependencyGraph) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for node in graph.get_all_nodes() {
        for edge in graph.get_edges(node) {
            *counts.entry(edge.target.as_str()).or_insert(0) += 1;
        }
    }
    counts
}

/// Per-file average preprocessing cost attributed to each header
///
/// Each unit's preprocessing time is split evenly across its direct
/// dependencies, then each header's total is divided by its fan-out.
pub(crate) fn estimate_header_compile_times<'g>(
    trace: &BuildTrace,
    graph: &'g DependencyGraph,
) -> BTreeMap<&'g str, f64> {
    let mut accumulated: BTreeMap<&'g str, f64> = BTreeMap::new();

    for unit in &trace.compilation_units {
        if unit.preprocessing_time_ms <= 0.0 {
            continue;
        }
        let deps = graph.get_dependencies(&unit.file_path);
        if deps.is_empty() {
            continue;
        }
        let share = unit.preprocessing_time_ms / deps.len() as f64;
        for dep in deps {
            *accumulated.entry(dep).or_insert(0.0) += share;
        }
    }

    for (header, time) in accumulated.iter_mut() {
        let fan_out = graph.get_reverse_dependencies(header).len();
        if fan_out > 0 {
            *time /= fan_out as f64;
        }
    }

    accumulated
}

/// Share of units that depend on `header`
pub(crate) fn usage_ratio(graph: &DependencyGraph, header: &str, total_files: usize) -> f64 {
    if total_files == 0 {
        return 0.0;
    }
    graph.get_reverse_dependencies(header).len() as f64 / total_files as f64
}
