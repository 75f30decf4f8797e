// PCH add/remove planning
//
// Turns analyzer output plus the current PCH header list into a concrete plan
// and the text of the regenerated PCH source.

use crate::dependency_graph::DependencyGraph;
use crate::headers::is_system_header;
use crate::pch::analyzer::{
    estimate_header_compile_times, usage_ratio, PchAnalyzer, PchCandidate, PCH_SAVINGS_FACTOR,
};
use crate::trace::BuildTrace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Headers used by fewer than this share of files are always removed
pub const REMOVAL_USAGE_RATIO: f64 = 0.15;

/// Headers cheaper than this (per-file ms) must be used widely to stay
pub const LOW_COMPILE_TIME_MS: f64 = 50.0;

/// Usage share a cheap header needs to stay in the PCH
pub const CHEAP_HEADER_RETAIN_RATIO: f64 = 0.5;

/// Share of a removed header's compile time charged back against the plan
pub const REMOVAL_PENALTY_FACTOR: f64 = 0.1;

/// Concrete PCH change plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PchPlan {
    pub headers_to_add: Vec<String>,
    pub headers_to_remove: Vec<String>,
    /// Current headers after removals, followed by additions (no duplicates)
    pub resulting_headers: Vec<String>,
    /// Regenerated PCH header text
    pub pch_source: String,
    pub estimated_savings_ms: f64,
}

impl PchPlan {
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "PCH plan: +{} / -{} headers, estimated savings {:.1} ms\n",
            self.headers_to_add.len(),
            self.headers_to_remove.len(),
            self.estimated_savings_ms
        ));
        for header in &self.headers_to_add {
            report.push_str(&format!("  + {}\n", header));
        }
        for header in &self.headers_to_remove {
            report.push_str(&format!("  - {}\n", header));
        }
        report
    }
}

/// Builds add/remove plans for a project's precompiled header
#[derive(Debug, Clone)]
pub struct PchOptimizer {
    analyzer: PchAnalyzer,
    top_n: usize,
    min_inclusion_ratio: f64,
}

impl Default for PchOptimizer {
    fn default() -> Self {
        Self::new(10, 0.3)
    }
}

impl PchOptimizer {
    pub fn new(top_n: usize, min_inclusion_ratio: f64) -> Self {
        Self {
            analyzer: PchAnalyzer::new(),
            top_n,
            min_inclusion_ratio,
        }
    }

    pub fn suggest_headers_to_add(
        &self,
        trace: &BuildTrace,
        graph: &DependencyGraph,
        current_headers: &[String],
    ) -> Vec<PchCandidate> {
        self.analyzer.suggest_pch_additions(
            trace,
            graph,
            current_headers,
            self.top_n,
            self.min_inclusion_ratio,
        )
    }

    /// Rarely used headers, and cheap headers that are not used by most files
    pub fn suggest_headers_to_remove(
        &self,
        trace: &BuildTrace,
        graph: &DependencyGraph,
        current_headers: &[String],
    ) -> Vec<String> {
        let total_files = trace.compilation_units.len();
        if total_files == 0 {
            return Vec::new();
        }
        let compile_times = estimate_header_compile_times(trace, graph);

        current_headers
            .iter()
            .filter(|header| {
                let ratio = usage_ratio(graph, header, total_files);
                if ratio < REMOVAL_USAGE_RATIO {
                    return true;
                }
                let compile_time = compile_times.get(header.as_str()).copied().unwrap_or(0.0);
                compile_time < LOW_COMPILE_TIME_MS && ratio <= CHEAP_HEADER_RETAIN_RATIO
            })
            .cloned()
            .collect()
    }

    /// Plan additions and removals and synthesize the new PCH text
    pub fn optimize(
        &self,
        trace: &BuildTrace,
        graph: &DependencyGraph,
        current_headers: &[String],
    ) -> PchPlan {
        let additions = self.suggest_headers_to_add(trace, graph, current_headers);
        let removals = self.suggest_headers_to_remove(trace, graph, current_headers);
        let compile_times = estimate_header_compile_times(trace, graph);

        let removed: BTreeSet<&str> = removals.iter().map(String::as_str).collect();
        let mut seen = BTreeSet::new();
        let resulting_headers: Vec<String> = current_headers
            .iter()
            .filter(|h| !removed.contains(h.as_str()))
            .chain(additions.iter().map(|c| &c.header))
            .filter(|h| seen.insert(h.as_str()))
            .cloned()
            .collect();

        let gained: f64 = additions
            .iter()
            .map(|c| {
                let fan_out = graph.get_reverse_dependencies(&c.header).len();
                c.average_compile_time_ms * fan_out as f64 * PCH_SAVINGS_FACTOR
            })
            .sum();
        let lost: f64 = removals
            .iter()
            .map(|h| {
                compile_times.get(h.as_str()).copied().unwrap_or(0.0) * REMOVAL_PENALTY_FACTOR
            })
            .sum();

        PchPlan {
            headers_to_add: additions.into_iter().map(|c| c.header).collect(),
            headers_to_remove: removals,
            pch_source: generate_pch_source(&resulting_headers),
            resulting_headers,
            estimated_savings_ms: gained - lost,
        }
    }
}

/// Render a PCH header that includes every given header once
pub fn generate_pch_source(headers: &[String]) -> String {
    let mut source = String::new();
    source.push_str("// Precompiled header generated by buildlens\n");
    source.push_str("#pragma once\n\n");
    for header in headers {
        let trimmed = header.trim_start_matches('<').trim_end_matches('>');
        if is_system_header(header) {
            source.push_str(&format!("#include <{}>\n", trimmed));
        } else {
            source.push_str(&format!("#include \"{}\"\n", trimmed));
        }
    }
    source
}
