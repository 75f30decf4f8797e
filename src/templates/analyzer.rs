// Template instantiation cost aggregation

use crate::templates::normalize::{is_std_template, normalize_template_name};
use crate::trace::{BuildTrace, CompilationUnit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated cost of one normalized template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateHotspot {
    /// Normalized template name
    pub name: String,
    /// Total instantiation time across all units
    pub time_ms: f64,
    pub instantiation_count: usize,
    /// Call stack of the first instantiation seen
    pub call_stack: Vec<String>,
    /// Unit in which the first instantiation was seen
    pub first_unit: String,
}

impl TemplateHotspot {
    pub fn to_report_string(&self) -> String {
        format!(
            "{} ({:.1} ms over {} instantiations)",
            self.name, self.time_ms, self.instantiation_count
        )
    }
}

/// Aggregates template instantiation records from a trace
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateAnalyzer;

impl TemplateAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Templates costing at least `threshold_ms`, most expensive first
    pub fn find_expensive_templates(
        &self,
        trace: &BuildTrace,
        top_n: usize,
        threshold_ms: f64,
    ) -> Vec<TemplateHotspot> {
        let mut hotspots: Vec<TemplateHotspot> = aggregate(trace)
            .into_values()
            .filter(|h| h.time_ms >= threshold_ms)
            .collect();

        hotspots.sort_by(|a, b| b.time_ms.total_cmp(&a.time_ms));
        hotspots.truncate(top_n);
        hotspots
    }

    /// Share of the unit's compile time spent instantiating templates (0-100)
    pub fn calculate_template_overhead(&self, unit: &CompilationUnit) -> f64 {
        if unit.total_time_ms <= 0.0 {
            return 0.0;
        }

        let template_time: f64 = unit
            .template_instantiations
            .iter()
            .map(|inst| inst.time_ms)
            .sum();

        (template_time / unit.total_time_ms * 100.0).clamp(0.0, 100.0)
    }

    /// Non-standard templates instantiated at least `min_count` times, most frequent first
    ///
    /// These are candidates for an explicit instantiation in one unit plus
    /// `extern template` declarations everywhere else.
    pub fn suggest_explicit_instantiations(
        &self,
        trace: &BuildTrace,
        min_count: usize,
    ) -> Vec<TemplateHotspot> {
        let mut candidates: Vec<TemplateHotspot> = aggregate(trace)
            .into_values()
            .filter(|h| h.instantiation_count >= min_count && !is_std_template(&h.name))
            .collect();

        candidates.sort_by(|a, b| b.instantiation_count.cmp(&a.instantiation_count));
        candidates
    }
}

fn aggregate(trace: &BuildTrace) -> BTreeMap<String, TemplateHotspot> {
    let mut by_name: BTreeMap<String, TemplateHotspot> = BTreeMap::new();

    for unit in &trace.compilation_units {
        for inst in &unit.template_instantiations {
            let name = normalize_template_name(&inst.name);
            let entry = by_name
                .entry(name.clone())
                .or_insert_with(|| TemplateHotspot {
                    name,
                    time_ms: 0.0,
                    instantiation_count: 0,
                    call_stack: inst.call_stack.clone(),
                    first_unit: unit.file_path.clone(),
                });
            entry.time_ms += inst.time_ms;
            entry.instantiation_count += 1;
        }
    }

    by_name
}
