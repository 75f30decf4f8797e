// Precompiled-Header Analysis
//
// Scores headers as PCH candidates from inclusion frequency and estimated
// preprocessing cost, measures how an existing PCH is used, and plans
// add/remove changes to the current PCH header list.
//
// Scoring:
//   inclusion_count      = edges pointing at the header (duplicates count)
//   compile_time_ms      = Σ(unit preprocessing / unit direct deps) / fan-out
//   benefit_score        = (inclusion_count / files) * (compile_time_ms / 1000) * inclusion_count
//   potential_savings_ms = compile_time_ms * inclusion_count * 0.8

mod analyzer;
mod optimizer;

pub use analyzer::{
    PchAnalyzer, PchCandidate, PchEffectiveness, PCH_REMOVAL_USAGE_RATIO, PCH_SAVINGS_FACTOR,
};
pub use optimizer::{generate_pch_source, PchOptimizer, PchPlan, LOW_COMPILE_TIME_MS};

pub(crate) use analyzer::{estimate_header_compile_times, usage_ratio};

#[cfg(test)]
mod tests;
