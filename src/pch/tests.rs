// Unit tests for PCH candidate scoring and planning
//
// Fixtures use round preprocessing times so expected per-header costs can be
// worked out by hand.

use super::*;
use crate::dependency_graph::{DependencyEdge, EdgeType};
use crate::trace::{BuildTrace, CompilationUnit};

fn unit(name: &str, preprocessing_ms: f64) -> CompilationUnit {
    let mut unit = CompilationUnit::new(name, preprocessing_ms * 2.0);
    unit.preprocessing_time_ms = preprocessing_ms;
    unit
}

fn include(trace: &mut BuildTrace, source: &str, header: &str) {
    trace
        .dependency_graph
        .add_edge(source, header, EdgeType::DirectInclude);
    if let Some(u) = trace
        .compilation_units
        .iter_mut()
        .find(|u| u.file_path == source)
    {
        u.direct_includes.push(header.to_string());
    }
}

/// Six units; common.h in three of them, core.h in all, rare.h in one
///
/// Per-file costs: common.h = 800/3, core.h = 2600/6, rare.h = 200
fn six_unit_trace() -> BuildTrace {
    let mut trace = BuildTrace::default();
    for name in ["a.cpp", "b.cpp", "c.cpp", "d.cpp", "e.cpp", "f.cpp"] {
        trace.compilation_units.push(unit(name, 600.0));
    }
    for name in ["a.cpp", "b.cpp", "c.cpp"] {
        include(&mut trace, name, "common.h");
    }
    for name in ["a.cpp", "b.cpp", "c.cpp", "d.cpp", "e.cpp", "f.cpp"] {
        include(&mut trace, name, "core.h");
    }
    include(&mut trace, "a.cpp", "rare.h");
    trace
}

/// Ten units; big.h everywhere, cheap.h in four, rare.h in one
fn ten_unit_trace() -> BuildTrace {
    let mut trace = BuildTrace::default();
    let names: Vec<String> = (0..10).map(|i| format!("u{}.cpp", i)).collect();
    for name in &names {
        trace.compilation_units.push(unit(name, 100.0));
    }
    for name in &names {
        include(&mut trace, name, "big.h");
    }
    include(&mut trace, "u0.cpp", "rare.h");
    for name in &names[..4] {
        include(&mut trace, name, "cheap.h");
    }
    trace
}

#[test]
fn test_candidates_sorted_by_benefit() {
    let trace = six_unit_trace();
    let graph = trace.dependency_graph.clone();
    let candidates = PchAnalyzer::new().identify_pch_candidates(&trace, &graph, 10, 0.5);

    let headers: Vec<&str> = candidates.iter().map(|c| c.header.as_str()).collect();
    assert_eq!(headers, vec!["core.h", "common.h"]);

    let core = &candidates[0];
    assert_eq!(core.inclusion_count, 6);
    assert!((core.average_compile_time_ms - 2600.0 / 6.0).abs() < 1e-9);
    assert!((core.benefit_score - 2.6).abs() < 1e-9);
    assert!((core.potential_savings_ms - 2600.0 / 6.0 * 6.0 * 0.8).abs() < 1e-9);
}

#[test]
fn test_inclusion_ratio_boundary_is_inclusive() {
    // common.h is included by exactly 3 of 6 units
    let trace = six_unit_trace();
    let graph = trace.dependency_graph.clone();
    let candidates = PchAnalyzer::new().identify_pch_candidates(&trace, &graph, 10, 0.5);

    assert!(candidates.iter().any(|c| c.header == "common.h"));
    assert!(!candidates.iter().any(|c| c.header == "rare.h"));
}

#[test]
fn test_top_n_truncates() {
    let trace = six_unit_trace();
    let graph = trace.dependency_graph.clone();
    let candidates = PchAnalyzer::new().identify_pch_candidates(&trace, &graph, 1, 0.0);

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].header, "core.h");
}

#[test]
fn test_system_headers_excluded() {
    let mut trace = six_unit_trace();
    for name in ["a.cpp", "b.cpp", "c.cpp", "d.cpp", "e.cpp", "f.cpp"] {
        include(&mut trace, name, "/usr/include/c++/13/vector");
    }
    let graph = trace.dependency_graph.clone();
    let candidates = PchAnalyzer::new().identify_pch_candidates(&trace, &graph, 10, 0.0);

    assert!(candidates.iter().all(|c| !c.header.contains("/usr/include/")));
}

#[test]
fn test_flagged_system_headers_excluded() {
    let mut trace = six_unit_trace();
    for name in ["a.cpp", "b.cpp", "c.cpp", "d.cpp", "e.cpp", "f.cpp"] {
        trace.dependency_graph.add_dependency_edge(
            name,
            DependencyEdge {
                is_system_header: true,
                ..DependencyEdge::new("/opt/sdk/include/sdk.h", EdgeType::DirectInclude)
            },
        );
    }
    let graph = trace.dependency_graph.clone();
    let candidates = PchAnalyzer::new().identify_pch_candidates(&trace, &graph, 10, 0.0);

    assert!(!candidates.is_empty());
    assert!(candidates.iter().all(|c| c.header != "/opt/sdk/include/sdk.h"));
}

#[test]
fn test_repeated_analysis_is_identical() {
    let trace = six_unit_trace();
    let graph = trace.dependency_graph.clone();
    let analyzer = PchAnalyzer::new();
    let headers = vec!["common.h".to_string(), "core.h".to_string()];

    assert_eq!(
        analyzer.identify_pch_candidates(&trace, &graph, 10, 0.0),
        analyzer.identify_pch_candidates(&trace, &graph, 10, 0.0)
    );
    assert_eq!(
        analyzer.estimate_pch_savings(&headers, &trace, &graph).to_bits(),
        analyzer.estimate_pch_savings(&headers, &trace, &graph).to_bits()
    );

    let optimizer = PchOptimizer::default();
    let current = vec!["rare.h".to_string()];
    assert_eq!(
        optimizer.optimize(&trace, &graph, &current),
        optimizer.optimize(&trace, &graph, &current)
    );
}

#[test]
fn test_empty_trace_has_no_candidates() {
    let trace = BuildTrace::default();
    let candidates =
        PchAnalyzer::new().identify_pch_candidates(&trace, &trace.dependency_graph, 10, 0.1);
    assert!(candidates.is_empty());
}

#[test]
fn test_units_without_preprocessing_time_contribute_nothing() {
    let mut trace = BuildTrace::default();
    trace.compilation_units.push(unit("a.cpp", 0.0));
    trace.compilation_units.push(unit("b.cpp", 0.0));
    include(&mut trace, "a.cpp", "x.h");
    include(&mut trace, "b.cpp", "x.h");

    let graph = trace.dependency_graph.clone();
    let candidates = PchAnalyzer::new().identify_pch_candidates(&trace, &graph, 10, 0.5);

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].average_compile_time_ms, 0.0);
    assert_eq!(candidates[0].benefit_score, 0.0);
}

#[test]
fn test_pch_effectiveness() {
    let mut trace = BuildTrace::default();
    trace
        .compilation_units
        .push(CompilationUnit::new("pch.h", 500.0));
    for name in ["a.cpp", "b.cpp", "c.cpp"] {
        trace.compilation_units.push(unit(name, 100.0));
    }
    trace.compilation_units[1]
        .direct_includes
        .push("pch.h".to_string());
    trace.compilation_units[2]
        .direct_includes
        .push("pch.h".to_string());

    let report = PchAnalyzer::new()
        .analyze_pch_effectiveness(&trace, "pch.h")
        .unwrap();

    assert_eq!(report.users, 2);
    assert_eq!(report.pch_build_time_ms, 500.0);
    assert!((report.hit_rate - 50.0).abs() < 1e-9);
    assert!((report.total_time_saved_ms - 800.0).abs() < 1e-9);
    assert!((report.average_time_saved_per_file_ms - 400.0).abs() < 1e-9);
}

#[test]
fn test_pch_effectiveness_without_users() {
    let mut trace = BuildTrace::default();
    trace
        .compilation_units
        .push(CompilationUnit::new("pch.h", 500.0));
    trace.compilation_units.push(unit("a.cpp", 100.0));

    let report = PchAnalyzer::new()
        .analyze_pch_effectiveness(&trace, "pch.h")
        .unwrap();
    assert_eq!(report.users, 0);
    assert_eq!(report.hit_rate, 0.0);
    assert_eq!(report.average_time_saved_per_file_ms, 0.0);
}

#[test]
fn test_pch_effectiveness_missing_pch() {
    let trace = six_unit_trace();
    let err = PchAnalyzer::new()
        .analyze_pch_effectiveness(&trace, "missing_pch.h")
        .unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::NotFound);
}

#[test]
fn test_additions_skip_current_headers() {
    let trace = six_unit_trace();
    let graph = trace.dependency_graph.clone();
    let additions = PchAnalyzer::new().suggest_pch_additions(
        &trace,
        &graph,
        &["core.h".to_string()],
        10,
        0.5,
    );

    assert_eq!(additions.len(), 1);
    assert_eq!(additions[0].header, "common.h");
}

#[test]
fn test_removals_below_usage_ratio() {
    let trace = six_unit_trace();
    let graph = trace.dependency_graph.clone();
    let removals = PchAnalyzer::new().suggest_pch_removals(
        &trace,
        &graph,
        &["core.h".to_string(), "ghost.h".to_string()],
    );
    assert_eq!(removals, vec!["ghost.h".to_string()]);
}

#[test]
fn test_estimate_savings() {
    let trace = six_unit_trace();
    let graph = trace.dependency_graph.clone();
    let analyzer = PchAnalyzer::new();

    assert_eq!(analyzer.estimate_pch_savings(&[], &trace, &graph), 0.0);

    let savings = analyzer.estimate_pch_savings(&["common.h".to_string()], &trace, &graph);
    assert!((savings - 640.0).abs() < 1e-6);

    let unknown = analyzer.estimate_pch_savings(&["ghost.h".to_string()], &trace, &graph);
    assert_eq!(unknown, 0.0);
}

#[test]
fn test_optimizer_removes_rare_and_cheap_headers() {
    let trace = ten_unit_trace();
    let graph = trace.dependency_graph.clone();
    let optimizer = PchOptimizer::default();

    let current = vec!["big.h".to_string(), "rare.h".to_string(), "cheap.h".to_string()];
    let removals = optimizer.suggest_headers_to_remove(&trace, &graph, &current);

    // rare.h: usage 0.1 < 0.15; cheap.h: ~45.8 ms per file with usage 0.4
    assert_eq!(removals, vec!["rare.h".to_string(), "cheap.h".to_string()]);
}

#[test]
fn test_optimizer_plan() {
    let trace = ten_unit_trace();
    let graph = trace.dependency_graph.clone();
    let optimizer = PchOptimizer::default();

    let current = vec!["rare.h".to_string(), "cheap.h".to_string()];
    let plan = optimizer.optimize(&trace, &graph, &current);

    assert_eq!(plan.headers_to_add, vec!["big.h".to_string()]);
    assert_eq!(
        plan.headers_to_remove,
        vec!["rare.h".to_string(), "cheap.h".to_string()]
    );
    assert_eq!(plan.resulting_headers, vec!["big.h".to_string()]);
    assert!(plan.pch_source.contains("#include \"big.h\""));
    assert!(!plan.pch_source.contains("rare.h"));
    assert!((plan.estimated_savings_ms - 618.75).abs() < 1e-6);
}

#[test]
fn test_optimizer_deduplicates_headers() {
    let trace = ten_unit_trace();
    let graph = trace.dependency_graph.clone();
    let optimizer = PchOptimizer::default();

    let current = vec!["big.h".to_string(), "big.h".to_string()];
    let plan = optimizer.optimize(&trace, &graph, &current);

    assert!(plan.headers_to_remove.is_empty());
    assert_eq!(
        plan.resulting_headers,
        vec!["big.h".to_string(), "cheap.h".to_string()]
    );
}

#[test]
fn test_generate_pch_source() {
    let source = generate_pch_source(&["vector".to_string(), "include/app.h".to_string()]);

    assert!(source.contains("#pragma once"));
    assert!(source.contains("#include <vector>"));
    assert!(source.contains("#include \"include/app.h\""));
}

#[test]
fn test_plan_report_string() {
    let trace = ten_unit_trace();
    let graph = trace.dependency_graph.clone();
    let plan = PchOptimizer::default().optimize(&trace, &graph, &["rare.h".to_string()]);

    let report = plan.to_report_string();
    assert!(report.contains("- rare.h"));
    assert!(report.contains("+ big.h"));
}
