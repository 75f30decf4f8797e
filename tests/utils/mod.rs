// Shared fixtures for integration tests
//
// Traces are built in code so expected numbers stay easy to derive:
// every unit's preprocessing time is split evenly over its direct includes.

#![allow(dead_code)]

use buildlens::dependency_graph::EdgeType;
use buildlens::symbols::StaticSymbolInspector;
use buildlens::trace::{BuildTrace, CompilationUnit, TemplateInstantiation};
use std::io::Write;
use tempfile::NamedTempFile;

pub const MATH_HEADER: &str = "include/math.h";

pub const MATH_DEPENDENTS: [&str; 4] = ["physics.cpp", "collide.cpp", "render.cpp", "camera.cpp"];

/// Add a unit whose preprocessing time is `preprocessing_ms`
pub fn add_unit(trace: &mut BuildTrace, name: &str, preprocessing_ms: f64) {
    let mut unit = CompilationUnit::new(name, preprocessing_ms * 2.5);
    unit.preprocessing_time_ms = preprocessing_ms;
    trace.compilation_units.push(unit);
}

/// Record a direct include in both the graph and the unit
pub fn include(trace: &mut BuildTrace, source: &str, header: &str) {
    trace
        .dependency_graph
        .add_edge(source, header, EdgeType::DirectInclude);
    if let Some(unit) = trace
        .compilation_units
        .iter_mut()
        .find(|u| u.file_path == source)
    {
        unit.direct_includes.push(header.to_string());
        unit.all_includes.push(header.to_string());
    }
}

pub fn instantiate(trace: &mut BuildTrace, unit: &str, template: &str, time_ms: f64) {
    if let Some(u) = trace
        .compilation_units
        .iter_mut()
        .find(|u| u.file_path == unit)
    {
        u.template_instantiations.push(TemplateInstantiation {
            name: template.to_string(),
            time_ms,
            call_stack: vec![unit.to_string()],
        });
    }
}

/// Eight units of a small game engine
///
/// - `include/core.h`: all eight units, 400 ms per file
/// - `include/math.h`: four units (the math dependents)
/// - `include/legacy.h`: one unit
/// - `Vector<float>` instantiated in four units, 30 ms each
pub fn engine_trace() -> BuildTrace {
    let mut trace = BuildTrace {
        trace_id: "engine-build".to_string(),
        build_system: "cmake".to_string(),
        ..BuildTrace::default()
    };

    let others = ["main.cpp", "audio.cpp", "input.cpp", "net.cpp"];
    for name in MATH_DEPENDENTS.iter().chain(others.iter()) {
        add_unit(&mut trace, name, 800.0);
        include(&mut trace, name, "include/core.h");
    }
    for name in MATH_DEPENDENTS {
        include(&mut trace, name, MATH_HEADER);
    }
    // main.cpp now splits 800 ms over two headers
    include(&mut trace, "main.cpp", "include/legacy.h");

    for name in ["physics.cpp", "collide.cpp", "render.cpp", "camera.cpp"] {
        instantiate(&mut trace, name, "Vector<float>", 30.0);
    }
    instantiate(&mut trace, "main.cpp", "std::vector<int>", 80.0);

    trace
}

/// math.h with two symbol pairs, each used by two dependents
pub fn math_inspector() -> StaticSymbolInspector {
    let mut inspector = StaticSymbolInspector::new();
    inspector.declare(MATH_HEADER, ["Vec2", "Vec3", "Mat3", "Mat4"]);
    inspector.reference("physics.cpp", MATH_HEADER, ["Vec2", "Vec3"]);
    inspector.reference("collide.cpp", MATH_HEADER, ["Vec2", "Vec3"]);
    inspector.reference("render.cpp", MATH_HEADER, ["Mat3", "Mat4"]);
    inspector.reference("camera.cpp", MATH_HEADER, ["Mat3", "Mat4"]);
    inspector
}

pub fn write_trace_file(trace: &BuildTrace) -> anyhow::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(serde_json::to_string_pretty(trace)?.as_bytes())?;
    file.flush()?;
    Ok(file)
}

pub fn write_text_file(content: &str) -> anyhow::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}
