//! Canonical build-trace model
//!
//! Compiler-specific ingestion happens upstream; this crate only reads the
//! normalized JSON form produced by those decoders.

use crate::dependency_graph::DependencyGraph;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One template instantiation recorded while compiling a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateInstantiation {
    pub name: String,
    pub time_ms: f64,
    #[serde(default)]
    pub call_stack: Vec<String>,
}

/// Timings for a single translation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompilationUnit {
    pub file_path: String,
    pub total_time_ms: f64,
    pub preprocessing_time_ms: f64,
    pub parsing_time_ms: f64,
    pub codegen_time_ms: f64,
    pub optimization_time_ms: f64,
    pub direct_includes: Vec<String>,
    pub all_includes: Vec<String>,
    pub template_instantiations: Vec<TemplateInstantiation>,
}

impl CompilationUnit {
    pub fn new(file_path: impl Into<String>, total_time_ms: f64) -> Self {
        Self {
            file_path: file_path.into(),
            total_time_ms,
            ..Self::default()
        }
    }
}

/// Summary numbers computed by the caller before analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BuildMetrics {
    pub total_build_time_ms: f64,
    pub total_files: usize,
    pub percentiles: HashMap<String, f64>,
}

/// Normalized build trace: units plus their include graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BuildTrace {
    pub trace_id: String,
    pub build_system: String,
    pub compilation_units: Vec<CompilationUnit>,
    pub dependency_graph: DependencyGraph,
    pub metrics: BuildMetrics,
}

impl BuildTrace {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse build trace JSON")
    }

    /// Load a normalized trace from disk
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read trace file: {}", path.as_ref().display())
        })?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid trace file: {}", path.as_ref().display()))
    }

    pub fn find_unit(&self, file_path: &str) -> Option<&CompilationUnit> {
        self.compilation_units
            .iter()
            .find(|u| u.file_path == file_path)
    }
}
