//! buildlens - build-performance analysis for C/C++ build traces
//!
//! This library reads a normalized build trace (per-unit timings plus the
//! include graph) and turns it into ranked, actionable suggestions:
//! precompiled-header additions and removals, header splits derived from
//! symbol co-usage clustering, and explicit template instantiations.

pub mod cli;
pub mod config;
pub mod dependency_graph;
pub mod engine;
pub mod error;
pub mod header_split;
pub mod headers;
pub mod pch;
pub mod suggestion;
pub mod symbols;
pub mod templates;
pub mod trace;
