// Template Instantiation Hotspots
//
// Aggregates template-instantiation cost across translation units. Names are
// normalized first so structurally equivalent instantiations (same template,
// different user-defined arguments) merge into one hotspot.
//
//   Foo< Bar , std::string >  →  Foo<T,std::string>

mod analyzer;
mod normalize;

pub use analyzer::{TemplateAnalyzer, TemplateHotspot};
pub use normalize::{is_std_template, normalize_template_name, PLACEHOLDER};
