//! Symbol inspection for header-split analysis
//!
//! The splitter only needs two questions answered: which symbols does a
//! header declare, and which of those does a given dependent use. Two
//! implementations are provided: an in-memory table and a lightweight
//! regex scanner over source files.

use crate::error::{AnalysisError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Answers symbol declaration/usage questions about headers
pub trait SymbolInspector: Send + Sync {
    /// Symbols declared by `header_path`
    fn declared_symbols(&self, header_path: &str) -> Result<BTreeSet<String>>;

    /// Subset of the header's declared symbols referenced by `dependent_path`
    fn referenced_symbols(&self, dependent_path: &str, header_path: &str)
        -> Result<BTreeSet<String>>;

    /// Symbols of `declared` referenced by `dependent_path`, when the
    /// header's declarations are already known
    fn referenced_among(
        &self,
        dependent_path: &str,
        header_path: &str,
        declared: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>> {
        Ok(self
            .referenced_symbols(dependent_path, header_path)?
            .into_iter()
            .filter(|s| declared.contains(s))
            .collect())
    }
}

/// Symbol tables held in memory
///
/// # Example
/// ```
/// use buildlens::symbols::{StaticSymbolInspector, SymbolInspector};
///
/// let mut inspector = StaticSymbolInspector::new();
/// inspector.declare("math.h", ["Vec3", "Mat4"]);
/// inspector.reference("render.cpp", "math.h", ["Mat4"]);
///
/// let used = inspector.referenced_symbols("render.cpp", "math.h").unwrap();
/// assert!(used.contains("Mat4"));
/// assert!(!used.contains("Vec3"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticSymbolInspector {
    /// header → declared symbols
    #[serde(default)]
    declarations: BTreeMap<String, BTreeSet<String>>,

    /// dependent → header → referenced symbols
    #[serde(default)]
    references: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl StaticSymbolInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare<I, S>(&mut self, header: &str, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declarations
            .entry(header.to_string())
            .or_default()
            .extend(symbols.into_iter().map(Into::into));
    }

    pub fn reference<I, S>(&mut self, dependent: &str, header: &str, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references
            .entry(dependent.to_string())
            .or_default()
            .entry(header.to_string())
            .or_default()
            .extend(symbols.into_iter().map(Into::into));
    }
}

impl SymbolInspector for StaticSymbolInspector {
    fn declared_symbols(&self, header_path: &str) -> Result<BTreeSet<String>> {
        self.declarations
            .get(header_path)
            .cloned()
            .ok_or_else(|| AnalysisError::FileNotFound(PathBuf::from(header_path)))
    }

    fn referenced_symbols(
        &self,
        dependent_path: &str,
        header_path: &str,
    ) -> Result<BTreeSet<String>> {
        let declared = self.declared_symbols(header_path)?;
        let referenced = self
            .references
            .get(dependent_path)
            .and_then(|by_header| by_header.get(header_path));

        Ok(match referenced {
            Some(symbols) => symbols.intersection(&declared).cloned().collect(),
            None => BTreeSet::new(),
        })
    }
}

/// Pattern-based scanner over C/C++ sources below a root directory
#[derive(Debug, Clone)]
pub struct SourceSymbolInspector {
    root: PathBuf,
}

fn type_decl_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:template\s*<[^>]*>\s*)?(?:class|struct|union|enum(?:\s+class)?)\s+(?:\w+\s+)*?([A-Za-z_]\w*)\s*(?:final\s*)?[:{;]")
            .expect("valid type declaration regex")
    })
}

fn alias_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:using\s+([A-Za-z_]\w*)\s*=|typedef\s+[^;]*?\b([A-Za-z_]\w*)\s*;)")
            .expect("valid alias regex")
    })
}

fn function_decl_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:(?:inline|static|extern|constexpr|virtual)\s+)*[A-Za-z_][\w:<>,\s\*&]*?[\s\*&]([A-Za-z_]\w*)\s*\([^;{)]*\)\s*(?:const\s*)?(?:noexcept\s*)?[;{]")
            .expect("valid function declaration regex")
    })
}

fn macro_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*#\s*define\s+([A-Za-z_]\w*)").expect("valid macro regex")
    })
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Za-z_]\w*\b").expect("valid identifier regex"))
}

const KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "return", "sizeof", "decltype", "alignof", "static_assert",
];

impl SourceSymbolInspector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        }
    }

    fn read_source(&self, path: &str) -> Result<String> {
        let resolved = self.resolve(path);
        let bytes = fs::read(&resolved).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AnalysisError::FileNotFound(resolved.clone())
            } else {
                AnalysisError::FileRead {
                    path: resolved.clone(),
                    source,
                }
            }
        })?;
        String::from_utf8(bytes).map_err(|e| AnalysisError::Parse {
            path: resolved,
            message: e.to_string(),
        })
    }
}

/// Symbols declared in a header's text
pub fn scan_declarations(source: &str) -> BTreeSet<String> {
    let mut symbols = BTreeSet::new();

    for caps in type_decl_regex().captures_iter(source) {
        symbols.insert(caps[1].to_string());
    }
    for caps in alias_regex().captures_iter(source) {
        if let Some(name) = caps.get(1).or_else(|| caps.get(2)) {
            symbols.insert(name.as_str().to_string());
        }
    }
    for caps in function_decl_regex().captures_iter(source) {
        let name = &caps[1];
        if !KEYWORDS.contains(&name) {
            symbols.insert(name.to_string());
        }
    }
    for caps in macro_regex().captures_iter(source) {
        let name = &caps[1];
        // Include guards are not part of a header's interface
        if !name.ends_with("_H") && !name.ends_with("_HPP") && !name.ends_with("_H_") {
            symbols.insert(name.to_string());
        }
    }

    symbols
}

impl SymbolInspector for SourceSymbolInspector {
    fn declared_symbols(&self, header_path: &str) -> Result<BTreeSet<String>> {
        let source = self.read_source(header_path)?;
        Ok(scan_declarations(&source))
    }

    fn referenced_symbols(
        &self,
        dependent_path: &str,
        header_path: &str,
    ) -> Result<BTreeSet<String>> {
        let declared = self.declared_symbols(header_path)?;
        self.referenced_among(dependent_path, header_path, &declared)
    }

    fn referenced_among(
        &self,
        dependent_path: &str,
        _header_path: &str,
        declared: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>> {
        let source = self.read_source(dependent_path)?;

        Ok(identifier_regex()
            .find_iter(&source)
            .map(|m| m.as_str())
            .filter(|ident| declared.contains(*ident))
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const WIDGET_H: &str = r#"
#ifndef WIDGET_H
#define WIDGET_H
#define WIDGET_MAX 16

struct Point { int x; int y; };
class Widget : public Base {
};
enum class Color { Red, Green };
using WidgetId = unsigned;
typedef struct Point PointAlias;

int widget_count(const Widget& w);
inline void reset_widgets() {}

#endif
"#;

    #[test]
    fn test_scan_declarations() {
        let symbols = scan_declarations(WIDGET_H);

        for expected in [
            "Point",
            "Widget",
            "Color",
            "WidgetId",
            "PointAlias",
            "widget_count",
            "reset_widgets",
            "WIDGET_MAX",
        ] {
            assert!(symbols.contains(expected), "missing {}", expected);
        }
        assert!(!symbols.contains("WIDGET_H"));
    }

    #[test]
    fn test_referenced_among_reads_only_the_dependent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.cpp"), "Widget w; Gadget g;\n").unwrap();

        let declared: BTreeSet<String> = ["Widget".to_string()].into_iter().collect();
        let inspector = SourceSymbolInspector::new(dir.path());
        let used = inspector
            .referenced_among("main.cpp", "absent.h", &declared)
            .unwrap();

        assert_eq!(used, declared);
    }

    #[test]
    fn test_source_inspector_reads_files() {
        let dir = TempDir::new().unwrap();
        let mut header = fs::File::create(dir.path().join("widget.h")).unwrap();
        header.write_all(WIDGET_H.as_bytes()).unwrap();
        fs::write(
            dir.path().join("main.cpp"),
            "#include \"widget.h\"\nint main() { Widget w; return widget_count(w); }\n",
        )
        .unwrap();

        let inspector = SourceSymbolInspector::new(dir.path());
        let used = inspector.referenced_symbols("main.cpp", "widget.h").unwrap();

        assert_eq!(
            used.into_iter().collect::<Vec<_>>(),
            vec!["Widget".to_string(), "widget_count".to_string()]
        );
    }

    #[test]
    fn test_source_inspector_missing_file() {
        let dir = TempDir::new().unwrap();
        let inspector = SourceSymbolInspector::new(dir.path());

        let err = inspector.declared_symbols("nope.h").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::FileNotFound);
    }

    #[test]
    fn test_source_inspector_non_utf8() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.h"), [0xff, 0xfe, 0x00]).unwrap();
        let inspector = SourceSymbolInspector::new(dir.path());

        let err = inspector.declared_symbols("bad.h").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ParseError);
    }

    #[test]
    fn test_static_inspector_intersects_with_declared() {
        let mut inspector = StaticSymbolInspector::new();
        inspector.declare("a.h", ["A", "B"]);
        inspector.reference("x.cpp", "a.h", ["A", "NotDeclared"]);

        let used = inspector.referenced_symbols("x.cpp", "a.h").unwrap();
        assert_eq!(used.len(), 1);
        assert!(used.contains("A"));

        let none = inspector.referenced_symbols("y.cpp", "a.h").unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_static_inspector_unknown_header() {
        let inspector = StaticSymbolInspector::new();
        let err = inspector.declared_symbols("missing.h").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::FileNotFound);
    }
}
