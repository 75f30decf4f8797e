// Symbol usage cache and co-usage matrix

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Declared symbols of one header and what each dependent uses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolUsageCache {
    pub header: String,
    pub symbols: BTreeSet<String>,
    /// dependent path → referenced subset of `symbols`
    pub usage: BTreeMap<String, BTreeSet<String>>,
}

impl SymbolUsageCache {
    pub fn new(header: impl Into<String>, symbols: BTreeSet<String>) -> Self {
        Self {
            header: header.into(),
            symbols,
            usage: BTreeMap::new(),
        }
    }

    /// Symbols used by `dependent`; `None` when it was never recorded
    pub fn used_by(&self, dependent: &str) -> Option<&BTreeSet<String>> {
        self.usage.get(dependent)
    }
}

/// Square co-occurrence matrix aligned with `symbols`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolCoUsage {
    pub symbols: Vec<String>,
    pub matrix: Vec<Vec<u32>>,
}

impl SymbolCoUsage {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Count, for every symbol pair, the dependents that use both
///
/// The diagonal holds the number of dependents using each symbol at all.
/// Referenced symbols the header does not declare are ignored.
pub fn build_co_usage_matrix(cache: &SymbolUsageCache) -> SymbolCoUsage {
    let symbols: Vec<String> = cache.symbols.iter().cloned().collect();
    let index: HashMap<&str, usize> = symbols
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();

    let n = symbols.len();
    let mut matrix = vec![vec![0u32; n]; n];

    for used in cache.usage.values() {
        let indices: Vec<usize> = used
            .iter()
            .filter_map(|s| index.get(s.as_str()).copied())
            .collect();
        for &i in &indices {
            for &j in &indices {
                matrix[i][j] += 1;
            }
        }
    }

    SymbolCoUsage { symbols, matrix }
}
