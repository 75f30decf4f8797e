// Header split proposal

use crate::error::{AnalysisError, Result};
use crate::header_split::clustering::perform_spectral_clustering;
use crate::header_split::co_usage::{build_co_usage_matrix, SymbolUsageCache};
use crate::symbols::SymbolInspector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Tunables for header split proposals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSplitConfig {
    /// Proposals below this estimated benefit are rejected
    pub min_benefit_ms: f64,

    /// Benefit of a dependent skipping every group
    pub benefit_scale_ms: f64,

    /// Upper bound on k for k-means
    pub max_clusters: usize,

    /// Seed for centroid selection; `None` draws from entropy on every call
    pub seed: Option<u64>,
}

impl Default for HeaderSplitConfig {
    fn default() -> Self {
        Self {
            min_benefit_ms: 10.0,
            benefit_scale_ms: 10.0,
            max_clusters: 6,
            seed: None,
        }
    }
}

impl HeaderSplitConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.min_benefit_ms < 0.0 {
            return Err(format!(
                "min_benefit_ms must be non-negative, got {}",
                self.min_benefit_ms
            ));
        }
        if self.benefit_scale_ms <= 0.0 {
            return Err(format!(
                "benefit_scale_ms must be positive, got {}",
                self.benefit_scale_ms
            ));
        }
        if self.max_clusters < 2 {
            return Err(format!(
                "max_clusters must be >= 2 to split anything, got {}",
                self.max_clusters
            ));
        }
        Ok(())
    }
}

/// One header of a proposed split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedHeader {
    pub name: String,
    pub symbols: Vec<String>,
}

/// Proposal to split one header into several
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderSplitSuggestion {
    pub original_header: String,
    pub proposed_headers: Vec<ProposedHeader>,
    pub estimated_benefit_ms: f64,
    pub confidence: f64,
    pub rationale: String,
}

/// Clusters a header's symbols by co-usage and proposes a split
pub struct HeaderSplitter {
    inspector: Arc<dyn SymbolInspector>,
    config: HeaderSplitConfig,
}

impl std::fmt::Debug for HeaderSplitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderSplitter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HeaderSplitter {
    pub fn new(inspector: Arc<dyn SymbolInspector>) -> Self {
        Self::with_config(inspector, HeaderSplitConfig::default())
    }

    pub fn with_config(inspector: Arc<dyn SymbolInspector>, config: HeaderSplitConfig) -> Self {
        Self { inspector, config }
    }

    pub fn config(&self) -> &HeaderSplitConfig {
        &self.config
    }

    /// Collect declared symbols and per-dependent usage for `header`
    pub fn build_symbol_cache(&self, header: &str, dependents: &[String]) -> Result<SymbolUsageCache> {
        let symbols = self.inspector.declared_symbols(header)?;
        self.collect_usage(header, symbols, dependents)
    }

    fn collect_usage(
        &self,
        header: &str,
        symbols: BTreeSet<String>,
        dependents: &[String],
    ) -> Result<SymbolUsageCache> {
        let mut cache = SymbolUsageCache::new(header, symbols);

        for dependent in dependents {
            let used = self
                .inspector
                .referenced_among(dependent, header, &cache.symbols)?;
            cache.usage.insert(dependent.clone(), used);
        }

        Ok(cache)
    }

    /// Propose a split of `header` using a generator derived from the configured seed
    ///
    /// # Errors
    /// `Analysis` when the header has fewer than `2 * min_cluster_size`
    /// symbols, when clustering yields fewer than two usable groups, or when
    /// the estimated benefit is too small. Symbol inspection errors pass
    /// through unchanged.
    pub fn analyze_header(
        &self,
        header: &str,
        dependents: &[String],
        min_cluster_size: usize,
    ) -> Result<HeaderSplitSuggestion> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.analyze_header_with_rng(header, dependents, min_cluster_size, &mut rng)
    }

    /// Same as [`analyze_header`](Self::analyze_header) with an explicit generator
    pub fn analyze_header_with_rng<R: Rng + ?Sized>(
        &self,
        header: &str,
        dependents: &[String],
        min_cluster_size: usize,
        rng: &mut R,
    ) -> Result<HeaderSplitSuggestion> {
        let mut seen = BTreeSet::new();
        let dependents: Vec<String> = dependents
            .iter()
            .filter(|d| seen.insert(d.as_str()))
            .cloned()
            .collect();

        let symbols = self.inspector.declared_symbols(header)?;
        let symbol_count = symbols.len();
        let required = min_cluster_size.saturating_mul(2);
        if symbol_count < required {
            return Err(AnalysisError::analysis(format!(
                "{} declares {} symbols, need at least {} to split",
                header, symbol_count, required
            )));
        }

        let cache = self.collect_usage(header, symbols, &dependents)?;

        let co_usage = build_co_usage_matrix(&cache);
        let k = self.cluster_count(symbol_count, min_cluster_size);
        let clustering = perform_spectral_clustering(&co_usage.matrix, k, rng);

        let mut by_label: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for (symbol, &label) in co_usage.symbols.iter().zip(&clustering.labels) {
            by_label.entry(label).or_default().push(symbol.clone());
        }
        let groups: Vec<Vec<String>> = by_label
            .into_values()
            .filter(|g| !g.is_empty())
            .map(|mut g| {
                g.sort();
                g
            })
            .collect();

        if groups.len() < 2 {
            return Err(AnalysisError::analysis(format!(
                "{}: symbols did not separate into at least two groups",
                header
            )));
        }

        let average_reduction = average_group_reduction(&groups, &cache, &dependents);
        let benefit_ms = average_reduction * self.config.benefit_scale_ms;

        if benefit_ms < self.config.min_benefit_ms {
            return Err(AnalysisError::analysis(format!(
                "{}: estimated benefit {:.2} ms is below {:.2} ms",
                header, benefit_ms, self.config.min_benefit_ms
            )));
        }
        if let Some(small) = groups.iter().find(|g| g.len() < 2) {
            return Err(AnalysisError::analysis(format!(
                "{}: group containing '{}' has fewer than two symbols",
                header,
                small.first().map(String::as_str).unwrap_or_default()
            )));
        }

        let rationale = format!(
            "{} declares {} symbols that cluster into {} groups by co-usage; \
             dependents skip {:.0}% of the groups on average",
            header,
            symbol_count,
            groups.len(),
            average_reduction * 100.0
        );

        let proposed_headers = groups
            .into_iter()
            .enumerate()
            .map(|(i, symbols)| ProposedHeader {
                name: split_header_name(header, i + 1),
                symbols,
            })
            .collect();

        Ok(HeaderSplitSuggestion {
            original_header: header.to_string(),
            proposed_headers,
            estimated_benefit_ms: benefit_ms,
            confidence: clustering.quality_score,
            rationale,
        })
    }

    /// k = |S| / min_cluster_size, clamped to [2, max_clusters] and never above |S|
    fn cluster_count(&self, symbol_count: usize, min_cluster_size: usize) -> usize {
        (symbol_count / min_cluster_size.max(1))
            .clamp(2, self.config.max_clusters.max(2))
            .min(symbol_count)
    }
}

/// Mean, over dependents, of the share of groups a dependent does not need
fn average_group_reduction(
    groups: &[Vec<String>],
    cache: &SymbolUsageCache,
    dependents: &[String],
) -> f64 {
    if dependents.is_empty() || groups.is_empty() {
        return 0.0;
    }

    let total_groups = groups.len() as f64;
    let total_reduction: f64 = dependents
        .iter()
        .map(|dependent| {
            let needed = match cache.used_by(dependent) {
                Some(used) => groups
                    .iter()
                    .filter(|g| g.iter().any(|s| used.contains(s)))
                    .count(),
                None => 0,
            };
            (total_groups - needed as f64) / total_groups
        })
        .sum();

    total_reduction / dependents.len() as f64
}

/// `widget.h` → `widget_part2.h`; names without an extension get the suffix appended
pub fn split_header_name(header: &str, part: usize) -> String {
    let file_start = header.rfind(['/', '\\']).map_or(0, |i| i + 1);
    match header[file_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let dot = file_start + dot;
            format!("{}_part{}{}", &header[..dot], part, &header[dot..])
        }
        _ => format!("{}_part{}", header, part),
    }
}
