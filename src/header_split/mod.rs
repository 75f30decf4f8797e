// Header Splitting by Symbol Co-Usage
//
// Proposes splitting a widely included header into smaller headers whose
// symbols tend to be used by the same dependents.
//
// Pipeline:
//   1. symbol cache     declared symbols + per-dependent referenced subsets
//   2. co-usage matrix  M[i][j] = dependents using both symbol i and j
//   3. affinity matrix  A[i][j] = exp(-(M[i][j] / max(M))² / 0.2)
//   4. k-means          over affinity rows, at most 100 iterations
//   5. grouping         non-empty clusters → proposed headers
//   6. benefit          average share of groups a dependent can skip × 10 ms
//
// Note that the kernel maps frequent co-usage to LOW affinity, so symbols
// that are rarely used together end up close in feature space. Consumers may
// depend on this behavior; it is kept as is.
//
// Cluster seeds come from a caller-controlled RNG. `HeaderSplitter` derives a
// fresh generator per call from its configured seed, or from entropy when no
// seed is set, so results are reproducible whenever a seed is given.

mod clustering;
mod co_usage;
mod splitter;

pub use clustering::{
    compute_affinity_matrix, kmeans, perform_spectral_clustering, ClusteringResult,
    AFFINITY_BANDWIDTH, MAX_KMEANS_ITERATIONS,
};
pub use co_usage::{build_co_usage_matrix, SymbolCoUsage, SymbolUsageCache};
pub use splitter::{
    split_header_name, HeaderSplitConfig, HeaderSplitSuggestion, HeaderSplitter, ProposedHeader,
};
