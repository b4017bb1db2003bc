use serde::{Deserialize, Serialize};

/// Configuration for parser behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Maximum file size to parse (in bytes)
    /// Files larger than this are rejected with `FileTooLarge`
    pub max_file_size: usize,

    /// Enable parallel parsing (for `parse_files`)
    pub parallel: bool,

    /// Number of parallel workers (None = rayon default)
    pub parallel_workers: Option<usize>,

    /// Fail a file when the drivers see an impossible event order,
    /// instead of logging a warning and carrying on
    pub strict_transitions: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024, // 10 MB
            parallel: false,
            parallel_workers: None,
            strict_transitions: false,
        }
    }
}

impl ParserConfig {
    /// Create config that rejects files with driver transition errors
    pub fn strict() -> Self {
        Self {
            strict_transitions: true,
            ..Default::default()
        }
    }

    /// Enable parallel parsing
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the number of worker threads used by parallel parsing
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.parallel_workers = Some(workers);
        self
    }

    /// Set maximum file size
    pub fn with_max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    pub fn with_strict_transitions(mut self, strict: bool) -> Self {
        self.strict_transitions = strict;
        self
    }
}
