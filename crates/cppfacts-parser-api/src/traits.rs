use crate::{config::ParserConfig, errors::ParserError, metrics::ParserMetrics};
use cppfacts::FactIndex;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Information about a successfully parsed file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Path to the source file
    pub file_path: PathBuf,

    /// Fully qualified names of the enums indexed from this file
    pub enums: Vec<String>,

    /// Fully qualified names of the classes and structs indexed from this file
    pub classes: Vec<String>,

    /// Time taken to parse this file
    #[serde(with = "duration_serde")]
    pub parse_time: Duration,

    /// Number of lines in the file
    pub line_count: usize,

    /// File size in bytes
    pub byte_count: usize,
}

// Helper module for serializing Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis: u64 = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

impl FileInfo {
    /// Total number of entities extracted
    pub fn entity_count(&self) -> usize {
        self.enums.len() + self.classes.len()
    }
}

/// Aggregate information about a parsed project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Information about each successfully parsed file
    pub files: Vec<FileInfo>,

    /// Total number of enums across all files
    pub total_enums: usize,

    /// Total number of classes across all files
    pub total_classes: usize,

    /// Total parse time for all files
    #[serde(with = "duration_serde")]
    pub total_parse_time: Duration,

    /// Files that failed to parse (path, error message)
    pub failed_files: Vec<(PathBuf, String)>,
}

impl ProjectInfo {
    /// Empty project summary, filled in with [`ProjectInfo::record`]
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            total_enums: 0,
            total_classes: 0,
            total_parse_time: Duration::ZERO,
            failed_files: Vec::new(),
        }
    }

    /// Fold one file's outcome into the summary
    pub fn record(&mut self, path: &Path, result: Result<FileInfo, ParserError>) {
        match result {
            Ok(info) => {
                self.total_enums += info.enums.len();
                self.total_classes += info.classes.len();
                self.total_parse_time += info.parse_time;
                self.files.push(info);
            }
            Err(e) => {
                warn!("Failed to parse {}: {e}", path.display());
                self.failed_files.push((path.to_path_buf(), e.to_string()));
            }
        }
    }

    /// Total number of files processed (success + failure)
    pub fn total_files(&self) -> usize {
        self.files.len() + self.failed_files.len()
    }

    /// Success rate (0.0 to 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.total_files() == 0 {
            0.0
        } else {
            self.files.len() as f64 / self.total_files() as f64
        }
    }

    /// Average parse time per file
    pub fn avg_parse_time(&self) -> Duration {
        if self.files.is_empty() {
            Duration::ZERO
        } else {
            self.total_parse_time / self.files.len() as u32
        }
    }
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Core trait for parsers that extract facts from headers
///
/// Parsers read a source file, run it through their grammar and drivers, and
/// insert every published enum and class into a [`FactIndex`].
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to support parallel parsing.
pub trait FactParser: Send + Sync {
    /// Returns the language identifier (lowercase, e.g., "cpp")
    fn language(&self) -> &str;

    /// Returns supported file extensions (e.g., [".h", ".hpp"])
    fn file_extensions(&self) -> &[&str];

    /// Parse a single file and insert its entities into the index
    ///
    /// **Note on Metrics**: This method updates parser metrics
    /// (files_attempted, files_succeeded, etc.).
    ///
    /// # Errors
    /// Returns `ParserError` if:
    /// - File cannot be read or is larger than `max_file_size`
    /// - The grammar fails to match part of the file
    /// - Strict transitions are enabled and a driver saw an invalid event
    fn parse_file(&self, path: &Path, index: &mut FactIndex) -> Result<FileInfo, ParserError>;

    /// Parse source text and insert its entities into the index
    ///
    /// **Note on Metrics**: This method does NOT update parser metrics.
    /// Only `parse_file()` updates metrics to avoid double-counting when
    /// `parse_source()` is called internally by `parse_file()`.
    ///
    /// # Arguments
    /// * `source` - Header text
    /// * `file_path` - Logical path recorded as `defined_in` for each entity
    /// * `index` - Fact index receiving the entities
    fn parse_source(
        &self,
        source: &str,
        file_path: &Path,
        index: &mut FactIndex,
    ) -> Result<FileInfo, ParserError>;

    /// Parse multiple files (can be overridden for parallel parsing)
    ///
    /// Default implementation parses files sequentially. A file that fails
    /// is recorded in `failed_files` and does not stop the others.
    fn parse_files(
        &self,
        paths: &[PathBuf],
        index: &mut FactIndex,
    ) -> Result<ProjectInfo, ParserError> {
        let mut project = ProjectInfo::new();
        for path in paths {
            let result = self.parse_file(path, index);
            project.record(path, result);
        }
        Ok(project)
    }

    /// Parse a directory recursively
    fn parse_directory(
        &self,
        dir: &Path,
        index: &mut FactIndex,
    ) -> Result<ProjectInfo, ParserError> {
        let paths = self.discover_files(dir)?;
        debug!("Discovered {} files under {}", paths.len(), dir.display());
        self.parse_files(&paths, index)
    }

    /// Discover parseable files in a directory
    ///
    /// Default implementation walks the directory and filters by extension.
    /// Results are sorted so later headers override earlier ones in a
    /// stable order.
    fn discover_files(&self, dir: &Path) -> Result<Vec<PathBuf>, ParserError> {
        use std::fs;

        let mut files = Vec::new();
        let extensions = self.file_extensions();

        fn walk_dir(
            dir: &Path,
            extensions: &[&str],
            files: &mut Vec<PathBuf>,
        ) -> Result<(), ParserError> {
            if !dir.is_dir() {
                return Ok(());
            }

            for entry in
                fs::read_dir(dir).map_err(|e| ParserError::IoError(dir.to_path_buf(), e))?
            {
                let entry = entry.map_err(|e| ParserError::IoError(dir.to_path_buf(), e))?;
                let path = entry.path();

                if path.is_dir() {
                    walk_dir(&path, extensions, files)?;
                } else if let Some(ext) = path.extension() {
                    let ext_str = format!(".{}", ext.to_string_lossy());
                    if extensions.contains(&ext_str.as_str()) {
                        files.push(path);
                    }
                }
            }

            Ok(())
        }

        walk_dir(dir, extensions, &mut files)?;
        files.sort();
        Ok(files)
    }

    /// Check if this parser can handle the given file
    fn can_parse(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_str = format!(".{}", ext.to_string_lossy());
            self.file_extensions().contains(&ext_str.as_str())
        } else {
            false
        }
    }

    /// Get parser configuration
    fn config(&self) -> &ParserConfig;

    /// Get accumulated metrics
    fn metrics(&self) -> ParserMetrics;

    /// Reset metrics
    fn reset_metrics(&mut self);
}
