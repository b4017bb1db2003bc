//! Implementation of the FactParser trait for C++ headers

use cppfacts::FactIndex;
use cppfacts_parser_api::{
    FactParser, FileFacts, FileInfo, ParserConfig, ParserError, ParserMetrics, ProjectInfo,
};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::extractor;
use crate::mapper;

/// Facts read from one file, not yet inserted into an index
struct ExtractedFile {
    facts: FileFacts,
    line_count: usize,
    byte_count: usize,
    parse_time: Duration,
}

/// C++ header parser implementing the FactParser trait
pub struct CppFactParser {
    config: ParserConfig,
    metrics: Mutex<ParserMetrics>,
}

impl CppFactParser {
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
            metrics: Mutex::new(ParserMetrics::default()),
        }
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            metrics: Mutex::new(ParserMetrics::default()),
        }
    }

    fn update_metrics(&self, success: bool, duration: Duration, enums: usize, classes: usize) {
        let mut metrics = self.metrics.lock().unwrap();
        metrics.files_attempted += 1;
        if success {
            metrics.files_succeeded += 1;
        } else {
            metrics.files_failed += 1;
        }
        metrics.total_parse_time += duration;
        metrics.total_enums += enums;
        metrics.total_classes += classes;
    }

    fn read_source(&self, path: &Path) -> Result<String, ParserError> {
        let metadata =
            fs::metadata(path).map_err(|e| ParserError::IoError(path.to_path_buf(), e))?;

        if metadata.len() as usize > self.config.max_file_size {
            return Err(ParserError::FileTooLarge(
                path.to_path_buf(),
                metadata.len() as usize,
            ));
        }

        fs::read_to_string(path).map_err(|e| ParserError::IoError(path.to_path_buf(), e))
    }

    /// Read and extract one file without touching an index. Safe to run
    /// on several files at once.
    fn extract_file(&self, path: &Path) -> Result<ExtractedFile, ParserError> {
        let start = Instant::now();
        let source = self.read_source(path)?;
        let facts = extractor::extract(&source, path, &self.config)?;
        Ok(ExtractedFile {
            facts,
            line_count: source.lines().count(),
            byte_count: source.len(),
            parse_time: start.elapsed(),
        })
    }

    fn index_file(&self, extracted: ExtractedFile, index: &mut FactIndex) -> FileInfo {
        let mut file_info = mapper::facts_to_index(&extracted.facts, index);
        file_info.parse_time = extracted.parse_time;
        file_info.line_count = extracted.line_count;
        file_info.byte_count = extracted.byte_count;
        file_info
    }

    /// Parse files sequentially
    fn parse_files_sequential(
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

    /// Extract files in parallel using rayon, then index the results in
    /// input order so the index matches a sequential run
    fn parse_files_parallel(
        &self,
        paths: &[PathBuf],
        index: &mut FactIndex,
    ) -> Result<ProjectInfo, ParserError> {
        use rayon::prelude::*;

        // Configure thread pool if parallel_workers is specified
        let pool = if let Some(num_threads) = self.config.parallel_workers {
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .map_err(|e| {
                    ParserError::IndexError(format!("Failed to create thread pool: {e}"))
                })?
        } else {
            rayon::ThreadPoolBuilder::new().build().map_err(|e| {
                ParserError::IndexError(format!("Failed to create thread pool: {e}"))
            })?
        };

        let results: Vec<_> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| self.extract_file(path))
                .collect()
        });

        let mut project = ProjectInfo::new();
        for (path, result) in paths.iter().zip(results) {
            let result = match result {
                Ok(extracted) => {
                    let duration = extracted.parse_time;
                    let info = self.index_file(extracted, index);
                    self.update_metrics(true, duration, info.enums.len(), info.classes.len());
                    Ok(info)
                }
                Err(e) => {
                    self.update_metrics(false, Duration::ZERO, 0, 0);
                    Err(e)
                }
            };
            project.record(path, result);
        }
        Ok(project)
    }
}

impl Default for CppFactParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FactParser for CppFactParser {
    fn language(&self) -> &str {
        "cpp"
    }

    fn file_extensions(&self) -> &[&str] {
        &[".h", ".hh", ".hpp", ".hxx", ".cpp", ".cc", ".cxx"]
    }

    fn parse_file(&self, path: &Path, index: &mut FactIndex) -> Result<FileInfo, ParserError> {
        let start = Instant::now();
        let result = self
            .extract_file(path)
            .map(|extracted| self.index_file(extracted, index));

        let duration = start.elapsed();
        if let Ok(ref info) = result {
            self.update_metrics(true, duration, info.enums.len(), info.classes.len());
        } else {
            self.update_metrics(false, duration, 0, 0);
        }

        result
    }

    fn parse_source(
        &self,
        source: &str,
        file_path: &Path,
        index: &mut FactIndex,
    ) -> Result<FileInfo, ParserError> {
        let start = Instant::now();
        let facts = extractor::extract(source, file_path, &self.config)?;
        let mut file_info = mapper::facts_to_index(&facts, index);

        file_info.parse_time = start.elapsed();
        file_info.line_count = source.lines().count();
        file_info.byte_count = source.len();

        Ok(file_info)
    }

    fn parse_files(
        &self,
        paths: &[PathBuf],
        index: &mut FactIndex,
    ) -> Result<ProjectInfo, ParserError> {
        info!(
            "Parsing {} files ({})",
            paths.len(),
            if self.config.parallel {
                "parallel"
            } else {
                "sequential"
            }
        );
        let project = if self.config.parallel {
            self.parse_files_parallel(paths, index)?
        } else {
            self.parse_files_sequential(paths, index)?
        };
        info!(
            "Indexed {} enums and {} classes from {} of {} files",
            project.total_enums,
            project.total_classes,
            project.files.len(),
            project.total_files()
        );
        let metrics = self.metrics.lock().unwrap();
        debug!(
            "Parser totals: {} entities, {} of {} files succeeded",
            metrics.total_entities(),
            metrics.files_succeeded,
            metrics.files_attempted
        );
        Ok(project)
    }

    fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn metrics(&self) -> ParserMetrics {
        self.metrics.lock().unwrap().clone()
    }

    fn reset_metrics(&mut self) {
        *self.metrics.lock().unwrap() = ParserMetrics::default();
    }
}
