//! cppfacts Parser API
//!
//! Shared trait and types for parsers that feed the cppfacts index.
//!
//! This crate defines:
//!
//! - **FactParser trait**: The interface a header parser implements
//! - **FileFacts**: Entities published while parsing one file
//! - **Configuration**: Size limits, parallelism and transition strictness
//! - **Metrics**: Performance and success tracking
//! - **Error handling**: Comprehensive error types
//!
//! # Example
//!
//! ```rust,ignore
//! use cppfacts::FactIndex;
//! use cppfacts_parser_api::{FactParser, FileInfo, ParserConfig, ParserError, ParserMetrics};
//! use std::path::Path;
//!
//! struct MyParser {
//!     config: ParserConfig,
//! }
//!
//! impl FactParser for MyParser {
//!     fn language(&self) -> &str {
//!         "cpp"
//!     }
//!
//!     fn file_extensions(&self) -> &[&str] {
//!         &[".h"]
//!     }
//!
//!     fn parse_file(&self, path: &Path, index: &mut FactIndex) -> Result<FileInfo, ParserError> {
//!         todo!()
//!     }
//!
//!     fn parse_source(&self, source: &str, file_path: &Path, index: &mut FactIndex)
//!         -> Result<FileInfo, ParserError> {
//!         todo!()
//!     }
//!
//!     fn config(&self) -> &ParserConfig {
//!         &self.config
//!     }
//!
//!     fn metrics(&self) -> ParserMetrics {
//!         ParserMetrics::default()
//!     }
//!
//!     fn reset_metrics(&mut self) {}
//! }
//! ```

pub mod config;
pub mod errors;
pub mod ir;
pub mod metrics;
pub mod traits;

// Re-export commonly used types
pub use config::ParserConfig;
pub use errors::{ParserError, ParserResult};
pub use ir::FileFacts;
pub use metrics::ParserMetrics;
pub use traits::{FactParser, FileInfo, ProjectInfo};
