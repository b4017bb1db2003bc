//! Text generators driven by indexed facts.
//!
//! - **enum_strings**: `to_string` and `operator<<` for enums
//! - **accessors**: getters, setters and archive save/load bodies for classes

pub mod accessors;
pub mod enum_strings;

pub use accessors::{getter_lines, load_lines, save_lines, setter_lines};
pub use enum_strings::{generate_header, generate_source};
