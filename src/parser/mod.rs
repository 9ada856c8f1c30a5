// Parsers for the command-line mini languages

pub mod lexer;
pub mod options;
pub mod transform;

// Public API re-exports
pub use options::{parse_fig_size, parse_ranges};
pub use transform::parse_transform_spec;
