//! Text input and output for the category graph

pub mod text;

pub use text::{dump_lines, load_file, load_lines, parse_lines, save_file, Record};
