//! Commit range parsing and resolution

mod parser;
mod resolver;

pub use parser::{parse_range, RangeSpec};
pub use resolver::{resolve_range, ResolvedRange};
