//! Ticketlog Git - git2 backed source control
//!
//! This crate lists tags in chronological order and walks the commits of a
//! resolved range for the changelog pipeline.

mod commits;
mod repository;
mod source;
mod tags;
pub mod types;

pub use commits::parse_date;
pub use repository::{GitRepo, Result};
pub use source::GitSourceControl;
pub use types::TagInfo;
