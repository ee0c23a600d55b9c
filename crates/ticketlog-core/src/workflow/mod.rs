//! Workflow orchestration for ticketlog

mod delivery;
mod output;
mod pipeline;

pub use delivery::*;
pub use output::*;
pub use pipeline::*;
