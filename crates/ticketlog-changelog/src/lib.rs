//! Ticketlog Changelog - template data and rendering
//!
//! This crate turns matched tickets into template data and renders it,
//! either with the built-in markdown layout or a `{{variable}}` template.

mod decode;
pub mod markdown;
mod renderer;
pub mod template;
mod template_data;

pub use decode::decode_entities;
pub use markdown::render_markdown;
pub use renderer::TemplateRenderer;
pub use template::{process_template, render_template};
pub use template_data::{build_template_data, transform_template_data};
