//! Ticketlog Slack - chat delivery
//!
//! Posts rendered changelogs through the Slack Web API, converting
//! markdown to Slack markup on the way.

mod client;
pub mod markup;

pub use client::{SlackClient, SLACK_API_BASE};
pub use markup::MarkupConverter;
