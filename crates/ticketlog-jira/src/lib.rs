//! Ticketlog Jira - Jira issue tracker integration
//!
//! Matches commit messages to Jira tickets, fetches ticket details and
//! manages release versions through the Jira REST API (v2).

mod api;
mod client;
mod matcher;

pub use client::JiraClient;
pub use matcher::TicketMatcher;
