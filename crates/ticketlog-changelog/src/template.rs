//! `{{variable}}` changelog templates
//!
//! A template file is plain text with placeholders:
//!
//! | Variable | Value |
//! |---|---|
//! | `{{release}}` | release name, empty when there is none |
//! | `{{date}}` | generation date |
//! | `{{tickets}}` | tickets grouped by issue type |
//! | `{{pending}}` | tickets awaiting approval |
//! | `{{other_commits}}` | commits without a ticket |
//! | `{{release_versions}}` | release versions in the tracker |
//! | `{{ticket_count}}` | number of tickets |
//! | `{{commit_count}}` | number of commits |
//!
//! Placeholders with no matching variable are left unchanged.

use std::collections::BTreeMap;

use html_escape::encode_text;

use ticketlog_core::TemplateData;

use crate::markdown::{commits_section, pending_section, release_versions_section, tickets_section};

/// Variables available to a template
pub fn template_variables(data: &TemplateData) -> BTreeMap<&'static str, String> {
    let mut vars = BTreeMap::new();
    vars.insert(
        "release",
        data.release
            .as_deref()
            .map(|r| encode_text(r).to_string())
            .unwrap_or_default(),
    );
    vars.insert("date", data.date.clone());
    vars.insert("tickets", tickets_section(&data.ticket_groups));
    vars.insert("pending", pending_section(&data.pending_tickets));
    vars.insert("other_commits", commits_section(&data.commits_without_tickets));
    vars.insert(
        "release_versions",
        release_versions_section(&data.release_versions),
    );
    vars.insert("ticket_count", data.ticket_count.to_string());
    vars.insert("commit_count", data.commit_count.to_string());
    vars
}

/// Replace `{{name}}` placeholders with their values
pub fn process_template(template: &str, vars: &BTreeMap<&'static str, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Render a template against template data
pub fn render_template(template: &str, data: &TemplateData) -> String {
    process_template(template, &template_variables(data))
}
