//! Built-in markdown changelog
//!
//! Ticket summaries, commit messages and other free text are HTML-escaped
//! as they are written; the pipeline decodes entities after rendering.

use html_escape::encode_text;
use tracing::{debug, instrument};

use ticketlog_core::{CommitInfo, ReleaseVersion, TemplateData, Ticket, TicketGroup};

/// One ticket as a list item
pub fn ticket_line(ticket: &Ticket) -> String {
    let key = match &ticket.url {
        Some(url) => format!("[{}]({})", ticket.key, url),
        None => ticket.key.clone(),
    };
    if ticket.summary.is_empty() {
        format!("- {}", key)
    } else {
        format!("- {} {}", key, encode_text(&ticket.summary))
    }
}

/// Tickets grouped under `### <issue type>` headings
pub fn tickets_section(groups: &[TicketGroup]) -> String {
    let mut output = String::new();
    for group in groups {
        if group.tickets.is_empty() {
            continue;
        }
        output.push_str(&format!("### {}\n\n", encode_text(&group.issue_type)));
        for ticket in &group.tickets {
            output.push_str(&ticket_line(ticket));
            output.push('\n');
        }
        output.push('\n');
    }
    output
}

/// Tickets awaiting approval, with their status
pub fn pending_section(tickets: &[Ticket]) -> String {
    let mut output = String::new();
    for ticket in tickets {
        output.push_str(&ticket_line(ticket));
        if let Some(status) = &ticket.status {
            output.push_str(&format!(" ({})", encode_text(status)));
        }
        output.push('\n');
    }
    output
}

/// Commits that reference no ticket
pub fn commits_section(commits: &[CommitInfo]) -> String {
    let mut output = String::new();
    for commit in commits {
        output.push_str(&format!(
            "- {} {} ({})\n",
            commit.short_hash,
            encode_text(&commit.message),
            encode_text(&commit.author)
        ));
    }
    output
}

/// Release versions, linked when the tracker gave a URL
pub fn release_versions_section(versions: &[ReleaseVersion]) -> String {
    let mut output = String::new();
    for version in versions {
        match &version.url {
            Some(url) => output.push_str(&format!(
                "- [{} {}]({})\n",
                version.project_key, version.name, url
            )),
            None => output.push_str(&format!("- {} {}\n", version.project_key, version.name)),
        }
    }
    output
}

/// Render the built-in markdown changelog
#[instrument(skip(data), fields(release = ?data.release, tickets = data.ticket_count))]
pub fn render_markdown(data: &TemplateData) -> String {
    let mut output = String::new();

    match &data.release {
        Some(release) => output.push_str(&format!("## {} - {}\n\n", encode_text(release), data.date)),
        None => output.push_str(&format!("## Changes - {}\n\n", data.date)),
    }

    if data.ticket_count == 0 && data.commits_without_tickets.is_empty() {
        output.push_str("No changes.\n");
        return output;
    }

    output.push_str(&tickets_section(&data.ticket_groups));

    if !data.pending_tickets.is_empty() {
        output.push_str("### Pending Approval\n\n");
        output.push_str(&pending_section(&data.pending_tickets));
        output.push('\n');
    }

    if !data.commits_without_tickets.is_empty() {
        output.push_str("### Other Commits\n\n");
        output.push_str(&commits_section(&data.commits_without_tickets));
        output.push('\n');
    }

    if !data.release_versions.is_empty() {
        output.push_str("### Release Versions\n\n");
        output.push_str(&release_versions_section(&data.release_versions));
        output.push('\n');
    }

    output.push_str(&format!(
        "_{} tickets, {} commits_\n",
        data.ticket_count, data.commit_count
    ));

    debug!(output_len = output.len(), "markdown changelog rendered");
    output
}
