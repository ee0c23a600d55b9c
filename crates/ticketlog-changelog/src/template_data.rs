//! Template data construction

use chrono::Utc;
use tracing::{debug, instrument};

use ticketlog_core::error::{Result, TemplateError};
use ticketlog_core::{
    ChangelogData, Config, HookContext, ReleaseVersion, TemplateData, Ticket, TicketGroup,
};

/// Build template data from changelog data.
///
/// Tickets whose issue type is listed in `jira.exclude_issue_types` are
/// dropped. The rest are grouped by issue type in order of first
/// appearance. When `jira.approval_statuses` is non-empty, tickets with a
/// known status outside that list are also reported as pending.
pub fn build_template_data(
    config: &Config,
    changelog: &ChangelogData,
    release_versions: &[ReleaseVersion],
) -> TemplateData {
    let jira = &config.jira;
    let included: Vec<&Ticket> = changelog
        .tickets
        .iter()
        .filter(|t| {
            !jira
                .exclude_issue_types
                .iter()
                .any(|excluded| excluded.eq_ignore_ascii_case(&t.issue_type))
        })
        .collect();

    let mut ticket_groups: Vec<TicketGroup> = Vec::new();
    for ticket in &included {
        match ticket_groups
            .iter_mut()
            .find(|g| g.issue_type == ticket.issue_type)
        {
            Some(group) => group.tickets.push((*ticket).clone()),
            None => ticket_groups.push(TicketGroup {
                issue_type: ticket.issue_type.clone(),
                tickets: vec![(*ticket).clone()],
            }),
        }
    }

    let pending_tickets: Vec<Ticket> = if jira.approval_statuses.is_empty() {
        Vec::new()
    } else {
        included
            .iter()
            .filter(|t| {
                t.status.as_deref().is_some_and(|status| {
                    !jira
                        .approval_statuses
                        .iter()
                        .any(|approved| approved.eq_ignore_ascii_case(status))
                })
            })
            .map(|t| (*t).clone())
            .collect()
    };

    debug!(
        groups = ticket_groups.len(),
        tickets = included.len(),
        excluded = changelog.tickets.len() - included.len(),
        pending = pending_tickets.len(),
        "built template data"
    );

    TemplateData {
        release: changelog.release.clone(),
        date: Utc::now().format("%Y-%m-%d").to_string(),
        jira_base_url: jira.api.base_url(),
        ticket_groups,
        pending_tickets,
        commits_without_tickets: changelog.commits_without_tickets.clone(),
        release_versions: release_versions.to_vec(),
        ticket_count: included.len(),
        commit_count: changelog.commit_count,
    }
}

/// Pass template data through the `transform_data` hook, if configured.
///
/// The hook gets the data as JSON on stdin and must print template data
/// JSON.
#[instrument(skip_all)]
pub async fn transform_template_data(config: &Config, data: TemplateData) -> Result<TemplateData> {
    let Some(hook) = &config.transform_data else {
        return Ok(data);
    };

    let input = serde_json::to_string(&data)?;
    let context = HookContext::from_config(config).with_release(data.release.as_deref());
    let output = hook.run(Some(&input), &context).await?;

    let transformed = serde_json::from_str(output.trim())
        .map_err(|e| TemplateError::InvalidTransform(e.to_string()))?;
    debug!(command = %hook.command, "transformed template data");
    Ok(transformed)
}
