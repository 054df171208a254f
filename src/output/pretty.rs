use chrono::Utc;
use colored::Colorize;

use crate::core::datetime::format_age;
use crate::session::{RequestState, RequestStatus, SessionState};
use crate::workflow::profile_url;

fn status_icon(status: RequestStatus) -> colored::ColoredString {
    match status {
        RequestStatus::Pending => "[ ]".white(),
        RequestStatus::Completed => "[x]".green(),
        RequestStatus::Skipped => "[-]".yellow(),
    }
}

/// Format session progress for humans
pub fn format_status_pretty(session: &SessionState) -> String {
    let progress = session.progress();
    let now = Utc::now();

    let mut output = format!("{}\n", "Session Progress".cyan().bold());
    output.push_str(&"─".repeat(40).dimmed().to_string());
    output.push('\n');
    output.push_str(&format!("  {} {}\n", "✅ Completed:".bold(), progress.completed));
    output.push_str(&format!("  {} {}\n", "⏭  Skipped:".bold(), progress.skipped));
    output.push_str(&format!("  {} {}\n", "⏳ Pending:".bold(), progress.pending));
    output.push_str(&format!(
        "  {} {}/{} ({}%)\n",
        "Position:".bold(),
        progress.position.min(progress.total),
        progress.total,
        progress.percent()
    ));
    output.push_str(&format!(
        "  {} {}\n",
        "Updated:".bold(),
        format_age(now, session.last_updated_at).dimmed()
    ));
    output.push('\n');

    match session.current_request() {
        Some(request) => output.push_str(&format_current_pretty(Some(request))),
        None => output.push_str(&format!("{}", "All pending follow requests processed.".green())),
    }

    output
}

/// Format the queue with a marker on the current request
pub fn format_queue_pretty(session: &SessionState) -> String {
    if session.is_empty() {
        return "Queue (0 requests)\n  No requests".to_string();
    }

    let mut output = format!("Queue ({} requests)\n", session.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for (index, request) in session.iter().enumerate() {
        let pointer = if index == session.current_index() {
            "👉".to_string()
        } else {
            " •".dimmed().to_string()
        };

        let name = match request.status {
            RequestStatus::Pending => format!("@{}", request.username).bold().to_string(),
            RequestStatus::Completed => format!("@{}", request.username),
            RequestStatus::Skipped => format!("@{}", request.username).dimmed().to_string(),
        };

        output.push_str(&format!("{pointer} {} {name}\n", status_icon(request.status)));
    }

    output
}

/// Format the current request, or the finished message
pub fn format_current_pretty(request: Option<&RequestState>) -> String {
    let Some(request) = request else {
        return "All pending follow requests processed.".green().to_string();
    };

    let mut output = format!("{}\n", "Current Request".cyan().bold());
    output.push_str(&format!("  {} @{}\n", "Username:".bold(), request.username));
    output.push_str(&format!(
        "  {} {}\n",
        "Profile:".bold(),
        profile_url(&request.username).underline()
    ));

    match request.last_opened_at {
        Some(opened) => output.push_str(&format!(
            "  {} {} ({})\n",
            "Opened:".bold(),
            format_age(Utc::now(), opened),
            "complete or skip it".dimmed()
        )),
        None => output.push_str(&format!(
            "  {} {}\n",
            "Opened:".bold(),
            "not yet - run 'followsweep open'".yellow()
        )),
    }

    output
}
