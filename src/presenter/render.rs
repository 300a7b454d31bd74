//! Terminal rendering of the dashboard state

use chrono::{TimeZone, Utc};
use std::fmt::{self, Write};

use super::state::DashboardState;

pub const TITLE: &str = "Recent NFC Logs";
pub const LOADING: &str = "Loading logs...";
pub const NO_LOGS: &str = "No logs found.";
pub const NO_VERIFIED: &str = "No verified entries found.";

/// Render the whole dashboard, formatting times in `tz`
pub fn render_dashboard<Tz>(state: &DashboardState, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if state.loading {
        return format!("{}\n", LOADING);
    }
    if let Some(error) = &state.error {
        return format!("{}\n", error);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}\n", TITLE);

    out.push_str("Logs\n");
    if state.logs.is_empty() {
        let _ = writeln!(out, "{}", NO_LOGS);
    } else {
        let rows = state
            .matched()
            .into_iter()
            .map(|m| {
                vec![
                    m.log.timestamp.to_string(),
                    local_time(m.log.timestamp, tz),
                    m.log.message.clone(),
                    m.status.to_string(),
                ]
            })
            .collect();
        out.push_str(&table(&["Timestamp", "Time (Local)", "Message", "Status"], rows));
    }

    out.push_str("\nVerified\n");
    if state.verified.is_empty() {
        let _ = writeln!(out, "{}", NO_VERIFIED);
    } else {
        let mut verified: Vec<_> = state.verified.iter().collect();
        verified.sort_by_key(|v| v.timestamp);
        let rows = verified
            .into_iter()
            .map(|v| {
                vec![
                    v.timestamp.to_string(),
                    local_time(v.timestamp, tz),
                    v.message.to_string(),
                ]
            })
            .collect();
        out.push_str(&table(&["Timestamp", "Time (Local)", "Status"], rows));
    }

    out
}

fn local_time<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match Utc.timestamp_millis_opt(timestamp).single() {
        Some(time) => time
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "-".to_string(),
    }
}

/// Left-aligned columns separated by two spaces
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);

    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
