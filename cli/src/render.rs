//! Plain-text tables for list pages.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use hubview_engine::{EmptyState, ListSnapshot};
use hubview_types::{NamespaceSummary, RegistryRemote, Role, User};

const NONE: &str = "---";

/// Column-aligned text table.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();
        let headers: Vec<String> = self.headers.iter().map(ToString::to_string).collect();
        write_row(&mut out, &headers, &widths);
        for row in &self.rows {
            write_row(&mut out, row, &widths);
        }
        out
    }
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

fn date(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(
        || NONE.to_string(),
        |d| d.format("%Y-%m-%d %H:%M").to_string(),
    )
}

pub fn registry_row(remote: &RegistryRemote) -> Vec<String> {
    let status = match (remote.last_sync_status(), remote.last_synced()) {
        (Some(state), Some(at)) => format!("{state} {}", date(Some(at))),
        (Some(state), None) => state.to_string(),
        (None, _) => NONE.to_string(),
    };
    vec![
        remote.name.clone(),
        date(remote.created_at),
        date(remote.updated_at),
        remote.url.clone(),
        status,
    ]
}

pub fn registry_table(items: &[RegistryRemote]) -> Table {
    let mut table = Table::new(vec!["NAME", "CREATED", "UPDATED", "URL", "SYNC STATUS"]);
    for remote in items {
        table.push(registry_row(remote));
    }
    table
}

pub fn user_table(items: &[User]) -> Table {
    let mut table = Table::new(vec!["ID", "USERNAME", "NAME", "EMAIL", "CREATED"]);
    for user in items {
        let name = format!("{} {}", user.first_name, user.last_name);
        table.push(vec![
            user.id.to_string(),
            user.username.clone(),
            name.trim().to_string(),
            user.email.clone(),
            date(user.date_joined),
        ]);
    }
    table
}

/// Role rows: `[x]` selected, `[-]` already assigned.
pub fn role_table<'a>(rows: impl IntoIterator<Item = (&'a Role, bool, bool)>) -> Table {
    let mut table = Table::new(vec!["", "ROLE", "DESCRIPTION"]);
    for (role, selected, disabled) in rows {
        let mark = match (selected, disabled) {
            (_, true) => "[-]",
            (true, false) => "[x]",
            (false, false) => "[ ]",
        };
        table.push(vec![
            mark.to_string(),
            role.name.clone(),
            role.description.clone().unwrap_or_default(),
        ]);
    }
    table
}

pub fn namespace_table(items: &[NamespaceSummary]) -> Table {
    let mut table = Table::new(vec!["NAME", "COMPANY", "COLLECTIONS"]);
    for ns in items {
        table.push(vec![
            ns.name.clone(),
            ns.company.clone(),
            ns.num_collections.to_string(),
        ]);
    }
    table
}

/// Footer line: `Page 2 of 5 (43 items)`.
pub fn page_footer(page: Option<u32>, page_size: Option<u32>, total_count: u64) -> String {
    let size = u64::from(page_size.unwrap_or(1).max(1));
    let pages = total_count.div_ceil(size).max(1);
    format!(
        "Page {} of {pages} ({total_count} items)",
        page.unwrap_or(1)
    )
}

pub fn empty_message(empty: EmptyState, no_data: &str) -> Option<String> {
    match empty {
        EmptyState::Items => None,
        EmptyState::NoData => Some(no_data.to_string()),
        EmptyState::NoFilterResults => {
            Some("No results found. Clear the filters and try again.".to_string())
        }
    }
}

pub fn registry_snapshot(snapshot: &ListSnapshot<RegistryRemote>) -> String {
    let mut out = match empty_message(snapshot.empty, "No remote registries yet.") {
        Some(message) => format!("{message}\n"),
        None => registry_table(&snapshot.items).render(),
    };
    out.push_str(&page_footer(
        snapshot.params.page(),
        snapshot.params.page_size(),
        snapshot.total_count,
    ));
    if let Some(error) = &snapshot.last_error {
        let _ = write!(out, "\nError: {error}");
    }
    out
}
