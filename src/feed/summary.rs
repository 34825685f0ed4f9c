//! Human-readable description of the active filters.

use super::query::SortOrder;

pub const NO_FILTERS: &str = "No filters applied.";

/// Compose the summary from the synchronously-known clauses plus the
/// creator name once the async lookup has resolved.
///
/// The default sort (distance) is not an active filter and produces no
/// clause; that keeps the fixed no-filter sentence reachable.
pub fn compose(
    search: &str,
    order: SortOrder,
    attending_only: bool,
    creator_name: Option<&str>,
) -> String {
    let mut clauses: Vec<String> = Vec::new();

    if !search.is_empty() {
        clauses.push(format!("Searching by: \"{search}\""));
    }
    if order != SortOrder::default() {
        clauses.push(format!("Ordering by: {order}"));
    }
    if attending_only {
        clauses.push("Showing attending only".to_string());
    }
    if let Some(name) = creator_name {
        clauses.push(format!("Events created by: User {name}"));
    }

    if clauses.is_empty() {
        NO_FILTERS.to_string()
    } else {
        format!("{}.", clauses.join(". "))
    }
}
