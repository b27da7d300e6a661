//! Applies inbound status updates to the table.

use super::StatusTable;
use crate::protocol::StatusUpdateEvent;

/// What happened when an update was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Exactly one row matched and its status cell was rewritten
    Updated,
    /// No row carries this identifier (not rendered yet, or since removed)
    NoMatch,
    /// Several rows share the identifier; nothing was changed
    Ambiguous(usize),
}

/// Apply one status update to the row whose identifier equals `event.id`.
///
/// Every other row is left untouched. Zero matches is a normal outcome. More
/// than one match means the identifier-uniqueness invariant is broken, so the
/// update is skipped rather than written to several rows.
pub fn reconcile(table: &mut StatusTable, event: &StatusUpdateEvent) -> ReconcileOutcome {
    let matches: Vec<usize> = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.id() == Some(event.id))
        .map(|(index, _)| index)
        .collect();

    match matches.as_slice() {
        [] => {
            tracing::debug!(site_id = event.id, "No row for status update");
            ReconcileOutcome::NoMatch
        }
        [index] => {
            let row = &mut table.rows_mut()[*index];
            tracing::debug!(
                site_id = event.id,
                old_status = row.status(),
                new_status = event.status_code,
                "Status updated"
            );
            row.set_status(event.status_code);
            ReconcileOutcome::Updated
        }
        _ => {
            tracing::warn!(
                site_id = event.id,
                matching_rows = matches.len(),
                "Duplicate row identifiers in status table, update skipped"
            );
            ReconcileOutcome::Ambiguous(matches.len())
        }
    }
}
