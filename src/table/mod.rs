//! Status table and reconciliation.
//!
//! The table is the dashboard's view of every monitored site. Rows are seeded
//! once (from configuration) and then only their status cell changes, driven
//! by [`reconcile`] as status updates arrive from the server.

mod reconcile;

pub use reconcile::{reconcile, ReconcileOutcome};

use crate::config::SiteConfig;

/// Column headers, in display order.
pub const COLUMNS: [&str; 7] = [
    "ID",
    "Name",
    "URL",
    "Status",
    "Date Added",
    "Uptime",
    "Interval",
];

/// Position of the identifier cell in every row.
pub const ID_COLUMN: usize = 0;

/// Position of the status cell in every row.
pub const STATUS_COLUMN: usize = 3;

/// One row of the status table.
///
/// Cells are kept as display text. The identifier cell is fixed for the
/// lifetime of the row; only the status cell is ever rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<String>,
}

impl TableRow {
    /// Build a row from raw cells.
    ///
    /// Short rows are padded with empty cells so the status column always
    /// exists.
    pub fn new(mut cells: Vec<String>) -> Self {
        if cells.len() < COLUMNS.len() {
            cells.resize(COLUMNS.len(), String::new());
        }
        Self { cells }
    }

    /// Parsed identifier, or `None` if the identifier cell is not an integer.
    pub fn id(&self) -> Option<i64> {
        self.cells[ID_COLUMN].trim().parse().ok()
    }

    /// Current status cell text.
    pub fn status(&self) -> &str {
        &self.cells[STATUS_COLUMN]
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub(crate) fn set_status(&mut self, status_code: i64) {
        self.cells[STATUS_COLUMN] = status_code.to_string();
    }
}

impl From<&SiteConfig> for TableRow {
    fn from(site: &SiteConfig) -> Self {
        Self::new(vec![
            site.id.to_string(),
            site.name.clone(),
            site.url.clone(),
            site.status_code.map(|c| c.to_string()).unwrap_or_default(),
            site.date_added.clone().unwrap_or_default(),
            site.uptime.clone().unwrap_or_default(),
            site.interval.to_string(),
        ])
    }
}

/// Ordered set of rows shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTable {
    rows: Vec<TableRow>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the table from configured sites, preserving their order.
    pub fn from_sites(sites: &[SiteConfig]) -> Self {
        Self {
            rows: sites.iter().map(TableRow::from).collect(),
        }
    }

    /// Append a row. Only the page owner adds rows; reconciliation never does.
    pub fn push_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Status text of the row with the given identifier, if present.
    pub fn status_of(&self, id: i64) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.id() == Some(id))
            .map(TableRow::status)
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [TableRow] {
        &mut self.rows
    }
}
