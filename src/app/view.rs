//! Presentation seam between the event loop and whatever draws the dashboard.

use crate::connection::ConnectionState;
use crate::table::StatusTable;

/// Receives every visible change the event loop makes.
pub trait View {
    /// The connection indicator changed.
    fn connection_changed(&mut self, state: ConnectionState);

    /// At least one status cell changed, or the table is shown for the first time.
    fn table_changed(&mut self, table: &StatusTable);

    /// Operator-facing message, e.g. why a registration was refused.
    fn notify(&mut self, message: &str);
}
