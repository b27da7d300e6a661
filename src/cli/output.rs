//! Terminal rendering for the dashboard

use crate::app::View;
use crate::connection::ConnectionState;
use crate::table::{StatusTable, COLUMNS, STATUS_COLUMN};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::io::{self, Write};

/// Format the status table for the terminal
pub fn format_status_table(table: &StatusTable) -> String {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL);
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(COLUMNS.to_vec());

    for row in table.rows() {
        let cells = row.cells().iter().enumerate().map(|(i, text)| {
            if i == STATUS_COLUMN {
                Cell::new(status_label(text))
            } else {
                Cell::new(text)
            }
        });
        out.add_row(cells);
    }

    out.to_string()
}

/// Colour a status cell by HTTP status class
pub fn status_label(status: &str) -> String {
    match status.trim().parse::<i64>() {
        Ok(code @ 200..=299) => code.to_string().green().to_string(),
        Ok(code @ 300..=399) => code.to_string().cyan().to_string(),
        Ok(code) => code.to_string().red().to_string(),
        Err(_) if status.trim().is_empty() => "pending".yellow().to_string(),
        Err(_) => status.yellow().to_string(),
    }
}

/// Colour the connection indicator
pub fn connection_label(state: ConnectionState) -> String {
    match state {
        ConnectionState::Connected => state.as_str().green().to_string(),
        ConnectionState::Connecting => state.as_str().yellow().to_string(),
        ConnectionState::Disconnected | ConnectionState::Errored => {
            state.as_str().red().to_string()
        }
    }
}

/// [`View`] that prints to a terminal.
pub struct TerminalView<W: Write> {
    out: W,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        // A closed stdout must not take the dashboard down
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            tracing::debug!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write> View for TerminalView<W> {
    fn connection_changed(&mut self, state: ConnectionState) {
        self.write_line(&format!("Connection: {}", connection_label(state)));
    }

    fn table_changed(&mut self, table: &StatusTable) {
        self.write_line(&format_status_table(table));
    }

    fn notify(&mut self, message: &str) {
        self.write_line(&format!("» {}", message));
    }
}
