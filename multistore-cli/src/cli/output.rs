// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde_json::Value;

use super::commands::OutputFormat;

/// One line of the `drivers` listing
#[derive(Debug, Clone)]
pub struct DriverRow {
    pub name: String,
    pub supported: bool,
    /// 1-based position in the active driver order, if listed
    pub priority: Option<usize>,
}

/// Formatter for store entries and driver listings
pub struct EntryFormatter;

impl EntryFormatter {
    /// Format store entries in the specified format
    pub fn format_entries(driver: &str, entries: &[(String, Value)], format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_table(driver, entries),
            OutputFormat::Json => Self::format_json(driver, entries),
        }
    }

    /// Format entries as a table using comfy-table
    fn format_table(driver: &str, entries: &[(String, Value)]) -> String {
        if entries.is_empty() {
            return format!("{}\n", "Store is empty".yellow());
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", "Store Contents".bold().green()));
        output.push_str(&format!("Driver: {}\n", driver));
        output.push_str(&format!("Entries: {}\n\n", entries.len()));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("#").fg(Color::Green),
            Cell::new("key").fg(Color::Green),
            Cell::new("value").fg(Color::Green),
        ]);

        for (index, (key, value)) in entries.iter().enumerate() {
            table.add_row(vec![
                index.to_string(),
                key.clone(),
                Self::value_to_string(value),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// Format entries as a JSON document
    fn format_json(driver: &str, entries: &[(String, Value)]) -> String {
        let mut map = serde_json::Map::new();
        for (key, value) in entries {
            map.insert(key.clone(), value.clone());
        }

        let json_result = serde_json::json!({
            "driver": driver,
            "length": entries.len(),
            "entries": Value::Object(map),
        });

        let mut text = serde_json::to_string_pretty(&json_result).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize entries to JSON\"}".to_string()
        });
        text.push('\n');
        text
    }

    /// Format the driver listing as a table
    pub fn format_drivers(rows: &[DriverRow]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("priority").fg(Color::Green),
            Cell::new("driver").fg(Color::Green),
            Cell::new("supported").fg(Color::Green),
        ]);

        for row in rows {
            let supported = if row.supported {
                Cell::new("yes").fg(Color::Green)
            } else {
                Cell::new("no").fg(Color::Red)
            };
            table.add_row(vec![
                Cell::new(row.priority.map(|p| p.to_string()).unwrap_or_else(|| "-".into())),
                Cell::new(&row.name),
                supported,
            ]);
        }

        format!("{}\n", table)
    }

    /// Convert a value to a display string; strings print without quotes
    pub fn value_to_string(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => "NULL".to_string(),
            other => other.to_string(),
        }
    }
}
