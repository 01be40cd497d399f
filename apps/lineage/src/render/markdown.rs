//! # Markdown Tables
//!
//! Cell rules:
//! - absent, unset, blank or placeholder values print as `-`
//! - a one-element list prints as its element, longer lists joined by `, `
//! - script settings print as `SET` or `-`, never by value
//! - `|` is escaped and line breaks are flattened so a cell stays one cell

use lineage_core::{ColumnHeader, ComparisonTable, EffectiveMatrix, Presence, SettingPolicy};
use serde_json::Value;

const EMPTY_CELL: &str = "-";
const SET_CELL: &str = "SET";

/// Side-by-side declared values along a chain, root on the left.
#[must_use]
pub fn comparison_table(table: &ComparisonTable, policy: &SettingPolicy) -> String {
    let mut out = header(&table.columns);
    for row in &table.rows {
        let cells = row
            .cells
            .iter()
            .map(|cell| format_cell(cell.as_ref(), row.script, policy));
        out.push_str(&table_row(&row.setting, cells));
    }
    out
}

/// Effective values of several profiles, one column each.
#[must_use]
pub fn effective_table(matrix: &EffectiveMatrix, policy: &SettingPolicy) -> String {
    let mut out = header(&matrix.columns);
    for row in &matrix.rows {
        let cells = row
            .cells
            .iter()
            .map(|cell| format_cell(cell.value(), row.script, policy));
        out.push_str(&table_row(&row.setting, cells));
    }
    out
}

/// Render one cell.
#[must_use]
pub fn format_cell(value: Option<&Value>, script: bool, policy: &SettingPolicy) -> String {
    if script {
        return match policy.presence(value) {
            Presence::Set => SET_CELL.to_string(),
            Presence::NotSet => EMPTY_CELL.to_string(),
        };
    }

    let Some(value) = value else {
        return EMPTY_CELL.to_string();
    };
    let text = display_value(value);
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == policy.placeholder {
        return EMPTY_CELL.to_string();
    }
    escape(trimmed)
}

/// Plain-text form of a setting value.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => match items.as_slice() {
            [only] => display_value(only),
            _ => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        },
        other => other.to_string(),
    }
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn header(columns: &[ColumnHeader]) -> String {
    let mut out = String::from("| Setting Name |");
    for column in columns {
        out.push_str(&format!(" {} |", escape(&column.store_key)));
    }
    out.push('\n');
    out.push_str("| --- |");
    for _ in columns {
        out.push_str(" --- |");
    }
    out.push('\n');
    out
}

fn table_row(setting: &str, cells: impl Iterator<Item = String>) -> String {
    let mut out = format!("| {} |", escape(setting));
    for cell in cells {
        out.push_str(&format!(" {} |", cell));
    }
    out.push('\n');
    out
}
