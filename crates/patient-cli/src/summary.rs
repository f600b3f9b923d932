use std::error::Error;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use patient_model::{PatientField, PatientRecord};

use crate::commands::ListOutcome;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Table with one row per record, columns in storage order.
pub fn patients_table(records: &[PatientRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(
        PatientField::ALL
            .iter()
            .map(|field| header_cell(field.label())),
    );
    apply_table_style(&mut table);
    for record in records {
        table.add_row(record.to_row());
    }
    table
}

pub fn print_listing(outcome: &ListOutcome) {
    if outcome.records.is_empty() {
        println!("No patients stored.");
    } else {
        println!("{}", patients_table(&outcome.records));
    }
    println!("Patients: {}", outcome.records.len());
    if outcome.has_errors() {
        println!("Invalid rows: {}", outcome.invalid.len());
        for error in &outcome.invalid {
            println!("  {}", error_chain(error));
        }
    }
}

/// An error followed by each of its sources, joined with `": "`.
pub fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
