use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use icu_model::{BatchReport, SkipReason};

use crate::types::BatchResult;

/// Skipped patients listed individually before the table is cut off.
const SKIPPED_LISTED: usize = 20;

pub fn print_summary(result: &BatchResult) {
    let report = &result.report;
    println!("Batch: {}", report.batch_idx);
    if let Some(path) = &result.config {
        println!("Options: {}", path.display());
    }
    match &report.output_path {
        Some(path) => println!("Output: {}", path.display()),
        None if result.dry_run => println!("Output: (dry run, nothing written)"),
        None => println!("Output: (nothing written)"),
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Outcome"), header_cell("Patients")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("labelled").fg(Color::Green),
        Cell::new(report.patients_labeled),
    ]);
    for reason in SkipReason::ALL {
        table.add_row(vec![
            Cell::new(format!("skipped: {reason}")),
            count_cell(report.skipped_with(reason), Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.patients_total).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("rows written")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.rows_written).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_skipped_table(report);
}

fn print_skipped_table(report: &BatchReport) {
    if report.skipped.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Patient"),
        header_cell("Reason"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for skipped in report.skipped.iter().take(SKIPPED_LISTED) {
        table.add_row(vec![
            Cell::new(skipped.patient_id),
            Cell::new(skipped.reason).fg(Color::Yellow),
            Cell::new(&skipped.detail),
        ]);
    }
    println!();
    println!("Skipped:");
    println!("{table}");
    let hidden = report.skipped.len().saturating_sub(SKIPPED_LISTED);
    if hidden > 0 {
        println!("... and {hidden} more");
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
