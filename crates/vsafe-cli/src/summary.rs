//! Text and table rendering for report results.

use std::io::{self, Write};
use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use vsafe_csv::CsvHeader;

use crate::report::values::ValueScan;
use crate::report::visits::VisitSummary;

/// `count` as a percentage of `total`, or `-` when `total` is zero.
pub fn percent(count: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.2}%", count as f64 * 100.0 / total as f64)
}

/// Rows of a visit summary: label, subject count, percentage of all subjects.
pub fn visit_rows(summary: &VisitSummary) -> Vec<(&'static str, usize, String)> {
    let total = summary.total_subjects;
    let counts = &summary.counts;
    [
        ("Any", counts.any),
        ("ER visits", counts.er),
        ("Hospital visits", counts.hospital),
        ("Outpatient visits", counts.outpatient),
        ("Telehealth visits", counts.telehealth),
    ]
    .into_iter()
    .map(|(label, count)| (label, count, percent(count, total)))
    .collect()
}

pub fn visit_table(summary: &VisitSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(summary.title),
        header_cell("Subjects"),
        header_cell("Of all"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);

    table.add_row(vec![
        Cell::new("Total registrants").add_attribute(Attribute::Bold),
        Cell::new(summary.total_subjects).add_attribute(Attribute::Bold),
        Cell::new("").fg(Color::DarkGrey),
    ]);
    for (label, count, share) in visit_rows(summary) {
        table.add_row(vec![Cell::new(label), Cell::new(count), Cell::new(share)]);
    }
    table
}

pub fn print_visit_summary(summary: &VisitSummary) {
    println!("{}", visit_table(summary));
}

/// Header listing for one file: the path, then each column indented.
pub fn write_toc<W: Write>(out: &mut W, path: &Path, header: &CsvHeader) -> io::Result<()> {
    writeln!(out, "{}", path.display())?;
    for column in header.columns() {
        writeln!(out, "    {column}")?;
    }
    writeln!(out)
}

/// Distinct values per column; columns over the cap are listed as such.
pub fn write_values<W: Write>(out: &mut W, scan: &ValueScan) -> io::Result<()> {
    writeln!(out, "# rows {}", scan.rows)?;
    for column in &scan.columns {
        writeln!(out)?;
        writeln!(out, "Column {}: {}", column.index, column.name)?;
        match &column.values {
            Some(values) => {
                for value in values {
                    writeln!(out, "    {value:?}")?;
                }
            }
            None => writeln!(out, "    (too many distinct values)")?,
        }
    }
    Ok(())
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
