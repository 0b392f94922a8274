use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use alr_model::DiagnosticKind;

use crate::types::SynthesizeResult;

/// Print the run summary to stderr, leaving stdout to the resources.
pub fn print_summary(result: &SynthesizeResult) {
    eprintln!("Batch: {}", result.batch_id);
    eprintln!(
        "Schema: {} (FHIR {})",
        result.version,
        result.version.fhir_release()
    );
    if let Some(path) = &result.crosswalk {
        eprintln!("Crosswalk: {}", path.display());
    }
    match &result.output {
        Some(path) => eprintln!("Output: {}", path.display()),
        None => eprintln!("Output: stdout"),
    }
    eprintln!(
        "Records: {} ({} synthesized, {} aborted), {} lines written",
        result.summary.records, result.summary.bundles, result.summary.aborted, result.lines_written
    );

    let mut resources = Table::new();
    resources.set_header(vec![header_cell("Resource"), header_cell("Count")]);
    apply_summary_table_style(&mut resources);
    align_column(&mut resources, 1, CellAlignment::Right);
    let mut total = 0usize;
    for (kind, count) in &result.summary.resources {
        total += count;
        resources.add_row(vec![
            Cell::new(kind.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(count),
        ]);
    }
    resources.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
    ]);
    eprintln!("{resources}");

    if result.summary.diagnostics.is_empty() {
        return;
    }
    let mut diagnostics = Table::new();
    diagnostics.set_header(vec![
        header_cell("Diagnostic"),
        header_cell("Effect"),
        header_cell("Count"),
    ]);
    apply_summary_table_style(&mut diagnostics);
    align_column(&mut diagnostics, 2, CellAlignment::Right);
    for (kind, count) in &result.summary.diagnostics {
        diagnostics.add_row(vec![
            Cell::new(kind.as_str()),
            effect_cell(*kind),
            count_cell(*count),
        ]);
    }
    eprintln!();
    eprintln!("Diagnostics:");
    eprintln!("{diagnostics}");
}

fn effect_cell(kind: DiagnosticKind) -> Cell {
    if kind.aborts_record() {
        Cell::new("record skipped")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("field skipped").fg(Color::Yellow)
    }
}

pub fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Yellow).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
