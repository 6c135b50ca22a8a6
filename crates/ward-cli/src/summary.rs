use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ward_model::KpiSummary;

use crate::types::{ArtifactEntry, RunResult};

pub fn print_run_summary(result: &RunResult) {
    println!("Data dir: {}", result.data_dir.display());
    let source = if result.generated {
        "generated"
    } else {
        "loaded"
    };
    let fingerprint = result.fingerprint.get(..12).unwrap_or(&result.fingerprint);
    println!(
        "Raw events: {source} {} records (sha256 {fingerprint})",
        result.records
    );
    print_kpi_table(&result.kpis);
    match &result.metrics {
        Some(metrics) => println!(
            "Model: roc_auc {:.3}, test_accuracy {:.3}",
            metrics.roc_auc, metrics.test_accuracy
        ),
        None => println!("Model: training skipped"),
    }
    print_artifact_table(&result.artifacts);
}

pub fn print_kpi_table(kpis: &KpiSummary) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("occupancy_rate"),
        rate_cell(kpis.occupancy_rate),
    ]);
    table.add_row(vec![Cell::new("icu_rate"), rate_cell(kpis.icu_rate)]);
    let stay_cell = match kpis.avg_length_of_stay {
        Some(days) => Cell::new(format!("{days:.3}")),
        None => dim_cell("-"),
    };
    table.add_row(vec![Cell::new("avg_length_of_stay"), stay_cell]);
    table.add_row(vec![
        Cell::new("readmission_rate"),
        rate_cell(kpis.readmission_rate),
    ]);
    table.add_row(vec![
        Cell::new("mortality_rate"),
        rate_cell(kpis.mortality_rate),
    ]);
    table.add_row(vec![
        Cell::new("complication_rate"),
        rate_cell(kpis.complication_rate),
    ]);
    table.add_row(vec![
        Cell::new("avg_treatment_cost"),
        Cell::new(format!("{:.2}", kpis.avg_treatment_cost)),
    ]);
    table.add_row(vec![Cell::new("opd_share"), rate_cell(kpis.opd_share)]);
    println!("{table}");
}

fn print_artifact_table(artifacts: &[ArtifactEntry]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Artifact"),
        header_cell("Rows"),
        header_cell("Path"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in artifacts {
        let rows_cell = match entry.rows {
            Some(count) => Cell::new(count),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(entry.label),
            rows_cell,
            Cell::new(entry.path.display().to_string()),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn rate_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.3}"))
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
