use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use polars::prelude::{AnyValue, DataFrame};
use tracing::{info, info_span, warn};

use ward_ingest::{any_to_string, parse_f64, parse_i64, str_column};
use ward_model::{ArtifactLayout, VISIT_SCHEMA, columns};
use ward_report::{ArtifactCache, read_kpi_summary, read_model_metrics};
use ward_synth::{SynthOptions, generate_to_csv};

use crate::cli::{GenerateArgs, RunArgs, ShowArgs};
use crate::pipeline::{acquire, preprocess, train};
use crate::summary::{apply_table_style, print_kpi_table};
use crate::types::{ArtifactEntry, RunResult};

/// Maximum rows shown in the high-risk roster.
const ROSTER_ROWS: usize = 12;

pub fn run_pipeline(args: &RunArgs) -> Result<RunResult> {
    let layout = ArtifactLayout::new(&args.data_dir);
    let run_span = info_span!("run", data_dir = %layout.root().display());
    let _run_guard = run_span.enter();
    let run_start = Instant::now();

    let acquired = acquire(&layout, args.records, args.seed)?;
    let processed = preprocess(&layout, &acquired.frame)?;

    let mut artifacts = vec![
        ArtifactEntry {
            label: "processed_patients",
            path: layout.processed_patients(),
            rows: Some(processed.frame.height()),
        },
        ArtifactEntry {
            label: "department_summary",
            path: layout.department_summary(),
            rows: Some(processed.departments),
        },
        ArtifactEntry {
            label: "weekly_trend",
            path: layout.weekly_trend(),
            rows: Some(processed.weeks),
        },
        ArtifactEntry {
            label: "kpi_summary",
            path: layout.kpi_summary(),
            rows: None,
        },
    ];

    let metrics = if args.skip_training {
        info!("training skipped");
        None
    } else {
        let trained = train(&layout, &processed.frame)?;
        artifacts.push(ArtifactEntry {
            label: "predictions",
            path: layout.predictions(),
            rows: Some(trained.scored_rows),
        });
        artifacts.push(ArtifactEntry {
            label: "model_metrics",
            path: layout.model_metrics(),
            rows: None,
        });
        artifacts.push(ArtifactEntry {
            label: "readmission_model",
            path: layout.readmission_model(),
            rows: None,
        });
        Some(trained.metrics)
    };

    info!(
        records = acquired.frame.height(),
        duration_ms = run_start.elapsed().as_millis(),
        "pipeline run complete"
    );

    Ok(RunResult {
        data_dir: args.data_dir.clone(),
        generated: acquired.generated,
        fingerprint: acquired.fingerprint,
        records: acquired.frame.height(),
        kpis: processed.kpis,
        metrics,
        artifacts,
    })
}

pub fn run_generate(args: &GenerateArgs) -> Result<()> {
    let options = SynthOptions {
        records: args.records,
        seed: args.seed,
        ..SynthOptions::default()
    };
    let frame = generate_to_csv(&args.output, &options)
        .with_context(|| format!("generate {}", args.output.display()))?;
    println!(
        "Wrote {} records to {}",
        frame.height(),
        args.output.display()
    );
    Ok(())
}

pub fn run_show(args: &ShowArgs) -> Result<()> {
    let layout = ArtifactLayout::new(&args.data_dir);
    let mut cache = ArtifactCache::new();

    let Some(kpis) = read_kpi_summary(&layout.kpi_summary())? else {
        warn!(
            path = %layout.kpi_summary().display(),
            "no KPI summary found; run the pipeline first"
        );
        return Ok(());
    };
    println!("Data dir: {}", layout.root().display());
    print_kpi_table(&kpis);

    match read_model_metrics(&layout.model_metrics())? {
        Some(metrics) => println!(
            "Model: roc_auc {:.3}, test_accuracy {:.3}",
            metrics.roc_auc, metrics.test_accuracy
        ),
        None => warn!("no model metrics found"),
    }

    match cache.frame(&layout.department_summary())? {
        Some(frame) => print_department_table(&frame),
        None => warn!("no department summary found"),
    }

    match cache.frame(&layout.predictions())? {
        Some(frame) => print_high_risk_roster(&frame, args.risk_threshold)?,
        None => warn!("no predictions found"),
    }
    Ok(())
}

pub fn run_schema() {
    let mut table = Table::new();
    table.set_header(vec!["Column", "Type"]);
    apply_table_style(&mut table);
    for def in VISIT_SCHEMA {
        table.add_row(vec![def.name, def.data_type.as_str()]);
    }
    println!("{table}");
}

fn print_department_table(frame: &DataFrame) {
    let names = frame.get_column_names();
    let frame_columns = frame.get_columns();
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(frame.height());
    for idx in 0..frame.height() {
        let mut row = Vec::with_capacity(frame_columns.len());
        for column in frame_columns {
            row.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
        }
        rows.push(row);
    }
    // Busiest departments first.
    if let Some(admissions_idx) = names.iter().position(|name| name.as_str() == "admissions") {
        rows.sort_by(|left, right| {
            let left_count = parse_i64(&left[admissions_idx]).unwrap_or(0);
            let right_count = parse_i64(&right[admissions_idx]).unwrap_or(0);
            right_count.cmp(&left_count).then_with(|| left.cmp(right))
        });
    }

    let mut table = Table::new();
    table.set_header(names.iter().map(|name| name.to_string()));
    apply_table_style(&mut table);
    for row in rows {
        table.add_row(row);
    }
    println!();
    println!("Departments:");
    println!("{table}");
}

fn print_high_risk_roster(frame: &DataFrame, threshold: f64) -> Result<()> {
    let patient_ids = str_column(frame, columns::PATIENT_ID)?;
    let departments = str_column(frame, columns::DEPARTMENT)?;
    let stays = str_column(frame, columns::LENGTH_OF_STAY)?;
    let probabilities = str_column(frame, columns::PREDICTED_READMISSION_PROB)?;

    let mut flagged: Vec<(f64, usize)> = Vec::new();
    for (idx, value) in probabilities.iter().enumerate() {
        let Some(probability) = value.and_then(parse_f64) else {
            continue;
        };
        if probability >= threshold {
            flagged.push((probability, idx));
        }
    }
    flagged.sort_by(|left, right| right.0.total_cmp(&left.0).then_with(|| left.1.cmp(&right.1)));

    println!();
    println!(
        "High-risk patients (probability >= {threshold:.2}): {}",
        flagged.len()
    );
    if flagged.is_empty() {
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec![
        columns::PATIENT_ID,
        columns::DEPARTMENT,
        columns::LENGTH_OF_STAY,
        columns::PREDICTED_READMISSION_PROB,
    ]);
    apply_table_style(&mut table);
    for (probability, idx) in flagged.iter().take(ROSTER_ROWS) {
        table.add_row(vec![
            patient_ids.get(*idx).unwrap_or("-").to_string(),
            departments.get(*idx).unwrap_or("-").to_string(),
            stays.get(*idx).unwrap_or("-").to_string(),
            format!("{probability:.3}"),
        ]);
    }
    println!("{table}");
    Ok(())
}
