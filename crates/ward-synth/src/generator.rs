//! Synthetic visit-record generation.
//!
//! One seeded generator drives every draw, column by column in a fixed
//! order, so a given (records, seed) pair always produces the same table
//! and the same bytes on disk.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Poisson};
use tracing::info;

use ward_model::vocab::{AdmissionType, DEPARTMENTS, Gender, TREATMENT_CATEGORIES};
use ward_model::{DATE_FORMAT, columns, round_dp};
use ward_report::write_frame_csv;

/// Day zero for admission offsets (2025-01-01).
pub fn default_base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid base date")
}

/// Knobs for one synthetic batch.
#[derive(Debug, Clone)]
pub struct SynthOptions {
    /// Number of records to generate.
    pub records: usize,
    /// Seed for the random source.
    pub seed: u64,
    /// Admissions fall within the year starting at this date.
    pub base_date: NaiveDate,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            records: 2500,
            seed: 42,
            base_date: default_base_date(),
        }
    }
}

fn clinical_note(department: &str, risk: f64) -> String {
    let severity = if risk > 0.6 {
        "high"
    } else if risk > 0.3 {
        "moderate"
    } else {
        "low"
    };
    format!(
        "Patient admitted to {department} with {severity} acuity. \
         Clinical team monitoring vitals, labs, and response to therapy."
    )
}

/// Generates a synthetic visit table.
///
/// Length of stay is Poisson-distributed and floored at one day; the cost
/// model adds ICU and stay surcharges over a per-age baseline with Gaussian
/// noise, floored at 800. Risk scores are clamped to [0, 1] and the ICU
/// flag is set for high composite risk or inpatient stays over three days.
pub fn generate_visits(options: &SynthOptions) -> Result<DataFrame> {
    let n = options.records;
    let mut rng = StdRng::seed_from_u64(options.seed);

    let offsets: Vec<i64> = (0..n).map(|_| rng.random_range(0..365)).collect();
    let poisson = Poisson::new(3.0).context("length-of-stay distribution")?;
    let stay_draws: Vec<i64> = (0..n).map(|_| poisson.sample(&mut rng) as i64).collect();

    let departments: Vec<&str> = (0..n)
        .map(|_| DEPARTMENTS[rng.random_range(0..DEPARTMENTS.len())])
        .collect();
    let treatments: Vec<&str> = (0..n)
        .map(|_| TREATMENT_CATEGORIES[rng.random_range(0..TREATMENT_CATEGORIES.len())])
        .collect();
    let admission_types: Vec<AdmissionType> = (0..n)
        .map(|_| {
            if rng.random_bool(0.6) {
                AdmissionType::Inpatient
            } else {
                AdmissionType::Opd
            }
        })
        .collect();

    let ages: Vec<i64> = (0..n).map(|_| rng.random_range(1..95)).collect();
    let genders: Vec<Gender> = (0..n)
        .map(|_| {
            let draw: f64 = rng.random();
            if draw < 0.45 {
                Gender::Male
            } else if draw < 0.90 {
                Gender::Female
            } else {
                Gender::Other
            }
        })
        .collect();

    let lab_normal: Normal<f64> = Normal::new(0.5, 0.15).context("lab score distribution")?;
    let lab_scores: Vec<f64> = (0..n)
        .map(|_| lab_normal.sample(&mut rng).clamp(0.0, 1.0))
        .collect();
    let vital_normal: Normal<f64> = Normal::new(0.4, 0.2).context("vital risk distribution")?;
    let vital_scores: Vec<f64> = (0..n)
        .map(|_| vital_normal.sample(&mut rng).clamp(0.0, 1.0))
        .collect();
    let risk_noise: Normal<f64> = Normal::new(0.0, 0.05).context("risk noise distribution")?;
    let risk_scores: Vec<f64> = lab_scores
        .iter()
        .zip(&vital_scores)
        .map(|(lab, vital)| (0.5 * lab + 0.5 * vital + risk_noise.sample(&mut rng)).clamp(0.0, 1.0))
        .collect();

    let icu_flags: Vec<i64> = (0..n)
        .map(|idx| {
            let high_risk = risk_scores[idx] > 0.7;
            let long_inpatient_stay = admission_types[idx].is_inpatient() && stay_draws[idx] > 3;
            i64::from(high_risk || long_inpatient_stay)
        })
        .collect();
    let complication_flags: Vec<i64> = (0..n).map(|_| i64::from(rng.random_bool(0.18))).collect();
    let mortality_flags: Vec<i64> = (0..n).map(|_| i64::from(rng.random_bool(0.03))).collect();
    let readmitted_flags: Vec<i64> = (0..n).map(|_| i64::from(rng.random_bool(0.2))).collect();

    let cost_noise: Normal<f64> = Normal::new(0.0, 800.0).context("cost noise distribution")?;
    let costs: Vec<f64> = (0..n)
        .map(|idx| {
            let cost = 5000.0
                + ages[idx] as f64 * 30.0
                + stay_draws[idx] as f64 * 1000.0
                + icu_flags[idx] as f64 * 4000.0
                + cost_noise.sample(&mut rng);
            round_dp(cost.max(800.0), 2)
        })
        .collect();

    let patient_ids: Vec<i64> = (1..=n as i64).collect();
    let stays: Vec<i64> = stay_draws.iter().map(|stay| (*stay).max(1)).collect();
    let admission_dates: Vec<String> = offsets
        .iter()
        .map(|offset| {
            (options.base_date + Duration::days(*offset))
                .format(DATE_FORMAT)
                .to_string()
        })
        .collect();
    let discharge_dates: Vec<String> = offsets
        .iter()
        .zip(&stays)
        .map(|(offset, stay)| {
            (options.base_date + Duration::days(offset + stay))
                .format(DATE_FORMAT)
                .to_string()
        })
        .collect();
    let notes: Vec<String> = departments
        .iter()
        .zip(&risk_scores)
        .map(|(department, risk)| clinical_note(department, *risk))
        .collect();

    let admission_type_labels: Vec<&str> = admission_types
        .iter()
        .map(AdmissionType::as_str)
        .collect();
    let gender_labels: Vec<&str> = genders.iter().map(Gender::as_str).collect();
    let opd_flags: Vec<i64> = admission_types
        .iter()
        .map(|kind| i64::from(!kind.is_inpatient()))
        .collect();
    let rounded3 = |values: &[f64]| -> Vec<f64> {
        values.iter().map(|value| round_dp(*value, 3)).collect()
    };

    let frame = DataFrame::new(vec![
        Series::new(columns::PATIENT_ID.into(), patient_ids).into(),
        Series::new(columns::ADMISSION_TYPE.into(), admission_type_labels).into(),
        Series::new(columns::DEPARTMENT.into(), departments).into(),
        Series::new(columns::TREATMENT_CATEGORY.into(), treatments).into(),
        Series::new(columns::AGE.into(), ages).into(),
        Series::new(columns::GENDER.into(), gender_labels).into(),
        Series::new(columns::ADMISSION_DATE.into(), admission_dates).into(),
        Series::new(columns::DISCHARGE_DATE.into(), discharge_dates).into(),
        Series::new(columns::LENGTH_OF_STAY.into(), stays).into(),
        Series::new(columns::ICU_FLAG.into(), icu_flags).into(),
        Series::new(columns::COMPLICATION_FLAG.into(), complication_flags).into(),
        Series::new(columns::MORTALITY_FLAG.into(), mortality_flags).into(),
        Series::new(columns::READMITTED.into(), readmitted_flags).into(),
        Series::new(columns::TREATMENT_COST.into(), costs).into(),
        Series::new(columns::LAB_SCORE.into(), rounded3(&lab_scores)).into(),
        Series::new(columns::VITAL_RISK_SCORE.into(), rounded3(&vital_scores)).into(),
        Series::new(columns::RISK_SCORE.into(), rounded3(&risk_scores)).into(),
        Series::new(columns::NOTE_TEXT.into(), notes).into(),
        Series::new(columns::OPD_VISIT.into(), opd_flags).into(),
    ])
    .context("assemble visit table")?;
    Ok(frame)
}

/// Generates a batch and persists it as CSV, creating parent directories.
pub fn generate_to_csv(path: &Path, options: &SynthOptions) -> Result<DataFrame> {
    let frame = generate_visits(options)?;
    write_frame_csv(path, &frame)
        .with_context(|| format!("write visits: {}", path.display()))?;
    info!(
        path = %path.display(),
        records = frame.height(),
        seed = options.seed,
        "generated synthetic visits"
    );
    Ok(frame)
}
