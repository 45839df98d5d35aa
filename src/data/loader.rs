use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array,
    Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{ContractDataset, ContractRecord, RawRecord, ThemeField};

/// Structural problems with an input file. Row-level problems are not
/// errors: bad rows are quarantined (skipped and counted) instead.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("input is missing required column '{0}'")]
    MissingColumn(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a contract dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the standard USAspending-style columns
/// * `.json`    – `[{ "award_id": ..., "action_date": ..., ... }, ...]`
/// * `.parquet` – flat columns, one row per award
pub fn load_file(path: &Path) -> Result<ContractDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// Field coercion helpers (shared by all three loaders)
// ---------------------------------------------------------------------------

/// Parse a currency amount, tolerating `$` and thousands separators.
/// Returns None for unparseable or negative values.
pub fn clean_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    let value: f64 = cleaned.parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Parse an action date. ISO-8601 first, then the `MM/DD/YYYY` form that
/// shows up in agency exports.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .ok()
}

/// Consolidate agency-name variants by dropping a trailing parenthesized
/// acronym: `"National Science Foundation (NSF)"` and
/// `"National Science Foundation"` become the same agency.
pub fn consolidate_agency(name: &str) -> String {
    let name = name.trim();
    if let Some(open) = name.rfind(" (") {
        if name.ends_with(')') {
            return name[..open].trim_end().to_string();
        }
    }
    name.to_string()
}

/// Split a semicolon-delimited theme list into a tag set.
pub fn split_themes(s: &str) -> BTreeSet<String> {
    s.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turn a `theme_equity_programs` column name into the `equity programs` tag.
fn theme_column_tag(column: &str) -> Option<String> {
    let tag = column.strip_prefix("theme_")?;
    if tag.is_empty() {
        return None;
    }
    Some(tag.replace('_', " "))
}

fn truthy(s: &str) -> bool {
    matches!(s.trim(), "true" | "True" | "TRUE" | "1")
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the required columns plus optional
/// `award_description` and themes, encoded either as a semicolon-delimited
/// `dei_themes` column or as boolean `theme_*` flag columns (both accepted,
/// merged when both are present).
fn load_csv(path: &Path) -> Result<ContractDataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    load_csv_from_reader(file)
}

fn load_csv_from_reader<R: io::Read>(reader: R) -> Result<ContractDataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = |name: &str| -> Result<usize, DataError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    };

    let id_idx = col("award_id")?;
    let recipient_idx = col("recipient_name")?;
    let agency_idx = col("awarding_agency_name")?;
    let amount_idx = col("award_amount")?;
    let date_idx = col("action_date")?;
    let description_idx = headers.iter().position(|h| h == "award_description");
    let themes_idx = headers.iter().position(|h| h == "dei_themes");
    let theme_flag_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| theme_column_tag(h).map(|tag| (i, tag)))
        .collect();

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let Some(action_date) = record.get(date_idx).and_then(parse_date) else {
            log::warn!(
                "CSV row {row_no}: unparseable action_date {:?}, skipping",
                record.get(date_idx).unwrap_or("")
            );
            skipped += 1;
            continue;
        };
        let Some(award_amount) = record.get(amount_idx).and_then(clean_amount) else {
            log::warn!(
                "CSV row {row_no}: unparseable award_amount {:?}, skipping",
                record.get(amount_idx).unwrap_or("")
            );
            skipped += 1;
            continue;
        };

        let mut themes = themes_idx
            .and_then(|i| record.get(i))
            .map(split_themes)
            .unwrap_or_default();
        for (i, tag) in &theme_flag_cols {
            if record.get(*i).is_some_and(truthy) {
                themes.insert(tag.clone());
            }
        }

        records.push(ContractRecord {
            award_id: record.get(id_idx).unwrap_or("").to_string(),
            recipient_name: record.get(recipient_idx).unwrap_or("").to_string(),
            awarding_agency_name: consolidate_agency(record.get(agency_idx).unwrap_or("")),
            award_amount,
            action_date,
            award_description: description_idx
                .and_then(|i| record.get(i))
                .unwrap_or("")
                .to_string(),
            themes,
        });
    }

    if skipped > 0 {
        log::warn!("quarantined {skipped} malformed rows during CSV load");
    }
    Ok(ContractDataset::from_records(records, skipped))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "award_id": "CONT-0001",
///     "recipient_name": "Acme Corp",
///     "awarding_agency_name": "National Science Foundation",
///     "award_amount": "$125,000.00",
///     "action_date": "2023-05-17",
///     "award_description": "...",
///     "dei_themes": "equity;inclusion"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<ContractDataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_json_records(&text)
}

fn parse_json_records(text: &str) -> Result<ContractDataset> {
    let raw: Vec<RawRecord> = serde_json::from_str(text).context("parsing JSON records")?;

    let mut records = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;

    for (row_no, rec) in raw.into_iter().enumerate() {
        match coerce_raw(rec) {
            Ok(record) => records.push(record),
            Err(reason) => {
                log::warn!("JSON record {row_no}: {reason}, skipping");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("quarantined {skipped} malformed records during JSON load");
    }
    Ok(ContractDataset::from_records(records, skipped))
}

fn coerce_raw(raw: RawRecord) -> Result<ContractRecord, String> {
    let award_amount = match &raw.award_amount {
        serde_json::Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| format!("invalid award_amount {n}")),
        serde_json::Value::String(s) => {
            clean_amount(s).ok_or_else(|| format!("unparseable award_amount {s:?}"))
        }
        other => Err(format!("award_amount has unexpected type: {other}")),
    }?;

    let action_date = parse_date(&raw.action_date)
        .ok_or_else(|| format!("unparseable action_date {:?}", raw.action_date))?;

    let themes = match raw.dei_themes {
        ThemeField::Missing => BTreeSet::new(),
        ThemeField::Delimited(s) => split_themes(&s),
        ThemeField::List(tags) => tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
    };

    Ok(ContractRecord {
        award_id: raw.award_id,
        recipient_name: raw.recipient_name,
        awarding_agency_name: consolidate_agency(&raw.awarding_agency_name),
        award_amount,
        action_date,
        award_description: raw.award_description,
        themes,
    })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of contract awards.
///
/// Expected schema: one flat column per field. `award_amount` may be
/// Float64/Float32/Int64 or a Utf8 currency string; `action_date` may be
/// Date32 or a Utf8 date string; themes come from a Utf8 `dei_themes`
/// column and/or Boolean `theme_*` columns. Works with files written by
/// both **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<ContractDataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let col = |name: &str| -> Result<usize, DataError> {
            schema
                .index_of(name)
                .map_err(|_| DataError::MissingColumn(name.to_string()))
        };
        let id_idx = col("award_id")?;
        let recipient_idx = col("recipient_name")?;
        let agency_idx = col("awarding_agency_name")?;
        let amount_idx = col("award_amount")?;
        let date_idx = col("action_date")?;
        let description_idx = schema.index_of("award_description").ok();
        let themes_idx = schema.index_of("dei_themes").ok();
        let theme_flag_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter_map(|(i, f)| theme_column_tag(f.name()).map(|tag| (i, tag)))
            .collect();

        for row in 0..batch.num_rows() {
            let Some(action_date) = extract_date(batch.column(date_idx), row) else {
                log::warn!("parquet row {row}: unparseable action_date, skipping");
                skipped += 1;
                continue;
            };
            let Some(award_amount) = extract_amount(batch.column(amount_idx), row) else {
                log::warn!("parquet row {row}: unparseable award_amount, skipping");
                skipped += 1;
                continue;
            };

            let mut themes = themes_idx
                .map(|i| split_themes(&extract_string(batch.column(i), row)))
                .unwrap_or_default();
            for (i, tag) in &theme_flag_cols {
                if extract_bool(batch.column(*i), row) {
                    themes.insert(tag.clone());
                }
            }

            records.push(ContractRecord {
                award_id: extract_string(batch.column(id_idx), row),
                recipient_name: extract_string(batch.column(recipient_idx), row),
                awarding_agency_name: consolidate_agency(&extract_string(
                    batch.column(agency_idx),
                    row,
                )),
                award_amount,
                action_date,
                award_description: description_idx
                    .map(|i| extract_string(batch.column(i), row))
                    .unwrap_or_default(),
                themes,
            });
        }
    }

    if skipped > 0 {
        log::warn!("quarantined {skipped} malformed rows during parquet load");
    }
    Ok(ContractDataset::from_records(records, skipped))
}

// -- Parquet / Arrow helpers --

fn extract_string(col: &Arc<dyn Array>, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string())
            .unwrap_or_default(),
        // Polars writes LargeUtf8 string columns.
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        _ => String::new(),
    }
}

fn extract_amount(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let value = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Utf8 | DataType::LargeUtf8 => {
            return clean_amount(&extract_string(col, row));
        }
        _ => None,
    }?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn extract_date(col: &Arc<dyn Array>, row: usize) -> Option<NaiveDate> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        // Date32 is days since the Unix epoch.
        DataType::Date32 => {
            let days = col.as_any().downcast_ref::<Date32Array>()?.value(row);
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
            epoch.checked_add_signed(chrono::Duration::days(days as i64))
        }
        DataType::Utf8 | DataType::LargeUtf8 => parse_date(&extract_string(col, row)),
        _ => None,
    }
}

fn extract_bool(col: &Arc<dyn Array>, row: usize) -> bool {
    if col.is_null(row) {
        return false;
    }
    match col.data_type() {
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .is_some_and(|a| a.value(row)),
        DataType::Utf8 | DataType::LargeUtf8 => truthy(&extract_string(col, row)),
        _ => false,
    }
}
