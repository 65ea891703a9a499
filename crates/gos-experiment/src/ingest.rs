//! Variant-row ingestion from exported table data.
//!
//! Two formats are accepted:
//! - JSON: an array of [`VariantRow`] objects (the shape the data API returns).
//! - CSV: header row plus data rows, per the column contract below.
//!
//! ## CSV column contract (case-insensitive, order-independent)
//!
//! | Column            | Type / example        | Notes                          |
//! |-------------------|-----------------------|--------------------------------|
//! | `experiment_id`   | `exp_42`              |                                |
//! | `variant_name`    | `Control`             | `name` also accepted           |
//! | `is_control`      | `true` / `1` / `yes`  | See [`parse_is_control`]       |
//! | `visitors`        | `1000`                | Integer ≥ 0                    |
//! | `conversions`     | `75`                  | Integer ≥ 0                    |
//! | `conversion_rate` | `7.5`                 | Optional, percent              |

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::types::VariantRow;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced while reading variant rows.
#[derive(Debug)]
pub enum IngestError {
    /// File could not be opened or read.
    Io(String),
    /// The CSV header row is missing a required column.
    MissingHeader(String),
    /// The CSV header row could not be read.
    Csv(String),
    /// The JSON document is not an array of rows.
    Json(String),
    /// File extension is neither `.json` nor `.csv`.
    UnsupportedFormat(String),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Io(msg) => write!(f, "rows io error: {msg}"),
            IngestError::MissingHeader(col) => {
                write!(f, "csv missing required header column: '{col}'")
            }
            IngestError::Csv(msg) => write!(f, "rows csv error: {msg}"),
            IngestError::Json(msg) => write!(f, "rows json error: {msg}"),
            IngestError::UnsupportedFormat(path) => {
                write!(f, "unsupported rows file (expected .json or .csv): {path}")
            }
        }
    }
}

impl std::error::Error for IngestError {}

/// Rows accepted plus the number of data rows dropped as unparseable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRows {
    pub rows: Vec<VariantRow>,
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Read rows from `path`, choosing the parser by extension.
pub fn load_rows(path: &Path) -> Result<ParsedRows, IngestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let read = || {
        std::fs::read_to_string(path)
            .map_err(|e| IngestError::Io(format!("read '{}': {e}", path.display())))
    };

    match ext.as_deref() {
        Some("json") => parse_rows_json(&read()?),
        Some("csv") => parse_rows_csv(&read()?),
        _ => Err(IngestError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Parse a JSON array of rows. Any malformed element fails the whole document.
pub fn parse_rows_json(src: &str) -> Result<ParsedRows, IngestError> {
    let rows: Vec<VariantRow> =
        serde_json::from_str(src).map_err(|e| IngestError::Json(e.to_string()))?;
    Ok(ParsedRows { rows, skipped: 0 })
}

/// Parse CSV text. Only structural / header errors are returned as `Err`;
/// rows with unparseable numbers or booleans are skipped and counted.
/// Fields may be quoted; a leading UTF-8 BOM is ignored.
pub fn parse_rows_csv(src: &str) -> Result<ParsedRows, IngestError> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    if src.trim().is_empty() {
        return Ok(ParsedRows::default());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(src.as_bytes());

    // --- Header ---
    let headers = rdr
        .headers()
        .map_err(|e| IngestError::Csv(e.to_string()))?
        .clone();
    let col_idx = build_col_index(&headers)?;
    let col = |name: &str| col_idx.get(name).copied();

    // Required columns are guaranteed by build_col_index.
    let i_exp = col("experiment_id");
    let i_name = col("variant_name").or_else(|| col("name"));
    let i_ctrl = col("is_control");
    let i_vis = col("visitors");
    let i_conv = col("conversions");
    let i_rate = col("conversion_rate");

    let mut out = ParsedRows::default();

    for rec in rdr.records() {
        let Ok(rec) = rec else {
            out.skipped += 1;
            continue;
        };
        let get = |i: Option<usize>| i.and_then(|i| rec.get(i));

        let parsed = (|| {
            let experiment_id = get(i_exp).filter(|s| !s.is_empty())?.to_string();
            let variant_name = get(i_name)?.to_string();
            let is_control = parse_is_control(get(i_ctrl)?)?;
            let visitors: u64 = get(i_vis)?.parse().ok()?;
            let conversions: u64 = get(i_conv)?.parse().ok()?;
            let conversion_rate = match get(i_rate) {
                None | Some("") => None,
                Some(s) => Some(s.parse::<f64>().ok()?),
            };
            Some(VariantRow {
                experiment_id,
                variant_name,
                is_control,
                visitors,
                conversions,
                conversion_rate,
            })
        })();

        match parsed {
            Some(r) => out.rows.push(r),
            None => out.skipped += 1,
        }
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse boolean values: `true/false/1/0/yes/no/t/f` (case-insensitive).
pub fn parse_is_control(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "t" => Some(true),
        "false" | "0" | "no" | "f" => Some(false),
        _ => None,
    }
}

/// Build a case-insensitive column-name -> index map from the CSV header.
fn build_col_index(headers: &csv::StringRecord) -> Result<HashMap<String, usize>, IngestError> {
    let map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_ascii_lowercase(), i))
        .collect();

    for required in ["experiment_id", "is_control", "visitors", "conversions"] {
        if !map.contains_key(required) {
            return Err(IngestError::MissingHeader(required.to_string()));
        }
    }
    if !map.contains_key("variant_name") && !map.contains_key("name") {
        return Err(IngestError::MissingHeader("variant_name".to_string()));
    }

    Ok(map)
}
