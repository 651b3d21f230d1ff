use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use super::error::{DataError, ParseError, Result};
use super::model::{Dataset, Record, Value};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// The input formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    /// Detect the format from the path suffix. Matching is literal and
    /// case-sensitive: `data.csv` is CSV, `DATA.CSV` is not.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path.to_string_lossy();

        if name.ends_with(".csv") {
            Ok(Format::Csv)
        } else if name.ends_with(".json") {
            Ok(Format::Json)
        } else {
            Err(DataError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    }
}

/// Load a product dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row, one product per line
/// * `.json` – `[{ "price": 9.99, "rating": 4, "reviews": 120 }, ...]`
///   or column-oriented `{ "price": {"0": 9.99, ...}, ... }`
///
/// No schema check happens here; see [`Dataset::require_columns`].
pub fn load_file(path: &Path) -> Result<Dataset> {
    let format = Format::from_path(path)?;
    log::debug!("Loading {} as {format:?}", path.display());

    let dataset = match format {
        Format::Csv => load_csv(path)?,
        Format::Json => load_json(path)?,
    };

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        dataset.len(),
        dataset.columns(),
        path.display()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| DataError::io(path, e))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every record the same width.
/// A short or long record anywhere fails the whole load.
fn load_csv(path: &Path) -> Result<Dataset> {
    let file = open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    if headers.is_empty() {
        return Err(DataError::parse(
            path,
            ParseError::Shape("no columns to parse from file".to_string()),
        ));
    }
    let columns = dedup_headers(headers);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        rows.push(record.iter().map(infer_value).collect::<Record>());
    }

    Ok(Dataset::new(columns, rows))
}

fn csv_error(path: &Path, e: csv::Error) -> DataError {
    if let csv::ErrorKind::Io(io) = e.kind() {
        return DataError::io(path, std::io::Error::new(io.kind(), io.to_string()));
    }
    DataError::parse(path, e)
}

/// Rename repeated header names `a, a` to `a, a.1`.
fn dedup_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());

    for name in headers {
        let mut candidate = name.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{name}.{count}");
        }
        seen.insert(candidate.clone(), 0);
        out.push(candidate);
    }
    out
}

/// Cell texts read as missing, matching the pandas `read_csv` defaults.
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Guess the type of one CSV cell.
///
/// Surrounding whitespace is ignored for NA tokens, numbers and booleans;
/// cells that stay strings keep their original text.
fn infer_value(raw: &str) -> Value {
    let s = raw.trim();
    if NA_TOKENS.contains(&s) {
        return Value::Null;
    }
    match s {
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        // `f64` parsing accepts any NaN spelling; those are missing values too.
        return if f.is_nan() { Value::Null } else { Value::Float(f) };
    }
    Value::String(raw.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Two layouts are accepted (the pandas `records` and `columns` orients):
///
/// ```json
/// [ { "price": 9.99, "rating": 4, "reviews": 120 }, ... ]
/// ```
///
/// ```json
/// { "price": { "0": 9.99, "1": 19.99 }, "rating": [4, 5], ... }
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let file = open(path)?;
    let root: JsonValue =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| json_error(path, e))?;

    let dataset = match root {
        JsonValue::Array(records) => from_records(records),
        JsonValue::Object(columns) => from_columns(columns),
        other => Err(ParseError::Shape(format!(
            "expected an array of records or an object of columns, found {}",
            json_kind(&other)
        ))),
    };
    dataset.map_err(|e| DataError::parse(path, e))
}

fn json_error(path: &Path, e: serde_json::Error) -> DataError {
    if e.is_io() {
        DataError::io(path, std::io::Error::from(e))
    } else {
        DataError::parse(path, e)
    }
}

fn from_records(records: Vec<JsonValue>) -> std::result::Result<Dataset, ParseError> {
    let mut columns: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<Record> = Vec::with_capacity(records.len());

    for (i, rec) in records.into_iter().enumerate() {
        let obj = match rec {
            JsonValue::Object(obj) => obj,
            other => {
                return Err(ParseError::Shape(format!(
                    "record {i} is {}, not an object",
                    json_kind(&other)
                )))
            }
        };

        let mut row = vec![Value::Null; columns.len()];
        for (key, val) in obj {
            let col = *index.entry(key.clone()).or_insert_with(|| {
                columns.push(key);
                columns.len() - 1
            });
            if col >= row.len() {
                row.resize(col + 1, Value::Null);
            }
            row[col] = json_to_value(val);
        }
        rows.push(row);
    }

    Ok(Dataset::new(columns, rows))
}

/// Column-oriented layout. Row labels come from the first column; every
/// other column must carry exactly the same labels and is matched by label,
/// not by position. Plain arrays are labelled by index (`"0"`, `"1"`, …).
fn from_columns(columns: Map<String, JsonValue>) -> std::result::Result<Dataset, ParseError> {
    let mut names = Vec::with_capacity(columns.len());
    let mut labelled: Vec<Vec<(String, Value)>> = Vec::with_capacity(columns.len());

    for (name, col) in columns {
        let cells: Vec<(String, Value)> = match col {
            JsonValue::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), json_to_value(v)))
                .collect(),
            JsonValue::Object(by_label) => by_label
                .into_iter()
                .map(|(label, v)| (label, json_to_value(v)))
                .collect(),
            other => {
                return Err(ParseError::Shape(format!(
                    "column '{name}' is {}, expected an array or an object",
                    json_kind(&other)
                )))
            }
        };
        names.push(name);
        labelled.push(cells);
    }

    let mut labelled = labelled.into_iter();
    let Some(first) = labelled.next() else {
        return Ok(Dataset::new(names, Vec::new()));
    };

    let (labels, first_values): (Vec<String>, Vec<Value>) = first.into_iter().unzip();
    let mut rows: Vec<Record> = first_values.into_iter().map(|v| vec![v]).collect();

    for (name, cells) in names.iter().skip(1).zip(labelled) {
        let n_cells = cells.len();
        let mut by_label: HashMap<String, Value> = cells.into_iter().collect();
        if n_cells != labels.len() {
            return Err(ParseError::Shape(format!(
                "column '{name}' has {n_cells} values, expected {}",
                labels.len()
            )));
        }
        for (row, label) in rows.iter_mut().zip(&labels) {
            let value = by_label.remove(label).ok_or_else(|| {
                ParseError::Shape(format!("column '{name}' has no value for row '{label}'"))
            })?;
            row.push(value);
        }
    }

    Ok(Dataset::new(names, rows))
}

fn json_to_value(val: JsonValue) -> Value {
    match val {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::String(s) => Value::String(s),
        nested => Value::String(nested.to_string()),
    }
}

fn json_kind(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
