use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use super::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV/JSON reader infers.
///
/// Ordered so it can key a `BTreeMap` (group-by, category counts):
/// `Null < Bool < numbers < String`, with integers and floats compared
/// numerically against each other.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Interpret the value as an `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Integer(_) | Value::Float(_) => 2,
            Value::String(_) => 3,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        let (ra, rb) = (self.rank(), other.rank());
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Float(a), Float(b)) => cmp_floats(*a, *b),
            (Integer(i), Float(f)) => cmp_int_float(*i, *f),
            (Float(f), Integer(i)) => cmp_int_float(*i, *f).reverse(),
            _ => Ordering::Equal,
        }
    }
}

/// Numeric order with `-0.0 == 0.0`; NaN sorts after every number.
fn cmp_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison of an integer against a float, without rounding the
/// integer through `f64` (which is lossy above 2^53).
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    // 2^63 is exactly representable; i64 spans [-2^63, 2^63).
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() || f >= TWO_POW_63 {
        return Ordering::Less;
    }
    if f < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&f).unwrap_or(Ordering::Equal),
        unequal => unequal,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – rows × named columns
// ---------------------------------------------------------------------------

/// One product (one row of the source table), aligned with
/// [`Dataset::columns`].
pub type Record = Vec<Value>;

/// The loaded table. Built once per run and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Dataset {
    /// Build a dataset; rows shorter than the header are padded with
    /// [`Value::Null`], longer ones truncated.
    pub fn new(columns: Vec<String>, mut rows: Vec<Record>) -> Self {
        for row in &mut rows {
            row.resize(columns.len(), Value::Null);
        }
        Dataset { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DataError::missing_column(name))
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Numeric cells of one column; nulls and non-numeric cells are dropped.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.column(name)?.filter_map(Value::as_f64).collect())
    }

    /// Every non-null cell is a number, and there is at least one.
    pub fn is_numeric(&self, name: &str) -> bool {
        let Ok(mut cells) = self.column(name) else {
            return false;
        };
        let mut seen = false;
        cells.all(|v| match v {
            Value::Null => true,
            Value::Integer(_) | Value::Float(_) => {
                seen = true;
                true
            }
            _ => false,
        }) && seen
    }

    /// Fail with the first of `names` that is not a column.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.column_index(name)?;
        }
        Ok(())
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Convert to an Arrow batch, inferring one Arrow type per column.
    pub fn to_record_batch(&self) -> std::result::Result<RecordBatch, ArrowError> {
        let mut fields = Vec::with_capacity(self.columns.len());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(self.columns.len());

        for (idx, name) in self.columns.iter().enumerate() {
            let cells: Vec<&Value> = self.rows.iter().map(|row| &row[idx]).collect();
            let array = column_to_array(&cells);
            fields.push(Field::new(name, array.data_type().clone(), true));
            arrays.push(array);
        }

        let options = RecordBatchOptions::new().with_row_count(Some(self.rows.len()));
        RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)
    }
}

/// Pick the narrowest Arrow type that holds every non-null cell.
fn column_to_array(cells: &[&Value]) -> ArrayRef {
    let non_null = || cells.iter().filter(|v| !v.is_null());

    let data_type = if non_null().next().is_none() {
        DataType::Utf8
    } else if non_null().all(|v| matches!(v, Value::Integer(_))) {
        DataType::Int64
    } else if non_null().all(|v| matches!(v, Value::Integer(_) | Value::Float(_))) {
        DataType::Float64
    } else if non_null().all(|v| matches!(v, Value::Bool(_))) {
        DataType::Boolean
    } else {
        DataType::Utf8
    };

    match data_type {
        DataType::Int64 => Arc::new(Int64Array::from(
            cells
                .iter()
                .map(|v| match v {
                    Value::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        DataType::Float64 => Arc::new(Float64Array::from(
            cells.iter().map(|v| v.as_f64()).collect::<Vec<_>>(),
        )),
        DataType::Boolean => Arc::new(BooleanArray::from(
            cells
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        _ => Arc::new(StringArray::from(
            cells
                .iter()
                .map(|v| (!v.is_null()).then(|| v.to_string()))
                .collect::<Vec<_>>(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn products() -> Dataset {
        Dataset::new(
            vec!["price".into(), "rating".into(), "reviews".into()],
            vec![
                vec![Value::Float(9.99), Value::Integer(4), Value::Integer(120)],
                vec![Value::Float(19.99), Value::Integer(5), Value::Null],
                vec![Value::Null, Value::String("n/a".into()), Value::Integer(7)],
            ],
        )
    }

    #[test]
    fn integers_and_floats_share_a_key() {
        let mut counts = BTreeMap::new();
        for v in [Value::Integer(4), Value::Float(4.0), Value::Float(4.5)] {
            *counts.entry(v).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&Value::Integer(4)], 2);
    }

    #[test]
    fn large_integers_compare_exactly_with_floats() {
        let big = 1i64 << 53;
        let (lo, hi, f) = (Value::Integer(big), Value::Integer(big + 1), Value::Float(big as f64));

        assert_eq!(lo, f);
        assert!(hi > f);
        assert!(hi > lo);
        assert!(Value::Integer(i64::MAX) < Value::Float(9.3e18));
        assert!(Value::Integer(2) > Value::Float(1.5));
        assert!(Value::Integer(1) < Value::Float(1.5));
        assert!(Value::Integer(-2) < Value::Float(-1.5));
        assert_eq!(Value::Integer(0), Value::Float(-0.0));
        assert!(Value::Integer(i64::MAX) < Value::Float(f64::NAN));

        let mut counts = BTreeMap::new();
        for v in [lo.clone(), hi.clone(), f.clone()] {
            *counts.entry(v).or_insert(0) += 1;
        }
        assert_eq!(counts[&lo], 2);
        assert_eq!(counts[&hi], 1);
    }

    #[test]
    fn ordering_groups_by_kind() {
        let mut values = vec![
            Value::String("a".into()),
            Value::Float(2.5),
            Value::Null,
            Value::Integer(1),
            Value::Bool(true),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Integer(1),
                Value::Float(2.5),
                Value::String("a".into()),
            ]
        );
    }

    #[test]
    fn rows_are_padded_to_the_header() {
        let ds = Dataset::new(vec!["a".into(), "b".into()], vec![vec![Value::Integer(1)]]);
        assert_eq!(ds.rows()[0], vec![Value::Integer(1), Value::Null]);
    }

    #[test]
    fn column_access_reports_missing_names() {
        let ds = products();
        assert_eq!(ds.numeric_column("price").unwrap(), vec![9.99, 19.99]);
        assert!(matches!(
            ds.numeric_column("stock"),
            Err(DataError::MissingColumn { column }) if column == "stock"
        ));
        assert!(ds.require_columns(&["price", "reviews"]).is_ok());
        assert!(ds.require_columns(&["price", "brand"]).is_err());
    }

    #[test]
    fn numeric_detection_ignores_nulls() {
        let ds = products();
        assert!(ds.is_numeric("price"));
        assert!(ds.is_numeric("reviews"));
        assert!(!ds.is_numeric("rating"));
        assert!(!ds.is_numeric("stock"));
    }

    #[test]
    fn head_keeps_order() {
        let ds = products().head(2);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[1][0], Value::Float(19.99));
    }

    #[test]
    fn record_batch_infers_types() {
        let batch = products().to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 3);
        let schema = batch.schema();
        assert_eq!(schema.field(0).data_type(), &DataType::Float64);
        assert_eq!(schema.field(1).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(2).data_type(), &DataType::Int64);
    }

    #[test]
    fn empty_dataset_converts() {
        let batch = Dataset::default().to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 0);
    }
}
