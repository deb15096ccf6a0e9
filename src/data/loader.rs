use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, Schema as ArrowSchema};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Record, Value};
use super::schema::{FieldDef, FieldKind, Schema};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a survey dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one row per response (the usual export)
/// * `.json`    – `[{ "Age": 25, "Gender": "Male", ... }, ...]`
/// * `.parquet` – flat scalar columns, as written by `df.to_parquet()`
///
/// With a `schema`, every schema column must be present; extra columns
/// are dropped. Without one, the schema is inferred from the data.
pub fn load_file(path: &Path, schema: Option<&Schema>) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    info!("loading {}", path.display());
    let dataset = match ext.as_str() {
        "csv" => read_csv(csv::Reader::from_path(path)?, schema),
        "json" => load_json(path, schema),
        "parquet" | "pq" => load_parquet(path, schema),
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }?;
    info!(
        "loaded {} rows x {} columns",
        dataset.len(),
        dataset.schema().len()
    );
    Ok(dataset)
}

/// Load CSV from any reader, e.g. an in-memory buffer.
pub fn load_csv_reader<R: Read>(reader: R, schema: Option<&Schema>) -> Result<Dataset> {
    read_csv(csv::Reader::from_reader(reader), schema)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with exact column names, then one response per
/// row. Empty cells are missing values.
fn read_csv<R: Read>(mut reader: csv::Reader<R>, schema: Option<&Schema>) -> Result<Dataset> {
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|c| c.to_string()).collect::<Vec<_>>());
    }

    from_text_grid(headers, rows, schema)
}

/// Build a dataset from header names and rows of raw text cells.
fn from_text_grid(
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    schema: Option<&Schema>,
) -> Result<Dataset> {
    let schema = match schema {
        Some(s) => s.clone(),
        None => Schema::infer(&headers, rows.iter().map(|r| r.as_slice())),
    };

    let positions = schema
        .fields()
        .iter()
        .map(|f| {
            headers
                .iter()
                .position(|h| h == &f.name)
                .ok_or_else(|| Error::MissingColumn(f.name.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    for extra in headers.iter().filter(|h| schema.position(h).is_err()) {
        debug!("ignoring column '{extra}' not in schema");
    }

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.iter().enumerate() {
        let values = schema
            .fields()
            .iter()
            .zip(&positions)
            .map(|(field, &idx)| {
                let cell = row.get(idx).map(String::as_str).unwrap_or("");
                parse_cell(cell, field, row_no)
            })
            .collect::<Result<Vec<_>>>()?;
        records.push(Record::new(values));
    }

    Ok(finish(schema, records))
}

/// Convert one text cell according to the declared field kind.
fn parse_cell(cell: &str, field: &FieldDef, row: usize) -> Result<Value> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    match field.kind {
        FieldKind::Categorical => Ok(Value::Text(cell.to_string())),
        FieldKind::Numeric => {
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(Value::Integer(i));
            }
            match trimmed.parse::<f64>() {
                // NaN and infinities count as missing.
                Ok(f) if !f.is_finite() => Ok(Value::Null),
                Ok(f) => Ok(Value::Float(f)),
                Err(_) => Err(Error::Parse {
                    row,
                    column: field.name.clone(),
                    value: cell.to_string(),
                }),
            }
        }
    }
}

/// A numeric column holding any fractional value is stored as floats
/// throughout, like a Pandas `float64` column.
fn finish(schema: Schema, mut records: Vec<Record>) -> Dataset {
    for (pos, field) in schema.fields().iter().enumerate() {
        if field.kind != FieldKind::Numeric {
            continue;
        }
        let has_float = records
            .iter()
            .any(|r| matches!(r.values.get(pos), Some(Value::Float(_))));
        if !has_float {
            continue;
        }
        for record in &mut records {
            if let Some(slot) = record.values.get_mut(pos) {
                if let Value::Integer(i) = *slot {
                    *slot = Value::Float(i as f64);
                }
            }
        }
    }
    Dataset::new(Arc::new(schema), records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "satisfaction": "satisfied", "Age": 65, "Arrival Delay in Minutes": 0.0, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path, schema: Option<&Schema>) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| Error::InvalidParameter("expected a top-level JSON array".to_string()))?;

    let headers: Vec<String> = match schema {
        Some(s) => s.fields().iter().map(|f| f.name.clone()).collect(),
        None => records
            .iter()
            .filter_map(|r| r.as_object())
            .flat_map(|obj| obj.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    };

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| {
            Error::InvalidParameter(format!("row {i} is not a JSON object"))
        })?;
        let mut row = Vec::with_capacity(headers.len());
        for name in &headers {
            match obj.get(name) {
                Some(val) => row.push(json_to_text(val)),
                None if schema.is_some() => return Err(Error::MissingColumn(name.clone())),
                None => row.push(String::new()),
            }
        }
        rows.push(row);
    }

    from_text_grid(headers, rows, schema)
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// One Arrow column normalised to the representation its field needs.
enum TypedColumn {
    Int(Int64Array),
    Float(Float64Array),
    /// Text that must be parsed as a number cell by cell.
    NumericText(StringArray),
    Text(StringArray),
}

impl TypedColumn {
    fn new(col: &ArrayRef, field: &FieldDef) -> Result<Self> {
        let dt = col.data_type();
        let typed = match field.kind {
            FieldKind::Numeric if dt.is_integer() => {
                TypedColumn::Int(cast(col, &DataType::Int64)?.as_primitive::<Int64Type>().clone())
            }
            FieldKind::Numeric if dt.is_floating() => TypedColumn::Float(
                cast(col, &DataType::Float64)?.as_primitive::<Float64Type>().clone(),
            ),
            FieldKind::Numeric => {
                TypedColumn::NumericText(cast(col, &DataType::Utf8)?.as_string::<i32>().clone())
            }
            FieldKind::Categorical => {
                TypedColumn::Text(cast(col, &DataType::Utf8)?.as_string::<i32>().clone())
            }
        };
        Ok(typed)
    }

    fn value(&self, row: usize, field: &FieldDef, global_row: usize) -> Result<Value> {
        let value = match self {
            TypedColumn::Int(a) if a.is_valid(row) => Value::Integer(a.value(row)),
            TypedColumn::Float(a) if a.is_valid(row) && a.value(row).is_finite() => {
                Value::Float(a.value(row))
            }
            TypedColumn::NumericText(a) | TypedColumn::Text(a) if a.is_valid(row) => {
                parse_cell(a.value(row), field, global_row)?
            }
            _ => Value::Null,
        };
        Ok(value)
    }
}

/// Load a Parquet file with one flat column per survey field.
///
/// Integer columns stay integral, float columns become floats, anything
/// else is read as text (dictionary-encoded categoricals included).
fn load_parquet(path: &Path, schema: Option<&Schema>) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let arrow_schema = Arc::clone(builder.schema());

    let schema = match schema {
        Some(s) => s.clone(),
        None => infer_from_arrow(&arrow_schema),
    };
    let positions = schema
        .fields()
        .iter()
        .map(|f| {
            arrow_schema
                .index_of(&f.name)
                .map_err(|_| Error::MissingColumn(f.name.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let reader = builder.build()?;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let columns = schema
            .fields()
            .iter()
            .zip(&positions)
            .map(|(f, &idx)| TypedColumn::new(batch.column(idx), f))
            .collect::<Result<Vec<_>>>()?;

        let offset = records.len();
        for row in 0..batch.num_rows() {
            let values = columns
                .iter()
                .zip(schema.fields())
                .map(|(col, f)| col.value(row, f, offset + row))
                .collect::<Result<Vec<_>>>()?;
            records.push(Record::new(values));
        }
    }

    Ok(finish(schema, records))
}

fn infer_from_arrow(arrow_schema: &ArrowSchema) -> Schema {
    let fields = arrow_schema
        .fields()
        .iter()
        .map(|f| {
            if f.data_type().is_integer() || f.data_type().is_floating() {
                FieldDef::numeric(f.name())
            } else {
                FieldDef::categorical(f.name())
            }
        })
        .collect();
    Schema::new(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(vec![FieldDef::categorical("kind"), FieldDef::numeric("delay")])
    }

    #[test]
    fn csv_cells_follow_declared_kinds() {
        let data = "kind,delay,extra\nA,5,x\nB,,y\n42,7,z\n";
        let ds = load_csv_reader(data.as_bytes(), Some(&schema())).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.schema().len(), 2);
        let rows = ds.records();
        assert_eq!(rows[0].values, vec![Value::Text("A".into()), Value::Integer(5)]);
        assert_eq!(rows[1].values[1], Value::Null);
        // Numbers in a categorical column stay text.
        assert_eq!(rows[2].values[0], Value::Text("42".into()));
    }

    #[test]
    fn fractional_cells_promote_whole_column_to_float() {
        let data = "kind,delay\nA,5\nB,2.5\nC,NaN\n";
        let ds = load_csv_reader(data.as_bytes(), Some(&schema())).unwrap();
        let delays: Vec<_> = ds.column("delay").unwrap().cloned().collect();
        assert_eq!(delays, vec![Value::Float(5.0), Value::Float(2.5), Value::Null]);
    }

    #[test]
    fn infinite_cells_load_as_null() {
        let data = "kind,delay\nA,1.5\nB,inf\nC,-inf\nD,2\n";
        let ds = load_csv_reader(data.as_bytes(), Some(&schema())).unwrap();
        let delays: Vec<_> = ds.column("delay").unwrap().cloned().collect();
        assert_eq!(
            delays,
            vec![Value::Float(1.5), Value::Null, Value::Null, Value::Float(2.0)]
        );
        assert_eq!(ds.numeric_values("delay").unwrap(), vec![1.5, 2.0]);
    }

    #[test]
    fn missing_schema_column_is_a_load_error() {
        let data = "kind\nA\n";
        let err = load_csv_reader(data.as_bytes(), Some(&schema())).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(c) if c == "delay"));
    }

    #[test]
    fn unparseable_numeric_cell_reports_position() {
        let data = "kind,delay\nA,1\nB,late\n";
        let err = load_csv_reader(data.as_bytes(), Some(&schema())).unwrap_err();
        match err {
            Error::Parse { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "delay");
                assert_eq!(value, "late");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn schema_is_inferred_without_one() {
        let data = "a,b\n1,x\n2,y\n";
        let ds = load_csv_reader(data.as_bytes(), None).unwrap();
        assert_eq!(ds.kind_of("a").unwrap(), FieldKind::Numeric);
        assert_eq!(ds.kind_of("b").unwrap(), FieldKind::Categorical);
    }
}
