use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::schema::{FieldKind, Schema};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the Pandas dtypes the survey uses.
/// `Text` is raw `object` data; `Category` is the coerced `category` form,
/// sharing one allocation per distinct label.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Category(Arc<str>),
}

// -- Manual Eq/Hash so whole rows can be deduplicated --
//
// Floats compare by value with NaN == NaN, and -0.0 hashes like 0.0.
// Integer(1) and Float(1.0) stay distinct: a column holds one or the other.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Text(a), Text(b)) => a == b,
            (Category(a), Category(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => {
                let canonical = if *f == 0.0 {
                    0.0f64
                } else if f.is_nan() {
                    f64::NAN
                } else {
                    *f
                };
                canonical.to_bits().hash(state)
            }
            Value::Text(s) => s.hash(state),
            Value::Category(s) => s.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "<null>"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Category(s) => write!(f, "{s}"),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64` for numeric work.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Label used when the value is counted as a category.
    pub fn label(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Category(s) => Some(s.to_string()),
            other => Some(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Pandas-style dtype name of the stored representation.
    pub fn dtype(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "int64",
            Value::Float(_) => "float64",
            Value::Text(_) => "object",
            Value::Category(_) => "category",
        }
    }
}

static NULL: Value = Value::Null;

// ---------------------------------------------------------------------------
// Record – one survey row
// ---------------------------------------------------------------------------

/// A single passenger response, values in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Record { values }
    }

    pub fn get(&self, pos: usize) -> &Value {
        self.values.get(pos).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// Dataset – an immutable snapshot of rows
// ---------------------------------------------------------------------------

/// Rows plus the schema they conform to. Never mutated once built; every
/// cleaning step produces a new `Dataset`.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Arc<Schema>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(schema: Arc<Schema>, records: Vec<Record>) -> Self {
        Dataset { schema, records }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub(crate) fn shared_schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every cell of one column, nulls included.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        let pos = self.schema.position(name)?;
        Ok(self.records.iter().map(move |r| r.get(pos)))
    }

    /// Non-null values of a numeric column, in row order.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<f64>> {
        let pos = self.schema.numeric_position(name)?;
        Ok(self
            .records
            .iter()
            .filter_map(|r| r.get(pos).as_f64())
            .collect())
    }

    /// Rows identical to an earlier row (Pandas `duplicated().sum()`).
    pub fn duplicate_count(&self) -> usize {
        let mut seen: HashSet<&Record> = HashSet::with_capacity(self.records.len());
        self.records.iter().filter(|r| !seen.insert(*r)).count()
    }

    pub fn kind_of(&self, name: &str) -> Result<FieldKind> {
        Ok(self.schema.field(name)?.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::FieldDef;

    fn dataset(rows: Vec<Vec<Value>>) -> Dataset {
        let schema = Schema::new(vec![FieldDef::numeric("n"), FieldDef::categorical("c")]);
        Dataset::new(Arc::new(schema), rows.into_iter().map(Record::new).collect())
    }

    #[test]
    fn float_equality_treats_nan_and_signed_zero_as_equal() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::Float(-0.0), Value::Float(0.0));
        assert_ne!(Value::Integer(1), Value::Float(1.0));

        let mut set = HashSet::new();
        set.insert(Value::Float(-0.0));
        assert!(!set.insert(Value::Float(0.0)));
    }

    #[test]
    fn duplicate_count_ignores_first_occurrence() {
        let ds = dataset(vec![
            vec![Value::Integer(1), Value::Text("a".into())],
            vec![Value::Integer(1), Value::Text("a".into())],
            vec![Value::Integer(2), Value::Text("a".into())],
            vec![Value::Integer(1), Value::Text("a".into())],
        ]);
        assert_eq!(ds.duplicate_count(), 2);
    }

    #[test]
    fn numeric_values_skip_nulls_and_reject_categories() {
        let ds = dataset(vec![
            vec![Value::Integer(1), Value::Text("a".into())],
            vec![Value::Null, Value::Text("b".into())],
            vec![Value::Float(2.5), Value::Null],
        ]);
        assert_eq!(ds.numeric_values("n").unwrap(), vec![1.0, 2.5]);
        assert!(ds.numeric_values("c").is_err());
        assert_eq!(ds.column("c").unwrap().filter(|v| v.is_null()).count(), 1);
    }
}
