use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// FieldKind / FieldDef – declared column types
// ---------------------------------------------------------------------------

/// Declared type of a column, validated once when the data is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Numeric => write!(f, "numeric"),
            FieldKind::Categorical => write!(f, "categorical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn numeric(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Numeric,
        }
    }

    pub fn categorical(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Categorical,
        }
    }
}

// ---------------------------------------------------------------------------
// Airline survey column names
// ---------------------------------------------------------------------------

pub const SATISFACTION: &str = "satisfaction";
pub const GENDER: &str = "Gender";
pub const CUSTOMER_TYPE: &str = "Customer Type";
pub const AGE: &str = "Age";
pub const TYPE_OF_TRAVEL: &str = "Type of Travel";
pub const CLASS: &str = "Class";
pub const FLIGHT_DISTANCE: &str = "Flight Distance";
pub const DEPARTURE_DELAY: &str = "Departure Delay in Minutes";
pub const ARRIVAL_DELAY: &str = "Arrival Delay in Minutes";

/// Ordinal 0–5 service ratings, in file order.
pub const SERVICE_RATINGS: [&str; 14] = [
    "Seat comfort",
    "Departure/Arrival time convenient",
    "Food and drink",
    "Gate location",
    "Inflight wifi service",
    "Inflight entertainment",
    "Online support",
    "Ease of Online booking",
    "On-board service",
    "Leg room service",
    "Baggage handling",
    "Checkin service",
    "Cleanliness",
    "Online boarding",
];

/// The categorical columns of the airline survey.
pub const CATEGORICAL_FIELDS: [&str; 5] = [SATISFACTION, GENDER, CUSTOMER_TYPE, TYPE_OF_TRAVEL, CLASS];

/// The numeric columns the exploration focuses on.
pub const KEY_NUMERIC_FIELDS: [&str; 4] = [AGE, FLIGHT_DISTANCE, DEPARTURE_DELAY, ARRIVAL_DELAY];

// ---------------------------------------------------------------------------
// Schema – ordered, typed column list
// ---------------------------------------------------------------------------

/// Ordered list of typed fields with a name → position index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDef>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        Schema { fields, index }
    }

    /// The Invistico airline satisfaction survey layout.
    pub fn airline() -> Self {
        let mut fields = vec![
            FieldDef::categorical(SATISFACTION),
            FieldDef::categorical(GENDER),
            FieldDef::categorical(CUSTOMER_TYPE),
            FieldDef::numeric(AGE),
            FieldDef::categorical(TYPE_OF_TRAVEL),
            FieldDef::categorical(CLASS),
            FieldDef::numeric(FLIGHT_DISTANCE),
        ];
        fields.extend(SERVICE_RATINGS.iter().map(|name| FieldDef::numeric(name)));
        fields.push(FieldDef::numeric(DEPARTURE_DELAY));
        fields.push(FieldDef::numeric(ARRIVAL_DELAY));
        Schema::new(fields)
    }

    /// Guess column kinds from raw text cells: a column is numeric when
    /// every non-empty cell parses as a number.
    pub fn infer<'a, I>(headers: &[String], rows: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut numeric = vec![true; headers.len()];
        for row in rows {
            for (i, cell) in row.iter().enumerate().take(headers.len()) {
                let cell = cell.trim();
                if numeric[i] && !cell.is_empty() && cell.parse::<f64>().is_err() {
                    numeric[i] = false;
                }
            }
        }
        let fields = headers
            .iter()
            .zip(numeric)
            .map(|(name, is_numeric)| {
                if is_numeric {
                    FieldDef::numeric(name)
                } else {
                    FieldDef::categorical(name)
                }
            })
            .collect();
        Schema::new(fields)
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of `name` in row order.
    pub fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))
    }

    pub fn field(&self, name: &str) -> Result<&FieldDef> {
        let pos = self.position(name)?;
        Ok(&self.fields[pos])
    }

    /// Position of a numeric field; categorical fields are rejected.
    pub fn numeric_position(&self, name: &str) -> Result<usize> {
        let pos = self.position(name)?;
        match self.fields[pos].kind {
            FieldKind::Numeric => Ok(pos),
            FieldKind::Categorical => Err(Error::NonNumericField(name.to_string())),
        }
    }

    /// Names of all numeric fields in schema order.
    pub fn numeric_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.kind == FieldKind::Numeric)
            .map(|f| f.name.as_str())
    }
}
