use serde::Serialize;

use crate::data::model::Dataset;
use crate::data::schema::FieldKind;

/// Per-column overview (Pandas `df.info()` plus `isnull().sum()`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: FieldKind,
    pub dtype: &'static str,
    pub non_null: usize,
    pub nulls: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
    pub duplicate_rows: usize,
}

impl DatasetProfile {
    /// Columns with at least one missing value.
    pub fn columns_with_nulls(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.columns.iter().filter(|c| c.nulls > 0)
    }
}

/// Shape, types, missing values and duplicate count of a dataset.
pub fn profile(dataset: &Dataset) -> DatasetProfile {
    let columns = dataset
        .schema()
        .fields()
        .iter()
        .enumerate()
        .map(|(pos, field)| {
            let mut nulls = 0;
            let mut dtype = None;
            for record in dataset.records() {
                let value = record.get(pos);
                if value.is_null() {
                    nulls += 1;
                } else if dtype.is_none() {
                    dtype = Some(value.dtype());
                }
            }
            let dtype = dtype.unwrap_or(match field.kind {
                FieldKind::Numeric => "float64",
                FieldKind::Categorical => "object",
            });
            ColumnProfile {
                name: field.name.clone(),
                kind: field.kind,
                dtype,
                non_null: dataset.len() - nulls,
                nulls,
            }
        })
        .collect();

    DatasetProfile {
        rows: dataset.len(),
        columns,
        duplicate_rows: dataset.duplicate_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_reader;

    #[test]
    fn counts_nulls_types_and_duplicates() {
        let data = "a,b,c\n1,x,\n2.5,,\n1,x,\n";
        let ds = load_csv_reader(data.as_bytes(), None).unwrap();
        let p = profile(&ds);

        assert_eq!(p.rows, 3);
        assert_eq!(p.duplicate_rows, 1);
        assert_eq!(p.columns[0].dtype, "float64");
        assert_eq!(p.columns[1].dtype, "object");
        assert_eq!(p.columns[1].nulls, 1);
        assert_eq!(p.columns[2].non_null, 0);
        let with_nulls: Vec<_> = p.columns_with_nulls().map(|c| c.name.as_str()).collect();
        assert_eq!(with_nulls, vec!["b", "c"]);
    }
}
