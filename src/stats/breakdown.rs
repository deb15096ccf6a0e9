use std::collections::HashMap;

use serde::Serialize;

use crate::data::model::Dataset;
use crate::error::Result;

/// Count and share of one category label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
    /// Percentage of the non-null total, 0–100.
    pub percentage: f64,
}

/// Label frequencies of one field (Pandas `value_counts()`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub field: String,
    /// Non-null observations counted.
    pub total: usize,
    /// Descending by count; ties keep first-observed order.
    pub categories: Vec<CategoryCount>,
}

impl CategoryBreakdown {
    pub fn get(&self, label: &str) -> Option<&CategoryCount> {
        self.categories.iter().find(|c| c.label == label)
    }
}

/// Count each distinct label of `field`. Nulls are skipped.
pub fn breakdown(dataset: &Dataset, field: &str) -> Result<CategoryBreakdown> {
    // label -> (first seen position, count)
    let mut seen: HashMap<String, (usize, usize)> = HashMap::new();
    let mut total = 0;

    for value in dataset.column(field)? {
        let Some(label) = value.label() else {
            continue;
        };
        let order = seen.len();
        seen.entry(label).or_insert((order, 0)).1 += 1;
        total += 1;
    }

    let mut entries: Vec<(String, usize, usize)> = seen
        .into_iter()
        .map(|(label, (order, count))| (label, order, count))
        .collect();
    entries.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));

    let categories = entries
        .into_iter()
        .map(|(label, _, count)| CategoryCount {
            label,
            count,
            percentage: count as f64 * 100.0 / total as f64,
        })
        .collect();

    Ok(CategoryBreakdown {
        field: field.to_string(),
        total,
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_reader;
    use approx::assert_abs_diff_eq;

    #[test]
    fn orders_by_count_then_first_seen() {
        let data = "class,n\nBusiness,1\nEco,2\nEco Plus,3\nEco,4\nBusiness,5\n,6\nEco,7\nFirst,8\n";
        let ds = load_csv_reader(data.as_bytes(), None).unwrap();
        let b = breakdown(&ds, "class").unwrap();

        let labels: Vec<_> = b.categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Eco", "Business", "Eco Plus", "First"]);
        assert_eq!(b.total, 7);
        assert_eq!(b.get("Eco").unwrap().count, 3);
        assert_abs_diff_eq!(b.get("Eco").unwrap().percentage, 300.0 / 7.0, epsilon = 1e-9);

        let sum: f64 = b.categories.iter().map(|c| c.percentage).sum();
        assert_abs_diff_eq!(sum, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn unknown_field_fails() {
        let ds = load_csv_reader("a\nx\n".as_bytes(), None).unwrap();
        assert!(breakdown(&ds, "b").is_err());
    }
}
