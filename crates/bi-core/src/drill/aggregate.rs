//! Count aggregation for drill levels

use crate::row::{Row, Value};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;

/// Occurrence count of one category
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub name: Value,
    pub count: usize,
}

/// Hashable form of a category value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Bool(bool),
    Number(OrderedFloat<f64>),
    String(String),
}

impl GroupKey {
    fn of(value: &Value) -> Option<Self> {
        if !value.is_category() {
            return None;
        }
        match value {
            Value::Bool(b) => Some(GroupKey::Bool(*b)),
            // -0.0 and 0.0 are the same category
            Value::Number(n) => Some(GroupKey::Number(OrderedFloat(*n + 0.0))),
            Value::String(s) => Some(GroupKey::String(s.clone())),
            Value::Null => None,
        }
    }
}

/// Group `rows` by `field` and count each distinct value.
///
/// Buckets come out in first-seen order. Rows where the field is missing,
/// null or an empty string are not counted.
pub fn count_by(rows: &[Row], field: &str) -> Vec<Bucket> {
    let mut groups: IndexMap<GroupKey, Bucket> = IndexMap::new();

    for row in rows {
        let Some(value) = row.get(field) else {
            continue;
        };
        let Some(key) = GroupKey::of(value) else {
            continue;
        };
        groups
            .entry(key)
            .or_insert_with(|| Bucket { name: value.clone(), count: 0 })
            .count += 1;
    }

    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_counts_in_first_seen_order() {
        let rows = vec![
            row! { "region" => "East", "sales" => 10 },
            row! { "region" => "West", "sales" => 20 },
            row! { "region" => "East", "sales" => 5 },
        ];

        let buckets = count_by(&rows, "region");
        assert_eq!(
            buckets,
            vec![
                Bucket { name: Value::from("East"), count: 2 },
                Bucket { name: Value::from("West"), count: 1 },
            ]
        );
    }

    #[test]
    fn test_nan_is_not_a_category() {
        let rows = vec![
            row! { "x" => f64::NAN },
            row! { "x" => f64::NAN },
            row! { "x" => 0 },
        ];

        assert_eq!(count_by(&rows, "x"), vec![Bucket { name: Value::from(0), count: 1 }]);
        assert!(count_by(&rows[..2], "x").is_empty());
    }

    #[test]
    fn test_skips_missing_null_and_empty() {
        let rows = vec![
            row! { "category" => "" },
            row! { "category" => Value::Null },
            row! { "other" => "x" },
            row! { "category" => "Books" },
        ];

        let buckets = count_by(&rows, "category");
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].name, Value::from("Books"));
    }

    #[test]
    fn test_zero_and_false_are_categories() {
        let rows = vec![
            row! { "flag" => false, "n" => 0 },
            row! { "flag" => false, "n" => -0.0 },
        ];

        assert_eq!(count_by(&rows, "flag")[0].count, 2);
        assert_eq!(count_by(&rows, "n")[0].count, 2);
    }

    #[test]
    fn test_number_and_string_stay_distinct() {
        let rows = vec![row! { "k" => 1 }, row! { "k" => "1" }];
        assert_eq!(count_by(&rows, "k").len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(count_by(&[], "region").is_empty());
    }
}
