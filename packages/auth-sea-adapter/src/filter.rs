//! Where-clause normalization.
//!
//! The authentication framework describes which rows to match either as a list
//! of `{ field, value, operator }` conditions or as a flat `[field, value, ...]`
//! list. Both collapse into a [`WhereMap`]: an insertion-ordered, equality-only
//! mapping from field name to expected value.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

/// Comparison operators the framework may send.
///
/// Only `Eq` is honoured; the rest are accepted so a condition carrying them
/// still parses, and are then treated as equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[default]
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    Contains,
    StartsWith,
    EndsWith,
    #[serde(other)]
    Unsupported,
}

/// Logical connector between conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connector {
    And,
    Or,
}

/// One `{ field, value, operator }` condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector: Option<Connector>,
}

impl Condition {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            operator: Operator::Eq,
            connector: None,
        }
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connector = Some(connector);
        self
    }
}

/// One entry of the flat `[field, value, ...]` form. `value: None` is an
/// undefined value, which drops the pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldPair {
    pub field: String,
    pub value: Option<Value>,
}

impl FieldPair {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: Some(value.into()),
        }
    }

    pub fn undefined(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: None,
        }
    }
}

/// A filter as received from the authentication framework.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Filter {
    Conditions(Vec<Condition>),
    Pairs(Vec<FieldPair>),
}

impl Default for Filter {
    fn default() -> Self {
        Filter::Conditions(Vec::new())
    }
}

impl From<Vec<Condition>> for Filter {
    fn from(conditions: Vec<Condition>) -> Self {
        Filter::Conditions(conditions)
    }
}

impl From<Vec<FieldPair>> for Filter {
    fn from(pairs: Vec<FieldPair>) -> Self {
        Filter::Pairs(pairs)
    }
}

impl Filter {
    /// Single equality condition; the common `id = ?` / `email = ?` lookup.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Conditions(vec![Condition::eq(field, value)])
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Filter::Conditions(c) => c.is_empty(),
            Filter::Pairs(p) => p.is_empty(),
        }
    }

    /// Build a filter from the raw JSON the framework hands over.
    ///
    /// An array whose first element is an object with a non-empty `field` is
    /// read as conditions; any other array is read as flat pairs. Anything
    /// that is not an array is an empty filter. Malformed input never fails:
    /// unusable entries are skipped, which can leave a partial or empty filter.
    pub fn from_json(raw: &Value) -> Filter {
        let Some(items) = raw.as_array() else {
            return Filter::default();
        };

        let first_is_condition = items
            .first()
            .and_then(|first| first.get("field"))
            .is_some_and(is_truthy);

        if first_is_condition {
            let conditions = items
                .iter()
                .filter_map(|item| match Condition::deserialize(item) {
                    Ok(condition) => Some(condition),
                    Err(e) => {
                        warn!(error = %e, "skipping unreadable filter condition");
                        None
                    }
                })
                .collect();
            return Filter::Conditions(conditions);
        }

        let pairs = items
            .chunks(2)
            .map(|chunk| FieldPair {
                field: chunk[0].as_str().unwrap_or_default().to_string(),
                value: chunk.get(1).cloned(),
            })
            .collect();
        Filter::Pairs(pairs)
    }

    /// Collapse into an equality-only [`WhereMap`].
    pub fn normalize(&self) -> WhereMap {
        let mut map = WhereMap::new();
        match self {
            Filter::Conditions(conditions) => {
                for condition in conditions {
                    if condition.operator != Operator::Eq {
                        warn!(
                            field = %condition.field,
                            operator = ?condition.operator,
                            "filter operator not supported, matching by equality"
                        );
                    }
                    if condition.connector == Some(Connector::Or) {
                        warn!(
                            field = %condition.field,
                            "OR connector not supported, conditions are conjoined"
                        );
                    }
                    map.insert(condition.field.clone(), condition.value.clone());
                }
            }
            Filter::Pairs(pairs) => {
                for pair in pairs {
                    if let (false, Some(value)) = (pair.field.is_empty(), &pair.value) {
                        map.insert(pair.field.clone(), value.clone());
                    }
                }
            }
        }
        map
    }
}

/// Normalize an optional filter; `None` matches every row.
pub fn normalize(filter: Option<&Filter>) -> WhereMap {
    filter.map(Filter::normalize).unwrap_or_default()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Insertion-ordered field → value mapping, equality semantics only.
///
/// Re-inserting a field replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereMap {
    entries: Vec<(String, Value)>,
}

impl WhereMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    /// True when `record` holds every expected value.
    pub fn matches(&self, record: &serde_json::Map<String, Value>) -> bool {
        self.iter()
            .all(|(field, expected)| record.get(field).unwrap_or(&Value::Null) == expected)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for WhereMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = WhereMap::new();
        for (field, value) in iter {
            map.insert(field, value);
        }
        map
    }
}

impl Serialize for WhereMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_filters_match_everything() {
        assert!(Filter::Conditions(vec![]).normalize().is_empty());
        assert!(Filter::Pairs(vec![]).normalize().is_empty());
        assert!(normalize(None).is_empty());
    }

    #[test]
    fn conditions_last_write_wins_keeps_position() {
        let filter = Filter::Conditions(vec![
            Condition::eq("email", "first@example.com"),
            Condition::eq("name", "A"),
            Condition::eq("email", "second@example.com"),
        ]);

        let map = filter.normalize();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("email"), Some(&json!("second@example.com")));
        assert_eq!(map.fields().collect::<Vec<_>>(), vec!["email", "name"]);
    }

    #[test]
    fn unsupported_operators_degrade_to_equality() {
        let filter = Filter::Conditions(vec![
            Condition::eq("expiresAt", 10).with_operator(Operator::Gt),
            Condition::eq("role", "admin").with_connector(Connector::Or),
        ]);

        let map = filter.normalize();
        assert_eq!(map.get("expiresAt"), Some(&json!(10)));
        assert_eq!(map.get("role"), Some(&json!("admin")));
    }

    #[test]
    fn pairs_drop_undefined_and_empty_fields() {
        let filter = Filter::Pairs(vec![
            FieldPair::new("userId", "u1"),
            FieldPair::undefined("token"),
            FieldPair::new("", "orphan"),
            FieldPair::new("providerId", Value::Null),
        ]);

        let map = filter.normalize();
        assert_eq!(map.fields().collect::<Vec<_>>(), vec!["userId", "providerId"]);
        assert_eq!(map.get("providerId"), Some(&Value::Null));
    }

    #[test]
    fn from_json_reads_condition_objects() {
        let raw = json!([{ "field": "email", "value": "x@y.com", "operator": "eq" }]);
        let filter = Filter::from_json(&raw);

        assert_eq!(filter, Filter::eq("email", "x@y.com"));
        let map = filter.normalize();
        assert_eq!(map.get("email"), Some(&json!("x@y.com")));
    }

    #[test]
    fn from_json_tolerates_unknown_operator_names() {
        let raw = json!([{ "field": "name", "value": "A", "operator": "ilike" }]);
        let Filter::Conditions(conditions) = Filter::from_json(&raw) else {
            panic!("expected conditions");
        };
        assert_eq!(conditions[0].operator, Operator::Unsupported);
    }

    #[test]
    fn from_json_reads_flat_pairs_with_trailing_field() {
        let raw = json!(["email", "a@b.com", "name"]);
        let filter = Filter::from_json(&raw);

        assert_eq!(
            filter,
            Filter::Pairs(vec![
                FieldPair::new("email", "a@b.com"),
                FieldPair::undefined("name"),
            ])
        );
        assert_eq!(filter.normalize().len(), 1);
    }

    #[test]
    fn from_json_falls_back_to_pairs_for_odd_shapes() {
        // Object without `field` is not a condition list
        let raw = json!([{ "column": "email" }, "x"]);
        assert!(filter_fields(&raw).is_empty());

        // Non-arrays are empty filters
        assert!(Filter::from_json(&json!({ "email": "x" })).is_empty());
        assert!(Filter::from_json(&Value::Null).is_empty());
    }

    #[test]
    fn where_map_matches_records() {
        let map: WhereMap = [("email", json!("a@b.com")), ("emailVerified", json!(false))]
            .into_iter()
            .collect();

        let hit = json!({ "email": "a@b.com", "emailVerified": false, "name": "A" });
        let miss = json!({ "email": "a@b.com", "emailVerified": true });
        assert!(map.matches(hit.as_object().unwrap()));
        assert!(!map.matches(miss.as_object().unwrap()));
    }

    #[test]
    fn where_map_serializes_in_insertion_order() {
        let map: WhereMap = [("b", json!(1)), ("a", json!(2))].into_iter().collect();
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"b":1,"a":2}"#);
    }

    fn filter_fields(raw: &Value) -> Vec<String> {
        Filter::from_json(raw)
            .normalize()
            .fields()
            .map(str::to_string)
            .collect()
    }
}
