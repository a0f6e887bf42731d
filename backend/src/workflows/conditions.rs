// Workflow Conditions - predicate evaluation over trigger payloads
//
// Conditions gate which workflows run for a trigger event. Evaluation
// is pure: a condition group plus a payload yields a bool, nothing
// else. The orchestrator that consumes the verdict lives elsewhere.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single predicate over one payload field. `field` supports dot
/// notation for nested lookups ("document.category").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    In,
    GreaterThan,
    LessThan,
    IsSet,
    IsEmpty,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionLogic {
    And,
    Or,
}

/// Conditions combined with AND/OR logic; groups nest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub logic: ConditionLogic,
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub groups: Vec<ConditionGroup>,
}

impl Condition {
    pub fn new(field: &str, operator: ConditionOperator, value: Option<serde_json::Value>) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value,
        }
    }

    pub fn equals(field: &str, value: serde_json::Value) -> Self {
        Self::new(field, ConditionOperator::Equals, Some(value))
    }

    pub fn not_equals(field: &str, value: serde_json::Value) -> Self {
        Self::new(field, ConditionOperator::NotEquals, Some(value))
    }

    pub fn contains(field: &str, value: &str) -> Self {
        Self::new(
            field,
            ConditionOperator::Contains,
            Some(serde_json::Value::String(value.to_string())),
        )
    }

    pub fn in_list(field: &str, values: Vec<serde_json::Value>) -> Self {
        Self::new(
            field,
            ConditionOperator::In,
            Some(serde_json::Value::Array(values)),
        )
    }

    pub fn is_set(field: &str) -> Self {
        Self::new(field, ConditionOperator::IsSet, None)
    }

    /// Evaluate this condition against a trigger payload.
    pub fn evaluate(&self, payload: &serde_json::Value) -> bool {
        let actual = lookup(payload, &self.field);

        match self.operator {
            ConditionOperator::Equals => match (&actual, &self.value) {
                (Some(a), Some(expected)) => a == expected,
                _ => false,
            },
            ConditionOperator::NotEquals => match (&actual, &self.value) {
                (Some(a), Some(expected)) => a != expected,
                // An absent field is "not equal" to any expected value.
                (None, Some(_)) => true,
                _ => false,
            },
            ConditionOperator::Contains => match (&actual, &self.value) {
                (Some(serde_json::Value::String(a)), Some(serde_json::Value::String(needle))) => {
                    a.contains(needle.as_str())
                }
                (Some(serde_json::Value::Array(items)), Some(expected)) => {
                    items.contains(expected)
                }
                _ => false,
            },
            ConditionOperator::In => match (&actual, &self.value) {
                (Some(a), Some(serde_json::Value::Array(options))) => options.contains(a),
                _ => false,
            },
            ConditionOperator::GreaterThan => compare_numbers(&actual, &self.value)
                .map(|ord| ord == std::cmp::Ordering::Greater)
                .unwrap_or(false),
            ConditionOperator::LessThan => compare_numbers(&actual, &self.value)
                .map(|ord| ord == std::cmp::Ordering::Less)
                .unwrap_or(false),
            ConditionOperator::IsSet => {
                matches!(&actual, Some(v) if !v.is_null())
            }
            ConditionOperator::IsEmpty => match &actual {
                None => true,
                Some(serde_json::Value::Null) => true,
                Some(serde_json::Value::String(s)) => s.is_empty(),
                Some(serde_json::Value::Array(items)) => items.is_empty(),
                Some(_) => false,
            },
        }
    }
}

impl ConditionGroup {
    pub fn all(conditions: Vec<Condition>) -> Self {
        Self {
            logic: ConditionLogic::And,
            conditions,
            groups: Vec::new(),
        }
    }

    pub fn any(conditions: Vec<Condition>) -> Self {
        Self {
            logic: ConditionLogic::Or,
            conditions,
            groups: Vec::new(),
        }
    }

    /// Evaluate the whole group against a trigger payload. An empty
    /// group matches everything.
    pub fn evaluate(&self, payload: &serde_json::Value) -> bool {
        if self.conditions.is_empty() && self.groups.is_empty() {
            return true;
        }

        let verdicts = self
            .conditions
            .iter()
            .map(|c| c.evaluate(payload))
            .chain(self.groups.iter().map(|g| g.evaluate(payload)));

        match self.logic {
            ConditionLogic::And => verdicts.fold(true, |acc, v| acc && v),
            ConditionLogic::Or => verdicts.fold(false, |acc, v| acc || v),
        }
    }
}

fn lookup(payload: &serde_json::Value, path: &str) -> Option<serde_json::Value> {
    let mut current = payload;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current.clone())
}

fn compare_numbers(
    actual: &Option<serde_json::Value>,
    expected: &Option<serde_json::Value>,
) -> Option<std::cmp::Ordering> {
    let a = actual.as_ref()?.as_f64();
    let b = expected.as_ref().and_then(|v| v.as_f64());
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => {
            warn!("Numeric comparison on non-numeric condition values");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equals_and_not_equals() {
        let payload = json!({ "to_status": "ACTIVE", "from_status": "LEAD" });

        assert!(Condition::equals("to_status", json!("ACTIVE")).evaluate(&payload));
        assert!(!Condition::equals("to_status", json!("CLOSED")).evaluate(&payload));
        assert!(Condition::not_equals("from_status", json!("ACTIVE")).evaluate(&payload));
        assert!(Condition::not_equals("missing_field", json!("x")).evaluate(&payload));
    }

    #[test]
    fn test_nested_lookup() {
        let payload = json!({ "document": { "category": "INCOME" } });
        assert!(Condition::equals("document.category", json!("INCOME")).evaluate(&payload));
        assert!(!Condition::equals("document.missing", json!("INCOME")).evaluate(&payload));
    }

    #[test]
    fn test_contains_for_strings_and_arrays() {
        let payload = json!({ "subject": "loan estimate ready", "tags": ["vip", "refi"] });

        assert!(Condition::contains("subject", "estimate").evaluate(&payload));
        assert!(!Condition::contains("subject", "denied").evaluate(&payload));

        let tag_check = Condition::new(
            "tags",
            ConditionOperator::Contains,
            Some(json!("vip")),
        );
        assert!(tag_check.evaluate(&payload));
    }

    #[test]
    fn test_in_list() {
        let payload = json!({ "to_status": "UNDERWRITING" });
        let condition = Condition::in_list(
            "to_status",
            vec![json!("PROCESSING"), json!("UNDERWRITING")],
        );
        assert!(condition.evaluate(&payload));
    }

    #[test]
    fn test_numeric_comparisons() {
        let payload = json!({ "days_overdue": 5 });

        let gt = Condition::new("days_overdue", ConditionOperator::GreaterThan, Some(json!(3)));
        let lt = Condition::new("days_overdue", ConditionOperator::LessThan, Some(json!(3)));
        assert!(gt.evaluate(&payload));
        assert!(!lt.evaluate(&payload));

        // Non-numeric comparison never matches
        let bad = Condition::new("days_overdue", ConditionOperator::GreaterThan, Some(json!("three")));
        assert!(!bad.evaluate(&payload));
    }

    #[test]
    fn test_is_set_and_is_empty() {
        let payload = json!({ "note": "", "tags": [], "assigned_to": null, "id": "abc" });

        assert!(Condition::is_set("id").evaluate(&payload));
        assert!(!Condition::is_set("assigned_to").evaluate(&payload));
        assert!(!Condition::is_set("missing").evaluate(&payload));

        let empty = |field: &str| Condition::new(field, ConditionOperator::IsEmpty, None);
        assert!(empty("note").evaluate(&payload));
        assert!(empty("tags").evaluate(&payload));
        assert!(empty("missing").evaluate(&payload));
        assert!(!empty("id").evaluate(&payload));
    }

    #[test]
    fn test_group_logic() {
        let payload = json!({ "to_status": "ACTIVE", "category": "INCOME" });

        let both = ConditionGroup::all(vec![
            Condition::equals("to_status", json!("ACTIVE")),
            Condition::equals("category", json!("INCOME")),
        ]);
        assert!(both.evaluate(&payload));

        let either = ConditionGroup::any(vec![
            Condition::equals("to_status", json!("CLOSED")),
            Condition::equals("category", json!("INCOME")),
        ]);
        assert!(either.evaluate(&payload));

        let neither = ConditionGroup::all(vec![
            Condition::equals("to_status", json!("CLOSED")),
            Condition::equals("category", json!("INCOME")),
        ]);
        assert!(!neither.evaluate(&payload));
    }

    #[test]
    fn test_nested_groups() {
        let payload = json!({ "to_status": "DENIED", "category": "CREDIT" });

        let group = ConditionGroup {
            logic: ConditionLogic::Or,
            conditions: vec![Condition::equals("to_status", json!("CLOSED"))],
            groups: vec![ConditionGroup::all(vec![
                Condition::equals("to_status", json!("DENIED")),
                Condition::equals("category", json!("CREDIT")),
            ])],
        };
        assert!(group.evaluate(&payload));
    }

    #[test]
    fn test_empty_group_matches_everything() {
        let group = ConditionGroup::all(vec![]);
        assert!(group.evaluate(&json!({ "anything": 1 })));
    }
}
