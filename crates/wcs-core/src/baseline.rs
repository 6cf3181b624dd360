//! Baseline snapshots and "modified since baseline" tracking.
//!
//! A baseline is the deep copy of a widget taken when it registers. A widget
//! is modified exactly when its live properties differ structurally from its
//! baseline's. The flag is recomputed on every read; nothing is cached.

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::widget::{Properties, WidgetId, WidgetRecord};

/// Owns one baseline snapshot per registered widget.
#[derive(Debug, Clone, Default)]
pub struct BaselineTracker {
    baselines: IndexMap<WidgetId, WidgetRecord>,
}

impl BaselineTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `record` as the baseline for its id, replacing any previous one.
    pub fn capture(&mut self, record: WidgetRecord) {
        self.baselines.insert(record.id.clone(), record);
    }

    /// Drops the baseline for `id`. Returns `true` if one existed.
    pub fn remove(&mut self, id: &WidgetId) -> bool {
        self.baselines.shift_remove(id).is_some()
    }

    pub fn get(&self, id: &WidgetId) -> Option<&WidgetRecord> {
        self.baselines.get(id)
    }

    pub fn contains(&self, id: &WidgetId) -> bool {
        self.baselines.contains_key(id)
    }

    pub fn clear(&mut self) {
        self.baselines.clear();
    }

    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }

    /// Returns `true` if `live` differs from the baseline recorded for `id`.
    ///
    /// A widget without a baseline is never modified.
    pub fn is_modified(&self, id: &WidgetId, live: &Properties) -> bool {
        match self.baselines.get(id) {
            Some(baseline) => !properties_equal(&baseline.properties, live),
            None => false,
        }
    }
}

/// Structural equality over property maps: same key set, pairwise-equal values.
pub fn properties_equal(a: &Properties, b: &Properties) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other)))
}

/// Structural equality over JSON values.
///
/// Objects compare by key set regardless of order, arrays element-wise in
/// order, and numbers by numeric value (`14` equals `14.0`).
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => properties_equal(x, y),
        _ => false,
    }
}

/// Integers compare exactly; an integer equals a float only if the float is
/// integral and holds exactly that value.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (a.is_f64(), b.is_f64()) {
        (false, false) => a == b,
        (true, true) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
        (false, true) => b.as_f64().is_some_and(|f| integer_equals_float(a, f)),
        (true, false) => a.as_f64().is_some_and(|f| integer_equals_float(b, f)),
    }
}

fn integer_equals_float(int: &Number, f: f64) -> bool {
    // 2^63 and 2^64 are exact in f64; casts below are in range
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

    if !f.is_finite() || f.fract() != 0.0 {
        return false;
    }
    if let Some(i) = int.as_i64() {
        return (-TWO_POW_63..TWO_POW_63).contains(&f) && f as i64 == i;
    }
    if let Some(u) = int.as_u64() {
        return (0.0..TWO_POW_64).contains(&f) && f as u64 == u;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        match value {
            Value::Object(map) => map,
            _ => Properties::new(),
        }
    }

    fn record(id: &str, properties: Value) -> WidgetRecord {
        WidgetRecord::new(WidgetId::new(id), "Text", props(properties))
    }

    #[test]
    fn test_unknown_widget_is_not_modified() {
        let tracker = BaselineTracker::new();
        let live = props(json!({"fontSize": 20}));
        assert!(!tracker.is_modified(&WidgetId::new("missing"), &live));
    }

    #[test]
    fn test_identical_properties_are_not_modified() {
        let mut tracker = BaselineTracker::new();
        tracker.capture(record("w1", json!({"fontSize": 14, "visible": true})));

        let live = props(json!({"visible": true, "fontSize": 14}));
        assert!(!tracker.is_modified(&WidgetId::new("w1"), &live));
    }

    #[test]
    fn test_changed_value_is_modified() {
        let mut tracker = BaselineTracker::new();
        tracker.capture(record("w1", json!({"fontSize": 14})));

        let live = props(json!({"fontSize": 20}));
        assert!(tracker.is_modified(&WidgetId::new("w1"), &live));
    }

    #[test]
    fn test_added_key_is_modified() {
        let mut tracker = BaselineTracker::new();
        tracker.capture(record("w1", json!({"fontSize": 14})));

        let live = props(json!({"fontSize": 14, "color": "#ff0000"}));
        assert!(tracker.is_modified(&WidgetId::new("w1"), &live));
    }

    #[test]
    fn test_null_vs_missing_key_differs() {
        let mut tracker = BaselineTracker::new();
        tracker.capture(record("w1", json!({"fontSize": null})));

        assert!(tracker.is_modified(&WidgetId::new("w1"), &Properties::new()));
        assert!(!tracker.is_modified(&WidgetId::new("w1"), &props(json!({"fontSize": null}))));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut tracker = BaselineTracker::new();
        tracker.capture(record("w1", json!({})));
        tracker.capture(record("w2", json!({})));

        assert!(tracker.remove(&WidgetId::new("w1")));
        assert!(!tracker.remove(&WidgetId::new("w1")));
        assert_eq!(tracker.len(), 1);

        tracker.clear();
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_values_equal_numbers_by_value() {
        assert!(values_equal(&json!(14), &json!(14.0)));
        assert!(!values_equal(&json!(14), &json!(14.5)));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(!values_equal(&json!(0), &json!(false)));
    }

    #[test]
    fn test_values_equal_large_integers_exact() {
        // Adjacent integers past 2^53 share one f64 representation
        assert!(!values_equal(&json!(9007199254740992_u64), &json!(9007199254740993_u64)));
        assert!(!values_equal(&json!(u64::MAX), &json!(u64::MAX - 1)));
        assert!(!values_equal(&json!(i64::MIN), &json!(i64::MIN + 1)));
        assert!(values_equal(&json!(9007199254740993_u64), &json!(9007199254740993_u64)));

        // Int vs float: equal only when the float is exactly that integer
        assert!(values_equal(&json!(9007199254740992_u64), &json!(9007199254740992.0)));
        assert!(!values_equal(&json!(9007199254740993_u64), &json!(9007199254740992.0)));
        assert!(values_equal(&json!(-3), &json!(-3.0)));
        assert!(values_equal(&json!(-3.0), &json!(-3)));
        assert!(!values_equal(&json!(u64::MAX), &json!(18446744073709551616.0)));
    }

    #[test]
    fn test_is_modified_detects_large_integer_change() {
        let mut tracker = BaselineTracker::new();
        tracker.capture(WidgetRecord::new(
            WidgetId::new("w1"),
            "Text",
            props(json!({"id": 9007199254740992_u64})),
        ));

        assert!(tracker.is_modified(&WidgetId::new("w1"), &props(json!({"id": 9007199254740993_u64}))));
        assert!(!tracker.is_modified(&WidgetId::new("w1"), &props(json!({"id": 9007199254740992_u64}))));
    }

    #[test]
    fn test_values_equal_nested() {
        let a = json!({"heading": {"fontSize": 24, "shadows": [{"x": 1}, {"x": 2}]}});
        let b = json!({"heading": {"shadows": [{"x": 1}, {"x": 2}], "fontSize": 24.0}});
        let c = json!({"heading": {"shadows": [{"x": 2}, {"x": 1}], "fontSize": 24}});

        assert!(values_equal(&a, &b));
        assert!(!values_equal(&a, &c));
    }
}
