//! Foreign-key filters

use serde_json::{json, Map, Value};

use crate::node::FieldValue;

/// Builds the store filter matching `value` at the dotted `path`.
///
/// `a.b` with a scalar becomes `{a: {b: {eq: v}}}`; with a sequence the
/// innermost operator is `in`.
pub fn build_link_filter(path: &str, value: &FieldValue) -> Value {
    let operator = if value.is_sequence() {
        json!({ "in": value.to_json() })
    } else {
        json!({ "eq": value.to_json() })
    };

    path.rsplit('.').fold(operator, |inner, segment| {
        let mut wrapper = Map::new();
        wrapper.insert(segment.to_string(), inner);
        Value::Object(wrapper)
    })
}
