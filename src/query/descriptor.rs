//! Store-level query descriptors
//!
//! The representation the translator hands to the node store: a nested
//! filter tree, an optional sort, the group / distinct paths requested
//! further down the selection, and the cardinality flag.

use serde::Serialize;
use serde_json::{Map, Value};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    fn parse(value: &Value) -> Self {
        match value.as_str() {
            Some(s) if s.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// Multi-field sort specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    /// Dotted field paths, most significant first
    pub fields: Vec<String>,
    /// Direction per field; missing entries sort ascending
    pub order: Vec<SortDirection>,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![field.into()],
            order: vec![SortDirection::Asc],
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![field.into()],
            order: vec![SortDirection::Desc],
        }
    }

    /// Reads `{ fields: [..], order: [..] }`. A single string is accepted
    /// in place of either list. Returns `None` when no field is named.
    pub fn from_value(value: &Value) -> Option<Self> {
        let as_list = |v: Option<&Value>| -> Vec<Value> {
            match v {
                Some(Value::Array(items)) => items.clone(),
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![other.clone()],
            }
        };

        let fields: Vec<String> = as_list(value.get("fields"))
            .iter()
            .filter_map(|f| f.as_str().map(str::to_string))
            .collect();
        if fields.is_empty() {
            return None;
        }

        let order = as_list(value.get("order"))
            .iter()
            .map(SortDirection::parse)
            .collect();

        Some(Self { fields, order })
    }

    /// Direction for the field at `index`
    pub fn direction(&self, index: usize) -> SortDirection {
        self.order.get(index).copied().unwrap_or(SortDirection::Asc)
    }
}

/// A query the node store executes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    /// Target node type
    #[serde(rename = "type")]
    pub node_type: String,
    /// Nested predicate tree, `{}` matches everything
    pub filter: Value,
    pub sort: Option<SortSpec>,
    /// Dotted paths requested by `group` sub-selections
    pub group: Vec<String>,
    /// Dotted paths requested by `distinct` sub-selections
    pub distinct: Vec<String>,
    /// At most one node when set, otherwise an ordered sequence
    pub first_only: bool,
}

impl QueryDescriptor {
    /// A plural query
    pub fn many(node_type: impl Into<String>, filter: Value) -> Self {
        Self {
            node_type: node_type.into(),
            filter,
            sort: None,
            group: Vec::new(),
            distinct: Vec::new(),
            first_only: false,
        }
    }

    /// A singular query
    pub fn one(node_type: impl Into<String>, filter: Value) -> Self {
        Self {
            first_only: true,
            ..Self::many(node_type, filter)
        }
    }

    /// Builds a descriptor from resolver arguments
    /// (`filter`, `sort`, `group`, `distinct`).
    pub fn from_args(node_type: impl Into<String>, args: &Map<String, Value>, first_only: bool) -> Self {
        let filter = match args.get("filter") {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(filter) => filter.clone(),
        };
        let paths = |key: &str| -> Vec<String> {
            args.get(key)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|p| p.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default()
        };

        Self {
            node_type: node_type.into(),
            filter,
            sort: args.get("sort").and_then(SortSpec::from_value),
            group: paths("group"),
            distinct: paths("distinct"),
            first_only,
        }
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_args() {
        let args = json!({
            "filter": {"frontmatter": {"draft": {"eq": false}}},
            "sort": {"fields": ["frontmatter.date"], "order": ["DESC"]},
            "group": ["frontmatter.tags"],
            "skip": 10
        });

        let descriptor = QueryDescriptor::from_args("MarkdownRemark", args.as_object().unwrap(), false);

        assert_eq!(descriptor.node_type, "MarkdownRemark");
        assert_eq!(descriptor.filter, json!({"frontmatter": {"draft": {"eq": false}}}));
        assert_eq!(descriptor.sort, Some(SortSpec::desc("frontmatter.date")));
        assert_eq!(descriptor.group, vec!["frontmatter.tags"]);
        assert!(descriptor.distinct.is_empty());
        assert!(!descriptor.first_only);
    }

    #[test]
    fn test_missing_filter_matches_all() {
        let descriptor = QueryDescriptor::from_args("T", &Map::new(), true);
        assert_eq!(descriptor.filter, json!({}));
        assert!(descriptor.first_only);
    }

    #[test]
    fn test_sort_spec_defaults() {
        let sort = SortSpec::from_value(&json!({"fields": ["a", "b"], "order": "desc"})).unwrap();
        assert_eq!(sort.direction(0), SortDirection::Desc);
        assert_eq!(sort.direction(1), SortDirection::Asc);

        assert!(SortSpec::from_value(&json!({"order": ["ASC"]})).is_none());
    }

    #[test]
    fn test_serializes_type_key() {
        let json = serde_json::to_value(QueryDescriptor::one("Author", json!({}))).unwrap();
        assert_eq!(json["type"], "Author");
        assert_eq!(json["firstOnly"], true);
    }
}
