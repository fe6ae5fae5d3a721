//! Filter tree evaluation for the in-memory store
//!
//! A filter is a nested object mirroring the node's shape. Non-operator keys
//! descend one path segment; operator keys (`eq`, `in`, ...) apply to the
//! value found at the accumulated dotted path. Sibling keys combine with AND.
//!
//! A sequence value matches when any element matches, except for `ne` and
//! `nin`, which require that no element matches.

use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};
use crate::node::{extract, FieldValue, Node};

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
    Regex,
    Glob,
}

impl FilterOperator {
    /// Parses an operator key; `None` for ordinary field names
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "eq" => Some(FilterOperator::Eq),
            "ne" => Some(FilterOperator::Ne),
            "gt" => Some(FilterOperator::Gt),
            "gte" => Some(FilterOperator::Gte),
            "lt" => Some(FilterOperator::Lt),
            "lte" => Some(FilterOperator::Lte),
            "in" => Some(FilterOperator::In),
            "nin" => Some(FilterOperator::Nin),
            "regex" => Some(FilterOperator::Regex),
            "glob" => Some(FilterOperator::Glob),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::In => "in",
            FilterOperator::Nin => "nin",
            FilterOperator::Regex => "regex",
            FilterOperator::Glob => "glob",
        }
    }
}

/// Evaluates filter trees against nodes
pub struct NodeFilter;

impl NodeFilter {
    /// Checks if a node matches the filter tree.
    ///
    /// Fails on malformed trees (non-object branches, bad `in` operands,
    /// invalid patterns).
    pub fn matches(node: &Node, filter: &Value) -> StoreResult<bool> {
        match filter {
            Value::Null => Ok(true),
            Value::Object(map) => Self::matches_branch(node, "", map),
            other => Err(StoreError::InvalidFilter(format!(
                "expected an object, found {}",
                other
            ))),
        }
    }

    /// Checks the shape of a filter tree without evaluating it.
    ///
    /// Catches the same errors as [`NodeFilter::matches`], so a malformed
    /// filter fails even when no node is there to match against.
    pub fn validate(filter: &Value) -> StoreResult<()> {
        match filter {
            Value::Null => Ok(()),
            Value::Object(map) => Self::validate_branch("", map),
            other => Err(StoreError::InvalidFilter(format!(
                "expected an object, found {}",
                other
            ))),
        }
    }

    fn validate_branch(prefix: &str, branch: &Map<String, Value>) -> StoreResult<()> {
        for (key, condition) in branch {
            match FilterOperator::parse(key) {
                Some(op) if !prefix.is_empty() => Self::validate_operand(op, condition)?,
                Some(op) => {
                    return Err(StoreError::InvalidFilter(format!(
                        "operator `{}` needs a field path",
                        op.as_str()
                    )))
                }
                None => {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    match condition {
                        Value::Object(inner) => Self::validate_branch(&path, inner)?,
                        other => {
                            return Err(StoreError::InvalidFilter(format!(
                                "expected an operator object at `{}`, found {}",
                                path, other
                            )))
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_operand(op: FilterOperator, operand: &Value) -> StoreResult<()> {
        match op {
            FilterOperator::In | FilterOperator::Nin => Self::operand_list(op, operand).map(|_| ()),
            FilterOperator::Regex => parse_regex(Self::operand_str(op, operand)?).map(|_| ()),
            FilterOperator::Glob => glob_to_regex(Self::operand_str(op, operand)?).map(|_| ()),
            _ => Ok(()),
        }
    }

    fn matches_branch(node: &Node, prefix: &str, branch: &Map<String, Value>) -> StoreResult<bool> {
        for (key, condition) in branch {
            let matched = match FilterOperator::parse(key) {
                Some(op) if !prefix.is_empty() => {
                    let value = extract(node, prefix);
                    Self::apply(op, &value, condition)?
                }
                Some(op) => {
                    return Err(StoreError::InvalidFilter(format!(
                        "operator `{}` needs a field path",
                        op.as_str()
                    )))
                }
                None => {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    match condition {
                        Value::Object(inner) => Self::matches_branch(node, &path, inner)?,
                        other => {
                            return Err(StoreError::InvalidFilter(format!(
                                "expected an operator object at `{}`, found {}",
                                path, other
                            )))
                        }
                    }
                }
            };

            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn apply(op: FilterOperator, value: &FieldValue, operand: &Value) -> StoreResult<bool> {
        let candidates: Vec<Value> = match value {
            FieldValue::Null => vec![Value::Null],
            FieldValue::Scalar(scalar) => vec![scalar.to_json()],
            FieldValue::Sequence(items) => items.iter().map(|s| s.to_json()).collect(),
        };

        let result = match op {
            FilterOperator::Eq => candidates.iter().any(|c| c == operand),
            FilterOperator::Ne => !candidates.iter().any(|c| c == operand),
            FilterOperator::In => {
                let set = Self::operand_list(op, operand)?;
                candidates.iter().any(|c| set.contains(c))
            }
            FilterOperator::Nin => {
                let set = Self::operand_list(op, operand)?;
                !candidates.iter().any(|c| set.contains(c))
            }
            FilterOperator::Gt => Self::any_ordered(&candidates, operand, |o| o == Ordering::Greater),
            FilterOperator::Gte => Self::any_ordered(&candidates, operand, |o| o != Ordering::Less),
            FilterOperator::Lt => Self::any_ordered(&candidates, operand, |o| o == Ordering::Less),
            FilterOperator::Lte => Self::any_ordered(&candidates, operand, |o| o != Ordering::Greater),
            FilterOperator::Regex => {
                let pattern = Self::operand_str(op, operand)?;
                let regex = parse_regex(pattern)?;
                candidates
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|s| regex.is_match(s))
            }
            FilterOperator::Glob => {
                let pattern = Self::operand_str(op, operand)?;
                let regex = glob_to_regex(pattern)?;
                candidates
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|s| regex.is_match(s))
            }
        };
        Ok(result)
    }

    fn operand_list(op: FilterOperator, operand: &Value) -> StoreResult<&Vec<Value>> {
        operand.as_array().ok_or_else(|| {
            StoreError::InvalidFilter(format!("`{}` expects a list, found {}", op.as_str(), operand))
        })
    }

    fn operand_str(op: FilterOperator, operand: &Value) -> StoreResult<&str> {
        operand.as_str().ok_or_else(|| {
            StoreError::InvalidFilter(format!("`{}` expects a string, found {}", op.as_str(), operand))
        })
    }

    fn any_ordered(candidates: &[Value], bound: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
        candidates
            .iter()
            .filter_map(|c| compare_values(c, bound))
            .any(accept)
    }
}

/// Orders numbers numerically and strings lexically; other pairs are
/// incomparable.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Parses `/pattern/flags` (flags: `i`, `m`, `s`); a bare pattern is
/// accepted as-is.
fn parse_regex(source: &str) -> StoreResult<Regex> {
    let (pattern, flags) = match source.strip_prefix('/').and_then(|rest| rest.rsplit_once('/')) {
        Some((pattern, flags)) => (pattern, flags),
        None => (source, ""),
    };

    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'g' | 'u' => &mut builder,
            other => {
                return Err(StoreError::InvalidFilter(format!(
                    "unsupported regex flag `{}`",
                    other
                )))
            }
        };
    }

    builder
        .build()
        .map_err(|e| StoreError::InvalidFilter(format!("invalid regex `{}`: {}", source, e)))
}

/// `**` crosses path separators, `*` and `?` do not
fn glob_to_regex(glob: &str) -> StoreResult<Regex> {
    let mut pattern = String::from("^");
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                pattern.push_str(".*");
            }
            '*' => pattern.push_str("[^/]*"),
            '?' => pattern.push_str("[^/]"),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');

    Regex::new(&pattern)
        .map_err(|e| StoreError::InvalidFilter(format!("invalid glob `{}`: {}", glob, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post() -> Node {
        Node::new("p1", "MarkdownRemark")
            .with_field("slug", json!("/blog/hello-world"))
            .with_field(
                "frontmatter",
                json!({"title": "Hello World", "views": 120, "tags": ["rust", "cli"]}),
            )
    }

    #[test]
    fn test_equality_match() {
        assert!(NodeFilter::matches(&post(), &json!({"slug": {"eq": "/blog/hello-world"}})).unwrap());
        assert!(!NodeFilter::matches(&post(), &json!({"slug": {"eq": "/other"}})).unwrap());
    }

    #[test]
    fn test_nested_path_and_combination() {
        let filter = json!({
            "frontmatter": {"views": {"gte": 100, "lt": 200}, "title": {"ne": "Draft"}}
        });
        assert!(NodeFilter::matches(&post(), &filter).unwrap());

        let filter = json!({"frontmatter": {"views": {"gt": 120}}});
        assert!(!NodeFilter::matches(&post(), &filter).unwrap());
    }

    #[test]
    fn test_sequence_any_match() {
        assert!(NodeFilter::matches(&post(), &json!({"frontmatter": {"tags": {"eq": "cli"}}})).unwrap());
        assert!(NodeFilter::matches(&post(), &json!({"frontmatter": {"tags": {"in": ["go", "rust"]}}})).unwrap());
        assert!(!NodeFilter::matches(&post(), &json!({"frontmatter": {"tags": {"nin": ["rust"]}}})).unwrap());
    }

    #[test]
    fn test_missing_field() {
        assert!(!NodeFilter::matches(&post(), &json!({"author": {"eq": "ada"}})).unwrap());
        assert!(NodeFilter::matches(&post(), &json!({"author": {"eq": null}})).unwrap());
    }

    #[test]
    fn test_no_type_coercion() {
        assert!(!NodeFilter::matches(&post(), &json!({"frontmatter": {"views": {"eq": "120"}}})).unwrap());
    }

    #[test]
    fn test_regex_and_glob() {
        assert!(NodeFilter::matches(&post(), &json!({"frontmatter": {"title": {"regex": "/^hello/i"}}})).unwrap());
        assert!(NodeFilter::matches(&post(), &json!({"slug": {"glob": "/blog/*"}})).unwrap());
        assert!(!NodeFilter::matches(&post(), &json!({"slug": {"glob": "/*"}})).unwrap());
        assert!(NodeFilter::matches(&post(), &json!({"slug": {"glob": "/**"}})).unwrap());
    }

    #[test]
    fn test_empty_filter_matches() {
        assert!(NodeFilter::matches(&post(), &json!({})).unwrap());
        assert!(NodeFilter::matches(&post(), &Value::Null).unwrap());
    }

    #[test]
    fn test_malformed_filters_fail() {
        assert!(NodeFilter::matches(&post(), &json!({"slug": "plain"})).is_err());
        assert!(NodeFilter::matches(&post(), &json!({"slug": {"in": "x"}})).is_err());
        assert!(NodeFilter::matches(&post(), &json!({"eq": 1})).is_err());
        assert!(NodeFilter::matches(&post(), &json!({"slug": {"regex": "/(/"}})).is_err());
        assert!(NodeFilter::matches(&post(), &json!([1])).is_err());
    }

    #[test]
    fn test_validate_without_nodes() {
        assert!(NodeFilter::validate(&json!({"frontmatter": {"views": {"gte": 1}}})).is_ok());
        assert!(NodeFilter::validate(&Value::Null).is_ok());

        assert!(NodeFilter::validate(&json!({"slug": "plain"})).is_err());
        assert!(NodeFilter::validate(&json!({"slug": {"nin": 3}})).is_err());
        assert!(NodeFilter::validate(&json!({"slug": {"glob": 3}})).is_err());
        assert!(NodeFilter::validate(&json!({"slug": {"regex": "/a/x"}})).is_err());
        assert!(NodeFilter::validate(&json!({"in": []})).is_err());
    }

    #[test]
    fn test_resolved_cache_is_filtered() {
        let node = post().with_resolved("frontmatter.title", json!("Cached"));
        assert!(NodeFilter::matches(&node, &json!({"frontmatter": {"title": {"eq": "Cached"}}})).unwrap());
    }
}
