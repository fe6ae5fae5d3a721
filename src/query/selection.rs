//! Selection sets of the operation being resolved
//!
//! Only the parts the translator inspects are modelled: field names, their
//! literal arguments, nested selections and fragments.

use std::collections::HashMap;

use serde_json::Value;

use crate::dispatch::ResolveInfo;
use crate::errors::{ResolveError, ResolveResult};

/// Fragment definitions of the operation, by name
pub type Fragments = HashMap<String, SelectionSet>;

/// A literal argument on a field; enum literals are held as strings
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

/// A field occurrence in a selection set
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldNode {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub selection_set: SelectionSet,
}

impl FieldNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.push(Argument {
            name: name.into(),
            value,
        });
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection_set.selections.push(selection);
        self
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }
}

/// One entry of a selection set
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(FieldNode),
    /// `...Name`, resolved through the operation's fragments
    FragmentSpread(String),
    /// `... on T { ... }`
    InlineFragment(SelectionSet),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionSet {
    pub selections: Vec<Selection>,
}

impl SelectionSet {
    pub fn new(selections: Vec<Selection>) -> Self {
        Self { selections }
    }

    /// Every field named `name` reachable without entering another field:
    /// direct selections, inline fragments and fragment spreads. Unknown
    /// spreads contribute nothing.
    pub fn fields_named<'a>(&'a self, name: &str, fragments: &'a Fragments) -> Vec<&'a FieldNode> {
        let mut found = Vec::new();
        for selection in &self.selections {
            match selection {
                Selection::Field(field) if field.name == name => found.push(field),
                Selection::Field(_) => {}
                Selection::FragmentSpread(fragment) => {
                    if let Some(set) = fragments.get(fragment) {
                        found.extend(set.fields_named(name, fragments));
                    }
                }
                Selection::InlineFragment(set) => found.extend(set.fields_named(name, fragments)),
            }
        }
        found
    }
}

/// Enum mapping schema-safe keys to dotted field paths
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldEnum {
    values: HashMap<String, String>,
}

impl FieldEnum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares each path under its conventional key (`a.b` as `a___b`)
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = paths
            .into_iter()
            .map(|path| {
                let path = path.into();
                (path.replace('.', "___"), path)
            })
            .collect();
        Self { values }
    }

    pub fn with_value(mut self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.values.insert(key.into(), path.into());
        self
    }

    /// Dotted path for an enum key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Dotted paths named by the `field:` argument of every `sub_field`
/// selected under the field being resolved.
///
/// Selections without a `field:` argument are ignored. A key the
/// connection's enum does not declare, or a connection without an enum for
/// `sub_field`, is a schema error.
pub fn projected_field(info: &ResolveInfo, sub_field: &str) -> ResolveResult<Vec<String>> {
    let selection_set = match info.field_nodes.first() {
        Some(field) => &field.selection_set,
        None => return Ok(Vec::new()),
    };

    let mut paths = Vec::new();
    for field in selection_set.fields_named(sub_field, &info.fragments) {
        let key = match field.argument("field") {
            Some(Value::String(key)) => key,
            Some(_) | None => continue,
        };

        let field_enum = info
            .field_enums
            .get(sub_field)
            .ok_or_else(|| ResolveError::MissingFieldEnum(sub_field.to_string()))?;
        let path = field_enum
            .get(key)
            .ok_or_else(|| ResolveError::UnknownEnumValue {
                field: sub_field.to_string(),
                value: key.clone(),
            })?;
        paths.push(path.to_string());
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::TypeRef;
    use serde_json::json;

    fn group_on(key: &str) -> Selection {
        Selection::Field(FieldNode::new("group").with_argument("field", json!(key)))
    }

    fn info(selections: Vec<Selection>, fragments: Fragments) -> ResolveInfo {
        let mut connection = FieldNode::new("allMarkdownRemark");
        connection.selection_set = SelectionSet::new(selections);

        ResolveInfo::new("allMarkdownRemark", TypeRef::named("MarkdownRemarkConnection"))
            .with_field_node(connection)
            .with_fragments(fragments)
            .with_field_enum(
                "group",
                FieldEnum::from_paths(["frontmatter.color", "frontmatter.tags"]),
            )
    }

    #[test]
    fn test_direct_and_nested_selections() {
        let mut fragments = Fragments::new();
        fragments.insert(
            "Tags".to_string(),
            SelectionSet::new(vec![group_on("frontmatter___tags")]),
        );

        let info = info(
            vec![
                group_on("frontmatter___color"),
                Selection::FragmentSpread("Tags".to_string()),
                Selection::InlineFragment(SelectionSet::new(vec![group_on("frontmatter___color")])),
                Selection::FragmentSpread("Unknown".to_string()),
                Selection::Field(FieldNode::new("totalCount")),
            ],
            fragments,
        );

        assert_eq!(
            projected_field(&info, "group").unwrap(),
            vec!["frontmatter.color", "frontmatter.tags", "frontmatter.color"]
        );
        assert!(projected_field(&info, "distinct").unwrap().is_empty());
    }

    #[test]
    fn test_nested_fields_are_not_entered() {
        let edges = FieldNode::new("edges").with_selection(group_on("frontmatter___color"));
        let info = info(vec![Selection::Field(edges)], Fragments::new());
        assert!(projected_field(&info, "group").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_enum_value_fails() {
        let info = info(vec![group_on("frontmatter___size")], Fragments::new());
        assert_eq!(
            projected_field(&info, "group").unwrap_err(),
            ResolveError::UnknownEnumValue {
                field: "group".into(),
                value: "frontmatter___size".into()
            }
        );
    }

    #[test]
    fn test_missing_enum_fails() {
        let distinct = Selection::Field(FieldNode::new("distinct").with_argument("field", json!("id")));
        let info = info(vec![distinct], Fragments::new());
        assert_eq!(
            projected_field(&info, "distinct").unwrap_err(),
            ResolveError::MissingFieldEnum("distinct".into())
        );
    }

    #[test]
    fn test_no_field_nodes() {
        let info = ResolveInfo::new("allFile", TypeRef::named("FileConnection"));
        assert!(projected_field(&info, "group").unwrap().is_empty());
    }
}
