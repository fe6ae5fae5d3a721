//! Field metadata handed to resolvers

use std::collections::HashMap;
use std::fmt;

use crate::query::{FieldEnum, FieldNode, Fragments};

/// Output type of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(of: TypeRef) -> Self {
        TypeRef::List(Box::new(of))
    }

    pub fn non_null(of: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(of))
    }

    /// Strips one outer non-null wrapper
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, TypeRef::List(_))
    }

    /// Innermost named type
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// Resolution metadata for one field access
#[derive(Debug, Clone)]
pub struct ResolveInfo {
    /// Name of the field being resolved
    pub field_name: String,
    pub return_type: TypeRef,
    /// Dotted path to read instead of `field_name`
    pub from: Option<String>,
    /// Read `from` on the root ancestor of the source node
    pub from_node: bool,
    /// AST occurrences of this field in the operation
    pub field_nodes: Vec<FieldNode>,
    pub fragments: Fragments,
    /// Field enums of the return type, keyed by the sub-field taking them
    pub field_enums: HashMap<String, FieldEnum>,
    /// Response path
    pub path: Vec<String>,
}

impl ResolveInfo {
    pub fn new(field_name: impl Into<String>, return_type: TypeRef) -> Self {
        let field_name = field_name.into();
        Self {
            path: vec![field_name.clone()],
            field_name,
            return_type,
            from: None,
            from_node: false,
            field_nodes: Vec::new(),
            fragments: Fragments::new(),
            field_enums: HashMap::new(),
        }
    }

    pub fn with_from(mut self, from: impl Into<String>, from_node: bool) -> Self {
        self.from = Some(from.into());
        self.from_node = from_node;
        self
    }

    pub fn with_field_node(mut self, node: FieldNode) -> Self {
        self.field_nodes.push(node);
        self
    }

    pub fn with_fragments(mut self, fragments: Fragments) -> Self {
        self.fragments = fragments;
        self
    }

    pub fn with_field_enum(mut self, sub_field: impl Into<String>, field_enum: FieldEnum) -> Self {
        self.field_enums.insert(sub_field.into(), field_enum);
        self
    }

    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }

    /// Copy with `from` / `from_node` replaced when a link declares its own
    /// `from`; otherwise the original values are kept.
    pub fn overriding_from(&self, from: Option<&str>, from_node: bool) -> Self {
        let mut info = self.clone();
        if let Some(from) = from {
            info.from = Some(from.to_string());
            info.from_node = from_node;
        }
        info
    }

    /// Dotted response path, for logs
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }
}
