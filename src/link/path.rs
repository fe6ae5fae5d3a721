//! Relative file links
//!
//! A node sourced from a file (markdown, yaml, ...) may reference other
//! files by a path relative to its own file. The owning file is found by
//! walking up the parent chain; the reference is resolved against its
//! directory and matched against the absolute path of every file node.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use super::resolve_raw;
use crate::dispatch::{Args, FieldResolver, ResolveFuture, ResolveInfo, Resolved, ResolverContext, Source};
use crate::errors::ResolveResult;
use crate::node::{FieldValue, Node, Scalar};
use crate::observability::{log_event_with_fields, Event};

/// Joins `path` onto `base` unless it is already absolute. A relative
/// result is anchored at the working directory.
pub fn resolve_path(base: &str, path: &str) -> PathBuf {
    let path = Path::new(path);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new(base).join(path)
    };

    if joined.is_absolute() {
        joined
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(joined)
    }
}

/// Folds `.` and `..` lexically and renders with `/` separators, without a
/// trailing slash.
pub fn normalize_path(path: &Path) -> String {
    let mut prefix = String::new();
    let mut parts: Vec<String> = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => prefix = p.as_os_str().to_string_lossy().into_owned(),
            Component::RootDir => prefix.push('/'),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop();
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }

    let normalized = format!("{}{}", prefix, parts.join("/")).replace('\\', "/");
    if normalized.is_empty() {
        ".".to_string()
    } else {
        normalized
    }
}

/// Resolves a relative file path field to the file node it names
#[derive(Clone, Default)]
pub struct FileByPath {
    from: Option<String>,
    from_node: bool,
    inner: Option<Arc<dyn FieldResolver>>,
}

impl FileByPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the path from `from` instead of the field itself
    pub fn with_from(mut self, from: impl Into<String>, from_node: bool) -> Self {
        self.from = Some(from.into());
        self.from_node = from_node;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn FieldResolver>) -> Self {
        self.inner = Some(resolver);
        self
    }

    async fn file_by_path(
        &self,
        source: &Source,
        args: &Args,
        ctx: &ResolverContext,
        info: &ResolveInfo,
    ) -> ResolveResult<Resolved> {
        let raw = resolve_raw(
            self.inner.as_ref(),
            self.from.as_deref(),
            self.from_node,
            source,
            args,
            ctx,
            info,
        )
        .await?;
        if raw.is_null() {
            return Ok(Resolved::Null);
        }

        let config = &ctx.config;
        let is_file = |node: &Node| node.node_type() == config.file_node_type;
        let ancestor = match source.owner() {
            Some(owner) => ctx.store.find_root_node_ancestor(owner, Some(&is_file)).await?,
            None => None,
        };

        let files = match &ancestor {
            Some(_) => ctx.store.get_all_nodes(&config.file_node_type).await?,
            None => {
                let path = info.path_string();
                log_event_with_fields(
                    Event::FileLinkNoAncestor,
                    &[("file_type", &config.file_node_type), ("path", &path)],
                );
                Vec::new()
            }
        };

        let dir = ancestor
            .as_ref()
            .and_then(|file| file.get(&config.file_dir_field))
            .and_then(|dir| dir.as_str())
            .unwrap_or_default();

        let find = |scalar: &Scalar| -> Option<Arc<Node>> {
            let relative = match scalar {
                Scalar::Json(serde_json::Value::String(s)) => s,
                _ => return None,
            };
            let wanted = normalize_path(&resolve_path(dir, relative));
            files
                .iter()
                .find(|file| {
                    file.get(&config.file_path_field).and_then(|p| p.as_str()) == Some(wanted.as_str())
                })
                .cloned()
        };

        Ok(match &raw {
            FieldValue::Sequence(items) => Resolved::Nodes(items.iter().map(find).collect()),
            FieldValue::Scalar(scalar) => Resolved::Node(find(scalar)),
            FieldValue::Null => Resolved::Null,
        })
    }
}

impl FieldResolver for FileByPath {
    fn resolve<'a>(
        &'a self,
        source: &'a Source,
        args: &'a Args,
        ctx: &'a ResolverContext,
        info: &'a ResolveInfo,
    ) -> ResolveFuture<'a> {
        Box::pin(self.file_by_path(source, args, ctx, info))
    }
}

impl fmt::Debug for FileByPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileByPath")
            .field("from", &self.from)
            .field("from_node", &self.from_node)
            .field("custom_resolver", &self.inner.is_some())
            .finish()
    }
}
