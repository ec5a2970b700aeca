//! Node paths.
//!
//! A node is identified by the names of its ancestors below the request root,
//! joined with [`NAME_SEPARATOR`]. The root itself has the empty path.

use std::fmt;

/// Separator between component names in a path and in prefixed argument keys.
pub const NAME_SEPARATOR: char = '-';

/// Stable identifier of a node within one request's tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodePath(Vec<String>);

impl NodePath {
    /// The request root.
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a separator-joined path. Empty segments are skipped.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(NAME_SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Build a path from individual names.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The names from the root down.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether this is the request root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The node's own name, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// The parent path, `None` for the root.
    pub fn parent(&self) -> Option<NodePath> {
        self.0
            .split_last()
            .map(|(_, rest)| NodePath(rest.to_vec()))
    }

    /// Path of a direct child.
    pub fn child(&self, name: &str) -> NodePath {
        let mut segments = self.0.clone();
        segments.push(name.to_owned());
        NodePath(segments)
    }

    /// Append a relative path.
    pub fn join(&self, relative: &NodePath) -> NodePath {
        let mut segments = self.0.clone();
        segments.extend(relative.0.iter().cloned());
        NodePath(segments)
    }

    /// Prefix `key` with this path, as used in a presenter's parameter namespace.
    pub fn prefix(&self, key: &str) -> String {
        if self.is_root() {
            key.to_owned()
        } else {
            format!("{self}{NAME_SEPARATOR}{key}")
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{NAME_SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
