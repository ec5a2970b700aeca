//! Destination strings.
//!
//! A destination addresses a signal (or view) on some node relative to the
//! node that issued it:
//!
//! ```text
//! [!]path-to-node-action[!][#anchor]
//! this[#anchor]
//! ```
//!
//! The `!` marker is historical and carries no meaning here. `this` means the
//! issuing node itself and never raises a signal.

use crate::error::DispatchError;
use crate::path::{NAME_SEPARATOR, NodePath};

/// Sentinel destination naming the issuing node.
pub const THIS: &str = "this";

/// Signal marker accepted and discarded by [`Destination::parse`].
pub const SIGNAL_MARKER: char = '!';

/// Separator between a destination and its anchor.
pub const ANCHOR_SEPARATOR: char = '#';

/// Whether `name` is a valid signal or view name: non-empty ASCII alphanumerics.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A parsed destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    target: NodePath,
    action: String,
    is_signal: bool,
    anchor: Option<String>,
    link: String,
}

impl Destination {
    /// Parse `raw` as issued by the node at `current`.
    ///
    /// The resulting target path is absolute. An action that is empty or
    /// contains anything besides ASCII alphanumerics is rejected with
    /// [`DispatchError::InvalidActionName`].
    pub fn parse(raw: &str, current: &NodePath) -> Result<Self, DispatchError> {
        let (destination, anchor) = match raw.split_once(ANCHOR_SEPARATOR) {
            Some((destination, anchor)) => (destination, Some(anchor.to_owned())),
            None => (raw, None),
        };
        let destination = destination.trim_matches(SIGNAL_MARKER);

        if destination == THIS {
            return Ok(Self {
                target: current.clone(),
                action: String::new(),
                is_signal: false,
                anchor,
                link: THIS.to_owned(),
            });
        }

        let (relative, action) = match destination.rsplit_once(NAME_SEPARATOR) {
            Some((path, action)) => (NodePath::parse(path), action),
            None => (NodePath::root(), destination),
        };

        if !is_valid_name(action) {
            return Err(DispatchError::InvalidActionName {
                node: current.clone(),
                action: action.to_owned(),
            });
        }

        Ok(Self {
            target: current.join(&relative),
            action: action.to_owned(),
            is_signal: true,
            anchor,
            link: destination.to_owned(),
        })
    }

    /// Absolute path of the node the destination addresses.
    pub fn target(&self) -> &NodePath {
        &self.target
    }

    /// The signal or view name; empty for `this`.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Whether dispatching this destination raises a signal.
    pub fn is_signal(&self) -> bool {
        self.is_signal
    }

    /// The anchor fragment, if any.
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// The destination as it should be handed to link generation: markers and
    /// anchor removed, path still relative to the issuing node.
    pub fn link_target(&self) -> &str {
        &self.link
    }
}
