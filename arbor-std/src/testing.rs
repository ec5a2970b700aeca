//! Testing utilities for Arbor.
//!
//! This module provides doubles for the collaborators a component tree talks
//! to, so dispatch and render behavior can be asserted without an HTTP layer
//! or a real template engine.
//!
//! # Features
//!
//! - [`RecordingPresenter`]: records every redirect, forward and signal
//! - [`MemoryTemplateSource`]: in-memory template files with probe log
//! - [`RecordingEngine`]: records renders instead of producing markup
//! - [`Journal`]: a shared, ordered log for call-order assertions

use arbor_core::{
    BoxError, NodePath, Params, Presenter, TemplateEngine, TemplateSource, TemplateVars,
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Journal
// ============================================================================

/// A shared, ordered log of string entries.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        lock(&self.entries).push(entry.into());
    }

    /// Snapshot of all entries.
    pub fn entries(&self) -> Vec<String> {
        lock(&self.entries).clone()
    }

    /// Whether an entry equal to `entry` was recorded.
    pub fn contains(&self, entry: &str) -> bool {
        lock(&self.entries).iter().any(|e| e == entry)
    }

    /// Clear all entries.
    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}

// ============================================================================
// Recording Presenter
// ============================================================================

/// An outbound presenter call.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    /// [`Presenter::raise_signal`].
    RaiseSignal {
        /// Target node.
        target: NodePath,
        /// Signal name.
        signal: String,
    },
    /// [`Presenter::redirect`].
    Redirect {
        /// Issuing node.
        origin: NodePath,
        /// Destination as given.
        destination: String,
        /// Arguments, default link parameters merged in.
        args: Params,
    },
    /// [`Presenter::forward`].
    Forward {
        /// Presenter-level destination.
        destination: String,
        /// Presenter-namespaced arguments.
        args: Params,
    },
}

/// A presenter that records every side-effecting call.
///
/// # Example
///
/// ```rust,ignore
/// let presenter = RecordingPresenter::ajax();
/// let mut tree = ComponentTree::builder(root, presenter.clone()).build();
///
/// tree.go(id, "save!", Params::new(), &[], false)?;
/// assert!(presenter.calls().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    calls: Arc<Mutex<Vec<PresenterCall>>>,
    ajax: bool,
}

impl RecordingPresenter {
    /// A presenter for a regular (full page) request.
    pub fn new() -> Self {
        Self::default()
    }

    /// A presenter for a partial-update request.
    pub fn ajax() -> Self {
        Self {
            ajax: true,
            ..Self::default()
        }
    }

    /// Snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<PresenterCall> {
        lock(&self.calls).clone()
    }

    /// Number of recorded calls.
    pub fn count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Forget all recorded calls.
    pub fn clear(&self) {
        lock(&self.calls).clear();
    }
}

impl Presenter for RecordingPresenter {
    fn is_ajax(&self) -> bool {
        self.ajax
    }

    /// Formats `origin:destination?key=value&...`.
    fn link(
        &self,
        origin: &NodePath,
        destination: &str,
        args: &Params,
    ) -> Result<String, BoxError> {
        let query: Vec<String> = args.iter().map(|(k, v)| format!("{k}={v}")).collect();
        if query.is_empty() {
            Ok(format!("{origin}:{destination}"))
        } else {
            Ok(format!("{origin}:{destination}?{}", query.join("&")))
        }
    }

    fn raise_signal(&mut self, target: &NodePath, signal: &str) -> Result<(), BoxError> {
        lock(&self.calls).push(PresenterCall::RaiseSignal {
            target: target.clone(),
            signal: signal.to_owned(),
        });
        Ok(())
    }

    fn redirect(
        &mut self,
        origin: &NodePath,
        destination: &str,
        args: &Params,
    ) -> Result<(), BoxError> {
        lock(&self.calls).push(PresenterCall::Redirect {
            origin: origin.clone(),
            destination: destination.to_owned(),
            args: args.clone(),
        });
        Ok(())
    }

    fn forward(&mut self, destination: &str, args: &Params) -> Result<(), BoxError> {
        lock(&self.calls).push(PresenterCall::Forward {
            destination: destination.to_owned(),
            args: args.clone(),
        });
        Ok(())
    }
}

// ============================================================================
// Memory Template Source
// ============================================================================

/// Template files held in memory.
///
/// Every [`TemplateSource::exists`] probe is logged, so tests can see which
/// candidates a resolver tried.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateSource {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
    probes: Arc<Mutex<Vec<PathBuf>>>,
    journal: Option<Journal>,
}

impl MemoryTemplateSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        lock(&self.files).insert(path.into(), contents.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Also push `resolve` onto `journal` for every probe.
    #[must_use]
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Paths probed so far, in order.
    pub fn probes(&self) -> Vec<PathBuf> {
        lock(&self.probes).clone()
    }
}

impl TemplateSource for MemoryTemplateSource {
    fn exists(&self, path: &Path) -> bool {
        if let Some(journal) = &self.journal {
            journal.push("resolve");
        }
        lock(&self.probes).push(path.to_owned());
        lock(&self.files).contains_key(path)
    }

    fn read(&self, path: &Path) -> Result<String, BoxError> {
        lock(&self.files)
            .get(path)
            .cloned()
            .ok_or_else(|| format!("no template at {}", path.display()).into())
    }
}

// ============================================================================
// Recording Engine
// ============================================================================

/// A render recorded by [`RecordingEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRender {
    /// Resolved template path.
    pub path: PathBuf,
    /// Variables the template received.
    pub vars: TemplateVars,
}

/// A template engine that records renders and returns `rendered:<path>`.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    renders: Arc<Mutex<Vec<RecordedRender>>>,
    journal: Option<Journal>,
}

impl RecordingEngine {
    /// Create an engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also push `render` onto `journal` for every render.
    #[must_use]
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Snapshot of recorded renders.
    pub fn renders(&self) -> Vec<RecordedRender> {
        lock(&self.renders).clone()
    }

    /// Number of renders.
    pub fn count(&self) -> usize {
        lock(&self.renders).len()
    }
}

impl TemplateEngine for RecordingEngine {
    fn render(&self, path: &Path, vars: &TemplateVars) -> Result<String, BoxError> {
        if let Some(journal) = &self.journal {
            journal.push("render");
        }
        lock(&self.renders).push(RecordedRender {
            path: path.to_owned(),
            vars: vars.clone(),
        });
        Ok(format!("rendered:{}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_presenter_formats_links() {
        let presenter = RecordingPresenter::new();
        let mut args = Params::new();
        args.insert("page".into(), 2.into());
        args.insert("q".into(), "x".into());
        assert_eq!(
            presenter
                .link(&NodePath::parse("grid"), "sort", &args)
                .unwrap(),
            "grid:sort?page=2&q=x"
        );
        assert_eq!(
            presenter
                .link(&NodePath::root(), "this", &Params::new())
                .unwrap(),
            ":this"
        );
    }

    #[test]
    fn memory_source_logs_probes() {
        let source = MemoryTemplateSource::new().with("/t/Default.html", "hi");
        assert!(source.exists(Path::new("/t/Default.html")));
        assert!(!source.exists(Path::new("/t/Other.html")));
        assert_eq!(source.probes().len(), 2);
        assert_eq!(source.read(Path::new("/t/Default.html")).unwrap(), "hi");
        assert!(source.read(Path::new("/t/Other.html")).is_err());
    }

    #[test]
    fn journal_clones_share_entries() {
        let journal = Journal::new();
        let engine = RecordingEngine::new().with_journal(journal.clone());
        engine
            .render(Path::new("/t/Default.html"), &TemplateVars::new())
            .unwrap();
        assert_eq!(journal.entries(), ["render"]);
        assert_eq!(engine.count(), 1);
    }
}
