//! Presenter wrappers.

use arbor_core::{BoxError, NodePath, Params, Presenter};

/// A presenter wrapper that instruments every outbound call with a
/// `tracing` span.
///
/// Without the `tracing` feature the wrapper is a plain pass-through.
pub struct TracingPresenter<P> {
    inner: P,
    name: &'static str,
}

impl<P> TracingPresenter<P> {
    /// Wrap `inner`; `name` tags every span.
    pub const fn new(inner: P, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// The wrapped presenter.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Unwrap.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Clone> Clone for TracingPresenter<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<P: Presenter> Presenter for TracingPresenter<P> {
    fn is_ajax(&self) -> bool {
        self.inner.is_ajax()
    }

    fn link(
        &self,
        origin: &NodePath,
        destination: &str,
        args: &Params,
    ) -> Result<String, BoxError> {
        self.inner.link(origin, destination, args)
    }

    fn raise_signal(&mut self, target: &NodePath, signal: &str) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "presenter",
            presenter = %self.name,
            call = "raise_signal",
            target = %target,
            signal
        )
        .entered();
        self.inner.raise_signal(target, signal)
    }

    fn redirect(
        &mut self,
        origin: &NodePath,
        destination: &str,
        args: &Params,
    ) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "presenter",
            presenter = %self.name,
            call = "redirect",
            origin = %origin,
            destination,
            args = ?args
        )
        .entered();
        self.inner.redirect(origin, destination, args)
    }

    fn forward(&mut self, destination: &str, args: &Params) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "presenter",
            presenter = %self.name,
            call = "forward",
            destination,
            args = ?args
        )
        .entered();
        self.inner.forward(destination, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PresenterCall, RecordingPresenter};

    #[test]
    fn passes_calls_through() {
        let recorder = RecordingPresenter::new();
        let mut presenter = TracingPresenter::new(recorder.clone(), "test");

        presenter
            .redirect(&NodePath::parse("a"), "save!", &Params::new())
            .unwrap();
        presenter.forward("a-save", &Params::new()).unwrap();

        assert_eq!(
            recorder.calls(),
            [
                PresenterCall::Redirect {
                    origin: NodePath::parse("a"),
                    destination: "save!".into(),
                    args: Params::new(),
                },
                PresenterCall::Forward {
                    destination: "a-save".into(),
                    args: Params::new(),
                },
            ]
        );
        assert!(!presenter.is_ajax());
    }
}
