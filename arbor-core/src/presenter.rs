//! The presenter collaborator.
//!
//! The presenter owns the request: it knows whether the request is a partial
//! update, formats links, and performs the actual redirect and forward
//! mechanics. The tree only decides *which* of them to call.

use crate::error::BoxError;
use crate::path::NodePath;
use crate::value::Params;

/// The external request-processing context of one request.
pub trait Presenter: Send {
    /// Whether the current request is a partial-update (AJAX) request.
    fn is_ajax(&self) -> bool;

    /// Format a link to `destination`, relative to the node at `origin`.
    fn link(&self, origin: &NodePath, destination: &str, args: &Params)
    -> Result<String, BoxError>;

    /// Raise `signal` on the node at `target`.
    fn raise_signal(&mut self, target: &NodePath, signal: &str) -> Result<(), BoxError>;

    /// Redirect the client to `destination`, relative to the node at `origin`.
    fn redirect(&mut self, origin: &NodePath, destination: &str, args: &Params)
    -> Result<(), BoxError>;

    /// Forward to a presenter-level destination with presenter-namespaced args.
    fn forward(&mut self, destination: &str, args: &Params) -> Result<(), BoxError>;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn is_ajax(&self) -> bool {
        (**self).is_ajax()
    }

    fn link(
        &self,
        origin: &NodePath,
        destination: &str,
        args: &Params,
    ) -> Result<String, BoxError> {
        (**self).link(origin, destination, args)
    }

    fn raise_signal(&mut self, target: &NodePath, signal: &str) -> Result<(), BoxError> {
        (**self).raise_signal(target, signal)
    }

    fn redirect(
        &mut self,
        origin: &NodePath,
        destination: &str,
        args: &Params,
    ) -> Result<(), BoxError> {
        (**self).redirect(origin, destination, args)
    }

    fn forward(&mut self, destination: &str, args: &Params) -> Result<(), BoxError> {
        (**self).forward(destination, args)
    }
}
