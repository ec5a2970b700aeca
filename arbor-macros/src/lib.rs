//! Procedural macros for Arbor.
//!
//! Use through the `arbor` facade with the `macros` feature.

use proc_macro::TokenStream;

mod persistent;

/// Derive macro for implementing `PersistentState`.
///
/// ```rust,ignore
/// #[derive(Persistent)]
/// struct Grid {
///     #[persistent]
///     pub page: i64,
///     #[persistent(rename = "sortBy")]
///     pub sort_by: Option<String>,
///     rows: Vec<Row>,
/// }
/// ```
#[proc_macro_derive(Persistent, attributes(persistent, inherit))]
pub fn derive_persistent(input: TokenStream) -> TokenStream {
    persistent::derive_persistent_impl(input)
}
