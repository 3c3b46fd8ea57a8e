#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared across the workspace.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! herald-derive = { path = "../infra/derive" }
//! ```
//!
//! Examples are `ignore`d to avoid compiling in this crate; the UI tests under
//! `tests/ui` exercise them for real.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless present.
/// * **Context Support**: Generates a companion `<ErrorName>Ext` trait that adds
///   `.context()` to any `Result` whose error converts into this enum.
/// * **Standard Conversions**: Implements `From<T>` for variants with a source field,
///   so `?` works on upstream errors.
/// * **Internal Fallback**: Implements `From<&'static str>` and `From<String>` if an
///   `Internal` variant exists.
/// * **Labels**: Generates `as_label()`, a stable snake_case name per variant for
///   structured logs.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. Variants that support context carry `context: Option<Cow<'static, str>>`.
/// 3. Variants wrapping an upstream error carry a `source` field (or a field marked
///    `#[source]`/`#[from]`) and must also carry `context`.
///
/// # Example
///
/// ```rust,ignore
/// use herald_derive::herald_error;
/// use std::borrow::Cow;
///
/// #[herald_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read() -> Result<String, StoreError> {
///     let raw = std::fs::read_to_string("store.toml").context("Reading store file")?;
///     if raw.is_empty() {
///         return Err("empty store file".into());
///     }
///     Ok(raw)
/// }
///
/// assert_eq!(StoreError::from("boom").as_label(), "internal");
/// ```
#[proc_macro_attribute]
pub fn herald_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
