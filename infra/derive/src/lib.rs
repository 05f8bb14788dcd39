#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the migrator workspace.
//!
//! * [`fcm_error`] wires an error enum into `thiserror`, context propagation and `From` conversions.
//! * [`migration`] declares the metadata of a migration unit and checks it at compile time.
//!
//! Examples are `ignore`d because the expansions reference crates this proc-macro crate
//! does not depend on.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// Attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&str>` and `From<String>` if an `Internal` variant
///   is present.
/// * **Kind**: Adds `kind()`, returning the variant name for structured logs.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants.
/// 2. Variants that support context carry `context: Option<Cow<'static, str>>`.
/// 3. Variants wrapping an upstream error carry `source: T` (or a field marked
///    `#[source]`/`#[from]`) and must also carry `context`.
///
/// # Example
///
/// ```rust,ignore
/// use fcm_derive::fcm_error;
/// use std::borrow::Cow;
///
/// #[fcm_error]
/// pub enum ContainerError {
///     #[error("I/O error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn open(path: &Path) -> Result<File, ContainerError> {
///     File::open(path).context("Opening archive")
/// }
/// ```
#[proc_macro_attribute]
pub fn fcm_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Declares a migration unit and implements `fcm_engine::Declared` for it.
///
/// All five keys are required and must be string literals:
///
/// * `name` - human-readable identifier (non-empty).
/// * `description` - one-line summary.
/// * `threshold` - the format version that introduced the change.
/// * `introduced_on` - `YYYY-MM-DD` date; orders units inside a plan.
/// * `change_id` - stable upstream identifier, usually a commit hash (non-empty).
///
/// A missing, duplicated or unknown key is a compile error. `Debug` and `Default` are derived
/// when absent; the forward/backward bodies are written by implementing `fcm_engine::Migration`.
///
/// # Example
///
/// ```rust,ignore
/// use fcm_engine::{Migration, MigrationError, rename_property};
/// use xmltree::Element;
///
/// #[fcm_derive::migration(
///     name = "AttachmentExtension::Support to AttachmentSupport",
///     description = "Rename the Support property to AttachmentSupport",
///     threshold = "1.0",
///     introduced_on = "2024-03-04",
///     change_id = "a8ae56e06ab0c45205f1f185523c23fe99d5ce44",
/// )]
/// pub struct AttachmentSupport;
///
/// impl Migration for AttachmentSupport {
///     fn forward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
///         rename_property(document, "Support", "AttachmentSupport");
///         Ok(())
///     }
///
///     fn backward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
///         rename_property(document, "AttachmentSupport", "Support");
///         Ok(())
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn migration(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::migration::expand_migration(args.into(), input).into()
}
