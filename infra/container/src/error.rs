use std::borrow::Cow;

/// A specialized [`ContainerError`] enum of this crate.
#[fcm_derive::fcm_error]
pub enum ContainerError {
    /// The archive lacks a part the migrator cannot work without.
    #[error("Missing required part{}: '{part}'", format_context(.context))]
    MissingRequiredPart { part: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Archive error{}: {source}", format_context(.context))]
    Archive { source: zip::result::ZipError, context: Option<Cow<'static, str>> },

    #[error("I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// A part could not be parsed or serialized as XML.
    #[error("XML error{}: {message}", format_context(.context))]
    Xml { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal container error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
