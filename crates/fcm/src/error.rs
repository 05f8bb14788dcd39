use fcm_container::ContainerError;
use fcm_engine::MigrationError;
use std::borrow::Cow;

/// Errors surfaced by the migrator facade.
#[fcm_derive::fcm_error]
pub enum FcmError {
    #[error("Migration failed{}: {source}", format_context(.context))]
    Migration { source: MigrationError, context: Option<Cow<'static, str>> },

    #[error("Container error{}: {source}", format_context(.context))]
    Container { source: ContainerError, context: Option<Cow<'static, str>> },

    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: ::config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
