//! Error types.
//!
//! `DispatchError` is what a caller can run into while a message is routed;
//! every variant maps to a localization key plus positional parameters so the
//! dispatcher can answer in the caller's language. Unrecognized input is not
//! an error at all: it is the `Outcome::Ignored` terminal state.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to convert one argument token into a parameter kind.
#[derive(Debug, Clone, Error, PartialEq, Eq, PartialOrd)]
pub enum ValueError {
    #[error("'{token}' is not a valid {kind}")]
    Mismatch { token: String, kind: String },

    #[error("'{token}' is not a whole number")]
    NotInteger { token: String },

    #[error("'{token}' is not a number")]
    NotNumber { token: String },

    #[error("'{token}' is not a yes/no value")]
    NotBoolean { token: String },

    #[error("'{token}' is not a valid identifier")]
    NotIdentifier { token: String },

    #[error("'{token}' is not a {dims}-component vector")]
    NotVector { token: String, dims: usize },

    #[error("'{token}' is not a duration (try 90s, 5m or 1h30m)")]
    NotDuration { token: String },

    #[error("'{token}' is not one of {expected}")]
    UnknownVariant { token: String, expected: String },

    #[error("nobody called '{token}' is known")]
    UnknownPrincipal { token: String },

    #[error("'{token}' is out of range")]
    OutOfRange { token: String },
}

/// Reasons a recognized command was not (successfully) executed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{group} needs a subcommand")]
    MissingGroupSubcommand { group: String, subcommands: Vec<String> },

    #[error("{group} has no subcommand '{subcommand}'")]
    UnknownSubcommand { group: String, subcommand: String, suggestion: Option<String> },

    #[error("{command}: missing required parameter '{param}'")]
    MissingRequiredParameter { command: String, param: String, usage: String },

    #[error("{command}: invalid value for '{param}': {reason}")]
    InvalidParameterValue {
        command: String,
        param: String,
        #[source]
        reason: ValueError,
        usage: String,
    },

    #[error("{command}: no overload accepts these arguments")]
    NoSuitableOverload { command: String },

    #[error("{command}: arguments match {candidates} overloads equally well")]
    AmbiguousOverload { command: String, candidates: usize },

    #[error("{command}: permission denied")]
    PermissionDenied { command: String },

    #[error("{command}: handler failed: {detail}")]
    HandlerExecutionFailed { command: String, detail: String },
}

impl DispatchError {
    /// Localization key of the reply shown to the caller.
    pub fn message_key(&self) -> &'static str {
        match self {
            DispatchError::MissingGroupSubcommand { .. } => "command.missing_subcommand",
            DispatchError::UnknownSubcommand { suggestion: Some(_), .. } => "command.unknown_subcommand_suggest",
            DispatchError::UnknownSubcommand { suggestion: None, .. } => "command.unknown_subcommand",
            DispatchError::MissingRequiredParameter { .. } => "command.missing_parameter",
            DispatchError::InvalidParameterValue { .. } => "command.invalid_parameter",
            DispatchError::NoSuitableOverload { .. } => "command.no_overload",
            DispatchError::AmbiguousOverload { .. } => "command.ambiguous",
            DispatchError::PermissionDenied { .. } => "command.permission_denied",
            DispatchError::HandlerExecutionFailed { .. } => "command.execution_failed",
        }
    }

    /// Positional parameters for [`message_key`](Self::message_key).
    ///
    /// `detail` of `HandlerExecutionFailed` is never part of the reply.
    pub fn message_params(&self) -> Vec<String> {
        match self {
            DispatchError::MissingGroupSubcommand { group, subcommands } => {
                vec![group.clone(), subcommands.join(", ")]
            }
            DispatchError::UnknownSubcommand { group, subcommand, suggestion } => {
                let mut params = vec![group.clone(), subcommand.clone()];
                params.extend(suggestion.clone());
                params
            }
            DispatchError::MissingRequiredParameter { param, usage, .. } => vec![param.clone(), usage.clone()],
            DispatchError::InvalidParameterValue { param, reason, usage, .. } => {
                vec![param.clone(), reason.to_string(), usage.clone()]
            }
            DispatchError::NoSuitableOverload { command } | DispatchError::PermissionDenied { command } => {
                vec![command.clone()]
            }
            DispatchError::AmbiguousOverload { command, candidates } => vec![command.clone(), candidates.to_string()],
            DispatchError::HandlerExecutionFailed { command, .. } => vec![command.clone()],
        }
    }
}

/// Invalid command or group descriptor passed to registration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("{what} must not be empty")]
    EmptyName { what: &'static str },

    #[error("group name '{name}' must be a single word")]
    InvalidGroupName { name: String },

    #[error("group alias '{alias}' already belongs to group '{existing}'")]
    GroupAliasConflict { alias: String, existing: String },

    #[error("{command}: locale alias '{name}' has no locale tag")]
    MissingLocaleTag { command: String, name: String },

    #[error("{command}: default for '{param}' is not a {expected}")]
    DefaultKindMismatch { command: String, param: String, expected: String },

    #[error("{command}: required parameter '{param}' follows an optional one")]
    RequiredAfterOptional { command: String, param: String },
}

/// Failure to load [`Options`](crate::Options).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
