use std::fmt;

/// All errors produced by chime.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AlarmError {
    /// An alarm failed validation before being accepted by the store.
    Validation { field: String, message: String },

    /// No alarm with the given id exists in the store.
    NotFound { id: String },

    /// Loading or saving the store document failed.
    Store { message: String },

    /// Next-occurrence computation failed (date range overflow).
    Resolve { message: String },
}

impl fmt::Display for AlarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, message } => write!(f, "{field}: {message}"),
            Self::NotFound { id } => write!(f, "alarm '{id}' not found"),
            Self::Store { message } => write!(f, "{message}"),
            Self::Resolve { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for AlarmError {}

impl AlarmError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn resolve(message: impl Into<String>) -> Self {
        Self::Resolve {
            message: message.into(),
        }
    }

    /// Format an error for terminal output, naming the offending field or id.
    pub fn display_rich(&self) -> String {
        match self {
            Self::Validation { field, message } => format!("error: invalid {field}: {message}"),
            Self::NotFound { id } => format!("error: alarm '{id}' not found"),
            Self::Store { message } => format!("error: {message}"),
            Self::Resolve { message } => format!("error: {message}"),
        }
    }
}
