use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure to generate one artifact.
///
/// Carries its own message and, when it wraps another failure, the original
/// cause.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct GenerateError {
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl GenerateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn wrap(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// The original failure when one is wrapped, otherwise this error.
    pub fn effective(&self) -> &(dyn StdError + 'static) {
        if let Some(cause) = &self.cause {
            return &**cause;
        }
        self
    }

    /// Unwrap to the original failure, or box this error when nothing is wrapped.
    pub fn into_cause(self) -> BoxError {
        match self.cause {
            Some(cause) => cause,
            None => Box::new(self),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = StdError::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Failure to produce or store one artifact file.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IntrospectError;

    #[test]
    fn test_effective_returns_cause() {
        let err = GenerateError::wrap(
            "Failed to read columns of ORDERS",
            IntrospectError::UnknownTable("ORDERS".into()),
        );
        assert_eq!(err.to_string(), "Failed to read columns of ORDERS");
        assert_eq!(err.effective().to_string(), "Unknown table: ORDERS");
        assert!(err.cause().is_some());

        let original = err.into_cause();
        assert!(original.downcast_ref::<IntrospectError>().is_some());
    }

    #[test]
    fn test_effective_without_cause_is_self() {
        let err = GenerateError::new("no type");
        assert_eq!(err.effective().to_string(), "no type");
        assert!(err.cause().is_none());
        assert!(err.into_cause().downcast_ref::<GenerateError>().is_some());
    }

    #[test]
    fn test_format_detailed() {
        let err = GenerateError::wrap("outer", IntrospectError::Source("db down".into()));
        assert_eq!(
            err.format_detailed(),
            "Error: outer\n\nCaused by:\n  1: Schema source error: db down"
        );
    }
}
