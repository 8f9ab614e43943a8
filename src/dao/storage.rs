use std::error::Error;
use thiserror::Error;

/// Result alias for card store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a card store backend, tagged with the backend and, when the
/// failing command targeted one, the key involved.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{backend} store unavailable{}", on_key(.key))]
    Unavailable {
        backend: &'static str,
        key: Option<String>,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

fn on_key(key: &Option<String>) -> String {
    key.as_deref()
        .map(|key| format!(" (key `{key}`)"))
        .unwrap_or_default()
}

impl StorageError {
    /// Wrap a backend failure.
    pub fn unavailable(
        backend: &'static str,
        key: Option<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        StorageError::Unavailable {
            backend,
            key,
            source: Box::new(source),
        }
    }

    /// Key the failing command targeted, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            StorageError::Unavailable { key, .. } => key.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn message_names_backend_and_key() {
        let err = StorageError::unavailable(
            "redis",
            Some("score:alice".into()),
            io::Error::new(io::ErrorKind::ConnectionReset, "reset"),
        );
        assert_eq!(err.to_string(), "redis store unavailable (key `score:alice`)");
        assert_eq!(err.key(), Some("score:alice"));
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("reset")
        );
    }

    #[test]
    fn keyless_failures_omit_the_key() {
        let err = StorageError::unavailable(
            "memory",
            None,
            io::Error::new(io::ErrorKind::Other, "offline"),
        );
        assert_eq!(err.to_string(), "memory store unavailable");
        assert_eq!(err.key(), None);
    }
}
