//! Tagged outcome of a remote (request/response) operation.

/// Outcome of a call to the platform's REST API.
///
/// Repositories never let a transport or HTTP error escape any other way:
/// every failure is folded into [`RemoteResult::Error`] with a human-readable
/// message. `Loading` exists so presentation state can hold an in-flight
/// value of the same type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteResult<T> {
    Success(T),
    Error(String),
    Loading,
}

impl<T> RemoteResult<T> {
    /// Creates an error result.
    pub fn error(message: impl Into<String>) -> Self {
        RemoteResult::Error(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RemoteResult::Success(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RemoteResult::Loading)
    }

    /// Transforms the success value, leaving `Error` and `Loading` untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteResult<U> {
        match self {
            RemoteResult::Success(value) => RemoteResult::Success(f(value)),
            RemoteResult::Error(message) => RemoteResult::Error(message),
            RemoteResult::Loading => RemoteResult::Loading,
        }
    }

    /// Returns the success value, if any.
    pub fn success(self) -> Option<T> {
        match self {
            RemoteResult::Success(value) => Some(value),
            RemoteResult::Error(_) | RemoteResult::Loading => None,
        }
    }

    /// Returns the error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            RemoteResult::Error(message) => Some(message),
            RemoteResult::Success(_) | RemoteResult::Loading => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_transforms_success_only() {
        let ok: RemoteResult<u32> = RemoteResult::Success(2);
        assert_eq!(ok.map(|v| v * 10), RemoteResult::Success(20));

        let err: RemoteResult<u32> = RemoteResult::error("boom");
        assert_eq!(err.map(|v| v * 10), RemoteResult::Error("boom".to_string()));

        let loading: RemoteResult<u32> = RemoteResult::Loading;
        assert!(loading.map(|v| v * 10).is_loading());
    }

    #[test]
    fn accessors_report_variant() {
        let ok: RemoteResult<&str> = RemoteResult::Success("x");
        assert!(ok.is_success());
        assert_eq!(ok.error_message(), None);
        assert_eq!(ok.success(), Some("x"));

        let err: RemoteResult<&str> = RemoteResult::error("Error 500: oops");
        assert!(!err.is_success());
        assert_eq!(err.error_message(), Some("Error 500: oops"));
        assert_eq!(err.success(), None);
    }
}
