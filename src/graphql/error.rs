//! Mapping of store errors onto GraphQL errors

use async_graphql::ErrorExtensions;

use crate::Error;

/// Machine readable code placed in `extensions.code`
pub fn error_code(err: &Error) -> &'static str {
    match err {
        Error::NotFound { .. } => "NOT_FOUND",
        Error::AlreadyExists { .. } => "ALREADY_EXISTS",
        Error::InvalidInput(_) => "BAD_USER_INPUT",
        _ => "INTERNAL_SERVER_ERROR",
    }
}

impl ErrorExtensions for Error {
    /// User-facing errors keep their message. Backend faults are logged and
    /// replaced by a generic message so storage details never reach clients.
    fn extend(&self) -> async_graphql::Error {
        let code = error_code(self);
        let message = if self.is_user_facing() {
            self.to_string()
        } else {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        };

        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(error_code(&Error::not_found("Game", 1)), "NOT_FOUND");
        assert_eq!(
            error_code(&Error::AlreadyExists { entity: "Editor", name: "Sega".into() }),
            "ALREADY_EXISTS"
        );
        assert_eq!(error_code(&Error::InvalidInput("x".into())), "BAD_USER_INPUT");
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = Error::Storage(rusqlite::Error::InvalidQuery);
        assert_eq!(err.extend().message, "Internal server error");

        let err = Error::not_found("Studio", 3);
        assert_eq!(err.extend().message, "Studio not found: 3");
    }
}
