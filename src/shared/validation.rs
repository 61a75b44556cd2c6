//! Validation Utilities
//!
//! Username/room-name rules and message sanitization. The registries are the
//! authoritative validators; inbound payload structs carry `validator`
//! derive length checks on top, converted through [`validation_error`].

use validator::ValidationErrors;

use super::error::AppError;

/// Maximum username length in characters
pub const MAX_USERNAME_LENGTH: usize = 20;

/// Maximum room name length in characters
pub const MAX_ROOM_NAME_LENGTH: usize = 30;

fn is_handle_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Validate a username: 1-20 characters from `[A-Za-z0-9_-]`.
pub fn validate_username(username: &str) -> Result<(), AppError> {
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Username must be 1-{} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    if !username.chars().all(is_handle_char) {
        return Err(AppError::Validation(
            "Username may only contain letters, digits, '_' and '-'".into(),
        ));
    }
    Ok(())
}

/// Validate a room name: 1-30 characters from `[A-Za-z0-9_-]`.
pub fn validate_room_name(room: &str) -> Result<(), AppError> {
    if room.is_empty() || room.chars().count() > MAX_ROOM_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Room name must be 1-{} characters",
            MAX_ROOM_NAME_LENGTH
        )));
    }
    if !room.chars().all(is_handle_char) {
        return Err(AppError::Validation(
            "Room name may only contain letters, digits, '_' and '-'".into(),
        ));
    }
    Ok(())
}

/// Sanitize message content: trim surrounding whitespace and truncate to
/// `max_length` characters. Empty-after-trim content is rejected.
pub fn sanitize_message(content: &str, max_length: usize) -> Result<String, AppError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Message content is empty".into()));
    }
    Ok(trimmed.chars().take(max_length).collect())
}

/// Convert validator derive errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let detail = e
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, detail)
            })
        })
        .next()
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("alice"; "plain")]
    #[test_case("Alice_99"; "mixed case digits underscore")]
    #[test_case("a-b-c"; "dashes")]
    #[test_case("x"; "single char")]
    fn test_valid_usernames(name: &str) {
        assert!(validate_username(name).is_ok());
    }

    #[test_case(""; "empty")]
    #[test_case("ab cd"; "contains space")]
    #[test_case("al!ce"; "punctuation")]
    #[test_case("abcdefghijklmnopqrstu"; "21 chars")]
    #[test_case("naïve"; "non ascii")]
    fn test_invalid_usernames(name: &str) {
        assert!(matches!(
            validate_username(name),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_room_name_length_limit_is_30() {
        let ok = "r".repeat(30);
        let too_long = "r".repeat(31);
        assert!(validate_room_name(&ok).is_ok());
        assert!(validate_room_name(&too_long).is_err());
    }

    #[test]
    fn test_sanitize_trims_and_truncates() {
        let sanitized = sanitize_message("  hello world  ", 5).unwrap();
        assert_eq!(sanitized, "hello");
    }

    #[test]
    fn test_sanitize_rejects_whitespace_only() {
        assert!(matches!(
            sanitize_message("   \t\n ", 500),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_underscore_and_dash_are_allowed() {
        assert!(validate_room_name("general_chat-2").is_ok());
    }
}
