//! Email heuristics used by the username field, and the seam to the real
//! email validation.

use validator::ValidateEmail;

/// Whether the value should be handled as an email: it contains an `@`.
pub fn looks_like_email(value: &str) -> bool {
    value.contains('@')
}

/// Stricter probe: an `@` followed somewhere later by a `.`.
pub fn looks_like_full_email(value: &str) -> bool {
    value
        .find('@')
        .is_some_and(|at| value[at + 1..].contains('.'))
}

/// Validates email addresses for the email style of the username field.
pub trait EmailValidator: Send + Sync {
    fn validate_email(&self, candidate: &str) -> bool;
}

impl<F> EmailValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn validate_email(&self, candidate: &str) -> bool {
        self(candidate)
    }
}

/// Checks candidates against the HTML5 email format, ignoring surrounding
/// whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5EmailValidator;

impl EmailValidator for Html5EmailValidator {
    fn validate_email(&self, candidate: &str) -> bool {
        let trimmed = candidate.trim();
        !trimmed.is_empty() && ValidateEmail::validate_email(&trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_email_checks_for_at() {
        assert!(looks_like_email("t@t.com"));
        assert!(looks_like_email("@"));
        assert!(looks_like_email("user@localhost"));
        assert!(!looks_like_email("tt.com"));
        assert!(!looks_like_email(""));
    }

    #[test]
    fn test_looks_like_full_email() {
        let full = vec!["t@t.com", " another@username.com ", "a@b.c", "a.b@c@d.e"];
        let partial = vec!["tt.com", "a.b@c", "user@", "", "@", "first.last@host"];

        for value in full {
            assert!(looks_like_full_email(value), "{} should look like a full email", value);
        }
        for value in partial {
            assert!(!looks_like_full_email(value), "{} should not look like a full email", value);
        }
    }

    #[test]
    fn test_html5_validator() {
        let validator = Html5EmailValidator;

        let valid_emails = vec!["user@example.com", "user+tag@example.com", "  user@example.com  "];
        let invalid_emails = vec!["", " ", "not-an-email", "@example.com", "user@", "user name@example.com"];

        for email in valid_emails {
            assert!(validator.validate_email(email), "Should accept valid email: {}", email);
        }
        for email in invalid_emails {
            assert!(!validator.validate_email(email), "Should reject invalid email: {}", email);
        }
    }

    #[test]
    fn test_closures_are_email_validators() {
        let only_example = |candidate: &str| candidate.ends_with("@example.com");

        assert!(only_example.validate_email("a@example.com"));
        assert!(!only_example.validate_email("a@other.com"));
    }
}
