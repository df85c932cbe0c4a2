//! Constants shared by the field modules.

/// Key under which the username is registered when the caller does not pick one.
pub const USERNAME_FIELD_KEY: &str = "username";

/// Characters accepted in a username when the connection enforces a policy.
pub const USERNAME_ALLOWED_CHARS: &str = r"^[a-zA-Z0-9_+\-.]*$";
