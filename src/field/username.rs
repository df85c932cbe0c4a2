//! Username field controller.
//!
//! Resolves the username style, decides how the raw value is stored and
//! builds the validator registered alongside it.
//!
//! - `email` style delegates to the email validator.
//! - `username` style checks length and allowed characters when the
//!   connection has a policy, and only non-emptiness otherwise.
//! - Without an explicit style the value itself decides: anything containing
//!   an `@` is handled as an email.

use std::sync::Arc;

use derive_more::Display;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use strum_macros::EnumString;

use crate::connection::{get_username_validation, Connection, UsernamePolicy};
use crate::consts::{USERNAME_ALLOWED_CHARS, USERNAME_FIELD_KEY};
use crate::field::email::{looks_like_email, looks_like_full_email, EmailValidator, Html5EmailValidator};
use crate::field::{FieldRegistry, Validator};

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(USERNAME_ALLOWED_CHARS).expect("Failed to compile username regex")
});

/// How the username field should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UsernameStyle {
    #[display("username")]
    Username,
    #[display("email")]
    Email,
}

impl UsernameStyle {
    /// Reads a style setting. Anything but `"username"` or `"email"` counts
    /// as no style at all.
    pub fn from_setting(setting: Option<&str>) -> Option<Self> {
        setting.and_then(|s| s.parse().ok())
    }
}

/// Picks the style used for `value`, inferring it when none is given.
pub fn resolve_style(style: Option<UsernameStyle>, value: &str) -> UsernameStyle {
    match style {
        Some(style) => style,
        None if looks_like_email(value) => UsernameStyle::Email,
        None => UsernameStyle::Username,
    }
}

/// Checks a candidate username.
///
/// With `validate_format` off every candidate passes. Without a policy the
/// candidate only has to be non-empty. With a policy its length in
/// characters must lie in `[min, max]` and it may only contain ASCII letters,
/// digits, `_`, `-`, `+` and `.`.
pub fn validate_username(candidate: &str, validate_format: bool, policy: Option<UsernamePolicy>) -> bool {
    if !validate_format {
        return true;
    }

    match policy {
        None => !candidate.is_empty(),
        Some(policy) => {
            policy.accepts_length(candidate.chars().count()) && USERNAME_REGEX.is_match(candidate)
        }
    }
}

/// Full emails are trimmed, everything else is kept as typed.
fn stored_value(value: &str) -> String {
    if looks_like_full_email(value) {
        value.trim().to_owned()
    } else {
        value.to_owned()
    }
}

/// Registers usernames into a [`FieldRegistry`].
#[derive(Debug, Clone)]
pub struct UsernameField<E = Html5EmailValidator> {
    key: String,
    email_validator: Arc<E>,
}

impl Default for UsernameField<Html5EmailValidator> {
    fn default() -> Self {
        Self::new(Html5EmailValidator)
    }
}

impl<E: EmailValidator + 'static> UsernameField<E> {
    pub fn new(email_validator: E) -> Self {
        Self {
            key: USERNAME_FIELD_KEY.to_owned(),
            email_validator: Arc::new(email_validator),
        }
    }

    /// Registers under `key` instead of `"username"`.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Builds the validator for `value`.
    ///
    /// `validate_format` defaults to `true`. The policy is only looked up when
    /// the username format is actually checked.
    pub fn validator(
        &self,
        connection: &Connection,
        value: &str,
        style: Option<UsernameStyle>,
        validate_format: Option<bool>,
    ) -> Validator {
        let style = resolve_style(style, value);
        let validate_format = validate_format.unwrap_or(true);
        debug!("Building {} validator for field {}", style, self.key);

        match style {
            UsernameStyle::Email => {
                let email_validator = Arc::clone(&self.email_validator);
                Arc::new(move |candidate: &str| email_validator.validate_email(candidate))
            }
            UsernameStyle::Username => {
                let policy = if validate_format {
                    get_username_validation(connection)
                } else {
                    None
                };
                match policy {
                    Some(policy) => debug!("Username policy {} in effect", policy),
                    None => trace!("No username policy in effect"),
                }
                Arc::new(move |candidate: &str| validate_username(candidate, validate_format, policy))
            }
        }
    }

    /// Normalizes `value` and registers it with its validator.
    ///
    /// Exactly one registration happens per call.
    pub fn set_username<R: FieldRegistry + ?Sized>(
        &self,
        registry: &mut R,
        connection: &Connection,
        value: &str,
        style: Option<UsernameStyle>,
        validate_format: Option<bool>,
    ) {
        let validator = self.validator(connection, value, style, validate_format);
        let stored = stored_value(value);
        if stored.len() != value.len() {
            trace!("Trimmed surrounding whitespace from field {}", self.key);
        }
        registry.set_field(connection, stored, &self.key, validator);
    }
}

/// Registers `value` under the `"username"` key with the HTML5 email check.
pub fn set_username<R: FieldRegistry + ?Sized>(
    registry: &mut R,
    connection: &Connection,
    value: &str,
    style: Option<UsernameStyle>,
    validate_format: Option<bool>,
) {
    UsernameField::<Html5EmailValidator>::default()
        .set_username(registry, connection, value, style, validate_format);
}
