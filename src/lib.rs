//! Username field of a login/signup form.
//!
//! Decides whether a user-entered username (or email used as username) is
//! acceptable, how it is stored, and registers it into a field container
//! together with a validator that can be re-run on every keystroke.

pub mod connection;
pub mod consts;
pub mod field;

pub use connection::{get_username_validation, ConfigError, Connection, UsernamePolicy};
pub use field::email::{looks_like_email, EmailValidator, Html5EmailValidator};
pub use field::username::{
    resolve_style, set_username, validate_username, UsernameField, UsernameStyle,
};
pub use field::{FieldRegistry, FieldState, FieldStore, Validator};
