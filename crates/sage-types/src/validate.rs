//! Field-length rules for incoming requests. Lengths are counted in
//! characters, not bytes; the 72-byte password ceiling is enforced again at
//! hashing time.

use crate::api::{ChatRequest, FieldError, RegisterRequest};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const EMAIL_MIN: usize = 5;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 72;
pub const MESSAGE_MIN: usize = 1;
pub const MESSAGE_MAX: usize = 2000;

pub trait Validate {
    /// Returns every violated rule; an empty vec means the request is valid.
    fn validate(&self) -> Vec<FieldError>;
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_len(&mut errors, "username", &self.username, USERNAME_MIN, Some(USERNAME_MAX));
        check_len(&mut errors, "email", &self.email, EMAIL_MIN, None);
        check_len(&mut errors, "password", &self.password, PASSWORD_MIN, Some(PASSWORD_MAX));
        errors
    }
}

impl Validate for ChatRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_len(&mut errors, "message", &self.message, MESSAGE_MIN, Some(MESSAGE_MAX));
        errors
    }
}

fn check_len(errors: &mut Vec<FieldError>, field: &str, value: &str, min: usize, max: Option<usize>) {
    let len = value.chars().count();
    if len < min {
        errors.push(FieldError::new(
            field,
            format!("must be at least {} characters", min),
        ));
    } else if let Some(max) = max.filter(|&max| len > max) {
        errors.push(FieldError::new(
            field,
            format!("must be at most {} characters", max),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn valid_registration_has_no_errors() {
        assert!(register("alice", "a@b.io", "secret1").validate().is_empty());
    }

    #[test]
    fn reports_every_bad_field() {
        let errors = register("al", "a@b", "short").validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["username", "email", "password"]);
    }

    #[test]
    fn password_limit_counts_characters() {
        // 72 two-byte characters pass the schema but not the byte ceiling
        let password = "é".repeat(72);
        assert!(register("alice", "a@b.io", &password).validate().is_empty());
        let password = "x".repeat(73);
        assert_eq!(register("alice", "a@b.io", &password).validate().len(), 1);
    }

    #[test]
    fn chat_message_bounds() {
        let empty = ChatRequest { message: String::new() };
        assert_eq!(empty.validate()[0].field, "message");

        let long = ChatRequest { message: "a".repeat(MESSAGE_MAX + 1) };
        assert_eq!(long.validate().len(), 1);

        let ok = ChatRequest { message: "a".repeat(MESSAGE_MAX) };
        assert!(ok.validate().is_empty());
    }
}
