use rand::{Rng, distr::Alphanumeric};

use crate::util::constant_time_eq;

const TOKEN_LENGTH: usize = 32;

/// Shared-password gate for the admin panel.
///
/// A single random bearer token is minted at startup and handed out on every
/// successful login; it stays valid until the process restarts.
pub struct AdminGate {
    password: String,
    token: String,
}

impl AdminGate {
    /// Gate for `password` with a freshly minted token.
    pub fn new(password: impl Into<String>) -> Self {
        let token = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self {
            password: password.into(),
            token,
        }
    }

    /// Return the bearer token when `password` matches.
    pub fn login(&self, password: &str) -> Option<&str> {
        constant_time_eq(password.as_bytes(), self.password.as_bytes())
            .then_some(self.token.as_str())
    }

    /// Whether `token` is the issued bearer token.
    pub fn check(&self, token: &str) -> bool {
        constant_time_eq(token.as_bytes(), self.token.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_hands_out_a_token_that_checks() {
        let gate = AdminGate::new("s3cret");
        let token = gate.login("s3cret").unwrap().to_string();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(gate.check(&token));
        assert!(!gate.check("admin-token"));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let gate = AdminGate::new("s3cret");
        assert!(gate.login("S3cret").is_none());
        assert!(gate.login("").is_none());
    }

    #[test]
    fn tokens_differ_between_gates() {
        assert!(!AdminGate::new("x").check(&AdminGate::new("x").token));
    }
}
