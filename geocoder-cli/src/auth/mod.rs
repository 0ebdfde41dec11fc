//! Access gate in front of file upload and processing
//!
//! The only implementation is a shared-secret string comparison. It is a
//! coarse gate for an internal tool, not authentication: the secret is held
//! and compared in plain text, there is no lockout and no per-user identity.

/// Decides whether an access attempt may open a session
pub trait AccessGate {
    fn check(&self, attempt: &str) -> bool;
}

/// Exact, case-sensitive comparison against a configured secret
#[derive(Debug, Clone)]
pub struct SharedSecretGate {
    secret: String,
}

impl SharedSecretGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl AccessGate for SharedSecretGate {
    fn check(&self, attempt: &str) -> bool {
        attempt == self.secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_secret_passes() {
        let gate = SharedSecretGate::new("default_secret_2024");
        assert!(gate.check("default_secret_2024"));
    }

    #[test]
    fn test_everything_else_fails() {
        let gate = SharedSecretGate::new("default_secret_2024");

        for attempt in [
            "",
            "default_secret_202",
            "default_secret_20245",
            "DEFAULT_SECRET_2024",
            " default_secret_2024",
            "default_secret_2024\n",
        ] {
            assert!(!gate.check(attempt), "accepted {:?}", attempt);
        }
    }
}
