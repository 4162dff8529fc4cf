use std::sync::Arc;

use lms_cache::KvStore;
use lms_core::error::CoreError;
use rand::Rng;

use super::password::{hash_password, verify_password};

/// One-time codes expire after five minutes.
pub const OTP_TTL_SECS: u64 = 300;

fn otp_key(email: &str) -> String {
    format!("otp:{}", email.to_lowercase())
}

fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}

/// Issues and verifies one-time email verification codes.
///
/// Codes are stored hashed in the key-value store so a leaked cache dump
/// cannot be replayed. Expiry is enforced by the store's TTL.
pub struct OtpService {
    store: Arc<dyn KvStore>,
}

impl OtpService {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Generate a fresh code for this email and store its hash, overwriting
    /// any prior pending code. Returns the plaintext code for delivery.
    pub async fn issue(&self, email: &str) -> Result<String, CoreError> {
        let code = generate_code();
        let hash = hash_password(&code)?;
        self.store
            .set_ex(&otp_key(email), &hash, OTP_TTL_SECS)
            .await
            .map_err(|e| CoreError::External(format!("otp store: {e}")))?;
        Ok(code)
    }

    /// Issue a new code unless a pending one still has time left, in which
    /// case the caller is told how long to wait.
    pub async fn resend(&self, email: &str) -> Result<String, CoreError> {
        let key = otp_key(email);
        let remaining = self
            .store
            .ttl(&key)
            .await
            .map_err(|e| CoreError::External(format!("otp store: {e}")))?;
        if let Some(secs) = remaining {
            if secs > 0 {
                return Err(CoreError::Conflict(format!(
                    "A verification code was already sent. Try again in {secs} seconds"
                )));
            }
        }
        self.issue(email).await
    }

    /// Check a submitted code against the pending record. Success consumes
    /// the record so each code can be used at most once.
    pub async fn verify(&self, email: &str, code: &str) -> Result<(), CoreError> {
        let key = otp_key(email);
        let stored = self
            .store
            .get(&key)
            .await
            .map_err(|e| CoreError::External(format!("otp store: {e}")))?;
        let hash = stored.ok_or_else(|| {
            CoreError::NotFoundMsg("No pending verification code for this email".into())
        })?;

        if !verify_password(code, &hash)? {
            return Err(CoreError::Unauthorized("Invalid verification code".into()));
        }

        self.store
            .del(&key)
            .await
            .map_err(|e| CoreError::External(format!("otp store: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_cache::memory::MemoryKv;

    fn service() -> OtpService {
        OtpService::new(Arc::new(MemoryKv::new()))
    }

    #[tokio::test]
    async fn issue_then_verify_consumes_the_code() {
        let otp = service();
        let code = otp.issue("user@example.com").await.unwrap();
        assert_eq!(code.len(), 6);
        otp.verify("user@example.com", &code).await.unwrap();

        // consumed, second attempt finds nothing
        let err = otp.verify("user@example.com", &code).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFoundMsg(_)));
    }

    #[tokio::test]
    async fn wrong_code_is_unauthorized_and_not_consumed() {
        let otp = service();
        let code = otp.issue("user@example.com").await.unwrap();

        let wrong = if code == "100000" { "100001" } else { "100000" };
        let err = otp.verify("user@example.com", wrong).await.unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized(_)));

        // the real code still works
        otp.verify("user@example.com", &code).await.unwrap();
    }

    #[tokio::test]
    async fn verify_without_pending_code_is_not_found() {
        let otp = service();
        let err = otp.verify("nobody@example.com", "123456").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFoundMsg(_)));
    }

    #[tokio::test]
    async fn resend_conflicts_while_pending() {
        let otp = service();
        otp.issue("user@example.com").await.unwrap();
        let err = otp.resend("user@example.com").await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn resend_without_pending_code_issues_one() {
        let otp = service();
        let code = otp.resend("fresh@example.com").await.unwrap();
        otp.verify("fresh@example.com", &code).await.unwrap();
    }

    #[tokio::test]
    async fn issue_overwrites_prior_code() {
        let otp = service();
        let first = otp.issue("user@example.com").await.unwrap();
        let second = otp.issue("user@example.com").await.unwrap();

        if first != second {
            let err = otp.verify("user@example.com", &first).await.unwrap_err();
            assert!(matches!(err, CoreError::Unauthorized(_)));
        }
        otp.verify("user@example.com", &second).await.unwrap();
    }

    #[tokio::test]
    async fn codes_are_case_insensitive_on_email() {
        let otp = service();
        let code = otp.issue("User@Example.com").await.unwrap();
        otp.verify("user@example.com", &code).await.unwrap();
    }
}
