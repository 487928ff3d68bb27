//! Access gate for the reporting console.
//!
//! The console is restricted to one administrator account. The gate runs
//! once at startup, before any report is loaded.

use crate::backend::Backend;
use crate::error::{ConsoleError, Result};
use crate::types::UserProfile;
use tracing::{info, warn};

/// The only account allowed to use the console.
pub const AUTHORIZED_EMAIL: &str = "tom@tmmit.com";

/// Check the calling identity against the authorized account.
///
/// Returns the profile on success. An identity-service failure maps to
/// [`ConsoleError::Auth`]; a well-formed identity with any other email maps
/// to [`ConsoleError::AccessDenied`].
pub fn authorize(backend: &dyn Backend) -> Result<UserProfile> {
    let profile = backend
        .current_user()
        .map_err(|e| ConsoleError::Auth(e.to_string()))?;

    if profile.email != AUTHORIZED_EMAIL {
        warn!("Rejected identity {}", profile.email);
        return Err(ConsoleError::AccessDenied {
            email: profile.email,
        });
    }

    info!("Access granted to {}", profile.email);
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComparisonOutcome, ComparisonRequest, InventoryReport};
    use anyhow::anyhow;
    use serde_json::Value;

    struct IdentityBackend {
        email: Option<&'static str>,
    }

    impl Backend for IdentityBackend {
        fn current_user(&self) -> anyhow::Result<UserProfile> {
            match self.email {
                Some(email) => Ok(UserProfile {
                    email: email.to_string(),
                    full_name: None,
                }),
                None => Err(anyhow!("identity service unavailable")),
            }
        }

        fn fetch_inventory_report(&self) -> anyhow::Result<InventoryReport> {
            Err(anyhow!("not implemented"))
        }

        fn fetch_entity_schema(&self, _entity: &str) -> anyhow::Result<Value> {
            Err(anyhow!("not implemented"))
        }

        fn fetch_sample_records(
            &self,
            _entity: &str,
            _limit: Option<usize>,
        ) -> anyhow::Result<Value> {
            Err(anyhow!("not implemented"))
        }

        fn run_comparison(&self, _request: &ComparisonRequest) -> anyhow::Result<ComparisonOutcome> {
            Err(anyhow!("not implemented"))
        }

        fn name(&self) -> &str {
            "identity-only"
        }
    }

    #[test]
    fn test_authorized_email_passes() {
        let backend = IdentityBackend {
            email: Some("tom@tmmit.com"),
        };
        let profile = authorize(&backend).unwrap();
        assert_eq!(profile.email, AUTHORIZED_EMAIL);
    }

    #[test]
    fn test_other_email_denied() {
        let backend = IdentityBackend {
            email: Some("mallory@tmmit.com"),
        };
        let error = authorize(&backend).unwrap_err();
        assert_eq!(error.error_code(), "ACCESS_DENIED");
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_email_comparison_is_exact() {
        let backend = IdentityBackend {
            email: Some("Tom@Tmmit.com"),
        };
        assert!(authorize(&backend).is_err());
    }

    #[test]
    fn test_identity_failure_is_auth_error() {
        let backend = IdentityBackend { email: None };
        let error = authorize(&backend).unwrap_err();
        assert_eq!(error.error_code(), "AUTH_ERROR");
        assert!(error.is_recoverable());
    }
}
