use crate::domain::error::DomainError;
use crate::domain::ports::EmailValidator;
use anyhow::Result;
use tracing::trace;
use validator::ValidateEmail;

/// Syntax-only check delegated to the `validator` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorEmailValidator;

impl EmailValidator for ValidatorEmailValidator {
    fn is_valid(&self, email: &str) -> Result<bool> {
        if email.is_empty() {
            return Err(DomainError::missing_param("email").into());
        }
        let valid = email.validate_email();
        trace!(valid, "Email syntax checked");
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_email() {
        assert!(ValidatorEmailValidator.is_valid("valid_email@email.com").unwrap());
    }

    #[test]
    fn test_rejects_malformed_emails() {
        for email in ["invalid_email", "missing-domain@", "@missing-local.com", "a b@c.com"] {
            assert!(
                !ValidatorEmailValidator.is_valid(email).unwrap(),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_requires_email() {
        let err = ValidatorEmailValidator.is_valid("").unwrap_err();
        assert_eq!(
            err.downcast_ref::<DomainError>(),
            Some(&DomainError::missing_param("email"))
        );
    }
}
