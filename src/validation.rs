//! Input checks run before any file, process or network access

use crate::error::{KeyManagerError, Result};

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 64;
/// Maximum host alias length
pub const MAX_ALIAS_LEN: usize = 128;

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
}

fn is_well_formed(value: &str, max_len: usize) -> bool {
    !value.is_empty() && value.len() <= max_len && value.chars().all(is_allowed_char)
}

/// Check an identity label: 1-64 chars of letters, digits, '.', '-', '_'
pub fn validate_label(label: &str) -> Result<()> {
    if !is_well_formed(label, MAX_LABEL_LEN) {
        return Err(KeyManagerError::Validation(format!(
            "Метка должна содержать 1-{} символов: буквы, цифры, '.', '-', '_'",
            MAX_LABEL_LEN
        )));
    }
    Ok(())
}

/// Check a host alias: 1-128 chars of the label set, and not `provider_host`
/// itself in any letter case
pub fn validate_host_alias(alias: &str, provider_host: &str) -> Result<()> {
    if !is_well_formed(alias, MAX_ALIAS_LEN) {
        return Err(KeyManagerError::Validation(format!(
            "Псевдоним хоста должен содержать 1-{} символов: буквы, цифры, '.', '-', '_'",
            MAX_ALIAS_LEN
        )));
    }
    if alias.eq_ignore_ascii_case(provider_host) {
        return Err(KeyManagerError::Validation(format!(
            "Псевдоним хоста не может быть {}",
            provider_host
        )));
    }
    Ok(())
}

/// Check that a token was actually entered
pub fn require_token(token: &str) -> Result<()> {
    if token.trim().is_empty() {
        return Err(KeyManagerError::Validation(
            "Требуется персональный токен доступа GitHub".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_labels() {
        let longest = "x".repeat(64);
        for label in ["work", "personal", "a", "Team_1.backup-2", longest.as_str()] {
            assert!(validate_label(label).is_ok(), "{label} should be valid");
        }
    }

    #[test]
    fn test_invalid_labels() {
        let too_long = "x".repeat(65);
        for label in ["", too_long.as_str(), "a/b", "my key", "me@work", "tab\there", "ключ"] {
            assert!(
                matches!(validate_label(label), Err(KeyManagerError::Validation(_))),
                "{label:?} should be rejected"
            );
        }
    }

    const HOST: &str = "github.com";

    #[test]
    fn test_host_alias_rejects_provider_host_any_case() {
        assert!(validate_host_alias("github.com", HOST).is_err());
        assert!(validate_host_alias("GitHub.COM", HOST).is_err());
        assert!(validate_host_alias("github-work", HOST).is_ok());
        assert!(validate_host_alias("work.github.com", HOST).is_ok());
    }

    #[test]
    fn test_host_alias_compared_with_given_host() {
        assert!(validate_host_alias("GitLab.COM", "gitlab.com").is_err());
        assert!(validate_host_alias("github.com", "gitlab.com").is_ok());
    }

    #[test]
    fn test_host_alias_length() {
        assert!(validate_host_alias(&"h".repeat(128), HOST).is_ok());
        assert!(validate_host_alias(&"h".repeat(129), HOST).is_err());
        assert!(validate_host_alias("", HOST).is_err());
    }

    #[test]
    fn test_require_token() {
        assert!(require_token("ghp_abc").is_ok());
        assert!(require_token("").is_err());
        assert!(require_token("   ").is_err());
    }
}
