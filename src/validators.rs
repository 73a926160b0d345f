/// Input validators for account and chirp payloads
/// Features:
/// 1. Email validation: format and length limits
/// 2. Chirp validation: length limit and profanity masking

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 3;
pub const MAX_CHIRP_LENGTH: usize = 140;

const PROFANE_WORDS: &[&str] = &["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("email regex is valid");
}

/// Validates an email address and returns it trimmed.
///
/// Case is preserved: emails are unique as stored.
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if trimmed.len() < MIN_EMAIL_LENGTH || !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    Ok(trimmed.to_string())
}

/// Validates a chirp body and returns the cleaned text to store.
///
/// Bodies longer than 140 characters are rejected. Words are split on single
/// spaces; any word matching a profane word case-insensitively becomes `****`.
/// Punctuation attached to a word prevents the match (`Sharbert!` is kept).
pub fn validate_chirp_body(body: &str) -> Result<String, ValidationError> {
    if body.trim().is_empty() {
        return Err(ValidationError::EmptyField("body".to_string()));
    }

    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("Chirp".to_string(), MAX_CHIRP_LENGTH));
    }

    Ok(mask_profanity(body))
}

fn mask_profanity(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com").is_ok());
        assert!(is_valid_email("a@x.com").is_ok());
        assert!(is_valid_email("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_is_trimmed_but_case_is_kept() {
        assert_eq!(is_valid_email("  Walt@Breaking.bad ").unwrap(), "Walt@Breaking.bad");
    }

    #[test]
    fn test_invalid_email_format() {
        assert!(is_valid_email("").is_err());
        assert!(is_valid_email("invalid").is_err());
        assert!(is_valid_email("user@").is_err());
        assert!(is_valid_email("@example.com").is_err());
        assert!(is_valid_email("user@@example.com").is_err());
    }

    #[test]
    fn test_email_length_limit() {
        let too_long = format!("{}@example.com", "a".repeat(250));
        assert!(is_valid_email(&too_long).is_err());
    }

    #[test]
    fn test_chirp_length_limit() {
        let exactly = "a".repeat(MAX_CHIRP_LENGTH);
        assert!(validate_chirp_body(&exactly).is_ok());

        let too_long = "a".repeat(MAX_CHIRP_LENGTH + 1);
        assert!(matches!(
            validate_chirp_body(&too_long),
            Err(ValidationError::TooLong(_, MAX_CHIRP_LENGTH))
        ));
    }

    #[test]
    fn test_chirp_length_counts_characters() {
        let multibyte = "é".repeat(MAX_CHIRP_LENGTH);
        assert!(validate_chirp_body(&multibyte).is_ok());
    }

    #[test]
    fn test_profanity_is_masked() {
        let cleaned = validate_chirp_body("This is a kerfuffle opinion I need to share with the world")
            .unwrap();
        assert_eq!(cleaned, "This is a **** opinion I need to share with the world");

        let cleaned = validate_chirp_body("I hear Mastodon is better than Chirpy. sharbert I need to migrate")
            .unwrap();
        assert_eq!(cleaned, "I hear Mastodon is better than Chirpy. **** I need to migrate");
    }

    #[test]
    fn test_profanity_match_is_case_insensitive_and_exact() {
        assert_eq!(validate_chirp_body("FORNAX Fornax").unwrap(), "**** ****");
        assert_eq!(validate_chirp_body("Sharbert!").unwrap(), "Sharbert!");
    }
}
