/// Input validators
///
/// Email format checks for user records and the chirp body rules:
/// a length limit and a word-level profanity filter.

use regex::Regex;
use lazy_static::lazy_static;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
pub const MAX_CHIRP_LENGTH: usize = 140;
const CENSORED: &str = "****";

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    // Whole words only; punctuation attached to a word keeps it uncensored
    static ref PROFANITY_REGEX: Regex = Regex::new(r"(?i)^(kerfuffle|sharbert|fornax)$").unwrap();
}

/// Validate an email address
///
/// The address is kept exactly as given: lookups are case-sensitive.
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    Ok(email.to_string())
}

/// Validate a chirp body and return it with profanity censored
pub fn clean_chirp(body: &str) -> Result<String, ValidationError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("chirp".to_string(), MAX_CHIRP_LENGTH));
    }

    Ok(censor(body))
}

/// Replace each space-separated profane word with `****`
pub fn censor(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if PROFANITY_REGEX.is_match(word) {
                CENSORED
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
    fn test_valid_emails() {
        assert!(is_valid_email("a@example.com").is_ok());
        assert!(is_valid_email("walt+test@breakingbad.com").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["", "notanemail", "user@", "@example.com", "user@@example.com"] {
            assert!(is_valid_email(email).is_err(), "accepted {:?}", email);
        }
    }

    #[test]
    fn test_email_case_preserved() {
        assert_eq!(is_valid_email("Walt@Example.com").unwrap(), "Walt@Example.com");
    }

    #[test]
    fn test_censor_replaces_whole_words() {
        assert_eq!(
            censor("I had something interesting for breakfast"),
            "I had something interesting for breakfast"
        );
        assert_eq!(
            censor("I hear Mastodon is better than Chirpy. sharbert I need to migrate"),
            "I hear Mastodon is better than Chirpy. **** I need to migrate"
        );
        assert_eq!(censor("Kerfuffle FORNAX"), "**** ****");
        assert_eq!(censor("Sharbert!"), "Sharbert!");
    }

    #[test]
    fn test_chirp_length_limit() {
        let exact = "a".repeat(MAX_CHIRP_LENGTH);
        assert!(clean_chirp(&exact).is_ok());

        let too_long = "a".repeat(MAX_CHIRP_LENGTH + 1);
        assert!(matches!(
            clean_chirp(&too_long),
            Err(ValidationError::TooLong(_, MAX_CHIRP_LENGTH))
        ));
    }
}
