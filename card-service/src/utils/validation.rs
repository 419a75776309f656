use once_cell::sync::Lazy;
use regex::Regex;

/// Longest address accepted, in characters.
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_LOCAL_PART_LENGTH: usize = 64;
const MAX_DOMAIN_LABEL_LENGTH: usize = 63;

/// Local part: atext characters with single dots between them. Domain:
/// alphanumeric labels separated by dots, ending in an alphabetic TLD.
/// Kept identical to `static/js/validate.js`.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[\-!#$%\&'*+/0-9=?A-Z^_a-z{|}\~](\.?[\-!#$%\&'*+/0-9=?A-Z^_a-z`{|}\~])*@[a-zA-Z0-9](-*\.?[a-zA-Z0-9])*\.[a-zA-Z](-?[a-zA-Z0-9])+$",
    )
    .expect("email pattern is a valid regex")
});

/// Check an address for syntax and length limits.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().count() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(email) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.len() > MAX_LOCAL_PART_LENGTH {
        return false;
    }

    !domain
        .split('.')
        .any(|label| label.len() > MAX_DOMAIN_LABEL_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("jane.doe@example.com"));
        assert!(is_valid_email("first+tag@mail.example-host.org"));
        assert!(is_valid_email("o'brien@example.ie"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("jane..doe@example.com"));
        assert!(!is_valid_email(".jane@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane@example.c"));
        assert!(!is_valid_email("jane@example.1com"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email("jane@@example.com"));
    }

    #[test]
    fn rejects_overlong_address() {
        let email = format!("{}@b.co", "x".repeat(255));
        assert!(!is_valid_email(&email));
    }

    #[test]
    fn enforces_total_length_limit() {
        // Local part and every label are within their own limits; only the
        // overall length differs.
        let address = |last_label: usize| {
            format!(
                "{}@{}.{}.{}.co",
                "a".repeat(64),
                "b".repeat(63),
                "c".repeat(63),
                "d".repeat(last_label)
            )
        };

        let at_limit = address(58);
        let over_limit = address(59);
        assert_eq!(at_limit.len(), 254);
        assert_eq!(over_limit.len(), 255);
        assert!(is_valid_email(&at_limit));
        assert!(!is_valid_email(&over_limit));
    }

    #[test]
    fn enforces_local_part_limit() {
        let at_limit = format!("{}@b.co", "a".repeat(64));
        let over_limit = format!("{}@b.co", "a".repeat(65));
        assert!(is_valid_email(&at_limit));
        assert!(!is_valid_email(&over_limit));
    }

    #[test]
    fn enforces_domain_label_limit() {
        let at_limit = format!("a@{}.co", "b".repeat(63));
        let over_limit = format!("a@{}.co", "b".repeat(64));
        assert!(is_valid_email(&at_limit));
        assert!(!is_valid_email(&over_limit));
    }
}
