use regex::Regex;

/// Basic RFC-ish check, enough to keep obvious garbage out of the accounts
/// table. Mail delivery is the real validator.
pub fn is_valid_email(email: &str) -> bool {
    let email_regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"
    ).unwrap();

    email_regex.is_match(email) && email.len() <= 254
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("ana+clinic@example.com.br"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("ana@localhost"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }
}
