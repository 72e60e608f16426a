//! Email address validation.

use validator::ValidateEmail;

/// Whether `candidate` looks like a deliverable email address.
///
/// Delegates the format check to `validator` and additionally requires a dot in
/// the domain part, so `user@localhost` style addresses are rejected.
pub fn is_valid_email(candidate: &str) -> bool {
    let candidate = candidate.trim().to_string();
    if !candidate.validate_email() {
        return false;
    }
    match candidate.rsplit_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        for email in [
            "a@b.com",
            "billing@example.co.in",
            "first.last+invoices@mail.example.org",
            "  padded@example.com  ",
        ] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "",
            "foo",
            "foo@",
            "@example.com",
            "foo@localhost",
            "foo bar@example.com",
            "foo@example.",
        ] {
            assert!(!is_valid_email(email), "{email:?} should be invalid");
        }
    }
}
