// File: src/validators.rs
// Purpose: Format validators backing the schema rules

use once_cell::sync::Lazy;
use regex::Regex;

// Email validation regex
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

// URL validation regex
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap()
});

// Phone validation regex: optional +, then digits with common separators
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9][0-9 \-().]{5,19}$").unwrap()
});

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate URL format
pub fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

/// Validate an IPv4 or IPv6 address
pub fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<std::net::IpAddr>().is_ok()
}

/// Validate phone number format
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Validate a calendar date in `YYYY-MM-DD` form
///
/// Goes through chrono rather than a shape-only regex, so 2024-02-30
/// is rejected.
pub fn is_valid_date(date: &str) -> bool {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

/// Validate UUID format (any version, hyphenated form)
pub fn is_valid_uuid(value: &str) -> bool {
    uuid::Uuid::parse_str(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a@b.com", true)]
    #[case("first.last+tag@example.co.uk", true)]
    #[case("not-an-email", false)]
    #[case("missing@tld", false)]
    #[case("@example.com", false)]
    fn test_email_validation(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_email(input), expected, "email {input}");
    }

    #[rstest]
    #[case("https://example.com", true)]
    #[case("http://example.com/path?q=1", true)]
    #[case("ftp://example.com", false)]
    #[case("example.com", false)]
    fn test_url_validation(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_url(input), expected, "url {input}");
    }

    #[rstest]
    #[case("127.0.0.1", true)]
    #[case("::1", true)]
    #[case("999.0.0.1", false)]
    #[case("localhost", false)]
    fn test_ip_validation(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_ip(input), expected, "ip {input}");
    }

    #[rstest]
    #[case("+1 555-123-4567", true)]
    #[case("0123456789", true)]
    #[case("call me", false)]
    #[case("+", false)]
    fn test_phone_validation(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_phone(input), expected, "phone {input}");
    }

    #[rstest]
    #[case("2024-02-29", true)]
    #[case("2023-02-29", false)] // not a leap year
    #[case("2024-13-01", false)]
    #[case("01/02/2024", false)]
    fn test_date_validation(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_date(input), expected, "date {input}");
    }

    #[rstest]
    #[case("550e8400-e29b-41d4-a716-446655440000", true)]
    #[case("550e8400", false)]
    #[case("zzze8400-e29b-41d4-a716-446655440000", false)]
    fn test_uuid_validation(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_uuid(input), expected, "uuid {input}");
    }
}
