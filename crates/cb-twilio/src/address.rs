//! Phone number, URL and resource id rules for outbound requests

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, TwilioError};

const WHATSAPP_PREFIX: &str = "whatsapp:";

static E164: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").expect("valid E.164 pattern"));

static RESOURCE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid resource id pattern"));

/// `+` followed by 2-15 digits, first digit non-zero
pub fn is_e164(number: &str) -> bool {
    E164.is_match(number)
}

/// Reject anything that is not an E.164 number
pub fn require_e164(field: &str, number: &str) -> Result<()> {
    if is_e164(number.trim()) {
        Ok(())
    } else {
        Err(TwilioError::Validation(format!(
            "{} must be an E.164 phone number (e.g. +14155550100), got '{}'",
            field, number
        )))
    }
}

/// Provider resource ids (call SIDs, message SIDs, call ids) are single
/// path segments of letters, digits, `_` and `-`
pub fn is_resource_id(id: &str) -> bool {
    RESOURCE_ID.is_match(id)
}

/// Reject ids that could change the provider path they are placed in
pub fn require_resource_id(field: &str, id: &str) -> Result<()> {
    if is_resource_id(id) {
        Ok(())
    } else {
        Err(TwilioError::Validation(format!(
            "{} must contain only letters, digits, '_' or '-'",
            field
        )))
    }
}

/// Prefix an address with `whatsapp:` unless it already carries it
pub fn normalize_whatsapp(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.starts_with(WHATSAPP_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", WHATSAPP_PREFIX, trimmed)
    }
}

/// Strip the `whatsapp:` prefix, if any
pub fn strip_whatsapp(address: &str) -> &str {
    let trimmed = address.trim();
    trimmed.strip_prefix(WHATSAPP_PREFIX).unwrap_or(trimmed)
}

/// Normalize a WhatsApp address and check the number behind it
pub fn require_whatsapp(field: &str, address: &str) -> Result<String> {
    require_e164(field, strip_whatsapp(address))?;
    Ok(normalize_whatsapp(address))
}

/// Optional URL fields must be absolute http(s) URLs
pub fn require_url(field: &str, url: Option<&str>) -> Result<()> {
    let Some(url) = url else {
        return Ok(());
    };

    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        _ => Err(TwilioError::Validation(format!(
            "{} must be an absolute http(s) URL",
            field
        ))),
    }
}

/// Reject blank required text fields
pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(TwilioError::Validation(format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_e164() {
        assert!(is_e164("+14155550100"));
        assert!(is_e164("+919876543210"));
        assert!(is_e164("+12"));
        assert!(!is_e164("14155550100"));
        assert!(!is_e164("+04155550100"));
        assert!(!is_e164("+1"));
        assert!(!is_e164("+1234567890123456"));
        assert!(!is_e164("+1 415 555 0100"));
    }

    #[test]
    fn test_resource_id() {
        assert!(is_resource_id("CA0123456789abcdef0123456789abcdef"));
        assert!(is_resource_id("3f1c_b2-9"));
        assert!(!is_resource_id(""));
        assert!(!is_resource_id("../Balance"));
        assert!(!is_resource_id("CA1/Recordings"));
        assert!(!is_resource_id("CA1.json"));
        assert!(require_resource_id("callSid", "..%2F..").is_err());
    }

    #[test]
    fn test_normalize_whatsapp_is_idempotent() {
        let once = normalize_whatsapp("+14155550100");
        assert_eq!(once, "whatsapp:+14155550100");
        assert_eq!(normalize_whatsapp(&once), once);
        assert_eq!(normalize_whatsapp("  whatsapp:+14155550100 "), once);
    }

    #[test]
    fn test_require_whatsapp() {
        assert_eq!(
            require_whatsapp("to", "whatsapp:+14155550100").unwrap(),
            "whatsapp:+14155550100"
        );
        assert!(require_whatsapp("to", "whatsapp:12345").is_err());
        assert!(require_whatsapp("to", "not-a-number").is_err());
    }

    #[test]
    fn test_require_url() {
        assert!(require_url("url", None).is_ok());
        assert!(require_url("url", Some("https://example.com/twiml")).is_ok());
        assert!(require_url("url", Some("/twilio/voice-response")).is_err());
        assert!(require_url("url", Some("ftp://example.com/x")).is_err());
    }
}
