//! Percent-encoding helpers for URL components.

use std::borrow::Cow;

/// Characters left untouched in fragments (RFC 3986 `pchar` plus `/` and `?`).
pub(crate) const FRAGMENT_SAFE: &str = "!$&'()*+,;=:@/?";

/// Percent-encodes `value`, leaving unreserved characters and any character in
/// `safe` as-is.
pub(crate) fn encode_component(value: &str, safe: &str) -> String {
    if safe.is_empty() {
        return urlencoding::encode(value).into_owned();
    }
    let mut out = String::with_capacity(value.len());
    let mut buf = [0_u8; 4];
    for ch in value.chars() {
        if safe.contains(ch) {
            out.push(ch);
        } else {
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }
    out
}

/// Decodes `%XX` escapes; input that does not decode to UTF-8 is kept verbatim
/// so a stray `%` is re-encoded as `%25` on output.
pub(crate) fn decode_lossless(value: &str) -> Cow<'_, str> {
    if !value.contains('%') {
        return Cow::Borrowed(value);
    }
    urlencoding::decode(value).unwrap_or(Cow::Borrowed(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component_reserved_characters() {
        assert_eq!(encode_component("a b/c?d", ""), "a%20b%2Fc%3Fd");
        assert_eq!(encode_component("plain-text_1.0~", ""), "plain-text_1.0~");
    }

    #[test]
    fn test_encode_component_respects_safe_set() {
        assert_eq!(encode_component("is:pr+is:open", "+"), "is%3Apr+is%3Aopen");
        assert_eq!(encode_component("sec/1 2", FRAGMENT_SAFE), "sec/1%202");
    }

    #[test]
    fn test_encode_component_non_ascii() {
        assert_eq!(encode_component("café", ""), "caf%C3%A9");
        assert_eq!(encode_component("café", "+"), "caf%C3%A9");
    }

    #[test]
    fn test_decode_lossless() {
        assert_eq!(decode_lossless("a%2Fb"), "a/b");
        assert_eq!(decode_lossless("100%"), "100%");
        assert_eq!(decode_lossless("%ZZ"), "%ZZ");
        assert_eq!(decode_lossless("plain"), "plain");
    }
}
