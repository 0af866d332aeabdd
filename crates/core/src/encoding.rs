//! Character encoding resolution.
//!
//! Pages routinely lie about their charset. The resolver decodes with the
//! declared charset (or UTF-8), measures how much of the result is made of
//! symbols that only show up when bytes were decoded with the wrong table,
//! and retries with ISO-8859-1 and then Windows-1252 when that garbage
//! density exceeds 1%. It never fails: when no candidate is clean, the first
//! decode is returned and the content validity filter deals with the rest.

use std::borrow::Cow;
use std::sync::LazyLock;

use encoding_rs::Encoding;
use regex::Regex;

/// Maximum fraction of garbage characters a decode may contain.
pub const GARBAGE_THRESHOLD: f64 = 0.01;

/// Bytes searched for an in-document charset declaration.
const META_SNIFF_BYTES: usize = 4096;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).expect("charset regex"));

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>;]+)"#).expect("meta charset regex"));

/// Charset-correct text of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    pub html: String,
    /// Name of the encoding that produced `html`.
    pub encoding: &'static str,
    /// Whether the declared/default decode was rejected for a fallback.
    pub fell_back: bool,
}

/// Extracts the `charset` parameter of a Content-Type header value, lowercased.
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    CHARSET_REGEX
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Finds a `<meta charset>` or `http-equiv` charset declaration near the top of the page.
fn sniff_meta_charset(bytes: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(META_SNIFF_BYTES)]);
    META_CHARSET_REGEX
        .captures(&head)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Characters that indicate bytes were decoded with the wrong table.
pub fn is_garbage_char(c: char) -> bool {
    matches!(c,
        '\u{FFFD}'
        | '\u{0080}'..='\u{009F}'
        | '\u{2500}'..='\u{25FF}'
        | '\u{2660}'..='\u{2667}'
        | '\u{00C2}' | '\u{00C3}'
    )
}

/// Fraction of characters in `text` that are garbage. Empty text has density 0.
pub fn garbage_density(text: &str) -> f64 {
    let (total, garbage) = text.chars().fold((0usize, 0usize), |(total, garbage), c| {
        (total + 1, garbage + usize::from(is_garbage_char(c)))
    });

    if total == 0 { 0.0 } else { garbage as f64 / total as f64 }
}

/// Whether a decode should be rejected.
pub fn is_garbled(text: &str) -> bool {
    garbage_density(text) > GARBAGE_THRESHOLD
}

/// ISO-8859-1 maps every byte to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, _, _) = encoding.decode(bytes);
    match text {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

/// Decodes `bytes`, falling back to ISO-8859-1 and Windows-1252 when the
/// first decode is garbled.
pub fn resolve(bytes: &[u8], declared_charset: Option<&str>) -> DecodedDocument {
    let label = declared_charset.map(str::to_string).or_else(|| sniff_meta_charset(bytes));
    let primary = label
        .as_deref()
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);

    let first = decode_with(primary, bytes);
    if !is_garbled(&first) {
        return DecodedDocument { html: first, encoding: primary.name(), fell_back: false };
    }

    tracing::warn!(
        encoding = primary.name(),
        density = garbage_density(&first),
        "decode rejected, trying fallbacks"
    );

    let latin1 = decode_latin1(bytes);
    if !is_garbled(&latin1) {
        return DecodedDocument { html: latin1, encoding: "ISO-8859-1", fell_back: true };
    }

    let windows = decode_with(encoding_rs::WINDOWS_1252, bytes);
    if !is_garbled(&windows) {
        return DecodedDocument { html: windows, encoding: encoding_rs::WINDOWS_1252.name(), fell_back: true };
    }

    tracing::debug!("no fallback decode passed, keeping the original");
    DecodedDocument { html: first, encoding: primary.name(), fell_back: false }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latin1_page() -> Vec<u8> {
        let mut bytes = b"<html><body><p>".to_vec();
        for _ in 0..20 {
            bytes.extend_from_slice(b"Caf\xE9 cr\xE8me ");
        }
        bytes.extend_from_slice(b"</p></body></html>");
        bytes
    }

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(charset_from_content_type("text/html; charset=UTF-8"), Some("utf-8".to_string()));
        assert_eq!(charset_from_content_type("text/html; charset=\"iso-8859-1\""), Some("iso-8859-1".to_string()));
        assert_eq!(charset_from_content_type("text/html"), None);
    }

    #[test]
    fn test_garbage_density() {
        assert_eq!(garbage_density(""), 0.0);
        assert_eq!(garbage_density("plain text"), 0.0);
        let noisy = format!("{}{}", "a".repeat(90), "█".repeat(10));
        assert!((garbage_density(&noisy) - 0.1).abs() < 1e-9);
        assert!(is_garbled(&noisy));
        assert!(!is_garbled("Café crème"));
    }

    #[test]
    fn test_clean_utf8_is_kept() {
        let doc = resolve("<p>Café crème brûlée</p>".as_bytes(), Some("utf-8"));
        assert_eq!(doc.encoding, "UTF-8");
        assert!(!doc.fell_back);
        assert!(doc.html.contains("brûlée"));
    }

    #[test]
    fn test_garbled_utf8_falls_back_to_latin1() {
        let doc = resolve(&latin1_page(), None);
        assert!(doc.fell_back);
        assert_eq!(doc.encoding, "ISO-8859-1");
        assert!(doc.html.contains("Café crème"));
    }

    #[test]
    fn test_c1_controls_fall_through_to_windows_1252() {
        let mut bytes = b"<p>".to_vec();
        for _ in 0..20 {
            bytes.extend_from_slice(b"\x93quoted\x94 text ");
        }
        let doc = resolve(&bytes, Some("utf-8"));
        assert_eq!(doc.encoding, "windows-1252");
        assert!(doc.html.contains("\u{201C}quoted\u{201D}"));
    }

    #[test]
    fn test_unfixable_garbage_returns_original() {
        let noise = b"\x81\x8d\x8f\x90\x9d ".repeat(20);
        let doc = resolve(&noise, Some("utf-8"));
        assert!(!doc.fell_back);
        assert_eq!(doc.encoding, "UTF-8");
        assert!(doc.html.contains('\u{FFFD}'));
    }

    #[test]
    fn test_meta_charset_sniffing() {
        let mut bytes = b"<html><head><meta charset=\"windows-1252\"></head><body>".to_vec();
        bytes.extend_from_slice(b"na\xEFve caf\xE9</body></html>");
        let doc = resolve(&bytes, None);
        assert_eq!(doc.encoding, "windows-1252");
        assert!(!doc.fell_back);
        assert!(doc.html.contains("naïve café"));
    }
}
