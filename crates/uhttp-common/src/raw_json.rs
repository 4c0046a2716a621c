//! Raw JSON log values

use std::borrow::Cow;
use std::fmt;

/// A byte body rendered verbatim in a log field.
///
/// The bytes are never parsed or re-serialized: a JSON body shows up in the log
/// exactly as it went over the wire. Invalid UTF-8 is replaced lossily.
///
/// ```
/// use uhttp_common::RawJson;
///
/// let body = br#"{"code":0}"#;
/// assert_eq!(RawJson(body).to_string(), r#"{"code":0}"#);
/// tracing::debug!(body = %RawJson(body), "resp_body");
/// ```
#[derive(Clone, Copy)]
pub struct RawJson<'a>(pub &'a [u8]);

impl RawJson<'_> {
    /// Body as text
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.0)
    }
}

impl fmt::Display for RawJson<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

// `?` in a tracing macro should log the same text as `%`, not a byte list.
impl fmt::Debug for RawJson<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_json_verbatim() {
        let body = br#"{ "a" : [1, 2],"b":null }"#;
        assert_eq!(RawJson(body).to_string(), r#"{ "a" : [1, 2],"b":null }"#);
    }

    #[test]
    fn test_debug_matches_display() {
        let body = br#"{"ok":true}"#;
        assert_eq!(format!("{:?}", RawJson(body)), format!("{}", RawJson(body)));
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let body = [b'{', 0xff, b'}'];
        assert_eq!(RawJson(&body).to_string(), "{\u{fffd}}");
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(RawJson(b"").to_string(), "");
    }
}
