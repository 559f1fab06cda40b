use std::fmt;

use serde::{Deserialize, Serialize};

/// Text that has already been HTML-escaped.
///
/// The only way to obtain one is through [`SafeText::new`], which escapes the
/// raw input, so anything holding a `SafeText` can be interpolated into markup
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SafeText {
    raw: String,
    html: String,
}

impl SafeText {
    /// Escapes `raw` for inclusion in HTML text or attribute values.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let html = escape_html(&raw);
        Self { raw, html }
    }

    /// Escaped form, ready for markup.
    #[must_use]
    pub fn as_html(&self) -> &str {
        &self.html
    }

    /// Original caller text, for comparisons and lookups.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl From<String> for SafeText {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SafeText {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<SafeText> for String {
    fn from(value: SafeText) -> Self {
        value.raw
    }
}

impl fmt::Display for SafeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

/// Escapes the five HTML-significant characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        let text = SafeText::new("<script>alert('x') & \"y\"</script>");
        assert_eq!(
            text.as_html(),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
        assert_eq!(text.raw(), "<script>alert('x') & \"y\"</script>");
    }

    #[test]
    fn plain_text_is_untouched() {
        let text = SafeText::from("Interpreted");
        assert_eq!(text.to_string(), "Interpreted");
    }

    #[test]
    fn serde_round_trips_raw_text_without_double_escaping() {
        let text = SafeText::new("a < b");
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, "\"a < b\"");
        let back: SafeText = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_html(), "a &lt; b");
    }
}
