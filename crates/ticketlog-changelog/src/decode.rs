//! HTML entity decoding

use html_escape::decode_html_entities;

/// Turn HTML entities (`&amp;`, `&#39;`, `&quot;`, ...) back into text
pub fn decode_entities(text: &str) -> String {
    decode_html_entities(text).into_owned()
}
