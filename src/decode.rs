use std::borrow::Cow;

/// Decode HTML character references (`&quot;`, `&#039;`, `&eacute;` ...) into literal text.
///
/// The trivia API encodes question and answer text this way by default.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}
