use ammonia;

/// Escape untrusted text for use inside the page shell, either as element
/// content or as a quoted attribute value.
///
/// Note:
/// 1. Everything that could open markup or close an attribute is encoded,
///    so the text is shown verbatim and never interpreted.
/// 2. This is for plain text only. Rendered Markdown goes through
///    `sanitizer::sanitize` instead.
pub fn escape_html(input: &str) -> String {
    ammonia::clean_text(input)
}
