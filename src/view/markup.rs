//! Plain text → result-area markup.

/// Escape markup characters and turn each line break into `<br>`.
///
/// ```
/// use image_analysis::view::text_to_markup;
///
/// assert_eq!(text_to_markup("Hello\nWorld"), "Hello<br>World");
/// ```
pub fn text_to_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => out.push_str("<br>"),
            other => out.push(other),
        }
    }
    out
}
