use regex::Regex;
use std::sync::LazyLock;

/// A line starting with '/' marks italics in the source format
static ITALIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^/([^\r\n]*)").expect("italic line pattern is valid")
});

/// Clean up converter output for display.
///
/// Lines starting with `/` have the rest of the line wrapped in `<i>` tags, and
/// every literal backslash-r pair left behind by the source format is removed.
pub fn normalize_converted_text(text: &str) -> String {
    let italicized = ITALIC_LINE.replace_all(text, "<i>$1</i>");
    italicized.replace("\\r", "")
}
