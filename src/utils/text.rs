use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Anything that starts like a link, up to the next whitespace
    static ref URL: Regex = Regex::new(r"http\S+").expect("invalid URL regex");

    /// Everything outside of ASCII letters, digits and the plain space
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-zA-Z0-9 ]").expect("invalid character class regex");
}

/// Normalize a raw comment before tokenization.
///
/// Links are removed, newlines become a single space, anything that isn't an ASCII letter, digit
/// or space is dropped, and the result is lowercased. Spaces left behind by removals are kept
/// as-is rather than collapsed, so `"Visit http://x.com NOW!!"` becomes `"visit  now"`.
pub fn clean(text: &str) -> String {
    let text = URL.replace_all(text, "");
    let text = text.replace('\n', " ");
    let text = NON_ALPHANUMERIC.replace_all(&text, "");

    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn removes_links_and_punctuation() {
        assert_eq!(clean("Visit http://x.com NOW!!"), "visit  now");
    }

    #[test]
    fn removes_secure_links() {
        assert_eq!(clean("see https://en.wikipedia.org/wiki/Talk:Foo ok"), "see  ok");
    }

    #[test]
    fn replaces_newlines_with_spaces() {
        assert_eq!(clean("first line\nsecond line"), "first line second line");
        assert_eq!(clean("a\n\nb"), "a  b");
    }

    #[test]
    fn drops_non_ascii_characters() {
        assert_eq!(clean("Café déjà vu 🙂"), "caf dj vu ");
    }

    #[test]
    fn drops_tabs_and_carriage_returns() {
        assert_eq!(clean("a\tb\r\nc"), "ab c");
    }

    #[test]
    fn handles_empty_input() {
        assert_eq!(clean(""), "");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(clean("Top 10 REASONS"), "top 10 reasons");
    }
}
