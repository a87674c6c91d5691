//! Thread title handling: extracting the work title and making names
//! filesystem safe.

use regex::Regex;

/// Maps a single character to its filesystem-safe replacement.
fn safe_char(c: char) -> Option<&'static str> {
    match c {
        '\\' | '/' | '*' => Some(""),
        ':' => Some("："),
        '&' => Some("+"),
        '?' => Some("？"),
        '|' | '\r' | '\n' | '\'' | '"' => Some(" "),
        _ => None,
    }
}

/// Converts free text into a name usable as a path component on Windows.
///
/// Characters outside the substitution table pass through unchanged, so
/// applying the function twice yields the same result as applying it once.
///
/// # Example
///
/// ```rust
/// use threadwiki_core::safe_name;
///
/// assert_eq!(safe_name("a/b:c?"), "ab：c？");
/// ```
pub fn safe_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match safe_char(c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}

/// Extracts the work title from a full thread subject.
///
/// Leading whitespace and at most one `【...】` tag are skipped, then the
/// first whitespace-delimited token is returned. Subjects without any token
/// come back unchanged.
///
/// # Example
///
/// ```rust
/// use threadwiki_core::parse_title;
///
/// assert_eq!(parse_title("【同人】 临高启明 第一章"), "临高启明");
/// ```
pub fn parse_title(subject: &str) -> String {
    let re = Regex::new(r"^(?:\s*【[^】]*】)?\s*(?P<title>\S+)").unwrap();
    match re.captures(subject).and_then(|caps| caps.name("title")) {
        Some(m) => m.as_str().to_string(),
        None => subject.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("back\\slash", "backslash")]
    #[case("for/ward", "forward")]
    #[case("a:b", "a：b")]
    #[case("tom&jerry", "tom+jerry")]
    #[case("star*", "star")]
    #[case("why?", "why？")]
    #[case("a|b", "a b")]
    #[case("line\r\nbreak", "line  break")]
    #[case("it's \"quoted\"", "it s  quoted ")]
    #[case("<kept> as is", "<kept> as is")]
    fn test_safe_name_table(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(safe_name(input), expected);
    }

    #[test]
    fn test_safe_name_idempotent() {
        let inputs = ["a/b\\c:d&e*f?g|h\r\ni'j\"k", "临高启明：外传", "", "plain"];
        for input in inputs {
            let once = safe_name(input);
            assert_eq!(safe_name(&once), once);
        }
    }

    #[rstest]
    #[case("【同人】临高启明", "临高启明")]
    #[case("  【架空】 海南岛 第二部", "海南岛")]
    #[case("没有标签 后缀", "没有标签")]
    #[case("【只有标签】", "【只有标签】")]
    #[case("【一】【二】正文", "【二】正文")]
    fn test_parse_title(#[case] subject: &str, #[case] expected: &str) {
        assert_eq!(parse_title(subject), expected);
    }

    #[test]
    fn test_parse_title_without_token() {
        assert_eq!(parse_title(""), "");
        assert_eq!(parse_title("   "), "   ");
    }
}
