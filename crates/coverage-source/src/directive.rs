//! Ignore directive grammar.
//!
//! Two families of directives are recognized:
//!
//! - `/* c8 ignore next [N] */` works on physical lines and is matched on raw
//!   line text while the line index is built.
//! - `t8 ignore next` / `t8 ignore rest` works on syntax and is matched on
//!   comment text extracted by the parser.
//!
//! Anything that does not fit the grammar exactly is a plain comment.

use regex::Regex;
use std::sync::OnceLock;

/// A line-level ignore directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDirective {
    /// The line holds nothing but the directive: ignore it and the next `n` lines.
    IgnoreNext(u32),
    /// The directive appears inline: ignore only this line.
    IgnoreLine,
}

impl LineDirective {
    /// Matches a physical line (terminator included) against the directive grammar.
    pub fn parse(line: &str) -> Option<Self> {
        if let Some(captures) = whole_line().captures(line) {
            return match captures.name("count") {
                Some(count) => count.as_str().parse().ok().map(LineDirective::IgnoreNext),
                None => Some(LineDirective::IgnoreNext(1)),
            };
        }
        inline().is_match(line).then_some(LineDirective::IgnoreLine)
    }

    /// The number of lines after the directive line that are ignored.
    pub fn following_lines(self) -> u32 {
        match self {
            LineDirective::IgnoreNext(n) => n,
            LineDirective::IgnoreLine => 0,
        }
    }
}

/// A syntax-level ignore directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDirective {
    /// Ignore the construct following the comment.
    Next,
    /// Ignore everything from the comment to the end of the enclosing block.
    Rest,
}

impl RangeDirective {
    /// Matches comment text (delimiters stripped) against the directive grammar.
    pub fn parse(comment: &str) -> Option<Self> {
        let keyword = range().captures(comment)?.get(1)?.as_str();
        match keyword {
            "next" => Some(RangeDirective::Next),
            "rest" => Some(RangeDirective::Rest),
            _ => None,
        }
    }
}

fn whole_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^A-Za-z0-9_]*/\* c8 ignore next (?P<count>[0-9]+)? *\*/[^A-Za-z0-9_]*$")
            .expect("whole-line directive pattern is valid")
    })
}

fn inline() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"/\* c8 ignore next \*/").expect("inline directive pattern is valid")
    })
}

fn range() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*t8 ignore (\S*)").expect("range directive pattern is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_line_default_count() {
        assert_eq!(
            LineDirective::parse("/* c8 ignore next */\n"),
            Some(LineDirective::IgnoreNext(1))
        );
        assert_eq!(
            LineDirective::parse("    /* c8 ignore next */"),
            Some(LineDirective::IgnoreNext(1))
        );
    }

    #[test]
    fn test_whole_line_with_count() {
        assert_eq!(
            LineDirective::parse("  /* c8 ignore next 3 */\r\n"),
            Some(LineDirective::IgnoreNext(3))
        );
        assert_eq!(LineDirective::IgnoreNext(3).following_lines(), 3);
    }

    #[test]
    fn test_inline_directive() {
        assert_eq!(
            LineDirective::parse("foo(); /* c8 ignore next */\n"),
            Some(LineDirective::IgnoreLine)
        );
        assert_eq!(LineDirective::IgnoreLine.following_lines(), 0);
    }

    #[test]
    fn test_inline_with_count_is_not_a_directive() {
        assert_eq!(LineDirective::parse("foo(); /* c8 ignore next 2 */\n"), None);
    }

    #[test]
    fn test_overflowing_count_is_not_a_directive() {
        assert_eq!(
            LineDirective::parse("/* c8 ignore next 99999999999999 */\n"),
            None
        );
    }

    #[test]
    fn test_line_comment_is_not_a_line_directive() {
        assert_eq!(LineDirective::parse("// c8 ignore next\n"), None);
        assert_eq!(LineDirective::parse("/* c8 ignore nextline */\n"), None);
    }

    #[test]
    fn test_range_directives() {
        assert_eq!(RangeDirective::parse(" t8 ignore next"), Some(RangeDirective::Next));
        assert_eq!(RangeDirective::parse(" t8 ignore rest "), Some(RangeDirective::Rest));
        assert_eq!(
            RangeDirective::parse("\n * t8 ignore next"),
            None,
            "leading `*` is not whitespace"
        );
    }

    #[test]
    fn test_unknown_range_keyword_is_ignored() {
        assert_eq!(RangeDirective::parse(" t8 ignore file"), None);
        assert_eq!(RangeDirective::parse(" t8 ignore "), None);
        assert_eq!(RangeDirective::parse(" t8 ignore"), None);
        assert_eq!(RangeDirective::parse(" c8 ignore next"), None);
    }
}
