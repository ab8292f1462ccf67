//! Inline markup parsing.
//!
//! # Syntax
//!
//! A fixed set of paired markers toggles one style flag each, longest
//! marker first:
//!
//! - `**bold**`
//! - `*italic*` or `_italic_`
//! - `__underline__`
//! - `~~strikethrough~~`
//! - `==big text==`
//! - `` `code` ``
//! - `@no wrapping@`
//!
//! Inside a code span every marker except the backtick is literal. A
//! backslash escapes marker characters; the doubled markers must be
//! escaped as a pair (`\**`), which is recognized before the single
//! character escapes. Unbalanced markers are not an error: a style left
//! open at the end of input simply stops mattering.

use std::mem;

use crate::text::{Run, StyleFlags, StyledText};

const DOUBLE_MARKERS: [(&str, StyleFlags); 4] = [
    ("**", StyleFlags::BOLD),
    ("__", StyleFlags::UNDERLINE),
    ("~~", StyleFlags::STRIKETHROUGH),
    ("==", StyleFlags::BIG_TEXT),
];

const SINGLE_MARKERS: [(char, StyleFlags); 3] = [
    ('*', StyleFlags::ITALIC),
    ('_', StyleFlags::ITALIC),
    ('@', StyleFlags::NO_WRAP),
];

/// Incremental markup parser.
///
/// Feed the builder one chunk at a time (the deck parser feeds each source
/// line followed by an explicit newline), then call
/// [`finish`](Self::finish) to take the accumulated runs. Leading newlines
/// are stripped while the builder is still clean, so a block never starts
/// with blank lines.
#[derive(Debug, Default)]
pub struct MarkupBuilder {
    runs: Vec<Run>,
    buf: String,
    state: StyleFlags,
}

impl MarkupBuilder {
    pub fn feed(&mut self, chunk: &str) {
        let mut rest = if self.dirty() {
            chunk
        } else {
            chunk.trim_start_matches('\n')
        };

        'input: while !rest.is_empty() {
            let in_code = self.state.contains(StyleFlags::CODE);

            if let Some(escaped) = rest.strip_prefix('\\') {
                if !in_code {
                    for (marker, _) in DOUBLE_MARKERS {
                        if let Some(after) = escaped.strip_prefix(marker) {
                            self.buf.push_str(marker);
                            rest = after;
                            continue 'input;
                        }
                    }
                    if let Some(c @ ('*' | '_' | '~' | '=' | '@')) = escaped.chars().next() {
                        self.buf.push(c);
                        rest = &escaped[1..];
                        continue 'input;
                    }
                }
                if let Some(c @ ('`' | '\\')) = escaped.chars().next() {
                    self.buf.push(c);
                    rest = &escaped[1..];
                    continue 'input;
                }
            }

            if !in_code {
                for (marker, flag) in DOUBLE_MARKERS {
                    if let Some(after) = rest.strip_prefix(marker) {
                        self.toggle(flag);
                        rest = after;
                        continue 'input;
                    }
                }
                for (marker, flag) in SINGLE_MARKERS {
                    if let Some(after) = rest.strip_prefix(marker) {
                        self.toggle(flag);
                        rest = after;
                        continue 'input;
                    }
                }
            }
            if let Some(after) = rest.strip_prefix('`') {
                self.toggle(StyleFlags::CODE);
                rest = after;
                continue 'input;
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                self.buf.push(c);
                rest = chars.as_str();
            }
        }
    }

    /// Flushes the pending partial run and takes everything accumulated so
    /// far. The toggle state carries over; call [`reset`](Self::reset) to
    /// clear it.
    pub fn finish(&mut self) -> StyledText {
        self.emit();
        StyledText::from_runs(mem::take(&mut self.runs))
    }

    /// Whether any input has been consumed since the last [`reset`](Self::reset).
    pub fn dirty(&self) -> bool {
        !self.runs.is_empty() || !self.buf.is_empty() || !self.state.is_empty()
    }

    pub fn reset(&mut self) {
        self.runs.clear();
        self.buf.clear();
        self.state = StyleFlags::empty();
    }

    fn toggle(&mut self, flag: StyleFlags) {
        self.emit();
        self.state.toggle(flag);
    }

    fn emit(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        self.runs.push(Run {
            style: self.state,
            text: self.buf.as_str().into(),
        });
        self.buf.clear();
    }
}

/// Parses a complete block of markup in one call.
pub fn parse(input: &str) -> StyledText {
    let mut builder = MarkupBuilder::default();
    builder.feed(input);
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(text: &StyledText) -> Vec<(StyleFlags, &str)> {
        text.runs()
            .iter()
            .map(|run| (run.style, run.text.as_str()))
            .collect()
    }

    #[test]
    fn plain_text_round_trips() {
        let text = parse("hello, world");
        assert_eq!(runs(&text), vec![(StyleFlags::empty(), "hello, world")]);
    }

    #[test]
    fn random_marker_free_text_round_trips() {
        let charset: Vec<char> = ('a'..='z')
            .chain('0'..='9')
            .chain([' ', '.', ',', '!', '?', '(', ')', '+', '-', 'ä', 'ß', '→'])
            .collect();
        for _ in 0..100 {
            let len = fastrand::usize(1..60);
            let mut input: String = (0..len)
                .map(|_| charset[fastrand::usize(..charset.len())])
                .collect();
            // Interior newlines survive; only leading ones are stripped.
            if fastrand::bool() {
                input.push('\n');
            }
            assert_eq!(parse(&input).to_plain_string(), input);
        }
    }

    #[test]
    fn toggle_pairs() {
        let text = parse("**bold**plain");
        assert_eq!(
            runs(&text),
            vec![(StyleFlags::BOLD, "bold"), (StyleFlags::empty(), "plain")]
        );
    }

    #[test]
    fn both_italic_markers() {
        let text = parse("*a*_b_");
        assert_eq!(
            runs(&text),
            vec![(StyleFlags::ITALIC, "a"), (StyleFlags::ITALIC, "b")]
        );
    }

    #[test]
    fn nested_styles_combine() {
        let text = parse("**a_b_**");
        assert_eq!(
            runs(&text),
            vec![
                (StyleFlags::BOLD, "a"),
                (StyleFlags::BOLD | StyleFlags::ITALIC, "b"),
            ]
        );
    }

    #[test]
    fn code_is_literal() {
        let text = parse("a `b **c** d` e");
        assert_eq!(
            runs(&text),
            vec![
                (StyleFlags::empty(), "a "),
                (StyleFlags::CODE, "b **c** d"),
                (StyleFlags::empty(), " e"),
            ]
        );
    }

    #[test]
    fn code_escapes() {
        let text = parse(r"`a \` b \\ c`");
        assert_eq!(runs(&text), vec![(StyleFlags::CODE, r"a ` b \ c")]);
    }

    #[test]
    fn no_wrap_marker() {
        let text = parse("@a b@ c");
        assert_eq!(
            runs(&text),
            vec![(StyleFlags::NO_WRAP, "a b"), (StyleFlags::empty(), " c")]
        );
    }

    #[test]
    fn big_text_marker() {
        let text = parse("==big== small");
        assert_eq!(
            runs(&text),
            vec![
                (StyleFlags::BIG_TEXT, "big"),
                (StyleFlags::empty(), " small")
            ]
        );
    }

    #[test]
    fn single_escapes() {
        let text = parse(r"\*\*a\*\*");
        assert_eq!(runs(&text), vec![(StyleFlags::empty(), "**a**")]);
    }

    #[test]
    fn double_escapes() {
        let text = parse(r"\__a\~~b\==c");
        assert_eq!(runs(&text), vec![(StyleFlags::empty(), "__a~~b==c")]);
    }

    #[test]
    fn escaped_at_and_equals() {
        let text = parse(r"mail\@host 1\=1");
        assert_eq!(runs(&text), vec![(StyleFlags::empty(), "mail@host 1=1")]);
    }

    #[test]
    fn stray_backslash_is_literal() {
        let text = parse(r"a\b");
        assert_eq!(runs(&text), vec![(StyleFlags::empty(), r"a\b")]);
    }

    #[test]
    fn unterminated_style_stays_open() {
        let text = parse("**bold");
        assert_eq!(runs(&text), vec![(StyleFlags::BOLD, "bold")]);
    }

    #[test]
    fn empty_runs_are_dropped() {
        assert!(parse("****").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn leading_newlines_stripped_until_dirty() {
        assert_eq!(parse("\n\nhello").to_plain_string(), "hello");

        let mut builder = MarkupBuilder::default();
        builder.feed("\n");
        assert!(!builder.dirty());
        builder.feed("a");
        builder.feed("\n");
        builder.feed("b");
        assert_eq!(builder.finish().to_plain_string(), "a\nb");
    }

    #[test]
    fn incremental_feeds_join_runs() {
        let mut builder = MarkupBuilder::default();
        builder.feed("**bo");
        builder.feed("ld** x");
        assert_eq!(
            runs(&builder.finish()),
            vec![(StyleFlags::BOLD, "bold"), (StyleFlags::empty(), " x")]
        );
    }

    #[test]
    fn markers_do_not_span_feeds() {
        // The deck parser always feeds whole lines, so `**` split across
        // two feeds is two separate italic toggles rather than bold.
        let mut builder = MarkupBuilder::default();
        builder.feed("*");
        builder.feed("*a");
        assert_eq!(runs(&builder.finish()), vec![(StyleFlags::empty(), "a")]);
    }

    #[test]
    fn finish_and_reset() {
        let mut builder = MarkupBuilder::default();
        builder.feed("`open");
        assert!(builder.dirty());
        let text = builder.finish();
        assert_eq!(runs(&text), vec![(StyleFlags::CODE, "open")]);
        // The dangling code toggle still marks the builder dirty.
        assert!(builder.dirty());
        builder.reset();
        assert!(!builder.dirty());
    }
}
