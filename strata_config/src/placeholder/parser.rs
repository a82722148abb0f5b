//! Recursive-descent parser splitting a template into literal text and
//! placeholder nodes.
//!
//! Placeholders nest lexically: in `${a-${b}}` the inner node is a child of
//! the outer one, so rendering children first reproduces innermost-first,
//! left-to-right expansion.

use super::PlaceholderSyntax;

/// One piece of a parsed template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Segment {
    /// Text copied to the output unchanged.
    Literal(String),
    /// A closed placeholder whose raw content is the rendering of its children.
    Placeholder(Vec<Segment>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Termination {
    /// The sequence ended on a suffix that closed the enclosing placeholder.
    Closed,
    /// The input ran out first.
    EndOfInput,
}

/// Parse `template` according to `syntax`.
pub(super) fn parse(template: &str, syntax: &PlaceholderSyntax) -> Vec<Segment> {
    let mut parser = Parser {
        input: template,
        pos: 0,
        syntax,
    };
    let (segments, _) = parser.sequence(false);
    segments
}

struct Parser<'t, 's> {
    input: &'t str,
    pos: usize,
    syntax: &'s PlaceholderSyntax,
}

impl<'t> Parser<'t, '_> {
    fn rest(&self) -> &'t str {
        self.input.get(self.pos..).unwrap_or_default()
    }

    /// Parse segments until end of input or, when `nested`, until the suffix
    /// that closes the current placeholder.
    fn sequence(&mut self, nested: bool) -> (Vec<Segment>, Termination) {
        let syntax = self.syntax;
        let prefix = syntax.prefix();
        let suffix = syntax.suffix();
        let mut segments = Vec::new();
        let mut literal = String::new();

        loop {
            let rest = self.rest();
            let Some(ch) = rest.chars().next() else {
                break;
            };

            if rest.starts_with(prefix) {
                self.pos += prefix.len();
                if literal.ends_with(syntax.escape()) {
                    literal.pop();
                    literal.push_str(prefix);
                    continue;
                }
                flush(&mut literal, &mut segments);
                let (children, termination) = self.sequence(true);
                match termination {
                    Termination::Closed => segments.push(Segment::Placeholder(children)),
                    Termination::EndOfInput => {
                        // An unterminated placeholder stays literal text.
                        segments.push(Segment::Literal(prefix.to_owned()));
                        segments.extend(children);
                    }
                }
                continue;
            }

            if nested && rest.starts_with(suffix) {
                self.pos += suffix.len();
                flush(&mut literal, &mut segments);
                return (segments, Termination::Closed);
            }

            literal.push(ch);
            self.pos += ch.len_utf8();
        }

        flush(&mut literal, &mut segments);
        (segments, Termination::EndOfInput)
    }
}

fn flush(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]
mod tests {
    use rstest::rstest;

    use super::{Segment, parse};
    use crate::placeholder::PlaceholderSyntax;

    fn lit(text: &str) -> Segment {
        Segment::Literal(text.to_owned())
    }

    #[rstest]
    fn plain_text_is_one_literal() {
        assert_eq!(
            parse("no tokens here", &PlaceholderSyntax::default()),
            vec![lit("no tokens here")]
        );
    }

    #[rstest]
    fn nested_placeholders_become_child_nodes() {
        let segments = parse("x${a-${b}}y", &PlaceholderSyntax::default());
        assert_eq!(
            segments,
            vec![
                lit("x"),
                Segment::Placeholder(vec![lit("a-"), Segment::Placeholder(vec![lit("b")])]),
                lit("y"),
            ]
        );
    }

    #[rstest]
    fn escaped_prefix_stays_literal() {
        let segments = parse(r"a-\${x}", &PlaceholderSyntax::default());
        assert_eq!(segments, vec![lit("a-${x}")]);
    }

    #[rstest]
    fn escaped_prefix_inside_placeholder_does_not_nest() {
        let segments = parse(r"${a-\${x}}", &PlaceholderSyntax::default());
        assert_eq!(
            segments,
            vec![Segment::Placeholder(vec![lit("a-${x")]), lit("}")]
        );
    }

    #[rstest]
    fn unmatched_suffix_is_literal() {
        assert_eq!(
            parse("a}b", &PlaceholderSyntax::default()),
            vec![lit("a}b")]
        );
    }

    #[rstest]
    fn unterminated_placeholder_is_flattened() {
        let segments = parse("a${b${c}", &PlaceholderSyntax::default());
        assert_eq!(
            segments,
            vec![
                lit("a"),
                lit("${"),
                lit("b"),
                Segment::Placeholder(vec![lit("c")]),
            ]
        );
    }

    #[rstest]
    fn empty_placeholder_has_no_children() {
        assert_eq!(
            parse("${}", &PlaceholderSyntax::default()),
            vec![Segment::Placeholder(Vec::new())]
        );
    }

    #[rstest]
    fn multi_character_tokens_and_unicode() {
        let syntax = PlaceholderSyntax::builder()
            .prefix("{{")
            .suffix("}}")
            .build()
            .expect("valid syntax");
        let segments = parse("héllo {{wörld}}!", &syntax);
        assert_eq!(
            segments,
            vec![
                lit("héllo "),
                Segment::Placeholder(vec![lit("wörld")]),
                lit("!"),
            ]
        );
    }
}
