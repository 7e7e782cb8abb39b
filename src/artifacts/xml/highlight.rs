//! Lexical classification of XML text for display
//!
//! Patterns are applied in priority order: declaration, comments, CDATA, then
//! element tags. A later pattern never claims text already covered by an
//! earlier one. Highlighting only wraps text, it never drops or rewrites it.

use colored::{ColoredString, Colorize};
use regex::Regex;
use std::collections::BTreeMap;

const DECLARATION_REGEX: &str = r"<\?xml[^<>&]*\?>";
const COMMENT_REGEX: &str = r"(?s)<!--.*?-->";
const CDATA_REGEX: &str = r"(?s)<!\[CDATA\[.*?\]\]>";
const TAG_REGEX: &str = r#"(</?)([a-zA-Z][a-zA-Z0-9:._-]*)((?:\s+[a-zA-Z][a-zA-Z0-9:._-]*\s*=\s*"[^"]*")*)(\s*)(/?>)"#;
const ATTRIBUTE_REGEX: &str = r#"(\s+)([a-zA-Z][a-zA-Z0-9:._-]*)(\s*=\s*)("[^"]*")"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Plain,
    Declaration,
    Comment,
    CData,
    Bracket,
    Element,
    AttributeName,
    AttributeValue,
}

impl TokenKind {
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            TokenKind::Plain => None,
            TokenKind::Declaration => Some("xml-declaration"),
            TokenKind::Comment => Some("xml-comment"),
            TokenKind::CData => Some("xml-cdata"),
            TokenKind::Bracket => Some("xml-bracket"),
            TokenKind::Element => Some("xml-element"),
            TokenKind::AttributeName => Some("xml-attribute-name"),
            TokenKind::AttributeValue => Some("xml-attribute-value"),
        }
    }

    fn paint(&self, text: &str) -> ColoredString {
        match self {
            TokenKind::Plain => text.normal(),
            TokenKind::Declaration => text.magenta(),
            TokenKind::Comment => text.bright_black(),
            TokenKind::CData => text.yellow(),
            TokenKind::Bracket => text.bright_black(),
            TokenKind::Element => text.blue().bold(),
            TokenKind::AttributeName => text.cyan(),
            TokenKind::AttributeValue => text.green(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    pub kind: TokenKind,
    pub text: &'t str,
}

impl<'t> Token<'t> {
    fn new(kind: TokenKind, text: &'t str) -> Self {
        Token { kind, text }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Declaration,
    Comment,
    CData,
    Tag,
}

/// Compiled token patterns, built once and reused for every line
#[derive(Debug, Clone)]
pub struct Highlighter {
    declaration: Regex,
    comment: Regex,
    cdata: Regex,
    tag: Regex,
    attribute: Regex,
}

impl Highlighter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Highlighter {
            declaration: Regex::new(DECLARATION_REGEX)?,
            comment: Regex::new(COMMENT_REGEX)?,
            cdata: Regex::new(CDATA_REGEX)?,
            tag: Regex::new(TAG_REGEX)?,
            attribute: Regex::new(ATTRIBUTE_REGEX)?,
        })
    }

    /// Split `text` into classified tokens covering it exactly
    pub fn tokenize<'t>(&self, text: &'t str) -> Vec<Token<'t>> {
        let spans = self.claim_spans(text);
        let mut tokens = Vec::new();
        let mut cursor = 0;

        for (start, (end, kind)) in spans {
            if cursor < start {
                tokens.push(Token::new(TokenKind::Plain, &text[cursor..start]));
            }

            let span = &text[start..end];
            match kind {
                SpanKind::Declaration => tokens.push(Token::new(TokenKind::Declaration, span)),
                SpanKind::Comment => tokens.push(Token::new(TokenKind::Comment, span)),
                SpanKind::CData => tokens.push(Token::new(TokenKind::CData, span)),
                SpanKind::Tag => self.split_tag(span, &mut tokens),
            }
            cursor = end;
        }

        if cursor < text.len() {
            tokens.push(Token::new(TokenKind::Plain, &text[cursor..]));
        }

        tokens
    }

    /// HTML-escape `text` and wrap every classified span in a `<span class>`
    pub fn classify(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 2);

        for token in self.tokenize(text) {
            let escaped = escape_html(token.text);
            match token.kind.css_class() {
                Some(class) => {
                    out.push_str("<span class=\"");
                    out.push_str(class);
                    out.push_str("\">");
                    out.push_str(&escaped);
                    out.push_str("</span>");
                }
                None => out.push_str(&escaped),
            }
        }

        out
    }

    /// Render `text` with terminal colors
    pub fn colorize(&self, text: &str) -> String {
        self.tokenize(text)
            .into_iter()
            .map(|token| token.kind.paint(token.text).to_string())
            .collect()
    }

    // start -> (end, kind); spans never overlap
    fn claim_spans(&self, text: &str) -> BTreeMap<usize, (usize, SpanKind)> {
        let mut spans = BTreeMap::new();
        let patterns = [
            (SpanKind::Declaration, &self.declaration),
            (SpanKind::Comment, &self.comment),
            (SpanKind::CData, &self.cdata),
            (SpanKind::Tag, &self.tag),
        ];

        for (kind, regex) in patterns {
            for found in regex.find_iter(text) {
                if !overlaps_claimed(&spans, found.start(), found.end()) {
                    spans.insert(found.start(), (found.end(), kind));
                }
            }
        }

        spans
    }

    fn split_tag<'t>(&self, tag: &'t str, tokens: &mut Vec<Token<'t>>) {
        let Some(caps) = self.tag.captures(tag) else {
            tokens.push(Token::new(TokenKind::Plain, tag));
            return;
        };

        let piece = |index: usize| caps.get(index).map_or("", |m| m.as_str());

        tokens.push(Token::new(TokenKind::Bracket, piece(1)));
        tokens.push(Token::new(TokenKind::Element, piece(2)));

        let attributes = piece(3);
        let mut cursor = 0;
        for attr in self.attribute.captures_iter(attributes) {
            let (Some(whole), Some(space), Some(name), Some(equals), Some(value)) = (
                attr.get(0),
                attr.get(1),
                attr.get(2),
                attr.get(3),
                attr.get(4),
            ) else {
                continue;
            };
            if cursor < whole.start() {
                tokens.push(Token::new(
                    TokenKind::Plain,
                    &attributes[cursor..whole.start()],
                ));
            }
            tokens.push(Token::new(TokenKind::Plain, space.as_str()));
            tokens.push(Token::new(TokenKind::AttributeName, name.as_str()));
            tokens.push(Token::new(TokenKind::Plain, equals.as_str()));
            tokens.push(Token::new(TokenKind::AttributeValue, value.as_str()));
            cursor = whole.end();
        }
        if cursor < attributes.len() {
            tokens.push(Token::new(TokenKind::Plain, &attributes[cursor..]));
        }

        if !piece(4).is_empty() {
            tokens.push(Token::new(TokenKind::Plain, piece(4)));
        }
        tokens.push(Token::new(TokenKind::Bracket, piece(5)));
    }
}

fn overlaps_claimed(spans: &BTreeMap<usize, (usize, SpanKind)>, start: usize, end: usize) -> bool {
    spans
        .range(..end)
        .next_back()
        .is_some_and(|(_, (claimed_end, _))| *claimed_end > start)
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn highlighter() -> Highlighter {
        Highlighter::new().expect("token patterns compile")
    }

    fn strip_markup(html: &str) -> String {
        let without_spans = regex::Regex::new(r#"<span class="[a-z-]+">|</span>"#)
            .unwrap()
            .replace_all(html, "");
        without_spans
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&")
    }

    #[rstest]
    fn element_with_attributes(highlighter: Highlighter) {
        assert_eq!(
            highlighter.classify(r#"<w:t xml:space="preserve">"#),
            concat!(
                r#"<span class="xml-bracket">&lt;</span>"#,
                r#"<span class="xml-element">w:t</span> "#,
                r#"<span class="xml-attribute-name">xml:space</span>="#,
                r#"<span class="xml-attribute-value">"preserve"</span>"#,
                r#"<span class="xml-bracket">&gt;</span>"#,
            )
        );
    }

    #[rstest]
    fn closing_and_self_closing_tags(highlighter: Highlighter) {
        assert_eq!(
            highlighter.classify("</a><b/>"),
            concat!(
                r#"<span class="xml-bracket">&lt;/</span><span class="xml-element">a</span>"#,
                r#"<span class="xml-bracket">&gt;</span>"#,
                r#"<span class="xml-bracket">&lt;</span><span class="xml-element">b</span>"#,
                r#"<span class="xml-bracket">/&gt;</span>"#,
            )
        );
    }

    #[rstest]
    fn declaration_takes_precedence(highlighter: Highlighter) {
        assert_eq!(
            highlighter.classify(r#"<?xml version="1.0"?>"#),
            r#"<span class="xml-declaration">&lt;?xml version="1.0"?&gt;</span>"#
        );
    }

    #[rstest]
    fn tags_inside_comments_stay_comments(highlighter: Highlighter) {
        let tokens = highlighter.tokenize("<!-- <b x=\"1\"/> -->");

        assert_eq!(
            tokens,
            vec![Token::new(TokenKind::Comment, "<!-- <b x=\"1\"/> -->")]
        );
    }

    #[rstest]
    fn cdata_content_is_not_split(highlighter: Highlighter) {
        assert_eq!(
            highlighter.classify("<![CDATA[<a>&</a>]]>"),
            r#"<span class="xml-cdata">&lt;![CDATA[&lt;a&gt;&amp;&lt;/a&gt;]]&gt;</span>"#
        );
    }

    #[rstest]
    fn plain_text_is_only_escaped(highlighter: Highlighter) {
        assert_eq!(highlighter.classify("  1 &lt; 2 & 3"), "  1 &amp;lt; 2 &amp; 3");
        assert!(highlighter.tokenize("").is_empty());
    }

    #[rstest]
    fn injected_markup_cannot_escape(highlighter: Highlighter) {
        let html = highlighter.classify("<script>alert(1)</script>");

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;"));
    }

    #[rstest]
    #[case("<a b=\"1\"   c = \"2\"  />")]
    #[case("<?xml version=\"1.0\"?><!--x--><r><![CDATA[y]]></r>")]
    #[case("text with < and > & friends")]
    #[case("<a\tb=\"1\">")]
    fn markup_only_adds_spans(highlighter: Highlighter, #[case] text: &str) {
        assert_eq!(strip_markup(&highlighter.classify(text)), text);

        let joined = highlighter
            .tokenize(text)
            .iter()
            .map(|token| token.text)
            .collect::<String>();
        assert_eq!(joined, text);
    }
}
