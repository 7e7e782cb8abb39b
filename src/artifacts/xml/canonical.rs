//! Canonical rendering of XML parts
//!
//! Office tools re-save parts with wildly different whitespace: a part
//! written by Word is one long line, the same part round-tripped through
//! another tool may be pretty-printed. Comparing them line by line only makes
//! sense after both are rendered in one fixed layout.
//!
//! ## Layout
//!
//! - one element per line, two spaces of indentation per depth level
//! - attributes in declaration order as `name="value"`
//! - `<tag/>` for elements with no child nodes at all
//! - text trimmed and placed on its own line, whitespace-only text dropped
//! - comments, CDATA and processing instructions inside the root kept verbatim
//!
//! Input that is not well-formed comes back untouched from [`canonicalize`].

use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};

const INDENT: &str = "  ";
const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, thiserror::Error)]
pub enum XmlParseError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),
    #[error("invalid UTF-8 in markup: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("closing tag </{0}> has no matching open tag")]
    UnexpectedClose(String),
    #[error("expected </{expected}>, found </{found}>")]
    MismatchedClose { expected: String, found: String },
    #[error("element <{0}> is never closed")]
    Unclosed(String),
    #[error("document has no root element")]
    MissingRoot,
    #[error("document has more than one root element")]
    MultipleRoots,
    #[error("content outside the root element")]
    StrayContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
    CData(String),
    Instruction(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    fn from_start(start: &BytesStart) -> Result<Self, XmlParseError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_owned();
        let attributes = start
            .attributes()
            .map(|attr| -> Result<(String, String), XmlParseError> {
                let attr = attr?;
                let key = std::str::from_utf8(attr.key.as_ref())?.to_owned();
                let value = attr.unescape_value()?.into_owned();
                Ok((key, value))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(XmlElement {
            name,
            attributes,
            children: Vec::new(),
        })
    }
}

/// Render `raw` in canonical form, or return it unchanged when it is not
/// well-formed XML
pub fn canonicalize(raw: &str) -> String {
    match try_canonicalize(raw) {
        Ok(canonical) => canonical,
        Err(err) => {
            tracing::debug!("keeping raw text, XML is not well-formed: {err}");
            raw.to_string()
        }
    }
}

/// Render `raw` in canonical form, reporting why it could not be parsed
pub fn try_canonicalize(raw: &str) -> Result<String, XmlParseError> {
    let root = parse_document(raw)?;
    let mut out = String::with_capacity(raw.len());
    write_element(&mut out, &root, 0);
    Ok(out)
}

fn parse_document(raw: &str) -> Result<XmlElement, XmlParseError> {
    let raw = raw.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw);

    let mut reader = Reader::from_str(raw);
    reader.trim_text(false);
    reader.check_end_names(true);

    let mut open = Vec::<XmlElement>::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if open.is_empty() && root.is_some() {
                    return Err(XmlParseError::MultipleRoots);
                }
                open.push(XmlElement::from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = XmlElement::from_start(&start)?;
                attach(&mut open, &mut root, XmlNode::Element(element))?;
            }
            Event::End(end) => {
                let found = std::str::from_utf8(end.name().as_ref())?.to_owned();
                let element = open
                    .pop()
                    .ok_or_else(|| XmlParseError::UnexpectedClose(found.clone()))?;
                if element.name != found {
                    return Err(XmlParseError::MismatchedClose {
                        expected: element.name,
                        found,
                    });
                }
                attach(&mut open, &mut root, XmlNode::Element(element))?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                match open.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Text(text.into_owned())),
                    None if text.trim().is_empty() => {}
                    None => return Err(XmlParseError::StrayContent),
                }
            }
            Event::CData(cdata) => {
                let data = cdata.into_inner();
                let data = std::str::from_utf8(&data)?.to_owned();
                match open.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::CData(data)),
                    None => return Err(XmlParseError::StrayContent),
                }
            }
            Event::Comment(comment) => {
                if let Some(parent) = open.last_mut() {
                    let comment = std::str::from_utf8(&comment)?.to_owned();
                    parent.children.push(XmlNode::Comment(comment));
                }
            }
            Event::PI(instruction) => {
                if let Some(parent) = open.last_mut() {
                    let instruction = std::str::from_utf8(&instruction)?.to_owned();
                    parent.children.push(XmlNode::Instruction(instruction));
                }
            }
            Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(element) = open.pop() {
        return Err(XmlParseError::Unclosed(element.name));
    }

    root.ok_or(XmlParseError::MissingRoot)
}

fn attach(
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    node: XmlNode,
) -> Result<(), XmlParseError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(node);
        return Ok(());
    }

    match node {
        XmlNode::Element(element) if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        XmlNode::Element(_) => Err(XmlParseError::MultipleRoots),
        _ => Err(XmlParseError::StrayContent),
    }
}

fn write_element(out: &mut String, element: &XmlElement, depth: usize) {
    let indent = INDENT.repeat(depth);

    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");

    let child_indent = INDENT.repeat(depth + 1);
    for child in &element.children {
        match child {
            XmlNode::Element(child) => write_element(out, child, depth + 1),
            XmlNode::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    push_line(out, &child_indent, &escape_text(text));
                }
            }
            XmlNode::Comment(comment) => {
                push_line(out, &child_indent, &format!("<!--{comment}-->"));
            }
            XmlNode::CData(data) => {
                push_line(out, &child_indent, &format!("<![CDATA[{data}]]>"));
            }
            XmlNode::Instruction(instruction) => {
                push_line(out, &child_indent, &format!("<?{instruction}?>"));
            }
        }
    }

    out.push_str(&indent);
    out.push_str("</");
    out.push_str(&element.name);
    out.push_str(">\n");
}

fn push_line(out: &mut String, indent: &str, line: &str) {
    out.push_str(indent);
    out.push_str(line);
    out.push('\n');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    fn nested_empty_element_is_self_closed() {
        assert_eq!(canonicalize("<a><b/></a>"), "<a>\n  <b/>\n</a>\n");
    }

    #[rstest]
    fn formatting_differences_vanish() {
        assert_eq!(
            canonicalize("<a><b/></a>"),
            canonicalize("<a>\n  <b/>\n</a>")
        );
        assert_eq!(
            canonicalize("<a>\n\n\t<b   x=\"1\"\n   y='2'/>   </a>"),
            "<a>\n  <b x=\"1\" y=\"2\"/>\n</a>\n"
        );
    }

    #[rstest]
    fn unterminated_input_is_returned_unchanged() {
        assert_eq!(canonicalize("<a><b>"), "<a><b>");
        assert!(matches!(
            try_canonicalize("<a><b>"),
            Err(XmlParseError::Unclosed(name)) if name == "b"
        ));
    }

    #[rstest]
    #[case::empty("")]
    #[case::plain_text("just some words")]
    #[case::mismatched("<a></b>")]
    #[case::stray_close("<a/></a>")]
    #[case::two_roots("<a/><b/>")]
    #[case::duplicate_attribute("<a x=\"1\" x=\"2\"/>")]
    #[case::unknown_entity("<a>&nope;</a>")]
    fn malformed_input_falls_back(#[case] raw: &str) {
        assert!(try_canonicalize(raw).is_err(), "{raw:?} should not parse");
        assert_eq!(canonicalize(raw), raw);
    }

    #[rstest]
    fn declaration_and_outer_comments_are_dropped() {
        let raw = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
                   <!-- generated -->\r\n<Types><Default Extension=\"xml\"/></Types>";

        assert_eq!(
            canonicalize(raw),
            "<Types>\n  <Default Extension=\"xml\"/>\n</Types>\n"
        );
    }

    #[rstest]
    fn text_is_trimmed_onto_its_own_line() {
        let raw = "<w:p><w:r><w:t xml:space=\"preserve\">  Hello world </w:t></w:r></w:p>";

        assert_eq!(
            canonicalize(raw),
            "<w:p>\n  <w:r>\n    <w:t xml:space=\"preserve\">\n      Hello world\n    </w:t>\n  </w:r>\n</w:p>\n"
        );
    }

    #[rstest]
    fn whitespace_only_text_still_counts_as_a_child() {
        assert_eq!(canonicalize("<a> </a>"), "<a>\n</a>\n");
        assert_eq!(canonicalize("<a></a>"), "<a/>\n");
    }

    #[rstest]
    fn namespace_declarations_keep_their_order() {
        let raw = "<w:document xmlns:wpc=\"urn:a\" mc:Ignorable=\"w14\" xmlns:w=\"urn:w\"/>";

        assert_eq!(
            canonicalize(raw),
            "<w:document xmlns:wpc=\"urn:a\" mc:Ignorable=\"w14\" xmlns:w=\"urn:w\"/>\n"
        );
    }

    #[rstest]
    fn special_characters_are_escaped_again() {
        let raw = "<a title=\"&quot;x&quot; &amp; y\">1 &lt; 2</a>";
        let canonical = canonicalize(raw);

        assert_eq!(
            canonical,
            "<a title=\"&quot;x&quot; &amp; y\">\n  1 &lt; 2\n</a>\n"
        );
        assert_eq!(canonicalize(&canonical), canonical);
    }

    #[rstest]
    fn comments_cdata_and_instructions_are_kept() {
        let raw = "<a><!-- note --><![CDATA[1 < 2]]><?mso-application progid?></a>";

        assert_eq!(
            canonicalize(raw),
            "<a>\n  <!-- note -->\n  <![CDATA[1 < 2]]>\n  <?mso-application progid?>\n</a>\n"
        );
    }

    #[rstest]
    fn byte_order_mark_is_ignored() {
        assert_eq!(canonicalize("\u{feff}<a/>"), "<a/>\n");
    }

    #[rstest]
    #[case("<a><b/></a>")]
    #[case("<root a=\"1\"><x>text<y/>tail</x><!--c--><z q='&amp;'/></root>")]
    #[case("<a>\n  <b>\n    multi\n    line\n  </b>\n</a>")]
    #[case("<a> </a>")]
    fn canonical_form_is_a_fixed_point(#[case] raw: &str) {
        let once = canonicalize(raw);
        assert_eq!(canonicalize(&once), once);
    }

    fn escaped(raw: &str) -> String {
        raw.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }

    fn element_name() -> impl Strategy<Value = String> {
        prop_oneof![Just("a"), Just("w:p"), Just("x"), Just("r:id")].prop_map(str::to_string)
    }

    fn attribute() -> impl Strategy<Value = String> {
        proptest::option::of("[a-z &<>\"']{0,6}")
            .prop_map(|value| value.map_or_else(String::new, |v| format!(" k=\"{}\"", escaped(&v))))
    }

    fn separator() -> impl Strategy<Value = String> {
        "[ \n\t]{0,3}"
    }

    fn node() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            "[a-z &<>]{1,8}".prop_map(|text| escaped(&text)),
            (element_name(), attribute()).prop_map(|(name, attr)| format!("<{name}{attr}/>")),
            Just("<!--note-->".to_string()),
        ];

        leaf.prop_recursive(4, 48, 4, |inner| {
            (
                element_name(),
                attribute(),
                proptest::collection::vec((separator(), inner), 0..4),
            )
                .prop_map(|(name, attr, children)| {
                    let body = children
                        .into_iter()
                        .map(|(gap, child)| gap + &child)
                        .collect::<String>();
                    format!("<{name}{attr}>{body}</{name}>")
                })
        })
    }

    fn document() -> impl Strategy<Value = String> {
        (element_name(), proptest::collection::vec((separator(), node()), 0..4)).prop_map(
            |(name, children)| {
                let body = children
                    .into_iter()
                    .map(|(gap, child)| gap + &child)
                    .collect::<String>();
                format!("<{name}>{body}</{name}>")
            },
        )
    }

    proptest! {
        #[test]
        fn prop_canonical_form_is_idempotent(raw in document()) {
            let once = try_canonicalize(&raw);
            prop_assert!(once.is_ok(), "{raw:?} should parse: {once:?}");

            let once = canonicalize(&raw);
            prop_assert_eq!(canonicalize(&once), once);
        }
    }
}
