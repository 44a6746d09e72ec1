//! HTML serialization of the document tree.

use super::{Element, Node};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub(super) fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text { text } => escape_into(out, text, false),
        Node::Element(element) => write_element(out, element),
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.tag);
    for attr in &element.attrs {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        escape_into(out, &attr.value, true);
        out.push('"');
    }
    out.push('>');

    if is_void(&element.tag) {
        return;
    }
    for child in &element.children {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

fn escape_into(out: &mut String, s: &str, attribute: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::document::{Document, Element, Node};

    #[test]
    fn link_fragment() {
        let doc = Document::from_element(
            Element::new("a").with_attr("href", "README.md").with_text("README.md"),
        );
        assert_eq!(doc.to_html(), r#"<a href="README.md">README.md</a>"#);
    }

    #[test]
    fn void_image_has_no_closing_tag() {
        let doc = Document::from_element(Element::new("img").with_attr("src", "logo.png"));
        assert_eq!(doc.to_html(), r#"<img src="logo.png">"#);
    }

    #[test]
    fn escapes_text_and_attribute_values() {
        let doc = Document::new(vec![
            Element::new("a")
                .with_attr("title", "say \"hi\" & <go>")
                .with_text("1 < 2 & \"q\"")
                .into(),
            Node::text(">"),
        ]);
        assert_eq!(
            doc.to_html(),
            r#"<a title="say &quot;hi&quot; &amp; <go>">1 &lt; 2 &amp; "q"</a>&gt;"#
        );
    }

    #[test]
    fn empty_document() {
        assert_eq!(Document::default().to_html(), "");
    }
}
