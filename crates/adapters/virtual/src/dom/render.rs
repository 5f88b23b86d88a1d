//! HTML serialisation and text extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::{Child, Element};

const VOID_ELEMENTS: [&str; 6] = ["br", "hr", "img", "input", "link", "meta"];

pub(super) fn outer_html(element: &Element) -> String {
    let mut html = format!("<{}", element.tag);
    for (name, value) in &element.attributes {
        html.push_str(&format!(" {name}=\"{}\"", escape(value, true)));
    }
    html.push('>');
    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return html;
    }
    html.push_str(&inner_html(&element.children));
    html.push_str(&format!("</{}>", element.tag));
    html
}

pub(super) fn inner_html(children: &[Child]) -> String {
    children
        .iter()
        .map(|child| match child {
            Child::Element(element) => outer_html(&element.borrow()),
            Child::Text(text) => escape(text, false),
            Child::Html(html) => html.clone(),
        })
        .collect()
}

pub(super) fn text(children: &[Child]) -> String {
    children
        .iter()
        .map(|child| match child {
            Child::Element(element) => text(&element.borrow().children),
            Child::Text(text) => text.clone(),
            Child::Html(html) => unescape(&strip_tags(html)),
        })
        .collect()
}

fn escape(text: &str, attribute: bool) -> String {
    if attribute {
        html_escape::encode_double_quoted_attribute(text).into_owned()
    } else {
        html_escape::encode_text(text).into_owned()
    }
}

fn strip_tags(html: &str) -> String {
    static TAG: LazyLock<Regex> =
        LazyLock::new(|| Regex::new("<[^>]*>").expect("valid tag pattern"));
    TAG.replace_all(html, "").into_owned()
}

fn unescape(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_escape_text_and_attributes_differently() {
        assert_eq!(escape(r#"<a href="x">&"#, false), r#"&lt;a href="x"&gt;&amp;"#);
        assert_eq!(
            escape(r#"<a href="x">&"#, true),
            "&lt;a href=&quot;x&quot;&gt;&amp;"
        );
    }

    #[test]
    fn should_strip_markup_from_text() {
        assert_eq!(
            unescape(&strip_tags("<progress value=\"3\">3%</progress> &amp;lt;")),
            "3% &lt;"
        );
    }

    #[test]
    fn should_decode_named_and_numeric_entities() {
        assert_eq!(
            unescape("Tom&#39;s &#x27;eco&#x27; &quot;mode&quot; &nbsp;&lt;&#60;"),
            "Tom's 'eco' \"mode\" \u{a0}<<"
        );
    }
}
