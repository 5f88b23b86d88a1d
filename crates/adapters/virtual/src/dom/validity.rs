//! Constraint validation for virtual form controls.

use gateway_ui_view::Node;
use regex::Regex;

use super::VNode;

/// Elements listed by `HTMLFieldSetElement.elements`.
const LISTED: [&str; 7] = [
    "button", "fieldset", "input", "object", "output", "select", "textarea",
];

/// Validity of one element. A fieldset is barred from validation and is
/// always valid, whatever its controls hold; a form checks its controls.
pub(super) fn check(node: &VNode) -> bool {
    match node.tag().as_str() {
        "form" => listed_controls(node).iter().all(control_is_valid),
        _ => control_is_valid(node),
    }
}

/// The listed controls of a fieldset, in tree order.
pub(super) fn form_controls(node: &VNode) -> Vec<VNode> {
    if node.tag() == "fieldset" {
        listed_controls(node)
    } else {
        Vec::new()
    }
}

fn listed_controls(node: &VNode) -> Vec<VNode> {
    node.descendants()
        .into_iter()
        .filter(|node| LISTED.contains(&node.tag().as_str()))
        .collect()
}

fn control_is_valid(node: &VNode) -> bool {
    if !matches!(node.tag().as_str(), "input" | "select" | "textarea") || node.is_disabled() {
        return true;
    }
    let required = node.has_attribute("required");
    let kind = node.attribute("type").unwrap_or_default();
    if kind == "checkbox" {
        return !required || node.checked();
    }

    let value = node.value();
    if value.is_empty() {
        return !required;
    }
    if kind == "number" && !number_in_range(node, &value) {
        return false;
    }
    if let Some(pattern) = node.attribute("pattern") {
        match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(pattern) if !pattern.is_match(&value) => return false,
            Ok(_) => {}
            Err(error) => tracing::debug!(%error, "ignoring invalid pattern"),
        }
    }
    let too_long = node
        .attribute("maxlength")
        .and_then(|max| max.parse::<usize>().ok())
        .is_some_and(|max| value.chars().count() > max);
    !too_long
}

fn number_in_range(node: &VNode, value: &str) -> bool {
    let Ok(number) = value.trim().parse::<f64>() else {
        return false;
    };
    let bound = |name: &str| {
        node.attribute(name)
            .and_then(|bound| bound.parse::<f64>().ok())
    };
    bound("min").is_none_or(|min| number >= min) && bound("max").is_none_or(|max| number <= max)
}

#[cfg(test)]
mod tests {
    use super::super::VirtualDocument;
    use super::*;

    fn input(document: &VirtualDocument, attributes: &[(&str, &str)]) -> VNode {
        let input = document.create_element("input");
        for (name, value) in attributes {
            input.set_attribute(name, value);
        }
        input
    }

    #[test]
    fn should_require_a_value() {
        let document = VirtualDocument::new();
        let input = input(&document, &[("type", "text"), ("required", "")]);
        assert!(!check(&input));
        input.set_value("x");
        assert!(check(&input));
    }

    #[test]
    fn should_check_number_bounds() {
        let document = VirtualDocument::new();
        let input = input(&document, &[("type", "number"), ("min", "1"), ("max", "4")]);
        input.set_value("4");
        assert!(check(&input));
        input.set_value("5");
        assert!(!check(&input));
        input.set_value("abc");
        assert!(!check(&input));
    }

    #[test]
    fn should_match_whole_pattern() {
        let document = VirtualDocument::new();
        let input = input(&document, &[("type", "text"), ("pattern", "[a-z]+")]);
        input.set_value("abc");
        assert!(check(&input));
        input.set_value("abc1");
        assert!(!check(&input));
    }

    #[test]
    fn should_never_invalidate_fieldset_itself() {
        let document = VirtualDocument::new();
        let fieldset = document.create_element("fieldset");
        let broker = input(&document, &[("type", "text"), ("required", "")]);
        fieldset.append_child(&broker);
        assert!(check(&fieldset));
        assert!(!check(&broker));
    }

    #[test]
    fn should_list_fieldset_controls_in_tree_order() {
        let document = VirtualDocument::new();
        let fieldset = document.create_element("fieldset");
        let label = document.create_element("label");
        let first = input(&document, &[("type", "text")]);
        let nested = document.create_element("fieldset");
        let second = document.create_element("select");
        let button = document.create_element("button");
        fieldset.append_child(&label);
        label.append_child(&first);
        fieldset.append_child(&nested);
        nested.append_child(&second);
        fieldset.append_child(&button);

        assert_eq!(form_controls(&fieldset), vec![first, nested, second, button]);
        assert!(form_controls(&label).is_empty());
    }

    #[test]
    fn should_skip_controls_of_disabled_fieldset() {
        let document = VirtualDocument::new();
        let fieldset = document.create_element("fieldset");
        let broker = input(&document, &[("type", "text"), ("required", "")]);
        fieldset.append_child(&broker);
        assert!(!check(&broker));
        fieldset.set_attribute("disabled", "");
        assert!(check(&broker));
    }

    #[test]
    fn should_check_every_control_of_a_form() {
        let document = VirtualDocument::new();
        let form = document.create_element("form");
        let fieldset = document.create_element("fieldset");
        let broker = input(&document, &[("type", "text"), ("required", "")]);
        form.append_child(&fieldset);
        fieldset.append_child(&broker);
        assert!(!check(&form));
        broker.set_value("10.0.0.2");
        assert!(check(&form));
    }

    #[test]
    fn should_limit_length_in_characters() {
        let document = VirtualDocument::new();
        let input = input(&document, &[("type", "text"), ("maxlength", "3")]);
        input.set_value("äöü");
        assert!(check(&input));
        input.set_value("abcd");
        assert!(!check(&input));
    }
}
