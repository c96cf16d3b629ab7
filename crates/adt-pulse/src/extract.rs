//! Declarative lookups over parsed portal pages.
//!
//! Every "which tag, which attribute" decision lives in a [`Locator`] built
//! by the caller; the functions here only walk the tree. Nothing in this
//! module decides whether a missing node is an error.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Node, Selector};

/// A test applied to one attribute of a candidate element.
#[derive(Debug, Clone)]
pub enum AttrPredicate {
    /// Exact, case-sensitive equality.
    Equals(&'static str, &'static str),
    /// ASCII case-insensitive equality.
    EqualsIgnoreCase(&'static str, &'static str),
    /// ASCII case-insensitive match against any of several values.
    OneOfIgnoreCase(&'static str, &'static [&'static str]),
    /// ASCII case-insensitive suffix.
    EndsWithIgnoreCase(&'static str, &'static str),
}

impl AttrPredicate {
    fn matches(&self, el: &ElementRef<'_>) -> bool {
        match self {
            AttrPredicate::Equals(name, want) => attr(el, name) == Some(*want),
            AttrPredicate::EqualsIgnoreCase(name, want) => {
                attr(el, name).is_some_and(|v| v.eq_ignore_ascii_case(want))
            }
            AttrPredicate::OneOfIgnoreCase(name, wants) => attr(el, name)
                .is_some_and(|v| wants.iter().any(|w| v.eq_ignore_ascii_case(w))),
            AttrPredicate::EndsWithIgnoreCase(name, suffix) => attr(el, name).is_some_and(|v| {
                v.to_ascii_lowercase()
                    .ends_with(&suffix.to_ascii_lowercase())
            }),
        }
    }
}

/// Tag name plus attribute predicates, all of which must hold.
#[derive(Debug, Clone)]
pub struct Locator {
    tag: &'static str,
    predicates: Vec<AttrPredicate>,
}

impl Locator {
    pub fn tag(tag: &'static str) -> Self {
        Self {
            tag,
            predicates: Vec::new(),
        }
    }

    pub fn attr_eq(mut self, name: &'static str, value: &'static str) -> Self {
        self.predicates.push(AttrPredicate::Equals(name, value));
        self
    }

    pub fn attr_eq_ignore_case(mut self, name: &'static str, value: &'static str) -> Self {
        self.predicates
            .push(AttrPredicate::EqualsIgnoreCase(name, value));
        self
    }

    pub fn attr_one_of_ignore_case(
        mut self,
        name: &'static str,
        values: &'static [&'static str],
    ) -> Self {
        self.predicates
            .push(AttrPredicate::OneOfIgnoreCase(name, values));
        self
    }

    pub fn attr_ends_with(mut self, name: &'static str, suffix: &'static str) -> Self {
        self.predicates
            .push(AttrPredicate::EndsWithIgnoreCase(name, suffix));
        self
    }

    /// Whether an element satisfies this locator.
    pub fn matches(&self, el: &ElementRef<'_>) -> bool {
        el.value().name().eq_ignore_ascii_case(self.tag)
            && self.predicates.iter().all(|p| p.matches(el))
    }
}

/// First element in document order matching the locator.
pub fn find_first<'a>(doc: &'a Html, locator: &Locator) -> Option<ElementRef<'a>> {
    find_all(doc, locator).into_iter().next()
}

/// All elements matching the locator, in document order.
pub fn find_all<'a>(doc: &'a Html, locator: &Locator) -> Vec<ElementRef<'a>> {
    let selector = match Selector::parse(locator.tag) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    doc.select(&selector)
        .filter(|el| locator.matches(el))
        .collect()
}

/// Attribute value, if present.
pub fn attr<'a>(el: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

/// Concatenated text of an element and its descendants, untouched.
pub fn inner_text(el: &ElementRef<'_>) -> String {
    el.text().collect()
}

/// Text of the node immediately after `el`, whether that node is a text
/// run or an element.
pub fn next_sibling_text(el: &ElementRef<'_>) -> Option<String> {
    let sibling = el.next_sibling()?;
    match sibling.value() {
        Node::Text(text) => {
            let s: &str = text;
            Some(s.to_string())
        }
        Node::Element(_) => ElementRef::wrap(sibling).map(|e| inner_text(&e)),
        _ => None,
    }
}

/// Label for a form control: the `value` of the `<input type="submit">`
/// that shares its parent.
pub fn sibling_submit_value<'a>(el: &ElementRef<'a>) -> Option<&'a str> {
    let parent = el.parent()?;
    let submit = Locator::tag("input").attr_eq_ignore_case("type", "submit");
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| submit.matches(child))
        .and_then(|child| attr(&child, "value"))
}

/// Every named `<input>` on the page, first value per name. A missing
/// `value` attribute reads as empty.
pub fn form_values(doc: &Html) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for input in find_all(doc, &Locator::tag("input")) {
        let name = match attr(&input, "name") {
            Some(n) if !n.is_empty() => n,
            _ => continue,
        };
        values
            .entry(name.to_string())
            .or_insert_with(|| attr(&input, "value").unwrap_or("").to_string());
    }
    values
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Display form of a status label: colons removed, whitespace collapsed.
pub fn normalize_label(text: &str) -> String {
    collapse_whitespace(&text.replace(':', ""))
}
