//! Document-order navigation over a parsed page.
//!
//! Wiki values are located relative to a label: "the `span.top` just before
//! the label", "the `<ul>` right after the heading". [`Elements`] flattens a
//! subtree into pre-order so those lookups become index scans.

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{Result, ScraperError};

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScraperError::InvalidSelector(format!("{}: {}", css, e)))
}

/// Elements of a subtree in document order, root included.
pub struct Elements<'a> {
    items: Vec<ElementRef<'a>>,
}

impl<'a> Elements<'a> {
    pub fn of(root: ElementRef<'a>) -> Self {
        Self {
            items: root.descendants().filter_map(ElementRef::wrap).collect(),
        }
    }

    pub fn of_document(document: &'a Html) -> Self {
        Self::of(document.root_element())
    }

    pub fn get(&self, index: usize) -> Option<ElementRef<'a>> {
        self.items.get(index).copied()
    }

    /// Index of the first element matching `tag` whose own string matches `label`.
    pub fn find_labelled(&self, tag: &Selector, label: &Regex) -> Option<usize> {
        self.items.iter().position(|el| {
            tag.matches(el) && own_string(*el).is_some_and(|text| label.is_match(&text))
        })
    }

    /// Index of the first element matching `sel`.
    pub fn find(&self, sel: &Selector) -> Option<usize> {
        self.items.iter().position(|el| sel.matches(el))
    }

    /// Closest element before `from` matching `sel`. Ancestors count as "before".
    pub fn find_previous(&self, from: usize, sel: &Selector) -> Option<ElementRef<'a>> {
        let end = from.min(self.items.len());
        self.items[..end].iter().rev().find(|el| sel.matches(el)).copied()
    }

    /// Index of the first element after `from` matching `sel`. Descendants count as "after".
    pub fn find_next(&self, from: usize, sel: &Selector) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .skip(from + 1)
            .find(|(_, el)| sel.matches(el))
            .map(|(i, _)| i)
    }

    pub fn filter<'s>(&'s self, sel: &'s Selector) -> impl Iterator<Item = ElementRef<'a>> + 's {
        self.items.iter().copied().filter(move |el| sel.matches(el))
    }
}

/// The element's single string, if it has exactly one child and that child
/// is text (or an element that itself has a single string).
pub fn own_string(el: ElementRef<'_>) -> Option<String> {
    let mut children = el.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    match only.value() {
        Node::Text(text) => Some(String::from(&**text)),
        Node::Element(_) => ElementRef::wrap(only).and_then(own_string),
        _ => None,
    }
}

/// All text below the element, concatenated.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Text of the element's `n`th child node (text node or element).
pub fn nth_content(el: ElementRef<'_>, n: usize) -> Option<String> {
    let node = el.children().nth(n)?;
    match node.value() {
        Node::Text(text) => Some(String::from(&**text)),
        Node::Element(_) => ElementRef::wrap(node).map(text_of),
        _ => None,
    }
}

/// First descendant of `el` (excluding itself) matching `sel`.
pub fn first_descendant<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|child| sel.matches(child))
}

/// Text node right after the first descendant matching `sel`,
/// e.g. the number following an icon `<div>`.
pub fn text_after<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<String> {
    let marker = first_descendant(el, sel)?;
    let sibling = marker.next_sibling()?;
    sibling.value().as_text().map(|text| String::from(&**text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_string_follows_single_children() {
        let html = Html::parse_fragment(
            "<p id=a>plain</p><p id=b><b>nested</b></p><p id=c>two <i>parts</i></p>",
        );
        let get = |id: &str| {
            let sel = selector(&format!("#{}", id)).unwrap();
            html.select(&sel).next().unwrap()
        };
        assert_eq!(own_string(get("a")).as_deref(), Some("plain"));
        assert_eq!(own_string(get("b")).as_deref(), Some("nested"));
        assert_eq!(own_string(get("c")), None);
    }

    #[test]
    fn previous_and_next_are_document_order() {
        let html = Html::parse_fragment(
            r#"<span class="top">1</span><span class="top">2</span>
               <span>Label</span><span class="top">3</span>"#,
        );
        let elements = Elements::of(html.root_element());
        let label = elements
            .find_labelled(&selector("span").unwrap(), &Regex::new("Label").unwrap())
            .unwrap();
        let top = selector("span.top").unwrap();
        assert_eq!(text_of(elements.find_previous(label, &top).unwrap()), "2");
        let next = elements.find_next(label, &top).unwrap();
        assert_eq!(text_of(elements.get(next).unwrap()), "3");
    }

    #[test]
    fn contents_by_position() {
        let html = Html::parse_fragment(r#"<span class="top">-8<br>+20</span>"#);
        let span = html.select(&selector("span").unwrap()).next().unwrap();
        assert_eq!(nth_content(span, 0).as_deref(), Some("-8"));
        assert_eq!(nth_content(span, 2).as_deref(), Some("+20"));
        assert_eq!(nth_content(span, 3), None);
    }

    #[test]
    fn text_after_icon() {
        let html = Html::parse_fragment("<span class=top><div class=icon></div>\n7.5\n</span>");
        let span = html.select(&selector("span").unwrap()).next().unwrap();
        assert_eq!(
            text_after(span, &selector("div").unwrap()).as_deref(),
            Some("\n7.5\n")
        );
    }
}
