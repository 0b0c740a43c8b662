//! Approximates a browser's `innerText` for a parsed element.
//!
//! There is no layout engine here, so "rendered" means: hidden subtrees and
//! non-content elements are dropped, block elements break lines, and ordinary
//! whitespace collapses outside preformatted elements.

use regex::Regex;
use scraper::node::Element;
use scraper::{ElementRef, Node};
use std::sync::LazyLock;

static ASCII_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\n\x0C]+").expect("static regex"));

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "template", "noscript", "head"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul", "textarea",
];

const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea", "listing", "xmp"];

/// True when the element itself hides its subtree: a `hidden` attribute or an
/// inline `display: none`.
pub fn hides_subtree(element: &Element) -> bool {
    element.attr("hidden").is_some() || element.attr("style").is_some_and(declares_display_none)
}

/// An element is visible when neither it nor any ancestor hides its subtree.
pub fn is_visible(element: ElementRef<'_>) -> bool {
    !hides_subtree(element.value())
        && element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .all(|ancestor| !hides_subtree(ancestor.value()))
}

fn declares_display_none(style: &str) -> bool {
    style.split(';').any(|declaration| {
        let Some((property, value)) = declaration.split_once(':') else {
            return false;
        };
        let value = value.trim();
        let value = value.strip_suffix("!important").unwrap_or(value).trim();
        property.trim().eq_ignore_ascii_case("display") && value.eq_ignore_ascii_case("none")
    })
}

pub fn rendered_text(element: ElementRef<'_>) -> String {
    let mut buffer = TextBuffer::default();
    let preformatted = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| PREFORMATTED_ELEMENTS.contains(&ancestor.value().name()));
    walk(element, preformatted, &mut buffer);
    buffer.finish()
}

fn walk(element: ElementRef<'_>, preformatted: bool, buffer: &mut TextBuffer) {
    let name = element.value().name();
    if SKIPPED_ELEMENTS.contains(&name) || hides_subtree(element.value()) {
        return;
    }
    if name == "br" {
        buffer.hard_break();
        return;
    }

    let block = BLOCK_ELEMENTS.contains(&name);
    let preformatted = preformatted || PREFORMATTED_ELEMENTS.contains(&name);
    if block {
        buffer.line_break();
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if preformatted {
                    buffer.push_preformatted(text);
                } else {
                    buffer.push_collapsed(text);
                }
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    walk(child, preformatted, buffer);
                }
            }
            _ => {}
        }
    }

    if block {
        buffer.line_break();
    }
}

#[derive(Default)]
struct TextBuffer {
    out: String,
    pending_break: bool,
}

impl TextBuffer {
    fn line_break(&mut self) {
        if !self.out.is_empty() {
            self.pending_break = true;
        }
    }

    fn hard_break(&mut self) {
        self.flush_break();
        self.trim_trailing_spaces();
        self.out.push('\n');
    }

    fn flush_break(&mut self) {
        if self.pending_break {
            self.trim_trailing_spaces();
            if !self.out.ends_with('\n') {
                self.out.push('\n');
            }
            self.pending_break = false;
        }
    }

    fn trim_trailing_spaces(&mut self) {
        let trimmed = self.out.trim_end_matches(' ').len();
        self.out.truncate(trimmed);
    }

    fn push_preformatted(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.flush_break();
        self.out.push_str(&text.replace('\u{a0}', " "));
    }

    fn push_collapsed(&mut self, text: &str) {
        let collapsed = ASCII_WHITESPACE.replace_all(text, " ");
        if collapsed.trim_matches(' ').is_empty() {
            if !collapsed.is_empty()
                && !self.pending_break
                && !self.out.is_empty()
                && !self.out.ends_with([' ', '\n'])
            {
                self.out.push(' ');
            }
            return;
        }

        self.flush_break();
        let mut piece: &str = &collapsed;
        if self.out.is_empty() || self.out.ends_with([' ', '\n']) {
            piece = piece.trim_start_matches(' ');
        }
        self.out.push_str(&piece.replace('\u{a0}', " "));
    }

    fn finish(self) -> String {
        self.out.trim().to_string()
    }
}
