//! HTML output for assembled books.
//!
//! Renders a markup tree as an HTML document with one element per line,
//! indented by nesting depth.

use crate::markup::{Element, Node};
use quick_xml::escape::{escape, partial_escape};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &["meta", "link", "img", "br"];

/// Elements whose content is written verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

/// Serializer for Bloom-compatible HTML output.
#[derive(Debug, Clone)]
pub struct HtmlSerializer {
    /// Spaces per nesting level.
    indent: usize,
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl HtmlSerializer {
    /// Create a serializer with the default two-space indent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom indent width (0 for no indentation).
    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.indent = spaces;
        self
    }

    /// Serialize a tree rooted at `<html>` into a complete document.
    ///
    /// # Example output
    /// ```text
    /// <!DOCTYPE html>
    /// <html>
    ///   <head>
    ///     <title>My Book</title>
    ///   </head>
    /// </html>
    /// ```
    pub fn serialize(&self, root: &Element) -> String {
        let mut out = String::from("<!DOCTYPE html>\n");
        self.write_element(&mut out, root, 0);
        out
    }

    fn write_element(&self, out: &mut String, element: &Element, depth: usize) {
        self.write_indent(out, depth);
        out.push('<');
        out.push_str(&element.name);
        for (key, value) in &element.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&element.name.as_str()) {
            out.push('\n');
            return;
        }

        let raw = RAW_TEXT_ELEMENTS.contains(&element.name.as_str());
        let has_child_elements = element
            .children
            .iter()
            .any(|c| matches!(c, Node::Element(_)));

        if has_child_elements {
            out.push('\n');
            for child in &element.children {
                match child {
                    Node::Element(e) => self.write_element(out, e, depth + 1),
                    Node::Text(t) => {
                        self.write_indent(out, depth + 1);
                        out.push_str(&partial_escape(t.as_str()));
                        out.push('\n');
                    }
                }
            }
            self.write_indent(out, depth);
        } else {
            for child in &element.children {
                if let Node::Text(t) = child {
                    if raw {
                        out.push_str(t);
                    } else {
                        out.push_str(&partial_escape(t.as_str()));
                    }
                }
            }
        }

        out.push_str("</");
        out.push_str(&element.name);
        out.push_str(">\n");
    }

    fn write_indent(&self, out: &mut String, depth: usize) {
        out.extend(std::iter::repeat(' ').take(depth * self.indent));
    }
}
