//! Markup-agnostic document tree handed to the serializer.

use serde::{Deserialize, Serialize};

/// A node in the output tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Add a child element.
    pub fn child(mut self, element: Element) -> Self {
        self.children.push(Node::Element(element));
        self
    }

    /// Add several child elements.
    pub fn children(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(elements.into_iter().map(Node::Element));
        self
    }

    /// Add a text child.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// All descendant elements with the given name, depth first.
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        for child in self.elements() {
            if child.name == name {
                found.push(child);
            }
            found.extend(child.find_all(name));
        }
        found
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .map(|n| match n {
                Node::Text(t) => t.clone(),
                Node::Element(e) => e.text_content(),
            })
            .collect()
    }
}

/// `<link>` in the document head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub link_type: String,
}

/// `<style>` in the document head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub css: String,
    pub style_type: String,
    pub title: Option<String>,
}

/// `<script>` in the document head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub src: String,
    pub script_type: String,
}

/// `<meta>` in the document head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meta {
    Charset(String),
    Named { name: String, content: String },
}

impl Meta {
    pub fn named(name: impl Into<String>, content: impl Into<String>) -> Self {
        Meta::Named {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// The document head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    pub title: String,
    pub script: Option<Script>,
    pub links: Vec<Link>,
    pub styles: Vec<Style>,
    pub metas: Vec<Meta>,
}

impl Head {
    /// Convert to a `<head>` element: metas, title, script, links, styles.
    pub fn to_element(&self) -> Element {
        let mut head = Element::new("head");

        for meta in &self.metas {
            head = head.child(match meta {
                Meta::Charset(charset) => Element::new("meta").attr("charset", charset),
                Meta::Named { name, content } => Element::new("meta")
                    .attr("name", name)
                    .attr("content", content),
            });
        }

        head = head.child(Element::new("title").text(&self.title));

        if let Some(script) = &self.script {
            head = head.child(
                Element::new("script")
                    .attr("src", &script.src)
                    .attr("type", &script.script_type),
            );
        }

        for link in &self.links {
            head = head.child(
                Element::new("link")
                    .attr("rel", &link.rel)
                    .attr("href", &link.href)
                    .attr("type", &link.link_type),
            );
        }

        for style in &self.styles {
            let mut element = Element::new("style").attr("type", &style.style_type);
            if let Some(title) = &style.title {
                element = element.attr("title", title);
            }
            head = head.child(element.text(&style.css));
        }

        head
    }
}
