//! Book metadata and its projection onto the document head.

use crate::markup::{Head, Link, Meta, Script, Style};
use serde::{Deserialize, Serialize};

/// Stylesheets every Bloom book links to.
pub const STANDARD_BLOOM_LINKS: [&str; 8] = [
    "basePage.css",
    "languageDisplay.css",
    "previewMode.css",
    "origami.css",
    "Basic Book.css",
    "Traditional-XMatter.css",
    "..\\settingsCollectionStyles.css",
    "..\\customCollectionStyles.css",
];

pub const DEFAULT_COVER_STYLES: [&str; 1] = [
    "DIV.coverColor TEXTAREA { background-color: #C2A6BF !important; }\r\n\
     DIV.bloom-page.coverColor { background-color: #C2A6BF !important }",
];

pub const DEFAULT_USER_MODIFIED_STYLES: [&str; 1] = [
    ".BigWords-style { font-size: 45pt ! important; text-align: center ! important; }\r\n\
     .Credits-Page-style[lang=\"en\"] { font-size: 8pt ! important; }\r\n\
     .Credits-Page-style { font-size: 8pt ! important; }",
];

pub const DEFAULT_FORMAT_VERSION: &str = "2.0";
pub const DEFAULT_CHARSET: &str = "UTF-8";
pub const DEFAULT_TEMPLATE_SOURCE: &str = "Basic Book";
pub const GENERATOR: &str = concat!("ps2bloom ", env!("CARGO_PKG_VERSION"));

/// Title attribute marking styles the user may edit in Bloom.
const USER_MODIFIED_STYLES_TITLE: &str = "userModifiedStyles";

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub links: Vec<String>,
    pub script: Option<String>,
    pub format_version: String,
    pub charset: String,
    pub template_source: String,
    pub generator: String,
    pub cover_styles: Vec<String>,
    pub user_modified_styles: Vec<String>,
    pub locked_down_as_shell: bool,
}

impl Metadata {
    /// Standard Bloom metadata for a book with the given title.
    ///
    /// Each call returns an independent copy of the default tables.
    pub fn default_for(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            links: to_owned_list(&STANDARD_BLOOM_LINKS),
            script: None,
            format_version: DEFAULT_FORMAT_VERSION.to_string(),
            charset: DEFAULT_CHARSET.to_string(),
            template_source: DEFAULT_TEMPLATE_SOURCE.to_string(),
            generator: GENERATOR.to_string(),
            cover_styles: to_owned_list(&DEFAULT_COVER_STYLES),
            user_modified_styles: to_owned_list(&DEFAULT_USER_MODIFIED_STYLES),
            locked_down_as_shell: true,
        }
    }

    /// Project the metadata onto a document head.
    pub fn to_head(&self) -> Head {
        Head {
            title: self.title.clone(),
            script: self
                .script
                .as_ref()
                .filter(|s| !s.is_empty())
                .map(|src| Script {
                    src: src.clone(),
                    script_type: "text/javascript".to_string(),
                }),
            links: self
                .links
                .iter()
                .map(|href| Link {
                    href: href.clone(),
                    rel: "stylesheet".to_string(),
                    link_type: "text/css".to_string(),
                })
                .collect(),
            styles: self.styles(),
            metas: vec![
                Meta::Charset(self.charset.clone()),
                Meta::named("Generator", &self.generator),
                Meta::named("BloomFormatVersion", &self.format_version),
                Meta::named("pageTemplateSource", &self.template_source),
                Meta::named("lockedDownAsShell", self.locked_down_as_shell.to_string()),
            ],
        }
    }

    fn styles(&self) -> Vec<Style> {
        let cover = self.cover_styles.iter().map(|css| Style {
            css: css.clone(),
            style_type: "text/css".to_string(),
            title: None,
        });
        let user_modified = self.user_modified_styles.iter().map(|css| Style {
            css: css.clone(),
            style_type: "text/css".to_string(),
            title: Some(USER_MODIFIED_STYLES_TITLE.to_string()),
        });
        cover.chain(user_modified).collect()
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta_names(head: &Head) -> Vec<String> {
        head.metas
            .iter()
            .map(|m| match m {
                Meta::Charset(_) => "charset".to_string(),
                Meta::Named { name, .. } => name.clone(),
            })
            .collect()
    }

    #[test]
    fn test_default_head() {
        let head = Metadata::default_for("X").to_head();

        assert_eq!(head.title, "X");
        assert!(head.script.is_none());
        assert_eq!(head.links.len(), 8);
        assert!(head.links.iter().all(|l| l.rel == "stylesheet" && l.link_type == "text/css"));
        assert_eq!(head.links[0].href, "basePage.css");
        assert_eq!(head.links[7].href, "..\\customCollectionStyles.css");

        assert_eq!(head.styles.len(), 2);
        assert_eq!(head.styles[0].title, None);
        assert_eq!(head.styles[1].title.as_deref(), Some("userModifiedStyles"));

        assert_eq!(
            meta_names(&head),
            vec![
                "charset",
                "Generator",
                "BloomFormatVersion",
                "pageTemplateSource",
                "lockedDownAsShell"
            ]
        );
        assert_eq!(head.metas[4], Meta::named("lockedDownAsShell", "true"));
    }

    #[test]
    fn test_default_head_element_has_single_title() {
        let element = Metadata::default_for("X").to_head().to_element();
        assert_eq!(element.find_all("title").len(), 1);
        assert_eq!(element.find_all("link").len(), 8);
        assert!(element.find_all("script").is_empty());
    }

    #[test]
    fn test_overrides_are_projected() {
        let mut metadata = Metadata::default_for("X");
        metadata.script = Some("bloomPlayer.js".to_string());
        metadata.links = vec!["b.css".to_string(), "a.css".to_string()];
        metadata.cover_styles.clear();
        metadata.user_modified_styles = vec!["one".to_string(), "two".to_string()];
        metadata.locked_down_as_shell = false;

        let head = metadata.to_head();

        assert_eq!(head.script.unwrap().src, "bloomPlayer.js");
        let hrefs: Vec<_> = head.links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["b.css", "a.css"]);
        let css: Vec<_> = head.styles.iter().map(|s| s.css.as_str()).collect();
        assert_eq!(css, vec!["one", "two"]);
        assert_eq!(head.metas[4], Meta::named("lockedDownAsShell", "false"));
    }

    #[test]
    fn test_empty_script_is_absent() {
        let mut metadata = Metadata::default_for("X");
        metadata.script = Some(String::new());
        assert!(metadata.to_head().script.is_none());
    }

    #[test]
    fn test_defaults_are_independent_copies() {
        let mut first = Metadata::default_for("A");
        first.links.clear();
        let second = Metadata::default_for("B");
        assert_eq!(second.links.len(), STANDARD_BLOOM_LINKS.len());
    }
}
