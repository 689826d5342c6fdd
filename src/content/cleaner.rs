//! Field value cleanup: markup stripping and media reference rewriting

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use scraper::{Html, Node};

/// Label of the hyperlink that replaces an audio tag in spreadsheets.
pub const AUDIO_LINK_LABEL: &str = "Play Audio";

/// Exported media filename -> path relative to the export file
pub type MediaMap = HashMap<String, String>;

/// How media references are rendered in the export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// Plain relative path, for delimited text
    #[default]
    Path,
    /// `=HYPERLINK(...)` formula, for spreadsheets
    Hyperlink,
}

fn sound_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[sound:(.*?)\]").expect("sound tag pattern is valid"))
}

/// Extract the visible text from a field value.
///
/// Text without a `<` is returned as is. Anything else is parsed as an HTML
/// fragment; every text node outside `script`/`style` is trimmed, empty
/// nodes are dropped, and the rest are joined with a single space. The HTML
/// parser recovers from any input, so malformed markup still yields its text.
pub fn strip_markup(text: &str) -> String {
    if !text.contains('<') {
        return text.to_string();
    }

    let fragment = Html::parse_fragment(text);
    let mut parts: Vec<&str> = Vec::new();

    for node in fragment.tree.root().descendants() {
        let Node::Text(t) = node.value() else {
            continue;
        };
        if node.ancestors().any(|a| is_invisible(a.value())) {
            continue;
        }
        let trimmed = t.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

fn is_invisible(node: &Node) -> bool {
    node.as_element()
        .map(|el| matches!(el.name(), "script" | "style" | "template"))
        .unwrap_or(false)
}

/// Replace `[sound:<file>]` tags whose file was exported.
///
/// Tags naming a file that is not in `media` are left verbatim.
pub fn rewrite_media_references(text: &str, media: &MediaMap, style: LinkStyle) -> String {
    sound_tag_regex()
        .replace_all(text, |caps: &Captures| {
            let filename = &caps[1];
            match media.get(filename) {
                Some(path) => match style {
                    LinkStyle::Path => path.clone(),
                    LinkStyle::Hyperlink => {
                        format!("=HYPERLINK(\"{}\", \"{}\")", path, AUDIO_LINK_LABEL)
                    }
                },
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Rewrite media references (when any media was exported) and strip markup.
pub fn clean_field(raw: &str, media: &MediaMap, style: LinkStyle) -> String {
    if media.is_empty() {
        strip_markup(raw)
    } else {
        strip_markup(&rewrite_media_references(raw, media, style))
    }
}
