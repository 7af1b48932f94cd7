//! Wikitext to plain-text reduction.
//!
//! Only what the extractor needs: link labels, headings and bullets survive;
//! templates, references, comments and inline markup are dropped. Line
//! structure is preserved.

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
static REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<ref[^>/]*/>|<ref[^>]*>.*?</ref>").expect("valid ref regex")
});
static TEMPLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[^{}]*\}\}").expect("valid template regex"));
static FILE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[\[(?:file|image):[^\[\]]*(?:\[\[[^\[\]]*\]\][^\[\]]*)*\]\]")
        .expect("valid file link regex")
});
static PIPED_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[[^\[\]|]*\|([^\[\]]*)\]\]").expect("valid piped link regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\[\]|]*)\]\]").expect("valid link regex"));
static EXTERNAL_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(?:https?:)?//[^\s\]]+(?:\s+([^\]]*))?\]").expect("valid external link regex")
});
static EMPHASIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'{2,}").expect("valid emphasis regex"));
static HTML_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid html tag regex"));

const ENTITIES: &[(&str, &str)] = &[
    ("&ndash;", "–"),
    ("&mdash;", "—"),
    ("&nbsp;", " "),
    ("&thinsp;", " "),
    ("&quot;", "\""),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
];

/// Reduces raw wikitext to the plain-text line stream.
pub fn plain_text(wikitext: &str) -> String {
    let text = COMMENT_RE.replace_all(wikitext, "");
    let text = REF_RE.replace_all(&text, "");
    let mut text = text.into_owned();

    // Innermost templates first until nested ones are gone.
    loop {
        let reduced = TEMPLATE_RE.replace_all(&text, "");
        if reduced == text {
            break;
        }
        text = reduced.into_owned();
    }

    let text = FILE_LINK_RE.replace_all(&text, "");
    let text = PIPED_LINK_RE.replace_all(&text, "$1");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = EXTERNAL_LINK_RE.replace_all(&text, "$1");
    let text = EMPHASIS_RE.replace_all(&text, "");
    let text = HTML_TAG_RE.replace_all(&text, "");

    let mut text = text.into_owned();
    for &(entity, replacement) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, replacement);
        }
    }

    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}
