//! Regex repair passes over converted Markdown.
//!
//! Conversion leaves emphasis markers glued to neighbouring text, split over
//! block boundaries, or padded with spaces on the inside, and list markers
//! with ragged spacing. Each pass below fixes one of those defects. Later
//! passes assume earlier ones have already normalized whitespace, so the
//! table order is fixed.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

/// Characters that count as a word for marker adjacency (ASCII and Polish letters).
const WORD: &str = "[A-Za-z0-9ąćęłńóśźżĄĆĘŁŃÓŚŹŻ]";

/// A `**bold**` span with no whitespace just inside either marker.
const BOLD_SPAN: &str = r"\*\*[^*\s](?:[^*\n]*[^*\s])?\*\*";

/// An `_italic_` span with no whitespace just inside either marker.
const ITALIC_SPAN: &str = r"_[^_\s](?:[^_\n]*[^_\s])?_";

/// Stands in for a link destination while the passes run.
const DESTINATION_MASK: char = '\u{E000}';

/// The `(url "title")` part of an inline link, escaped parentheses included.
static LINK_DESTINATION: Lazy<Regex> = Lazy::new(|| {
    compile(r#"\]\(((?:\\.|[^()\\\s])+(?:\s+"(?:\\.|[^"\\])*")?)\)"#)
});

struct RepairPass {
    name: &'static str,
    apply: fn(&str) -> String,
}

const PASSES: &[RepairPass] = &[
    RepairPass { name: "trim_inside_markers", apply: trim_inside_markers },
    RepairPass { name: "rejoin_split_markers", apply: rejoin_split_markers },
    RepairPass { name: "break_after_punctuation", apply: break_after_punctuation },
    RepairPass { name: "break_after_word", apply: break_after_word },
    RepairPass { name: "break_before_list_marker", apply: break_before_list_marker },
    RepairPass { name: "collapse_blank_lines", apply: collapse_blank_lines },
    RepairPass { name: "strip_trailing_whitespace", apply: strip_trailing_whitespace },
    RepairPass { name: "normalize_list_markers", apply: normalize_list_markers },
    RepairPass { name: "remove_empty_list_items", apply: remove_empty_list_items },
    RepairPass { name: "trim", apply: trim },
];

/// Run every repair pass, in order, over converter output or stored Markdown.
///
/// Link destinations are left untouched, so underscores in URLs never read as
/// emphasis.
///
/// ```rust
/// use pastemark::repair_markdown;
///
/// assert_eq!(repair_markdown("word**bold**"), "word\n\n**bold**");
/// assert_eq!(repair_markdown("** spaced **"), "**spaced**");
/// ```
pub fn repair_markdown(markdown: &str) -> String {
    let (masked, destinations) = mask_link_destinations(markdown);

    let repaired = PASSES.iter().fold(masked, |text, pass| {
        let repaired = (pass.apply)(&text);
        if repaired != text {
            trace!(pass = pass.name, "repair pass changed markdown");
        }
        repaired
    });

    unmask_link_destinations(&repaired, &destinations)
}

fn mask_link_destinations(md: &str) -> (String, Vec<String>) {
    if md.contains(DESTINATION_MASK) {
        return (md.to_string(), Vec::new());
    }

    let mut destinations = Vec::new();
    let masked = LINK_DESTINATION.replace_all(md, |caps: &Captures| {
        destinations.push(caps[1].to_string());
        format!("]({})", DESTINATION_MASK)
    });
    (masked.into_owned(), destinations)
}

fn unmask_link_destinations(md: &str, destinations: &[String]) -> String {
    if destinations.is_empty() {
        return md.to_string();
    }

    let mut destinations = destinations.iter();
    let mut restored = String::with_capacity(md.len());
    for c in md.chars() {
        if c == DESTINATION_MASK {
            if let Some(destination) = destinations.next() {
                restored.push_str(destination);
                continue;
            }
        }
        restored.push(c);
    }
    restored
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

/// `** bold **` → `**bold**`, `_ italic _` → `_italic_`
fn trim_inside_markers(md: &str) -> String {
    static BOLD: Lazy<Regex> = Lazy::new(|| compile(r"\*\*([^*\n]+?)\*\*"));
    static ITALIC: Lazy<Regex> = Lazy::new(|| compile(r"(^|[^\\])_([^_\n]+?)_"));

    let md = BOLD.replace_all(md, |caps: &Captures| {
        let inner = caps[1].trim();
        if inner.is_empty() {
            caps[0].to_string()
        } else {
            format!("**{}**", inner)
        }
    });
    ITALIC
        .replace_all(&md, |caps: &Captures| {
            let inner = caps[2].trim();
            if inner.is_empty() {
                caps[0].to_string()
            } else {
                format!("{}_{}_", &caps[1], inner)
            }
        })
        .into_owned()
}

/// `**bold\n**\n` → `**bold**\n\n`
fn rejoin_split_markers(md: &str) -> String {
    static BOLD: Lazy<Regex> = Lazy::new(|| {
        compile(r"(?m)(^|[\s(])\*\*([^*\s][^*\n]*?)[ \t]*\n+[ \t]*\*\*[ \t]*(\n|$)")
    });
    static ITALIC: Lazy<Regex> = Lazy::new(|| {
        compile(r"(?m)(^|[\s(])_([^_\s][^_\n]*?)[ \t]*\n+[ \t]*_[ \t]*(\n|$)")
    });

    let md = BOLD.replace_all(md, "${1}**${2}**\n\n");
    ITALIC.replace_all(&md, "${1}_${2}_\n\n").into_owned()
}

/// `word.**bold**` → `word.\n\n**bold**`
fn break_after_punctuation(md: &str) -> String {
    static BOLD: Lazy<Regex> = Lazy::new(|| compile(&format!(r"([).!?;:,])({})", BOLD_SPAN)));
    static ITALIC: Lazy<Regex> =
        Lazy::new(|| compile(&format!(r"([).!?;:,])({})(\W|$)", ITALIC_SPAN)));

    let md = BOLD.replace_all(md, "${1}\n\n${2}");
    ITALIC.replace_all(&md, "${1}\n\n${2}${3}").into_owned()
}

/// `word**bold**` → `word\n\n**bold**`
fn break_after_word(md: &str) -> String {
    static BOLD: Lazy<Regex> = Lazy::new(|| compile(&format!(r"({})({})", WORD, BOLD_SPAN)));
    static ITALIC: Lazy<Regex> =
        Lazy::new(|| compile(&format!(r"({})({})(\W|$)", WORD, ITALIC_SPAN)));

    let md = BOLD.replace_all(md, "${1}\n\n${2}");
    ITALIC.replace_all(&md, "${1}\n\n${2}${3}").into_owned()
}

/// `**bold**- item` → `**bold**\n\n- item`
fn break_before_list_marker(md: &str) -> String {
    static BOLD: Lazy<Regex> = Lazy::new(|| compile(&format!(r"({})(- |\d+\. )", BOLD_SPAN)));
    static ITALIC: Lazy<Regex> =
        Lazy::new(|| compile(&format!(r"({})(- |\d+\. )", ITALIC_SPAN)));

    let md = BOLD.replace_all(md, "${1}\n\n${2}");
    ITALIC.replace_all(&md, "${1}\n\n${2}").into_owned()
}

fn collapse_blank_lines(md: &str) -> String {
    static BLANK_LINES: Lazy<Regex> = Lazy::new(|| compile(r"\n{3,}"));
    BLANK_LINES.replace_all(md, "\n\n").into_owned()
}

/// Strip trailing whitespace from each line, except a two-space hard break
/// that still has a line to break onto.
fn strip_trailing_whitespace(md: &str) -> String {
    let lines: Vec<&str> = md.split('\n').collect();

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let trimmed = line.trim_end();
            let continues = lines.get(i + 1).is_some_and(|next| !next.trim().is_empty());
            if continues && !trimmed.is_empty() && line.ends_with("  ") {
                format!("{}  ", trimmed)
            } else {
                trimmed.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `-   item` → `- item`, `1.  item` → `1. item`
fn normalize_list_markers(md: &str) -> String {
    static MARKER: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^([ \t]*)([-*+]|\d+\.)[ \t]+"));
    MARKER.replace_all(md, "${1}${2} ").into_owned()
}

fn remove_empty_list_items(md: &str) -> String {
    static EMPTY_ITEM: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^[ \t]*([-*+]|\d+\.)[ \t]*$\n?"));
    EMPTY_ITEM.replace_all(md, "").into_owned()
}

fn trim(md: &str) -> String {
    md.trim().to_string()
}
