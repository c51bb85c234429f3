//! CommonMark rules for HTML to Markdown conversion.

use scraper::ElementRef;

use super::{Filter, Rule};
use crate::converter::utilities::{clean_attribute, parent_tag, text_content};
use crate::converter::{CodeBlockStyle, HeadingStyle};

/// Create all CommonMark rules, keyed by name, in dispatch order
pub fn commonmark_rules() -> Vec<(&'static str, Rule)> {
    vec![
        ("paragraph", paragraph_rule()),
        ("lineBreak", line_break_rule()),
        ("heading", heading_rule()),
        ("blockquote", blockquote_rule()),
        ("list", list_rule()),
        ("listItem", list_item_rule()),
        ("indentedCodeBlock", indented_code_block_rule()),
        ("fencedCodeBlock", fenced_code_block_rule()),
        ("horizontalRule", horizontal_rule()),
        ("inlineLink", inline_link_rule()),
        ("emphasis", emphasis_rule()),
        ("strong", strong_rule()),
        ("code", code_rule()),
        ("image", image_rule()),
    ]
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |_, content, _| format!("\n\n{}\n\n", content))
}

fn line_break_rule() -> Rule {
    Rule::for_tag("br", |_, _, _| "  \n".to_string())
}

fn heading_rule() -> Rule {
    Rule::for_tags(&["h1", "h2", "h3", "h4", "h5", "h6"], |node, content, options| {
        let level = heading_level(node);

        match options.heading_style {
            HeadingStyle::Setext if level <= 2 => {
                let underline = if level == 1 { "=" } else { "-" };
                format!(
                    "\n\n{}\n{}\n\n",
                    content,
                    underline.repeat(content.chars().count())
                )
            }
            _ => format!("\n\n{} {}\n\n", "#".repeat(level), content),
        }
    })
}

/// Heading level from an `h1`..`h6` tag name
pub(crate) fn heading_level(node: &ElementRef) -> usize {
    node.value().name()[1..]
        .parse::<usize>()
        .unwrap_or(1)
        .clamp(1, 6)
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content, _| {
        let content = content.trim_matches('\n');
        let quoted: Vec<String> = content.lines().map(|line| format!("> {}", line)).collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule() -> Rule {
    Rule::for_tags(&["ul", "ol"], |node, content, _| {
        let parent = node.parent().and_then(ElementRef::wrap);
        let is_last_in_item = parent
            .filter(|p| p.value().name() == "li")
            .and_then(|p| p.children().filter_map(ElementRef::wrap).last())
            .map(|last| last.id() == node.id())
            .unwrap_or(false);

        if is_last_in_item {
            format!("\n{}", content)
        } else {
            format!("\n\n{}\n\n", content)
        }
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("li", |node, content, options| {
        let content = content.trim_start_matches('\n');
        let body = content.trim_end_matches('\n');
        let content = if body.len() < content.len() {
            format!("{}\n", body)
        } else {
            body.to_string()
        };
        // Indent continuation lines
        let content = content.replace('\n', "\n    ");

        let prefix = if parent_tag(node) == Some("ol") {
            let start = node
                .parent()
                .and_then(ElementRef::wrap)
                .and_then(|ol| ol.value().attr("start"))
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(1);
            let index = node.prev_siblings().filter(|n| n.value().is_element()).count() as u64;
            format!("{}.  ", start + index)
        } else {
            format!("{}   ", options.bullet_list_marker)
        };

        let has_next = node.next_siblings().any(|n| {
            n.value().is_element() || n.value().as_text().is_some_and(|t| !t.trim().is_empty())
        });
        let separator = if has_next && !content.ends_with('\n') { "\n" } else { "" };

        format!("{}{}{}", prefix, content, separator)
    })
}

/// The `<code>` child of a `<pre>`, when it is the pre's first element
pub(crate) fn code_child<'a>(pre: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    pre.children()
        .filter_map(ElementRef::wrap)
        .next()
        .filter(|child| child.value().name() == "code")
}

fn indented_code_block_rule() -> Rule {
    Rule::new(
        Filter::tags_where(&["pre"], |node, options| {
            options.code_block_style == CodeBlockStyle::Indented && code_child(node).is_some()
        }),
        |node, _, _| {
            let code = code_child(node).map(|c| text_content(&c)).unwrap_or_default();
            format!("\n\n    {}\n\n", code.replace('\n', "\n    "))
        },
    )
}

fn fenced_code_block_rule() -> Rule {
    Rule::new(
        Filter::tags_where(&["pre"], |node, options| {
            options.code_block_style == CodeBlockStyle::Fenced && code_child(node).is_some()
        }),
        |node, _, options| {
            let Some(code_node) = code_child(node) else {
                return String::new();
            };
            let code = text_content(&code_node);

            let language = code_node
                .value()
                .attr("class")
                .unwrap_or("")
                .split_whitespace()
                .find_map(|c| c.strip_prefix("language-"))
                .unwrap_or("");

            let fence = fence_for(&code, &options.fence);
            format!(
                "\n\n{}{}\n{}\n{}\n\n",
                fence,
                language,
                code.strip_suffix('\n').unwrap_or(&code),
                fence
            )
        },
    )
}

/// Lengthen the fence until no run of fence characters in the code can close it
fn fence_for(code: &str, fence: &str) -> String {
    let Some(fence_char) = fence.chars().next() else {
        return "```".to_string();
    };
    let longest_run = code
        .lines()
        .map(|line| line.trim_start())
        .filter(|line| line.starts_with(fence_char))
        .map(|line| line.chars().take_while(|&c| c == fence_char).count())
        .max()
        .unwrap_or(0);

    let size = (longest_run + 1).max(fence.chars().count()).max(3);
    std::iter::repeat(fence_char).take(size).collect()
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("hr", |_, _, options| format!("\n\n{}\n\n", options.hr))
}

fn inline_link_rule() -> Rule {
    Rule::new(
        Filter::tags_where(&["a"], |node, _| node.value().attr("href").is_some()),
        |node, content, _| {
            let href = clean_attribute(node.value().attr("href"))
                .replace('(', "\\(")
                .replace(')', "\\)");
            let title = clean_attribute(node.value().attr("title"));

            let title_part = if title.is_empty() {
                String::new()
            } else {
                format!(" \"{}\"", title.replace('"', "\\\""))
            };

            format!("[{}]({}{})", content, href, title_part)
        },
    )
}

fn emphasis_rule() -> Rule {
    Rule::for_tags(&["em", "i"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        format!("{0}{1}{0}", options.em_delimiter, content)
    })
}

fn strong_rule() -> Rule {
    Rule::for_tags(&["strong", "b"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        format!("{0}{1}{0}", options.strong_delimiter, content)
    })
}

fn code_rule() -> Rule {
    Rule::new(
        Filter::tags_where(&["code"], |node, _| {
            // A lone <code> inside <pre> belongs to the code block rules
            let has_siblings = node.prev_sibling().is_some() || node.next_sibling().is_some();
            parent_tag(node) != Some("pre") || has_siblings
        }),
        |_, content, _| {
            if content.is_empty() {
                return String::new();
            }
            let content = content.replace("\r\n", " ").replace(['\r', '\n'], " ");

            let longest_run = content
                .split(|c| c != '`')
                .map(str::len)
                .max()
                .unwrap_or(0);
            let delimiter = "`".repeat(longest_run + 1);

            let needs_space = content.starts_with('`')
                || content.ends_with('`')
                || (content.starts_with(' ')
                    && content.ends_with(' ')
                    && !content.trim().is_empty());
            let space = if needs_space { " " } else { "" };

            format!("{0}{1}{2}{1}{0}", delimiter, space, content)
        },
    )
}

fn image_rule() -> Rule {
    Rule::for_tag("img", |node, _, _| {
        let alt = clean_attribute(node.value().attr("alt"));
        let src = clean_attribute(node.value().attr("src"));
        let title = clean_attribute(node.value().attr("title"));

        if src.is_empty() {
            return String::new();
        }

        let title_part = if title.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", title)
        };

        format!("![{}]({}{})", alt, src, title_part)
    })
}
