//! GitHub-flavored Markdown plugin: tables, strikethrough and task lists.

use scraper::ElementRef;

use super::{Filter, Rule};
use crate::converter::utilities::parent_tag;
use crate::converter::MarkdownConverter;

/// Install the GFM rules on a converter.
///
/// Tables whose first row is not a heading row cannot be expressed as a GFM
/// table and are kept as raw HTML.
pub fn gfm(converter: &mut MarkdownConverter) {
    converter
        .add_rule("strikethrough", strikethrough_rule())
        .add_rule("taskListItems", task_list_item_rule())
        .add_rule("tableCell", table_cell_rule())
        .add_rule("tableRow", table_row_rule())
        .add_rule("tableSection", table_section_rule())
        .add_rule("table", table_rule())
        .keep(Filter::tags_where(&["table"], |node, _| !has_heading_row(node)));
}

fn strikethrough_rule() -> Rule {
    Rule::for_tags(&["del", "s", "strike"], |_, content, _| {
        if content.trim().is_empty() {
            return String::new();
        }
        format!("~~{}~~", content)
    })
}

fn task_list_item_rule() -> Rule {
    Rule::new(
        Filter::tags_where(&["input"], |node, _| {
            node.value().attr("type").is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
                && parent_tag(node) == Some("li")
        }),
        |node, _, _| {
            if node.value().attr("checked").is_some() {
                "[x] ".to_string()
            } else {
                "[ ] ".to_string()
            }
        },
    )
}

fn table_cell_rule() -> Rule {
    Rule::for_tags(&["th", "td"], |node, content, _| cell(content, node))
}

fn table_row_rule() -> Rule {
    Rule::for_tag("tr", |node, content, _| {
        let mut border_cells = String::new();
        if is_heading_row(node) {
            for cell_node in node.children().filter_map(ElementRef::wrap) {
                border_cells.push_str(&cell(alignment_border(&cell_node), &cell_node));
            }
        }

        if border_cells.is_empty() {
            format!("\n{}", content)
        } else {
            format!("\n{}\n{}", content, border_cells)
        }
    })
}

fn table_section_rule() -> Rule {
    Rule::for_tags(&["thead", "tbody", "tfoot"], |_, content, _| content.to_string())
}

fn table_rule() -> Rule {
    Rule::new(
        Filter::tags_where(&["table"], |node, _| has_heading_row(node)),
        |_, content, _| format!("\n\n{}\n\n", content.replace("\n\n", "\n")),
    )
}

fn cell(content: &str, node: &ElementRef) -> String {
    let is_first = node.prev_siblings().all(|n| !n.value().is_element());
    let prefix = if is_first { "| " } else { " " };
    let content = content.trim().replace('\n', " ").replace('|', "\\|");
    format!("{}{} |", prefix, content)
}

fn alignment_border(cell: &ElementRef) -> &'static str {
    let align = cell
        .value()
        .attr("align")
        .map(str::to_ascii_lowercase)
        .or_else(|| {
            cell.value()
                .attr("style")
                .and_then(text_align)
        })
        .unwrap_or_default();

    match align.as_str() {
        "left" => ":--",
        "right" => "--:",
        "center" => ":-:",
        _ => "---",
    }
}

fn text_align(style: &str) -> Option<String> {
    style.split(';').find_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        property
            .trim()
            .eq_ignore_ascii_case("text-align")
            .then(|| value.trim().to_ascii_lowercase())
    })
}

fn has_heading_row(table: &ElementRef) -> bool {
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "tr")
        .is_some_and(|row| is_heading_row(&row))
}

/// A row that becomes the GFM header: any row in `<thead>`, or a first row
/// made only of `<th>` cells.
fn is_heading_row(tr: &ElementRef) -> bool {
    let Some(parent) = tr.parent().and_then(ElementRef::wrap) else {
        return false;
    };
    if parent.value().name() == "thead" {
        return true;
    }

    let is_first_row = parent
        .children()
        .filter_map(ElementRef::wrap)
        .next()
        .is_some_and(|first| first.id() == tr.id());
    let in_first_section = parent.value().name() == "table" || is_first_tbody(&parent);

    is_first_row
        && in_first_section
        && tr
            .children()
            .filter_map(ElementRef::wrap)
            .all(|cell| cell.value().name() == "th")
}

fn is_first_tbody(section: &ElementRef) -> bool {
    if section.value().name() != "tbody" {
        return false;
    }
    match section.prev_siblings().find_map(ElementRef::wrap) {
        None => true,
        Some(previous) => {
            previous.value().name() == "thead" && previous.text().all(|t| t.trim().is_empty())
        }
    }
}
