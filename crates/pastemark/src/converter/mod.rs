//! MarkdownConverter - the tree-walking HTML to Markdown engine.
//!
//! The converter parses a fragment with `scraper`, then walks it depth-first.
//! Each element is handed to the first rule that claims it, with its children
//! already converted. Text nodes have their whitespace collapsed the way a
//! browser would render it, and markdown-significant characters escaped.

mod options;
pub mod rules;
mod style;
pub mod utilities;

pub use options::{CodeBlockStyle, HeadingStyle, MarkdownOptions};
pub use rules::{Filter, Rule, Rules};

use scraper::{ElementRef, Html, Node};

use crate::{Error, Result};
use rules::{gfm, override_rules};
use utilities::{collapse_whitespace, escape_markdown, is_blank, is_block};

/// Elements whose content never belongs in Markdown output
const NOISE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head", "title"];

/// Walk state threaded through a single conversion.
#[derive(Debug)]
struct Context {
    in_pre: bool,
    in_code: bool,
    /// The last emitted text ended in whitespace, or a block boundary was crossed.
    trailing_space: bool,
}

impl Context {
    fn new() -> Self {
        Self {
            in_pre: false,
            in_code: false,
            trailing_space: true,
        }
    }
}

/// HTML to Markdown converter built from an ordered rule registry
pub struct MarkdownConverter {
    options: MarkdownOptions,
    rules: Rules,
}

impl MarkdownConverter {
    /// Create the paste converter with default options.
    ///
    /// Rules dispatch in this order: the paste override rules, the GFM plugin,
    /// then CommonMark.
    pub fn new() -> Self {
        Self::with_options(MarkdownOptions::default())
    }

    /// Create the paste converter with custom options
    pub fn with_options(options: MarkdownOptions) -> Self {
        let mut converter = Self::base(options);
        for (key, rule) in override_rules() {
            converter.add_rule(key, rule);
        }
        converter.use_plugin(gfm);
        converter.remove(Filter::tags(NOISE_ELEMENTS));
        converter
    }

    /// Create a converter with only the CommonMark rules
    pub fn base(options: MarkdownOptions) -> Self {
        Self {
            options,
            rules: Rules::new(),
        }
    }

    /// Convert an HTML fragment to Markdown.
    ///
    /// Fails when the options are invalid or the element tree is nested
    /// deeper than [`MarkdownOptions::max_depth`].
    pub fn convert(&self, html: &str) -> Result<String> {
        self.options.validate()?;

        let document = Html::parse_fragment(html);
        let mut ctx = Context::new();
        let output = self.process_children(document.root_element(), &mut ctx, 0)?;

        Ok(post_process(&output))
    }

    /// Add a rule. Rules added earlier take precedence.
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Keep elements matching the filter as HTML
    pub fn keep(&mut self, filter: Filter) -> &mut Self {
        self.rules.keep(filter);
        self
    }

    /// Remove elements matching the filter
    pub fn remove(&mut self, filter: Filter) -> &mut Self {
        self.rules.remove(filter);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Escape markdown special characters in a string
    pub fn escape(&self, text: &str) -> String {
        escape_markdown(text)
    }

    /// Get the current options
    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut MarkdownOptions {
        &mut self.options
    }

    /// Rule keys in the order they are tried
    pub fn rule_keys(&self) -> Vec<&str> {
        self.rules.keys().collect()
    }

    fn process_children(&self, element: ElementRef, ctx: &mut Context, depth: usize) -> Result<String> {
        let parent_is_block = is_block(element.value().name());
        let mut output = String::new();

        for child in element.children() {
            let rendered = match child.value() {
                Node::Text(text) => {
                    let before_boundary = child
                        .next_siblings()
                        .find_map(|sibling| match sibling.value() {
                            Node::Text(t) if t.text.trim().is_empty() => None,
                            Node::Text(_) => Some(false),
                            Node::Element(e) => Some(is_block(e.name()) || e.name() == "br"),
                            _ => None,
                        })
                        .unwrap_or(parent_is_block);
                    self.process_text(&text.text, before_boundary, ctx)
                }
                Node::Element(_) => match ElementRef::wrap(child) {
                    Some(child_element) => self.process_element(child_element, ctx, depth + 1)?,
                    None => continue,
                },
                _ => continue,
            };

            if !rendered.is_empty() {
                join(&mut output, &rendered);
            }
        }

        Ok(output)
    }

    fn process_text(&self, text: &str, before_boundary: bool, ctx: &mut Context) -> String {
        if ctx.in_pre {
            return text.to_string();
        }
        if ctx.in_code && self.options.preformatted_code {
            ctx.trailing_space = text.ends_with(char::is_whitespace);
            return text.to_string();
        }

        let mut text = collapse_whitespace(text);
        if ctx.trailing_space && text.starts_with(' ') {
            text.remove(0);
        }
        if before_boundary && text.ends_with(' ') {
            text.pop();
        }
        if text.is_empty() {
            return text;
        }

        ctx.trailing_space = text.ends_with(' ');
        if ctx.in_code {
            text
        } else {
            escape_markdown(&text)
        }
    }

    fn process_element(&self, element: ElementRef, ctx: &mut Context, depth: usize) -> Result<String> {
        if depth > self.options.max_depth {
            return Err(Error::Conversion(format!(
                "element nesting exceeds the maximum depth of {}",
                self.options.max_depth
            )));
        }

        let tag = element.value().name();
        let block = is_block(tag);

        if is_blank(&element) {
            return Ok(self.blank_replacement(&element, block, ctx));
        }

        let rule = self.rules.for_element(&element, &self.options).map(|(_, rule)| rule);
        if rule.is_none() {
            if self.rules.should_keep(&element, &self.options) {
                let html = element.html();
                ctx.trailing_space = block;
                return Ok(if block { format!("\n\n{}\n\n", html) } else { html });
            }
            if self.rules.should_remove(&element, &self.options) {
                return Ok(String::new());
            }
        }

        let (was_in_pre, was_in_code) = (ctx.in_pre, ctx.in_code);
        ctx.in_pre |= tag == "pre";
        ctx.in_code |= tag == "code";
        if block {
            ctx.trailing_space = true;
        }
        let content = self.process_children(element, ctx, depth)?;
        ctx.in_pre = was_in_pre;
        ctx.in_code = was_in_code;

        let (leading, inner, trailing) = if block || ctx.in_pre {
            ("", content.as_str(), "")
        } else {
            flanking_whitespace(&content)
        };

        let replacement = match rule {
            Some(rule) => rule.replace(&element, inner, &self.options),
            None if block => format!("\n\n{}\n\n", inner),
            None => inner.to_string(),
        };
        let output = format!("{}{}{}", leading, replacement, trailing);

        if block || tag == "br" {
            ctx.trailing_space = true;
        } else if !output.is_empty() {
            ctx.trailing_space = output.ends_with(char::is_whitespace);
        }

        Ok(output)
    }

    /// Blank blocks become a paragraph break; blank inline elements keep a
    /// single separating space if they held whitespace.
    fn blank_replacement(&self, element: &ElementRef, block: bool, ctx: &mut Context) -> String {
        if block {
            ctx.trailing_space = true;
            return "\n\n".to_string();
        }
        let has_whitespace = element.text().any(|t| !t.is_empty());
        if has_whitespace && !ctx.trailing_space && !ctx.in_pre {
            ctx.trailing_space = true;
            return " ".to_string();
        }
        String::new()
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Append a replacement, merging the newlines at the seam into a separator of
/// at most two.
fn join(output: &mut String, addition: &str) {
    let trailing = output.len() - output.trim_end_matches('\n').len();
    let body = addition.trim_start_matches('\n');
    let leading = addition.len() - body.len();
    let separator = trailing.max(leading).min(2);

    output.truncate(output.len() - trailing);
    output.extend(std::iter::repeat('\n').take(separator));
    output.push_str(body);
}

/// Split content into (leading whitespace, trimmed content, trailing whitespace)
fn flanking_whitespace(content: &str) -> (&str, &str, &str) {
    let start = content.trim_start();
    if start.is_empty() {
        return (content, "", "");
    }
    let leading = &content[..content.len() - start.len()];
    let inner = start.trim_end();
    let trailing = &start[inner.len()..];
    (leading, inner, trailing)
}

fn post_process(output: &str) -> String {
    // Leading spaces are kept: they may open an indented code block
    let result = output
        .trim_start_matches(['\n', '\r', '\t'])
        .trim_end();

    let mut newline_count = 0;
    let mut processed = String::with_capacity(result.len());

    for c in result.chars() {
        if c == '\n' {
            newline_count += 1;
            if newline_count <= 2 {
                processed.push(c);
            }
        } else {
            newline_count = 0;
            processed.push(c);
        }
    }

    processed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(html: &str) -> String {
        MarkdownConverter::new().convert(html).unwrap()
    }

    #[test]
    fn test_simple_paragraph() {
        assert_eq!(convert("<p>Hello World</p>"), "Hello World");
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        assert_eq!(convert("<p>One</p>\n\n<p>Two</p>"), "One\n\nTwo");
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(convert("<p>  Hello \n   world  </p>"), "Hello world");
    }

    #[test]
    fn test_flanking_whitespace_moves_outside_markers() {
        assert_eq!(convert("<p>a<b> b</b></p>"), "a **b**");
        assert_eq!(convert("<p><b>bold </b>text</p>"), "**bold** text");
    }

    #[test]
    fn test_blank_inline_element_keeps_space() {
        assert_eq!(convert("<p>a<span> </span>b</p>"), "a b");
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(convert("<p>2 * 3 = snake_case</p>"), r"2 \* 3 = snake\_case");
    }

    #[test]
    fn test_noise_elements_removed() {
        assert_eq!(convert("<p>text</p><script>alert(1)</script>"), "text");
    }

    #[test]
    fn test_unknown_inline_element_passes_content() {
        assert_eq!(convert("<p><mark>marked</mark></p>"), "marked");
    }

    #[test]
    fn test_keep_filter_emits_html() {
        let mut converter = MarkdownConverter::new();
        converter.keep(Filter::tag("sup"));
        assert_eq!(converter.convert("<p>x<sup>2</sup></p>").unwrap(), "x<sup>2</sup>");
    }

    #[test]
    fn test_escape() {
        let converter = MarkdownConverter::new();
        assert_eq!(converter.escape("1. *x*"), r"1\. \*x\*");
        assert_eq!(converter.escape("plain"), "plain");
    }

    #[test]
    fn test_options_mut_applies_to_next_conversion() {
        let mut converter = MarkdownConverter::new();
        converter.options_mut().strong_delimiter = "__".to_string();
        assert_eq!(converter.options().strong_delimiter, "__");
        assert_eq!(converter.convert("<p><b>x</b></p>").unwrap(), "__x__");
    }

    #[test]
    fn test_remove_with_predicate_filter() {
        let mut converter = MarkdownConverter::new();
        converter.remove(Filter::predicate(|tag, element, _| {
            tag == "aside" && element.value().attr("class") == Some("ad")
        }));
        assert_eq!(
            converter
                .convert(r#"<p>text</p><aside class="ad">buy</aside><aside>note</aside>"#)
                .unwrap(),
            "text\n\nnote"
        );
    }

    #[test]
    fn test_max_depth_exceeded() {
        let options = MarkdownOptions {
            max_depth: 3,
            ..Default::default()
        };
        let converter = MarkdownConverter::with_options(options);
        let err = converter
            .convert("<div><div><div><div><p>deep</p></div></div></div></div>")
            .unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = MarkdownOptions {
            strong_delimiter: String::new(),
            ..Default::default()
        };
        let converter = MarkdownConverter::with_options(options);
        assert!(matches!(converter.convert("<p>x</p>"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rule_keys_start_with_overrides() {
        let converter = MarkdownConverter::new();
        let keys = converter.rule_keys();
        assert_eq!(keys[0], "googleDocsBoldWrapper");
        assert_eq!(keys[1], "styledSpan");
        assert!(keys.contains(&"strikethrough"));
        assert_eq!(keys.last(), Some(&"image"));
    }

    #[test]
    fn test_join_merges_newlines() {
        let mut output = "a\n\n".to_string();
        join(&mut output, "\n\n\nb");
        assert_eq!(output, "a\n\nb");

        let mut output = "a".to_string();
        join(&mut output, "\nb");
        assert_eq!(output, "a\nb");
    }

    #[test]
    fn test_flanking_whitespace() {
        assert_eq!(flanking_whitespace(" x "), (" ", "x", " "));
        assert_eq!(flanking_whitespace("x"), ("", "x", ""));
        assert_eq!(flanking_whitespace("  "), ("  ", "", ""));
    }
}
