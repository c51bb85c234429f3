//! Rule system for HTML to Markdown conversion.
//!
//! Dispatch is first-match-wins: custom rules in the order they were added,
//! then the built-in CommonMark rules. Elements no rule claims go through the
//! keep filters (emitted as raw HTML), then the remove filters (dropped).

mod commonmark;
mod gfm;
mod overrides;
mod rule;

pub use commonmark::commonmark_rules;
pub use gfm::gfm;
pub use overrides::{
    bold_rule, div_paragraph_rule, google_docs_bold_wrapper_rule, heading_rule, italic_rule,
    line_break_rule, nested_list_rule, override_rules, paragraph_rule, plain_span_rule,
    styled_span_rule,
};
pub use rule::{Filter, PredicateFn, ReplacementFn, Rule};

use indexmap::IndexMap;
use scraper::ElementRef;

use crate::converter::MarkdownOptions;

/// Collection of rules for conversion
pub struct Rules {
    /// Custom rules added by the user (checked first, in insertion order)
    custom_rules: IndexMap<String, Rule>,
    /// Keep rules (preserve as HTML)
    keep_rules: Vec<Filter>,
    /// Remove rules (remove entirely)
    remove_rules: Vec<Filter>,
    /// Built-in CommonMark rules
    commonmark_rules: IndexMap<String, Rule>,
}

impl Rules {
    /// Create a new Rules instance with CommonMark rules
    pub fn new() -> Self {
        Self {
            custom_rules: IndexMap::new(),
            keep_rules: Vec::new(),
            remove_rules: Vec::new(),
            commonmark_rules: commonmark_rules()
                .into_iter()
                .map(|(key, rule)| (key.to_string(), rule))
                .collect(),
        }
    }

    /// Add a custom rule.
    ///
    /// Re-adding an existing key replaces the rule but keeps its position.
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.custom_rules.insert(key.to_string(), rule);
    }

    /// Add a keep filter
    pub fn keep(&mut self, filter: Filter) {
        self.keep_rules.push(filter);
    }

    /// Add a remove filter
    pub fn remove(&mut self, filter: Filter) {
        self.remove_rules.push(filter);
    }

    /// Find the first rule matching an element, with its key
    pub fn for_element<'a>(
        &'a self,
        element: &ElementRef,
        options: &MarkdownOptions,
    ) -> Option<(&'a str, &'a Rule)> {
        let tag = element.value().name();

        self.custom_rules
            .iter()
            .chain(self.commonmark_rules.iter())
            .map(|(key, rule)| (key.as_str(), rule))
            .find(|(_, rule)| rule.matches(tag, element, options))
    }

    /// Check if an element should be kept as HTML
    pub fn should_keep(&self, element: &ElementRef, options: &MarkdownOptions) -> bool {
        let tag = element.value().name();
        self.keep_rules
            .iter()
            .any(|filter| filter.matches(tag, element, options))
    }

    /// Check if an element should be removed
    pub fn should_remove(&self, element: &ElementRef, options: &MarkdownOptions) -> bool {
        let tag = element.value().name();
        self.remove_rules
            .iter()
            .any(|filter| filter.matches(tag, element, options))
    }

    /// Rule keys in dispatch order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.custom_rules
            .keys()
            .chain(self.commonmark_rules.keys())
            .map(String::as_str)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_custom_rules_precede_commonmark() {
        let mut rules = Rules::new();
        rules.add("shout", Rule::for_tag("p", |_, content, _| content.to_uppercase()));

        let html = Html::parse_fragment("<p>x</p>");
        let p = html.select(&Selector::parse("p").unwrap()).next().unwrap();
        let (key, rule) = rules.for_element(&p, &MarkdownOptions::default()).unwrap();
        assert_eq!(key, "shout");
        assert_eq!(rule.replace(&p, "x", &MarkdownOptions::default()), "X");
    }

    #[test]
    fn test_readding_a_key_keeps_position() {
        let mut rules = Rules::new();
        rules.add("first", Rule::for_tag("b", |_, c, _| c.to_string()));
        rules.add("second", Rule::for_tag("i", |_, c, _| c.to_string()));
        rules.add("first", Rule::for_tag("u", |_, c, _| c.to_string()));

        let keys: Vec<&str> = rules.keys().take(2).collect();
        assert_eq!(keys, vec!["first", "second"]);
    }

    #[test]
    fn test_keep_and_remove_filters() {
        let mut rules = Rules::new();
        rules.keep(Filter::tag("video"));
        rules.remove(Filter::tag("script"));

        let html = Html::parse_fragment("<video></video><script>x()</script>");
        let options = MarkdownOptions::default();
        let video = html.select(&Selector::parse("video").unwrap()).next().unwrap();
        let script = html.select(&Selector::parse("script").unwrap()).next().unwrap();

        assert!(rules.should_keep(&video, &options));
        assert!(!rules.should_remove(&video, &options));
        assert!(rules.should_remove(&script, &options));
    }
}
