//! Rule and Filter types for HTML conversion.

use scraper::ElementRef;

use crate::converter::MarkdownOptions;

/// Produces Markdown for a matched element from its converted children.
pub type ReplacementFn =
    Box<dyn Fn(&ElementRef, &str, &MarkdownOptions) -> String + Send + Sync>;

/// Decides whether an element (with its lowercase tag name) is handled.
pub type PredicateFn = Box<dyn Fn(&str, &ElementRef, &MarkdownOptions) -> bool + Send + Sync>;

/// A filter determines which elements a rule applies to
pub enum Filter {
    /// Match any of the listed tag names
    Tags(Vec<String>),
    /// Match using a predicate function
    Predicate(PredicateFn),
    /// Match the listed tag names, then ask the predicate
    TagsWhere(Vec<String>, PredicateFn),
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::Tags(vec![name.to_lowercase()])
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::Tags(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &ElementRef, &MarkdownOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Create a filter for the given tags narrowed by a predicate.
    ///
    /// The predicate only runs for elements whose tag is listed.
    pub fn tags_where<F>(names: &[&str], f: F) -> Self
    where
        F: Fn(&ElementRef, &MarkdownOptions) -> bool + Send + Sync + 'static,
    {
        Filter::TagsWhere(
            names.iter().map(|s| s.to_lowercase()).collect(),
            Box::new(move |_, element, options| f(element, options)),
        )
    }

    /// Check if this filter matches an element
    pub fn matches(&self, tag: &str, element: &ElementRef, options: &MarkdownOptions) -> bool {
        let tag = tag.to_lowercase();
        match self {
            Filter::Tags(tags) => tags.contains(&tag),
            Filter::Predicate(f) => f(&tag, element, options),
            Filter::TagsWhere(tags, f) => tags.contains(&tag) && f(&tag, element, options),
        }
    }
}

/// A rule defines how to convert a matched HTML element to Markdown
pub struct Rule {
    pub filter: Filter,
    pub replacement: ReplacementFn,
}

impl Rule {
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&ElementRef, &str, &MarkdownOptions) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(&ElementRef, &str, &MarkdownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&ElementRef, &str, &MarkdownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), replacement)
    }

    pub fn matches(&self, tag: &str, element: &ElementRef, options: &MarkdownOptions) -> bool {
        self.filter.matches(tag, element, options)
    }

    /// Apply this rule's replacement
    pub fn replace(&self, element: &ElementRef, content: &str, options: &MarkdownOptions) -> String {
        (self.replacement)(element, content, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector).next().unwrap()
    }

    #[test]
    fn test_tag_filters_are_case_insensitive() {
        let html = Html::parse_fragment("<p>x</p>");
        let p = first(&html, "p");
        let options = MarkdownOptions::default();

        assert!(Filter::tag("P").matches("p", &p, &options));
        assert!(Filter::tags(&["div", "p"]).matches("P", &p, &options));
        assert!(!Filter::tag("div").matches("p", &p, &options));
    }

    #[test]
    fn test_tags_where_checks_tag_before_predicate() {
        let html = Html::parse_fragment(r#"<span class="x">a</span><b class="x">b</b>"#);
        let options = MarkdownOptions::default();
        let filter = Filter::tags_where(&["span"], |el, _| el.value().attr("class") == Some("x"));

        assert!(filter.matches("span", &first(&html, "span"), &options));
        assert!(!filter.matches("b", &first(&html, "b"), &options));
    }

    #[test]
    fn test_rule_replace() {
        let html = Html::parse_fragment("<em>x</em>");
        let rule = Rule::for_tag("em", |_, content, options| {
            format!("{0}{1}{0}", options.em_delimiter, content)
        });
        let em = first(&html, "em");
        let options = MarkdownOptions::default();
        assert!(rule.matches("em", &em, &options));
        assert_eq!(rule.replace(&em, "x", &options), "_x_");
    }
}
