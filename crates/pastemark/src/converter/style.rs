//! Inline `style` attribute parsing for weight and slant.

/// Font weight and style declared inline on an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
}

impl InlineStyle {
    /// Parse the declarations we care about from a `style` attribute.
    ///
    /// Later declarations win, as in CSS.
    pub fn parse(style: &str) -> Self {
        let mut parsed = Self::default();

        for declaration in style.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase();
            if value.is_empty() {
                continue;
            }
            match property.trim().to_ascii_lowercase().as_str() {
                "font-weight" => parsed.font_weight = Some(value),
                "font-style" => parsed.font_style = Some(value),
                _ => {}
            }
        }

        parsed
    }

    pub fn is_empty(&self) -> bool {
        self.font_weight.is_none() && self.font_style.is_none()
    }

    /// `bold`, `bolder`, or a numeric weight of at least 600.
    pub fn is_bold(&self) -> bool {
        match self.font_weight.as_deref() {
            Some("bold") | Some("bolder") => true,
            Some(weight) => weight.parse::<u16>().map(|w| w >= 600).unwrap_or(false),
            None => false,
        }
    }

    /// `normal` or `400`: the marker Google Docs puts on its wrapper.
    pub fn is_normal_weight(&self) -> bool {
        matches!(self.font_weight.as_deref(), Some("normal") | Some("400"))
    }

    pub fn is_italic(&self) -> bool {
        matches!(
            self.font_style.as_deref(),
            Some(style) if style == "italic" || style.starts_with("oblique")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declarations() {
        let style = InlineStyle::parse("color: red; FONT-WEIGHT: 700; font-style:italic");
        assert_eq!(style.font_weight.as_deref(), Some("700"));
        assert_eq!(style.font_style.as_deref(), Some("italic"));
    }

    #[test]
    fn test_bold_threshold() {
        assert!(InlineStyle::parse("font-weight:600").is_bold());
        assert!(InlineStyle::parse("font-weight:bold").is_bold());
        assert!(InlineStyle::parse("font-weight:bolder").is_bold());
        assert!(!InlineStyle::parse("font-weight:500").is_bold());
        assert!(!InlineStyle::parse("font-weight:normal").is_bold());
        assert!(!InlineStyle::parse("font-weight:lighter").is_bold());
    }

    #[test]
    fn test_italic() {
        assert!(InlineStyle::parse("font-style: italic").is_italic());
        assert!(InlineStyle::parse("font-style: oblique 10deg").is_italic());
        assert!(!InlineStyle::parse("font-style: normal").is_italic());
    }

    #[test]
    fn test_normal_weight_and_important() {
        assert!(InlineStyle::parse("font-weight:normal !important").is_normal_weight());
        assert!(InlineStyle::parse("font-weight: 400").is_normal_weight());
        assert!(InlineStyle::parse("").is_empty());
    }
}
