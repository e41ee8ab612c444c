//! CSS / SCSS property usage tallies.
//!
//! Declarations are recognized line by line; there is no stylesheet parser.
//! A line such as `a:hover {` therefore counts as property `a`, which is
//! accepted noise for a usage overview.

pub mod report;

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::config::{CssConfig, PropertyFamily};
use crate::error::GleanError;

/// Family for properties no configured family claims.
pub const OTHER_FAMILY: &str = "other";

const IMPORTANT: &str = " !important";

/// Splits declaration lines and assigns properties to families.
#[derive(Debug, Clone)]
pub struct PropertyClassifier {
    property: Regex,
    families: Vec<PropertyFamily>,
    color_family: String,
}

impl PropertyClassifier {
    /// Builds a classifier from the `css` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`GleanError::Pattern`] if the declaration pattern fails to compile.
    pub fn new(config: &CssConfig) -> Result<Self, GleanError> {
        Ok(Self {
            property: Regex::new(r"^\s*([-\w]+)\s*:")?,
            families: config.families.clone(),
            color_family: config.color_family.clone(),
        })
    }

    /// Property and value of a `prop: value;` line, or `None` for anything else.
    #[must_use]
    pub fn parse_declaration(&self, line: &str) -> Option<(String, String)> {
        let stripped = line.trim();
        if stripped.is_empty() || ["//", "/*", "*", "@", "$", "#{"].iter().any(|p| stripped.starts_with(p)) {
            return None;
        }
        let caps = self.property.captures(stripped)?;
        let whole = caps.get(0)?;
        let property = caps.get(1)?.as_str();
        if stripped.split(':').next().is_some_and(|head| head.contains('(')) {
            return None;
        }
        let rest = stripped[whole.end()..].trim_start();
        let value = rest.split(';').next().unwrap_or(rest).trim();
        Some((property.to_string(), value.to_string()))
    }

    /// First family with an entry equal to `property` or a prefix of it followed by `-`.
    #[must_use]
    pub fn family_of(&self, property: &str) -> &str {
        self.families
            .iter()
            .find(|family| {
                family.properties.iter().any(|stem| {
                    property == stem || property.strip_prefix(stem.as_str()).is_some_and(|rest| rest.starts_with('-'))
                })
            })
            .map_or(OTHER_FAMILY, |family| family.name.as_str())
    }
}

/// Counts accumulated over every scanned stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTally {
    /// Property to declaration count.
    pub properties: BTreeMap<String, usize>,
    /// Family to property to declaration count.
    pub families: BTreeMap<String, BTreeMap<String, usize>>,
    /// Family to property to value to count.
    pub values: BTreeMap<String, BTreeMap<String, BTreeMap<String, usize>>>,
    /// Color value to count.
    pub colors: BTreeMap<String, usize>,
    important_seen: BTreeSet<String>,
}

impl PropertyTally {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every declaration in `text`.
    pub fn add_text(&mut self, text: &str, classifier: &PropertyClassifier) {
        for line in text.lines() {
            if let Some((property, value)) = classifier.parse_declaration(line) {
                self.add(&property, &value, classifier);
            }
        }
    }

    fn add(&mut self, property: &str, value: &str, classifier: &PropertyClassifier) {
        let family = classifier.family_of(property).to_string();
        *self.properties.entry(property.to_string()).or_default() += 1;
        *self.families.entry(family.clone()).or_default().entry(property.to_string()).or_default() += 1;
        if value.is_empty() {
            return;
        }
        *self
            .values
            .entry(family.clone())
            .or_default()
            .entry(property.to_string())
            .or_default()
            .entry(value.to_string())
            .or_default() += 1;

        if family != classifier.color_family {
            return;
        }
        let clean = value.replace(IMPORTANT, "").trim().to_string();
        if value.contains(IMPORTANT) && !self.important_seen.insert(clean.clone()) {
            return;
        }
        *self.colors.entry(clean).or_default() += 1;
    }

    /// Whether nothing was counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Entries sorted by count descending, then key.
pub(crate) fn by_count<'a>(counts: impl IntoIterator<Item = (&'a String, &'a usize)>) -> Vec<(&'a str, usize)> {
    let mut items: Vec<(&str, usize)> = counts.into_iter().map(|(k, v)| (k.as_str(), *v)).collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PropertyClassifier {
        PropertyClassifier::new(&CssConfig::default()).unwrap()
    }

    #[test]
    fn parses_declarations_and_skips_the_rest() {
        let c = classifier();
        assert_eq!(c.parse_declaration("  color: #fff;"), Some(("color".into(), "#fff".into())));
        assert_eq!(c.parse_declaration("margin: 0 auto"), Some(("margin".into(), "0 auto".into())));
        for line in ["", "// color: red;", "/* a: b */", " * x: y", "@include m;", "$main: red;", "#{$sel}: x", "url(a): b"] {
            assert_eq!(c.parse_declaration(line), None, "line {line:?}");
        }
    }

    #[test]
    fn families_match_exact_or_dash_prefixed() {
        let c = classifier();
        assert_eq!(c.family_of("color"), "color");
        assert_eq!(c.family_of("border-color"), "color");
        assert_eq!(c.family_of("margin-top"), "spacing");
        assert_eq!(c.family_of("border-radius"), "border");
        assert_eq!(c.family_of("colorful"), OTHER_FAMILY);
        assert_eq!(c.family_of("content"), OTHER_FAMILY);
    }

    #[test]
    fn important_colors_count_once() {
        let c = classifier();
        let mut tally = PropertyTally::new();
        tally.add_text(
            "  color: red !important;\ncolor: red !important;\ncolor: red;\nbackground-color: blue;\n",
            &c,
        );
        assert_eq!(tally.colors.get("red"), Some(&2));
        assert_eq!(tally.colors.get("blue"), Some(&1));
        assert_eq!(tally.properties.get("color"), Some(&3));
    }

    #[test]
    fn sorting_by_count_breaks_ties_by_name() {
        let counts: BTreeMap<String, usize> =
            [("b".to_string(), 2), ("a".to_string(), 2), ("c".to_string(), 5)].into_iter().collect();
        assert_eq!(by_count(&counts), vec![("c", 5), ("a", 2), ("b", 2)]);
    }
}
