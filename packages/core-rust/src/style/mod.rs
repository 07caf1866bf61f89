//! SLD to 3D Tiles style translation.
//!
//! [`translate`] turns a rule-based Styled Layer Descriptor into the ordered
//! `color.conditions` list of a 3D Tiles style. Each `Rule` contributes one
//! `(predicate, color)` pair in document order:
//!
//! - the color is the rule's first `Fill/SvgParameter[@name="fill"]`,
//!   defaulting to `#ffffff`
//! - the predicate is its translated `ogc:Filter`, or `true` for an
//!   `ElseFilter` rule or a rule without any filter
//!
//! When no rule yields `true`, a terminal `("true", "color('white')")` is
//! appended so every feature matches some condition.

mod filter;
mod xml;

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::warn;

pub use filter::{ComparisonOp, FilterNode, TranslationError};
use xml::Element;

/// OGC filter encoding namespace.
pub const OGC_NS: &str = "http://www.opengis.net/ogc";
/// Symbology encoding namespace (SLD 1.1).
pub const SE_NS: &str = "http://www.opengis.net/se";
/// Styled layer descriptor namespace (SLD 1.0 symbolizers live here).
pub const SLD_NS: &str = "http://www.opengis.net/sld";

/// Predicate matching every feature.
pub const TRUE_PREDICATE: &str = "true";
/// Predicate matching no feature.
pub const FALSE_PREDICATE: &str = "false";

const SYMBOLOGY: &[&str] = &[SE_NS, SLD_NS];
const OGC: &[&str] = &[OGC_NS];
const DEFAULT_FILL: &str = "#ffffff";
const FALLBACK_COLOR: &str = "color('white')";

/// The SLD document could not be read as XML.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SldError {
    #[error("malformed SLD document: {0}")]
    Xml(String),
    #[error("malformed SLD document: unbalanced element nesting")]
    UnexpectedEnd,
    #[error("SLD document has no root element")]
    Empty,
}

/// One `(predicate, color)` entry of a 3D Tiles `color.conditions` list.
///
/// Serializes as a two-element JSON array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCondition {
    pub predicate: String,
    pub color: String,
}

impl StyleCondition {
    #[must_use]
    pub fn new(predicate: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            color: color.into(),
        }
    }

    /// Whether this condition matches every feature.
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        self.predicate == TRUE_PREDICATE
    }
}

impl Serialize for StyleCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.predicate, &self.color).serialize(serializer)
    }
}

/// A translated 3D Tiles style.
///
/// Serializes as `{"defines": {}, "color": {"conditions": [...]}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    conditions: Vec<StyleCondition>,
}

impl StyleSheet {
    /// Ordered conditions; never empty, and at least one is a catch-all.
    #[must_use]
    pub fn conditions(&self) -> &[StyleCondition] {
        &self.conditions
    }
}

impl Serialize for StyleSheet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Color<'a> {
            conditions: &'a [StyleCondition],
        }

        let mut doc = serializer.serialize_struct("StyleSheet", 2)?;
        doc.serialize_field("defines", &BTreeMap::<String, String>::new())?;
        doc.serialize_field(
            "color",
            &Color {
                conditions: &self.conditions,
            },
        )?;
        doc.end()
    }
}

/// Translates an SLD document into a 3D Tiles style.
///
/// Filters with an unsupported shape (for example an `ogc:Not` with two
/// operands) do not fail the translation: that rule gets the predicate
/// `false`.
///
/// # Errors
///
/// Returns [`SldError`] if `xml` is not well-formed XML.
pub fn translate(xml: &str) -> Result<StyleSheet, SldError> {
    let root = xml::parse(xml)?;

    let mut conditions = Vec::new();
    let mut have_catch_all = false;

    for rule in root.descendants().filter(|e| e.is(SYMBOLOGY, "Rule")) {
        let color = format!("color('{}')", fill_color(rule).unwrap_or(DEFAULT_FILL));
        let predicate = match rule_filter(rule) {
            Some(filter) => match FilterNode::from_element(filter) {
                Ok(node) => node.to_expression(),
                Err(e) => {
                    warn!(rule = rule_name(rule), error = %e, "Untranslatable SLD filter, rule never matches");
                    FALSE_PREDICATE.to_string()
                }
            },
            // ElseFilter and filterless rules both match everything.
            None => {
                have_catch_all = true;
                TRUE_PREDICATE.to_string()
            }
        };
        conditions.push(StyleCondition { predicate, color });
    }

    if !have_catch_all {
        conditions.push(StyleCondition::new(TRUE_PREDICATE, FALLBACK_COLOR));
    }

    Ok(StyleSheet { conditions })
}

/// Text of the first `Fill/SvgParameter[@name="fill"]` below `rule`.
///
/// SLD 1.0 `CssParameter` is accepted in place of `SvgParameter`.
fn fill_color(rule: &Element) -> Option<&str> {
    rule.descendants()
        .filter(|e| e.is(SYMBOLOGY, "Fill"))
        .flat_map(|fill| fill.children.iter())
        .find(|p| {
            (p.is(SYMBOLOGY, "SvgParameter") || p.is(SYMBOLOGY, "CssParameter"))
                && p.attribute("name") == Some("fill")
        })
        .map(Element::text)
        .filter(|color| !color.is_empty())
}

/// The expression inside the rule's `ogc:Filter`, if it has a non-empty one.
fn rule_filter(rule: &Element) -> Option<&Element> {
    rule.child(OGC, "Filter")
        .and_then(|filter| filter.children.first())
}

fn rule_name(rule: &Element) -> &str {
    rule.child(SYMBOLOGY, "Name").map_or("", Element::text)
}
