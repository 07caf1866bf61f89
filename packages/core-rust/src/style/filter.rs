//! OGC filter trees and their translation to 3D Tiles style expressions.
//!
//! Parsing is strict about shape (a `Not` needs exactly one operand, leaves
//! need their property and literal) and lenient about kind: elements outside
//! the supported subset become [`FilterNode::Unsupported`], which translates
//! to `false` so unknown predicates never match.

use std::fmt;

use super::xml::Element;
use super::{FALSE_PREDICATE, OGC_NS};

const OGC: &[&str] = &[OGC_NS];

/// Binary comparison operators of OGC filter encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    EqualTo,
    NotEqualTo,
    LessThan,
    GreaterThan,
    LessThanOrEqualTo,
    GreaterThanOrEqualTo,
}

impl ComparisonOp {
    /// Maps an `ogc:PropertyIs*` local name to its operator.
    #[must_use]
    pub fn from_element_name(name: &str) -> Option<Self> {
        match name {
            "PropertyIsEqualTo" => Some(Self::EqualTo),
            "PropertyIsNotEqualTo" => Some(Self::NotEqualTo),
            "PropertyIsLessThan" => Some(Self::LessThan),
            "PropertyIsGreaterThan" => Some(Self::GreaterThan),
            "PropertyIsLessThanOrEqualTo" => Some(Self::LessThanOrEqualTo),
            "PropertyIsGreaterThanOrEqualTo" => Some(Self::GreaterThanOrEqualTo),
            _ => None,
        }
    }

    /// Style-language operator token.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::EqualTo => "===",
            Self::NotEqualTo => "!==",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessThanOrEqualTo => "<=",
            Self::GreaterThanOrEqualTo => ">=",
        }
    }
}

/// A parsed OGC filter expression.
///
/// Property names and literals are kept verbatim; the style language
/// accepts numeric and bare tokens as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterNode {
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
    Comparison {
        op: ComparisonOp,
        property: String,
        literal: String,
    },
    Between {
        property: String,
        lower: String,
        upper: String,
    },
    IsNull {
        property: String,
    },
    /// Any element outside the supported subset, by local name.
    Unsupported(String),
}

/// A filter element whose shape cannot be translated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    #[error("ogc:Not requires exactly one operand, found {found}")]
    NotArity { found: usize },
    #[error("ogc:{element} has no operands")]
    EmptyLogical { element: &'static str },
    #[error("ogc:{element} has no ogc:PropertyName")]
    MissingProperty { element: String },
    #[error("ogc:{element} has no ogc:Literal")]
    MissingLiteral { element: String },
    #[error("ogc:PropertyIsBetween has no ogc:{boundary}")]
    MissingBoundary { boundary: &'static str },
}

impl FilterNode {
    /// Parses the filter expression rooted at `element`.
    pub(crate) fn from_element(element: &Element) -> Result<Self, TranslationError> {
        if element.namespace.as_deref() != Some(OGC_NS) {
            return Ok(Self::Unsupported(element.name.clone()));
        }

        match element.name.as_str() {
            "And" => Ok(Self::And(Self::operands(element, "And")?)),
            "Or" => Ok(Self::Or(Self::operands(element, "Or")?)),
            "Not" => match element.children.as_slice() {
                [operand] => Ok(Self::Not(Box::new(Self::from_element(operand)?))),
                other => Err(TranslationError::NotArity { found: other.len() }),
            },
            "PropertyIsBetween" => Ok(Self::Between {
                property: property_name(element)?,
                lower: boundary(element, "LowerBoundary")?,
                upper: boundary(element, "UpperBoundary")?,
            }),
            "PropertyIsNull" => Ok(Self::IsNull {
                property: property_name(element)?,
            }),
            name => match ComparisonOp::from_element_name(name) {
                Some(op) => Ok(Self::Comparison {
                    op,
                    property: property_name(element)?,
                    literal: element
                        .child(OGC, "Literal")
                        .map(|l| l.text().to_string())
                        .ok_or_else(|| TranslationError::MissingLiteral {
                            element: name.to_string(),
                        })?,
                }),
                None => Ok(Self::Unsupported(name.to_string())),
            },
        }
    }

    fn operands(element: &Element, name: &'static str) -> Result<Vec<Self>, TranslationError> {
        if element.children.is_empty() {
            return Err(TranslationError::EmptyLogical { element: name });
        }
        element.children.iter().map(Self::from_element).collect()
    }

    /// Renders this node as a style-language expression.
    #[must_use]
    pub fn to_expression(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(children) => write_joined(f, children, " && "),
            Self::Or(children) => write_joined(f, children, " || "),
            Self::Not(child) => write!(f, "!({child})"),
            Self::Comparison {
                op,
                property,
                literal,
            } => write!(f, "${{{property}}} {} {literal}", op.symbol()),
            Self::Between {
                property,
                lower,
                upper,
            } => write!(
                f,
                "(${{{property}}} >= {lower} && ${{{property}}} <= {upper})"
            ),
            Self::IsNull { property } => write!(f, "${{{property}}} === null"),
            Self::Unsupported(_) => f.write_str(FALSE_PREDICATE),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[FilterNode], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}

fn property_name(element: &Element) -> Result<String, TranslationError> {
    element
        .child(OGC, "PropertyName")
        .map(|p| p.text().to_string())
        .ok_or_else(|| TranslationError::MissingProperty {
            element: element.name.clone(),
        })
}

/// Boundary value: the text of its `ogc:Literal`, or its own text.
fn boundary(element: &Element, name: &'static str) -> Result<String, TranslationError> {
    let boundary = element
        .child(OGC, name)
        .ok_or(TranslationError::MissingBoundary { boundary: name })?;
    Ok(boundary
        .child(OGC, "Literal")
        .unwrap_or(boundary)
        .text()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::xml::parse;

    fn filter(body: &str) -> Result<FilterNode, TranslationError> {
        let root = parse(&format!(
            r#"<ogc:Filter xmlns:ogc="http://www.opengis.net/ogc">{body}</ogc:Filter>"#
        ))
        .unwrap();
        FilterNode::from_element(&root.children[0])
    }

    fn expr(body: &str) -> String {
        filter(body).unwrap().to_expression()
    }

    fn cmp(tag: &str, property: &str, literal: &str) -> String {
        format!(
            "<ogc:{tag}><ogc:PropertyName>{property}</ogc:PropertyName>\
             <ogc:Literal>{literal}</ogc:Literal></ogc:{tag}>"
        )
    }

    #[test]
    fn equal_to_passes_literal_verbatim() {
        assert_eq!(
            expr(&cmp("PropertyIsEqualTo", "economy", "Developed")),
            "${economy} === Developed"
        );
    }

    #[test]
    fn comparison_operator_mapping() {
        let cases = [
            ("PropertyIsEqualTo", "==="),
            ("PropertyIsNotEqualTo", "!=="),
            ("PropertyIsLessThan", "<"),
            ("PropertyIsGreaterThan", ">"),
            ("PropertyIsLessThanOrEqualTo", "<="),
            ("PropertyIsGreaterThanOrEqualTo", ">="),
        ];
        for (tag, symbol) in cases {
            assert_eq!(expr(&cmp(tag, "h", "10")), format!("${{h}} {symbol} 10"));
        }
    }

    #[test]
    fn and_or_preserve_child_order() {
        let body = format!(
            "<ogc:Or>{}<ogc:And>{}{}</ogc:And></ogc:Or>",
            cmp("PropertyIsEqualTo", "a", "1"),
            cmp("PropertyIsGreaterThan", "b", "2"),
            cmp("PropertyIsLessThan", "c", "3"),
        );
        assert_eq!(expr(&body), "(${a} === 1 || (${b} > 2 && ${c} < 3))");
    }

    #[test]
    fn not_wraps_single_operand() {
        let body = format!("<ogc:Not>{}</ogc:Not>", cmp("PropertyIsEqualTo", "a", "1"));
        assert_eq!(expr(&body), "!(${a} === 1)");
    }

    #[test]
    fn not_with_two_operands_is_rejected() {
        let body = format!(
            "<ogc:Not>{}{}</ogc:Not>",
            cmp("PropertyIsEqualTo", "a", "1"),
            cmp("PropertyIsEqualTo", "b", "2"),
        );
        assert_eq!(filter(&body), Err(TranslationError::NotArity { found: 2 }));
    }

    #[test]
    fn empty_and_is_rejected() {
        assert_eq!(
            filter("<ogc:And/>"),
            Err(TranslationError::EmptyLogical { element: "And" })
        );
    }

    #[test]
    fn between_is_a_well_formed_range() {
        let body = "<ogc:PropertyIsBetween><ogc:PropertyName>pop</ogc:PropertyName>\
                    <ogc:LowerBoundary><ogc:Literal>100</ogc:Literal></ogc:LowerBoundary>\
                    <ogc:UpperBoundary>500</ogc:UpperBoundary></ogc:PropertyIsBetween>";
        assert_eq!(expr(body), "(${pop} >= 100 && ${pop} <= 500)");
    }

    #[test]
    fn between_without_upper_boundary_is_rejected() {
        let body = "<ogc:PropertyIsBetween><ogc:PropertyName>pop</ogc:PropertyName>\
                    <ogc:LowerBoundary>1</ogc:LowerBoundary></ogc:PropertyIsBetween>";
        assert_eq!(
            filter(body),
            Err(TranslationError::MissingBoundary {
                boundary: "UpperBoundary"
            })
        );
    }

    #[test]
    fn is_null() {
        let body = "<ogc:PropertyIsNull><ogc:PropertyName>name</ogc:PropertyName></ogc:PropertyIsNull>";
        assert_eq!(expr(body), "${name} === null");
    }

    #[test]
    fn unknown_operator_is_false() {
        let body = "<ogc:PropertyIsLike><ogc:PropertyName>n</ogc:PropertyName>\
                    <ogc:Literal>a*</ogc:Literal></ogc:PropertyIsLike>";
        assert_eq!(filter(body), Ok(FilterNode::Unsupported("PropertyIsLike".into())));
        assert_eq!(expr(body), "false");
    }

    #[test]
    fn unknown_operator_inside_and_only_falsifies_itself() {
        let body = format!(
            "<ogc:And>{}<ogc:BBOX/></ogc:And>",
            cmp("PropertyIsEqualTo", "a", "1")
        );
        assert_eq!(expr(&body), "(${a} === 1 && false)");
    }

    #[test]
    fn comparison_without_literal_is_rejected() {
        let body = "<ogc:PropertyIsEqualTo><ogc:PropertyName>a</ogc:PropertyName></ogc:PropertyIsEqualTo>";
        assert_eq!(
            filter(body),
            Err(TranslationError::MissingLiteral {
                element: "PropertyIsEqualTo".into()
            })
        );
    }

    #[test]
    fn comparison_without_property_is_rejected() {
        let body = "<ogc:PropertyIsEqualTo><ogc:Literal>1</ogc:Literal></ogc:PropertyIsEqualTo>";
        assert!(matches!(
            filter(body),
            Err(TranslationError::MissingProperty { .. })
        ));
    }

    #[test]
    fn elements_outside_ogc_namespace_are_unsupported() {
        let root = parse("<Filter><PropertyIsEqualTo/></Filter>").unwrap();
        assert_eq!(
            FilterNode::from_element(&root.children[0]),
            Ok(FilterNode::Unsupported("PropertyIsEqualTo".into()))
        );
    }
}
