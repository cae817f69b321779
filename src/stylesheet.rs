//! Stylesheet model consumed from the external CSS parser, and the sheet-level transform.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::diagnostics::{MessageSink, Position};
use crate::transformer::{convert, sanitize_selector, StyleQuery};

// ═══════════════════════════════════════════════════════════════════════════════
// PARSER NODES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub selectors: Vec<String>,
    #[serde(default)]
    pub declarations: Vec<DeclarationNode>,
    #[serde(default)]
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DeclarationNode {
    Declaration(Declaration),
    Comment {
        #[serde(default)]
        comment: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub property: String,
    pub value: String,
    #[serde(default)]
    pub position: Position,
}

impl DeclarationNode {
    pub fn declaration(property: &str, value: &str, position: Position) -> Self {
        DeclarationNode::Declaration(Declaration {
            property: property.to_string(),
            value: value.to_string(),
            position,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STYLE OBJECTS
// ═══════════════════════════════════════════════════════════════════════════════

/// A coerced style value: numbers stay numbers, everything else is kept as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    String(String),
}

impl StyleValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::String(s) => Some(s),
            StyleValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            StyleValue::String(_) => None,
        }
    }
}

impl Serialize for StyleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StyleValue::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                serializer.serialize_i64(*n as i64)
            }
            StyleValue::Number(n) => serializer.serialize_f64(*n),
            StyleValue::String(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                write!(f, "{}", *n as i64)
            }
            StyleValue::Number(n) => write!(f, "{}", n),
            StyleValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::String(value.to_string())
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

/// Camel-cased property -> value, in first-declaration order.
pub type StyleObject = IndexMap<String, StyleValue>;

// ═══════════════════════════════════════════════════════════════════════════════
// SHEET TRANSFORM
// ═══════════════════════════════════════════════════════════════════════════════

/// Transform every rule of a sheet and merge the results per sanitized selector.
///
/// A rule with a rejected selector is dropped as a whole. Later rules overwrite keys set by
/// earlier rules for the same selector.
pub fn transform_stylesheet(
    rules: &[Rule],
    query: &StyleQuery,
    sink: &mut impl MessageSink,
) -> IndexMap<String, StyleObject> {
    let mut sheet: IndexMap<String, StyleObject> = IndexMap::new();

    'rules: for rule in rules {
        let mut selectors = Vec::with_capacity(rule.selectors.len());
        for selector in &rule.selectors {
            match sanitize_selector(
                selector,
                query.transform_descendant_combinator,
                &rule.position,
                query.log,
                sink,
            ) {
                Some(sanitized) => selectors.push(sanitized),
                None => continue 'rules,
            }
        }

        let Some(style) = convert(rule, query, sink) else {
            continue;
        };

        for selector in selectors {
            let entry = sheet.entry(selector).or_default();
            for (key, value) in &style {
                entry.insert(key.clone(), value.clone());
            }
        }
    }

    sheet
}
