//! Style Declaration Transformer
//!
//! Converts one parsed CSS rule into a target-platform style object. Each declaration goes
//! through the same stages in order:
//!
//! 1. selector sanitizing (once per rule, see [`sanitize_selector`])
//! 2. property conversion to camelCase
//! 3. value coercion (numbers, colors)
//! 4. theme variables: `var(--name)` stays verbatim, or becomes a theme binding
//! 5. validation and particular-property expansion
//!
//! A `var()` value ends the pipeline for its declaration after stage 4.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{MessageSink, Position};
use crate::normalize_color::normalize_color;
use crate::particular::Particular;
use crate::stylesheet::{DeclarationNode, Rule, StyleObject, StyleValue};
use crate::validation;

/// Tag whose style travels through a different channel.
pub const TEXT_TAG: &str = "text";

const QUOTES: &[char] = &['\'', '"'];

const COLOR_PROPERTIES: &[&str] = &[
    "color",
    "backgroundColor",
    "borderColor",
    "borderBottomColor",
    "borderTopColor",
    "borderRightColor",
    "borderLeftColor",
];

lazy_static! {
    static ref VAR_REGEX: Regex = Regex::new(r"^var\(--(.*)\)$").unwrap();
    static ref SELECTOR_REGEX: Regex = Regex::new(r"^[.@#][a-zA-Z0-9_:\-]+$").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s").unwrap();
}

/// Caller switches for one transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StyleQuery {
    /// Report selector errors and validation warnings.
    #[serde(default)]
    pub log: bool,
    /// A theme context is available, `var(--x)` values become theme bindings.
    #[serde(default)]
    pub theme: bool,
    /// Compound and descendant selectors are transformed instead of rejected.
    #[serde(default)]
    pub transform_descendant_combinator: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SELECTORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Turn a CSS selector into a style-sheet key. `None` means the selector was rejected and the
/// rule must not produce a style object.
pub fn sanitize_selector(
    selector: &str,
    transform_descendant_combinator: bool,
    position: &Position,
    log: bool,
    sink: &mut impl MessageSink,
) -> Option<String> {
    let selector = if selector.starts_with(|c: char| c.is_ascii_alphabetic()) {
        format!("@{}", selector)
    } else {
        selector.to_string()
    };

    if log && !transform_descendant_combinator && !SELECTOR_REGEX.is_match(&selector) {
        let message = format!(
            "line: {}, column: {} - \"{}\" is not a valid selector (e.g. \".abc、.abcBcd、.abc_bcd\")",
            position.start.line, position.start.column, selector
        );
        log::error!("{}", message);
        sink.push_error(message);
        return None;
    }

    Some(WHITESPACE_REGEX.replace_all(&selector, "_").replace('.', ""))
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROPERTIES AND VALUES
// ═══════════════════════════════════════════════════════════════════════════════

/// `background-color` -> `backgroundColor`, `-webkit-box-flex` -> `WebkitBoxFlex`,
/// `--main-color` -> `mainColor`. Already converted names are returned unchanged.
pub fn convert_prop(prop: &str) -> String {
    if !prop.contains(&['-', '_'][..]) {
        return prop.to_string();
    }

    let mut result = String::with_capacity(prop.len());
    for segment in prop.split(&['-', '_'][..]).filter(|s| !s.is_empty()) {
        let lower = segment.to_ascii_lowercase();
        if result.is_empty() {
            result.push_str(&lower);
        } else {
            result.push_str(&capitalize(&lower));
        }
    }

    let vendor_prefixed = prop.starts_with('-')
        && prop[1..].starts_with(|c: char| c.is_alphanumeric() || c == '_');
    if vendor_prefixed {
        result = capitalize(&result);
    }
    result
}

/// Coerce a quote-stripped declaration value for a camel-cased property.
pub fn convert_value(property: &str, value: &str) -> StyleValue {
    if is_css_variable(value) {
        return StyleValue::from(value);
    }
    if let Some(number) = parse_number(value) {
        return StyleValue::Number(number);
    }
    if COLOR_PROPERTIES.contains(&property) {
        return StyleValue::String(normalize_color(value));
    }
    StyleValue::from(value)
}

pub fn is_css_variable(value: &str) -> bool {
    VAR_REGEX.is_match(value)
}

/// `var(--brand-color)` (or a bare `--brand-color`) -> `brandColor`.
pub fn convert_css_variable_value(value: &str) -> String {
    let name = VAR_REGEX
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or_else(|| value.trim_start_matches("--"));

    let mut result = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Finite numeric literal, as in `"12"`, `"-0.5"` or `"1e3"`.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RULE CONVERSION
// ═══════════════════════════════════════════════════════════════════════════════

/// Convert one rule into a style object. Rules for the text tag yield `None`.
pub fn convert(
    rule: &Rule,
    query: &StyleQuery,
    sink: &mut impl MessageSink,
) -> Option<StyleObject> {
    if rule.tag_name.as_deref() == Some(TEXT_TAG) {
        return None;
    }

    let selectors = rule.selectors.join(", ");
    let mut style = StyleObject::new();

    for node in &rule.declarations {
        let DeclarationNode::Declaration(declaration) = node else {
            continue;
        };

        let raw_value = declaration.value.replace(QUOTES, "");
        let property = convert_prop(&declaration.property);
        let value = convert_value(&property, &raw_value);

        if let StyleValue::String(text) = &value {
            if is_css_variable(text) {
                let stored = if query.theme {
                    StyleValue::String(convert_css_variable_value(text))
                } else {
                    value.clone()
                };
                style.insert(property, stored);
                continue;
            }
        }

        style.insert(property.clone(), value.clone());

        validation::validate(
            &property,
            &declaration.property,
            &raw_value,
            &selectors,
            &declaration.position,
            query.log,
            sink,
        );

        if let Some(particular) = Particular::for_property(&property) {
            let outcome = particular.apply(&value);
            if outcome.delete_original {
                style.shift_remove(&property);
            }
            for (key, expanded) in outcome.entries {
                style.insert(key, expanded);
            }
        }
    }

    Some(style)
}
