//! Declaration validation.
//!
//! Validation is advisory: a failing declaration is reported to the message sink and the
//! transformer keeps its coerced value.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use crate::diagnostics::{MessageSink, Position};
use crate::normalize_color::is_color;
use crate::transformer::parse_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Length,
    Color,
    Number,
    Integer,
    Enum(&'static [&'static str]),
}

const DISPLAY: &[&str] = &["flex", "block", "inline", "inline-block", "inline-flex", "none"];
const POSITION: &[&str] = &["relative", "absolute", "fixed", "sticky", "static"];
const FLEX_DIRECTION: &[&str] = &["row", "row-reverse", "column", "column-reverse"];
const FLEX_WRAP: &[&str] = &["nowrap", "wrap", "wrap-reverse"];
const JUSTIFY_CONTENT: &[&str] = &[
    "flex-start",
    "flex-end",
    "center",
    "space-between",
    "space-around",
    "space-evenly",
];
const ALIGN_ITEMS: &[&str] = &["flex-start", "flex-end", "center", "baseline", "stretch"];
const ALIGN_SELF: &[&str] = &["auto", "flex-start", "flex-end", "center", "baseline", "stretch"];
const TEXT_ALIGN: &[&str] = &["left", "center", "right", "justify", "start", "end"];
const FONT_STYLE: &[&str] = &["normal", "italic", "oblique"];
const FONT_WEIGHT: &[&str] = &[
    "normal", "bold", "bolder", "lighter", "100", "200", "300", "400", "500", "600", "700",
    "800", "900",
];
const TEXT_DECORATION: &[&str] = &["none", "underline", "line-through", "overline"];
const OVERFLOW: &[&str] = &["visible", "hidden", "scroll", "auto"];
const BORDER_STYLE: &[&str] = &["none", "solid", "dashed", "dotted"];
const WHITE_SPACE: &[&str] = &["normal", "nowrap", "pre", "pre-wrap", "pre-line"];
const TEXT_OVERFLOW: &[&str] = &["clip", "ellipsis"];
const VISIBILITY: &[&str] = &["visible", "hidden"];

lazy_static! {
    static ref LENGTH_REGEX: Regex =
        Regex::new(r"^[-+]?(\d+(\.\d*)?|\.\d+)(px|rpx|rem|em|vw|vh|vmin|vmax|%)?$").unwrap();

    static ref VALUE_KINDS: HashMap<&'static str, ValueKind> = {
        let mut m = HashMap::new();
        for prop in [
            "width", "height", "minWidth", "minHeight", "maxWidth", "maxHeight",
            "top", "right", "bottom", "left",
            "marginTop", "marginRight", "marginBottom", "marginLeft",
            "paddingTop", "paddingRight", "paddingBottom", "paddingLeft",
            "borderTopWidth", "borderRightWidth", "borderBottomWidth", "borderLeftWidth",
            "borderTopLeftRadius", "borderTopRightRadius",
            "borderBottomRightRadius", "borderBottomLeftRadius",
            "fontSize", "lineHeight", "letterSpacing", "flexBasis",
        ] {
            m.insert(prop, ValueKind::Length);
        }
        for prop in [
            "color", "backgroundColor",
            "borderTopColor", "borderRightColor", "borderBottomColor", "borderLeftColor",
        ] {
            m.insert(prop, ValueKind::Color);
        }
        m.insert("opacity", ValueKind::Number);
        m.insert("flexGrow", ValueKind::Number);
        m.insert("flexShrink", ValueKind::Number);
        m.insert("zIndex", ValueKind::Integer);
        m.insert("lines", ValueKind::Integer);
        m.insert("display", ValueKind::Enum(DISPLAY));
        m.insert("position", ValueKind::Enum(POSITION));
        m.insert("flexDirection", ValueKind::Enum(FLEX_DIRECTION));
        m.insert("flexWrap", ValueKind::Enum(FLEX_WRAP));
        m.insert("justifyContent", ValueKind::Enum(JUSTIFY_CONTENT));
        m.insert("alignItems", ValueKind::Enum(ALIGN_ITEMS));
        m.insert("alignSelf", ValueKind::Enum(ALIGN_SELF));
        m.insert("textAlign", ValueKind::Enum(TEXT_ALIGN));
        m.insert("fontStyle", ValueKind::Enum(FONT_STYLE));
        m.insert("fontWeight", ValueKind::Enum(FONT_WEIGHT));
        m.insert("textDecoration", ValueKind::Enum(TEXT_DECORATION));
        m.insert("overflow", ValueKind::Enum(OVERFLOW));
        m.insert("borderTopStyle", ValueKind::Enum(BORDER_STYLE));
        m.insert("borderRightStyle", ValueKind::Enum(BORDER_STYLE));
        m.insert("borderBottomStyle", ValueKind::Enum(BORDER_STYLE));
        m.insert("borderLeftStyle", ValueKind::Enum(BORDER_STYLE));
        m.insert("whiteSpace", ValueKind::Enum(WHITE_SPACE));
        m.insert("textOverflow", ValueKind::Enum(TEXT_OVERFLOW));
        m.insert("visibility", ValueKind::Enum(VISIBILITY));
        m
    };
}

impl ValueKind {
    pub fn for_property(camel_property: &str) -> Option<ValueKind> {
        VALUE_KINDS.get(camel_property).copied()
    }

    pub fn accepts(&self, value: &str) -> bool {
        let value = value.trim();
        match self {
            ValueKind::Length => value == "auto" || LENGTH_REGEX.is_match(value),
            ValueKind::Color => is_color(value),
            ValueKind::Number => parse_number(value).is_some(),
            ValueKind::Integer => parse_number(value).map_or(false, |n| n.fract() == 0.0),
            ValueKind::Enum(allowed) => allowed.contains(&value),
        }
    }
}

/// Validate one declaration. Returns `false` and records a warning when the value does not
/// fit the property. Unknown properties always pass.
pub fn validate(
    camel_property: &str,
    property: &str,
    value: &str,
    selectors: &str,
    position: &Position,
    log: bool,
    sink: &mut impl MessageSink,
) -> bool {
    let Some(kind) = ValueKind::for_property(camel_property) else {
        return true;
    };
    if kind.accepts(value) {
        return true;
    }

    let message = format!(
        "line: {}, column: {} - \"{}: {}\" is not valid in \"{}\" selector",
        position.start.line, position.start.column, property, value, selectors
    );
    if log {
        log::warn!("{}", message);
    }
    sink.push_warning(message);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;

    #[test]
    fn test_valid_declarations_pass() {
        let mut sink = Diagnostics::new();
        let pos = Position::at(1, 1);
        assert!(validate("width", "width", "100rpx", ".a", &pos, false, &mut sink));
        assert!(validate("width", "width", "auto", ".a", &pos, false, &mut sink));
        assert!(validate("color", "color", "red", ".a", &pos, false, &mut sink));
        assert!(validate("zIndex", "z-index", "10", ".a", &pos, false, &mut sink));
        assert!(validate("unknownProp", "unknown-prop", "whatever", ".a", &pos, false, &mut sink));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_invalid_declaration_reports_position() {
        let mut sink = Diagnostics::new();
        let pos = Position::at(4, 7);
        assert!(!validate("display", "display", "grid", ".a, .b", &pos, false, &mut sink));
        assert_eq!(
            sink.warnings,
            vec![
                "line: 4, column: 7 - \"display: grid\" is not valid in \".a, .b\" selector"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_integer_kind_rejects_fractions() {
        assert!(!ValueKind::Integer.accepts("1.5"));
        assert!(ValueKind::Number.accepts("0.5"));
        assert!(!ValueKind::Length.accepts("10 px"));
    }
}
