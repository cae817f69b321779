//! Properties whose target representation is not a 1:1 value mapping.
//!
//! Each particular property expands into several target keys and usually removes the
//! original shorthand key.

use crate::normalize_color::normalize_color;
use crate::stylesheet::StyleValue;
use crate::transformer::{convert_prop, parse_number};

const SIDES: [&str; 4] = ["Top", "Right", "Bottom", "Left"];
const CORNERS: [&str; 4] = ["TopLeft", "TopRight", "BottomRight", "BottomLeft"];

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset",
];
const BORDER_WIDTHS: &[&str] = &["thin", "medium", "thick"];
const FLEX_DIRECTIONS: &[&str] = &["row", "row-reverse", "column", "column-reverse"];
const FLEX_WRAPS: &[&str] = &["nowrap", "wrap", "wrap-reverse"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticularOutcome {
    pub entries: Vec<(String, StyleValue)>,
    pub delete_original: bool,
}

impl ParticularOutcome {
    fn expanded(entries: Vec<(String, StyleValue)>) -> Self {
        ParticularOutcome {
            delete_original: !entries.is_empty(),
            entries,
        }
    }

    fn deleted() -> Self {
        ParticularOutcome {
            entries: Vec::new(),
            delete_original: true,
        }
    }
}

/// What a side-expanded property stores per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidePart {
    Plain,
    Width,
    Style,
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Particular {
    /// `margin: 1 2 3 4` -> `marginTop`...; `borderWidth` -> `borderTopWidth`...
    FourSides {
        prefix: &'static str,
        part: SidePart,
    },
    /// `border` or `borderTop`: width, style and color in any order.
    BorderShorthand { side: &'static str },
    BorderRadius,
    Flex,
    FlexFlow,
    Transition,
}

impl Particular {
    pub fn for_property(property: &str) -> Option<Particular> {
        let particular = match property {
            "margin" => Particular::FourSides {
                prefix: "margin",
                part: SidePart::Plain,
            },
            "padding" => Particular::FourSides {
                prefix: "padding",
                part: SidePart::Plain,
            },
            "borderWidth" => Particular::FourSides {
                prefix: "border",
                part: SidePart::Width,
            },
            "borderStyle" => Particular::FourSides {
                prefix: "border",
                part: SidePart::Style,
            },
            "borderColor" => Particular::FourSides {
                prefix: "border",
                part: SidePart::Color,
            },
            "border" => Particular::BorderShorthand { side: "" },
            "borderTop" => Particular::BorderShorthand { side: "Top" },
            "borderRight" => Particular::BorderShorthand { side: "Right" },
            "borderBottom" => Particular::BorderShorthand { side: "Bottom" },
            "borderLeft" => Particular::BorderShorthand { side: "Left" },
            "borderRadius" => Particular::BorderRadius,
            "flex" => Particular::Flex,
            "flexFlow" => Particular::FlexFlow,
            "transition" => Particular::Transition,
            _ => return None,
        };
        Some(particular)
    }

    pub fn apply(&self, value: &StyleValue) -> ParticularOutcome {
        let text = value.to_string();
        let parts: Vec<&str> = text.split_whitespace().collect();

        match *self {
            Particular::FourSides { prefix, part } => {
                let Some(values) = expand_four(&parts) else {
                    return ParticularOutcome::default();
                };
                let suffix = match part {
                    SidePart::Plain => "",
                    SidePart::Width => "Width",
                    SidePart::Style => "Style",
                    SidePart::Color => "Color",
                };
                let entries = SIDES
                    .iter()
                    .zip(values)
                    .map(|(side, raw)| {
                        let value = if part == SidePart::Color {
                            StyleValue::String(normalize_color(raw))
                        } else {
                            coerce(raw)
                        };
                        (format!("{}{}{}", prefix, side, suffix), value)
                    })
                    .collect();
                ParticularOutcome::expanded(entries)
            }
            Particular::BorderShorthand { side } => expand_border(side, &parts),
            Particular::BorderRadius => {
                let Some(values) = expand_four(&parts) else {
                    return ParticularOutcome::default();
                };
                let entries = CORNERS
                    .iter()
                    .zip(values)
                    .map(|(corner, raw)| (format!("border{}Radius", corner), coerce(raw)))
                    .collect();
                ParticularOutcome::expanded(entries)
            }
            Particular::Flex => expand_flex(value, &parts),
            Particular::FlexFlow => {
                let mut entries = Vec::new();
                for part in &parts {
                    if FLEX_DIRECTIONS.contains(part) {
                        entries.push(("flexDirection".to_string(), StyleValue::from(*part)));
                    } else if FLEX_WRAPS.contains(part) {
                        entries.push(("flexWrap".to_string(), StyleValue::from(*part)));
                    }
                }
                ParticularOutcome::expanded(entries)
            }
            Particular::Transition => expand_transition(&text, &parts),
        }
    }
}

/// CSS 1-4 value shorthand in top, right, bottom, left order.
fn expand_four<'a>(parts: &[&'a str]) -> Option<[&'a str; 4]> {
    match *parts {
        [all] => Some([all, all, all, all]),
        [vertical, horizontal] => Some([vertical, horizontal, vertical, horizontal]),
        [top, horizontal, bottom] => Some([top, horizontal, bottom, horizontal]),
        [top, right, bottom, left] => Some([top, right, bottom, left]),
        _ => None,
    }
}

fn expand_border(side: &str, parts: &[&str]) -> ParticularOutcome {
    if parts.is_empty() || parts.len() > 3 {
        return ParticularOutcome::default();
    }

    let mut entries = Vec::new();
    for part in parts {
        let (suffix, value) = if BORDER_STYLES.contains(part) {
            ("Style", StyleValue::from(*part))
        } else if BORDER_WIDTHS.contains(part) || looks_numeric(part) {
            ("Width", coerce(part))
        } else {
            ("Color", StyleValue::String(normalize_color(part)))
        };
        entries.push((format!("border{}{}", side, suffix), value));
    }
    ParticularOutcome::expanded(entries)
}

fn expand_flex(value: &StyleValue, parts: &[&str]) -> ParticularOutcome {
    if value.as_number().is_some() {
        return ParticularOutcome::default();
    }

    match *parts {
        ["none"] => ParticularOutcome::deleted(),
        ["auto"] => ParticularOutcome::expanded(vec![
            ("flexGrow".to_string(), StyleValue::Number(1.0)),
            ("flexShrink".to_string(), StyleValue::Number(1.0)),
            ("flexBasis".to_string(), StyleValue::from("auto")),
        ]),
        [grow, shrink] => ParticularOutcome::expanded(vec![
            ("flexGrow".to_string(), coerce(grow)),
            ("flexShrink".to_string(), coerce(shrink)),
        ]),
        [grow, shrink, basis] => ParticularOutcome::expanded(vec![
            ("flexGrow".to_string(), coerce(grow)),
            ("flexShrink".to_string(), coerce(shrink)),
            ("flexBasis".to_string(), coerce(basis)),
        ]),
        _ => ParticularOutcome::default(),
    }
}

fn expand_transition(text: &str, parts: &[&str]) -> ParticularOutcome {
    // Lists of transitions are kept as-is.
    if text.contains(',') || parts.is_empty() {
        return ParticularOutcome::default();
    }

    let mut property = None;
    let mut duration = None;
    let mut delay = None;
    let mut timing = None;

    for part in parts {
        if is_time(part) {
            if duration.is_none() {
                duration = Some(*part);
            } else {
                delay = Some(*part);
            }
        } else if property.is_none() && timing.is_none() && !is_timing_function(part) {
            property = Some(*part);
        } else {
            timing = Some(*part);
        }
    }

    let mut entries = Vec::new();
    if let Some(property) = property {
        let name = if property == "all" {
            property.to_string()
        } else {
            convert_prop(property)
        };
        entries.push(("transitionProperty".to_string(), StyleValue::String(name)));
    }
    if let Some(duration) = duration {
        entries.push(("transitionDuration".to_string(), StyleValue::from(duration)));
    }
    if let Some(timing) = timing {
        entries.push(("transitionTimingFunction".to_string(), StyleValue::from(timing)));
    }
    if let Some(delay) = delay {
        entries.push(("transitionDelay".to_string(), StyleValue::from(delay)));
    }
    ParticularOutcome::expanded(entries)
}

fn coerce(raw: &str) -> StyleValue {
    match parse_number(raw) {
        Some(n) => StyleValue::Number(n),
        None => StyleValue::from(raw),
    }
}

fn looks_numeric(part: &str) -> bool {
    let digits = part.trim_start_matches(&['-', '+'][..]);
    digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

fn is_time(part: &str) -> bool {
    let number = part
        .strip_suffix("ms")
        .or_else(|| part.strip_suffix('s'));
    number.map_or(false, |n| parse_number(n).is_some())
}

fn is_timing_function(part: &str) -> bool {
    matches!(
        part,
        "ease" | "linear" | "ease-in" | "ease-out" | "ease-in-out" | "step-start" | "step-end"
    ) || part.starts_with("cubic-bezier(")
        || part.starts_with("steps(")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(property: &str, value: StyleValue) -> ParticularOutcome {
        Particular::for_property(property)
            .expect("registered particular")
            .apply(&value)
    }

    #[test]
    fn test_margin_two_values() {
        let outcome = apply("margin", StyleValue::from("10px 20px"));
        assert!(outcome.delete_original);
        assert_eq!(
            outcome.entries,
            vec![
                ("marginTop".to_string(), StyleValue::from("10px")),
                ("marginRight".to_string(), StyleValue::from("20px")),
                ("marginBottom".to_string(), StyleValue::from("10px")),
                ("marginLeft".to_string(), StyleValue::from("20px")),
            ]
        );
    }

    #[test]
    fn test_padding_numeric_single_value() {
        let outcome = apply("padding", StyleValue::Number(0.0));
        assert_eq!(outcome.entries.len(), 4);
        assert_eq!(outcome.entries[2], ("paddingBottom".to_string(), StyleValue::Number(0.0)));
    }

    #[test]
    fn test_padding_large_number_is_not_clamped() {
        let outcome = apply("padding", StyleValue::Number(1e20));
        assert_eq!(outcome.entries.len(), 4);
        for (_, value) in &outcome.entries {
            assert_eq!(value, &StyleValue::Number(1e20));
        }
    }

    #[test]
    fn test_border_color_sides_normalized() {
        let outcome = apply("borderColor", StyleValue::from("red blue"));
        assert_eq!(outcome.entries[0], ("borderTopColor".to_string(), StyleValue::from("#ff0000")));
        assert_eq!(
            outcome.entries[1],
            ("borderRightColor".to_string(), StyleValue::from("#0000ff"))
        );
    }

    #[test]
    fn test_border_shorthand() {
        let outcome = apply("borderTop", StyleValue::from("1px solid #f00"));
        assert!(outcome.delete_original);
        assert_eq!(
            outcome.entries,
            vec![
                ("borderTopWidth".to_string(), StyleValue::from("1px")),
                ("borderTopStyle".to_string(), StyleValue::from("solid")),
                ("borderTopColor".to_string(), StyleValue::from("#ff0000")),
            ]
        );
    }

    #[test]
    fn test_border_radius_three_values() {
        let outcome = apply("borderRadius", StyleValue::from("1px 2px 3px"));
        let keys: Vec<&str> = outcome.entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "borderTopLeftRadius",
                "borderTopRightRadius",
                "borderBottomRightRadius",
                "borderBottomLeftRadius"
            ]
        );
        assert_eq!(outcome.entries[3].1, StyleValue::from("2px"));
    }

    #[test]
    fn test_flex_none_deletes() {
        let outcome = apply("flex", StyleValue::from("none"));
        assert!(outcome.delete_original);
        assert!(outcome.entries.is_empty());

        let kept = apply("flex", StyleValue::Number(1.0));
        assert!(!kept.delete_original);
    }

    #[test]
    fn test_flex_three_values() {
        let outcome = apply("flex", StyleValue::from("1 0 auto"));
        assert_eq!(outcome.entries[0], ("flexGrow".to_string(), StyleValue::Number(1.0)));
        assert_eq!(outcome.entries[1], ("flexShrink".to_string(), StyleValue::Number(0.0)));
        assert_eq!(outcome.entries[2], ("flexBasis".to_string(), StyleValue::from("auto")));
    }

    #[test]
    fn test_flex_flow() {
        let outcome = apply("flexFlow", StyleValue::from("column wrap"));
        assert_eq!(outcome.entries[0], ("flexDirection".to_string(), StyleValue::from("column")));
        assert_eq!(outcome.entries[1], ("flexWrap".to_string(), StyleValue::from("wrap")));
    }

    #[test]
    fn test_transition() {
        let outcome = apply("transition", StyleValue::from("background-color 0.3s ease-in 100ms"));
        assert_eq!(
            outcome.entries,
            vec![
                ("transitionProperty".to_string(), StyleValue::from("backgroundColor")),
                ("transitionDuration".to_string(), StyleValue::from("0.3s")),
                ("transitionTimingFunction".to_string(), StyleValue::from("ease-in")),
                ("transitionDelay".to_string(), StyleValue::from("100ms")),
            ]
        );

        let list = apply("transition", StyleValue::from("opacity 1s, width 2s"));
        assert!(!list.delete_original);
    }

    #[test]
    fn test_unregistered_property() {
        assert!(Particular::for_property("width").is_none());
    }
}
