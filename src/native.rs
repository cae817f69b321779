//! Node bindings. Every entry point takes and returns JSON strings.

use napi_derive::napi;
use std::path::Path;

use crate::dependency::{generate_dependencies, rewrite_using_components, Dependency, LoaderPaths};
use crate::diagnostics::Diagnostics;
use crate::stylesheet::{transform_stylesheet, Rule};
use crate::transformer::{convert, StyleQuery};

fn parse_json<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> napi::Result<T> {
    serde_json::from_str(json)
        .map_err(|e| napi::Error::from_reason(format!("{} parse error: {}", what, e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> napi::Result<String> {
    serde_json::to_string(value)
        .map_err(|e| napi::Error::from_reason(format!("Serialize error: {}", e)))
}

fn parse_query(query_json: Option<String>) -> napi::Result<StyleQuery> {
    match query_json {
        Some(json) => parse_json("Query", &json),
        None => Ok(StyleQuery::default()),
    }
}

/// `{ style: object | null, errors, warnings }`
#[napi]
pub fn transform_rule_native(
    rule_json: String,
    query_json: Option<String>,
) -> napi::Result<String> {
    let rule: Rule = parse_json("Rule", &rule_json)?;
    let query = parse_query(query_json)?;
    let mut diagnostics = Diagnostics::new();
    let style = convert(&rule, &query, &mut diagnostics);
    to_json(&serde_json::json!({
        "style": style,
        "errors": diagnostics.errors,
        "warnings": diagnostics.warnings,
    }))
}

/// `{ styles: { selector: object }, errors, warnings }`
#[napi]
pub fn transform_stylesheet_native(
    rules_json: String,
    query_json: Option<String>,
) -> napi::Result<String> {
    let rules: Vec<Rule> = parse_json("Rules", &rules_json)?;
    let query = parse_query(query_json)?;
    let mut diagnostics = Diagnostics::new();
    let styles = transform_stylesheet(&rules, &query, &mut diagnostics);
    to_json(&serde_json::json!({
        "styles": styles,
        "errors": diagnostics.errors,
        "warnings": diagnostics.warnings,
    }))
}

#[napi]
pub fn rewrite_using_components_native(
    config_json: String,
    resource_path: String,
) -> napi::Result<String> {
    let config: serde_json::Map<String, serde_json::Value> = parse_json("Config", &config_json)?;
    to_json(&rewrite_using_components(&config, Path::new(&resource_path)))
}

/// Render dependency records as import statements.
#[napi]
pub fn generate_dependencies_native(
    deps_json: String,
    loaders_json: String,
) -> napi::Result<String> {
    let deps: Vec<Dependency> = parse_json("Dependencies", &deps_json)?;
    let loaders: LoaderPaths = parse_json("Loaders", &loaders_json)?;
    generate_dependencies(&deps, &loaders).map_err(|e| napi::Error::from_reason(e.to_string()))
}
