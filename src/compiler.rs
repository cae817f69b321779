//! Contracts of the external collaborators the loader drives: the component compiler and the
//! style processor.

use anyhow::Context;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dependency::USING_COMPONENTS;
use crate::options::CompilerOptions;
use crate::path_helper::{normalize_path, relative_path, to_slash};

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER OUTPUT
// ═══════════════════════════════════════════════════════════════════════════════

/// One usage of an imported module name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportUsage {
    #[serde(default)]
    pub is_from_component_library: bool,
    #[serde(default)]
    pub local: String,
}

impl ImportUsage {
    pub fn plain(local: &str) -> Self {
        ImportUsage {
            is_from_component_library: false,
            local: local.to_string(),
        }
    }

    pub fn library(local: &str) -> Self {
        ImportUsage {
            is_from_component_library: true,
            local: local.to_string(),
        }
    }
}

/// What the component compiler produced for one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationResult {
    pub code: String,
    #[serde(default)]
    pub map: Option<serde_json::Value>,
    #[serde(default)]
    pub css_files: Vec<String>,
    #[serde(default)]
    pub config: Map<String, Value>,
    #[serde(default)]
    pub template: Option<String>,
    /// Files the host must watch for this component.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Module name -> usages, in discovery order.
    #[serde(default)]
    pub imported: IndexMap<String, Vec<ImportUsage>>,
    /// Component map reported next to the config by some compiler versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub using_components: Option<Map<String, Value>>,
}

impl TransformationResult {
    /// The component config, with the reported `usingComponents` filled in when the config
    /// carries none of its own.
    pub fn component_config(&self) -> Map<String, Value> {
        let mut config = self.config.clone();
        if let Some(using_components) = &self.using_components {
            config
                .entry(USING_COMPONENTS)
                .or_insert_with(|| Value::Object(using_components.clone()));
        }
        config
    }
}

pub trait ComponentCompiler: Send + Sync {
    fn compile(
        &self,
        source: &str,
        options: &CompilerOptions,
    ) -> anyhow::Result<TransformationResult>;
}

impl<F> ComponentCompiler for F
where
    F: Fn(&str, &CompilerOptions) -> anyhow::Result<TransformationResult> + Send + Sync,
{
    fn compile(
        &self,
        source: &str,
        options: &CompilerOptions,
    ) -> anyhow::Result<TransformationResult> {
        self(source, options)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STYLE PROCESSING
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedStyle {
    pub style: String,
    /// Asset files referenced by the styles, relative to the source directory.
    pub assets: Vec<String>,
}

/// Resolves a component's style files into one style text plus the assets it references.
#[allow(async_fn_in_trait)]
pub trait StyleProcessor {
    async fn process(
        &self,
        css_files: &[String],
        source_path: &Path,
    ) -> anyhow::Result<ProcessedStyle>;
}

lazy_static! {
    static ref URL_REGEX: Regex = Regex::new(r#"url\(\s*['"]?([^'")]+?)['"]?\s*\)"#).unwrap();
}

/// Reads the style files, concatenates them and collects local `url(...)` references.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatStyleProcessor;

impl StyleProcessor for ConcatStyleProcessor {
    async fn process(
        &self,
        css_files: &[String],
        source_path: &Path,
    ) -> anyhow::Result<ProcessedStyle> {
        let mut styles = Vec::with_capacity(css_files.len());
        let mut assets: Vec<String> = Vec::new();

        for file in css_files {
            let path = resolve_style_file(file, source_path);
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read style file {}", path.display()))?;

            let style_dir = path.parent().unwrap_or(source_path);
            for caps in URL_REGEX.captures_iter(&text) {
                let url = caps[1].trim();
                if !is_local_asset(url) {
                    continue;
                }
                let asset = relative_path(source_path, &normalize_path(&style_dir.join(url)));
                let asset = to_slash(&asset);
                if !assets.contains(&asset) {
                    assets.push(asset);
                }
            }

            styles.push(text);
        }

        Ok(ProcessedStyle {
            style: styles.join("\n"),
            assets,
        })
    }
}

fn resolve_style_file(file: &str, source_path: &Path) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        normalize_path(&source_path.join(path))
    }
}

fn is_local_asset(url: &str) -> bool {
    !(url.is_empty()
        || url.starts_with("data:")
        || url.starts_with("http:")
        || url.starts_with("https:")
        || url.starts_with("//")
        || url.starts_with('#'))
}
