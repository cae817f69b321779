//! Output Stager
//!
//! Derives the artifact paths of a component and provisions its output directory. All five
//! artifacts share one base path, `dist_file_without_ext`, and differ only by extension. The
//! generated import graph references these exact paths.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{LoaderError, Result};
use crate::options::Mode;
use crate::path_helper::{relative_path, strip_extension};
use crate::platform::Platform;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactPaths {
    pub code: PathBuf,
    pub json: PathBuf,
    pub css: PathBuf,
    pub template: PathBuf,
    pub assets: PathBuf,
}

/// Content of one component's artifacts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputContent {
    pub code: String,
    pub map: Option<serde_json::Value>,
    pub css: String,
    pub json: serde_json::Map<String, serde_json::Value>,
    pub template: Option<String>,
    pub assets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub output_path: ArtifactPaths,
    pub mode: Mode,
    pub is_typescript_file: bool,
    #[serde(default)]
    pub turn_off_source_map: bool,
}

/// Persists a component's artifacts.
pub trait ArtifactWriter {
    fn write(
        &self,
        content: &OutputContent,
        raw_source: &str,
        options: &OutputOptions,
    ) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// PATH DERIVATION
// ═══════════════════════════════════════════════════════════════════════════════

/// `<output_root>/<resource relative to source_root>` without its extension.
pub fn dist_file_without_ext(
    resource_path: &Path,
    source_root: &Path,
    output_root: &Path,
    platform: Platform,
) -> PathBuf {
    let relative = relative_path(source_root, resource_path);
    let joined = output_root.join(relative);
    PathBuf::from(strip_extension(
        &joined.to_string_lossy(),
        Some(platform.type_tag()),
    ))
}

pub fn artifact_paths(
    dist_file_without_ext: &Path,
    output_root: &Path,
    platform: Platform,
) -> ArtifactPaths {
    ArtifactPaths {
        code: with_suffix(dist_file_without_ext, ".js"),
        json: with_suffix(dist_file_without_ext, ".json"),
        css: with_suffix(dist_file_without_ext, platform.css_extension()),
        template: with_suffix(dist_file_without_ext, platform.template_extension()),
        assets: output_root.to_path_buf(),
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

/// Create `dir` and its ancestors. A directory that already exists, or that a concurrent
/// invocation created first, is not an error.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(LoaderError::io(dir, e)),
    }
}

/// Compute the artifact paths of `resource_path` and make sure their directory exists.
pub fn stage_artifacts(
    resource_path: &Path,
    source_root: &Path,
    output_root: &Path,
    platform: Platform,
) -> Result<ArtifactPaths> {
    let base = dist_file_without_ext(resource_path, source_root, output_root, platform);
    if let Some(dir) = base.parent() {
        ensure_dir(dir)?;
    }
    Ok(artifact_paths(&base, output_root, platform))
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILE SYSTEM WRITER
// ═══════════════════════════════════════════════════════════════════════════════

/// Writes artifacts to disk and copies style assets from the source root.
#[derive(Debug, Clone)]
pub struct FsArtifactWriter {
    source_root: PathBuf,
}

impl FsArtifactWriter {
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
        }
    }
}

impl ArtifactWriter for FsArtifactWriter {
    fn write(
        &self,
        content: &OutputContent,
        _raw_source: &str,
        options: &OutputOptions,
    ) -> Result<()> {
        let paths = &options.output_path;

        let mut code = content.code.clone();
        if let (Some(map), false) = (&content.map, options.turn_off_source_map) {
            let map_path = with_suffix(&paths.code, ".map");
            let map_name = map_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            write_file(&map_path, &serde_json::to_string(map)?)?;
            code.push_str(&format!("\n//# sourceMappingURL={}", map_name));
        }
        write_file(&paths.code, &code)?;

        let json = match options.mode {
            Mode::Watch => serde_json::to_string_pretty(&content.json)?,
            Mode::Build => serde_json::to_string(&content.json)?,
        };
        write_file(&paths.json, &json)?;
        write_file(&paths.css, &content.css)?;

        if let Some(template) = &content.template {
            write_file(&paths.template, template)?;
        }

        for asset in &content.assets {
            let from = self.source_root.join(asset);
            let to = paths.assets.join(asset);
            if let Some(dir) = to.parent() {
                ensure_dir(dir)?;
            }
            fs::copy(&from, &to).map_err(|e| LoaderError::io(&from, e))?;
        }

        log::debug!("wrote artifacts for {}", paths.code.display());
        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| LoaderError::io(path, e))
}
