//! Component Loader
//!
//! Drives one component source file through the pipeline:
//!
//! 1. compile (or reuse a cached result)
//! 2. resolve styles and their assets
//! 3. rewrite `usingComponents`
//! 4. stage and write the artifacts
//! 5. classify imports and generate the module returned to the host
//!
//! Nothing is written when compilation or style processing fails.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::TransformCache;
use crate::compiler::{ComponentCompiler, StyleProcessor, TransformationResult};
use crate::dependency::{
    classify_imports, generate_module, rewrite_using_components, Dependency, LoaderPaths, WorkItem,
};
use crate::error::{render_error_chain, LoaderError, Result};
use crate::options::{CompilerOptions, LoaderOptions};
use crate::output::{stage_artifacts, ArtifactWriter, OutputContent, OutputOptions};
use crate::path_helper::{is_typescript_file, ConstantDirs};

/// Type tag handed to the compiler for component sources.
const COMPONENT_TYPE: &str = "component";

/// Everything the host knows about the file being loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderContext {
    pub resource_path: PathBuf,
    pub root_context: PathBuf,
    pub output_path: PathBuf,
    pub loaders: LoaderPaths,
    pub options: LoaderOptions,
}

impl LoaderContext {
    /// Directory of the entry file: `<root_context>/<dirname(entry_path)>`.
    pub fn source_root(&self) -> PathBuf {
        let entry_dir = Path::new(&self.options.entry_path)
            .parent()
            .unwrap_or(Path::new(""));
        self.root_context.join(entry_dir)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderOutput {
    /// Generated module text.
    pub code: String,
    /// Files the host must watch.
    pub file_dependencies: Vec<String>,
    /// Custom components to schedule through this loader.
    pub work_items: Vec<WorkItem>,
    pub dependencies: Vec<Dependency>,
}

pub struct ComponentLoader<C, S, W> {
    compiler: C,
    style_processor: S,
    writer: W,
}

impl<C, S, W> ComponentLoader<C, S, W>
where
    C: ComponentCompiler,
    S: StyleProcessor,
    W: ArtifactWriter,
{
    pub fn new(compiler: C, style_processor: S, writer: W) -> Self {
        Self {
            compiler,
            style_processor,
            writer,
        }
    }

    pub async fn run(&self, ctx: &LoaderContext) -> Result<LoaderOutput> {
        let resource_path = &ctx.resource_path;
        let options = &ctx.options;
        let platform = options.platform;
        let source_root = ctx.source_root();

        let raw_source =
            fs::read_to_string(resource_path).map_err(|e| LoaderError::io(resource_path, e))?;
        let transformed = self.compile(ctx, &raw_source, &source_root)?;

        let processed = self
            .style_processor
            .process(&transformed.css_files, &source_root)
            .await
            .map_err(|source| LoaderError::StyleProcess {
                resource: resource_path.clone(),
                source,
            })?;

        let config = rewrite_using_components(&transformed.component_config(), resource_path);

        let output_path =
            stage_artifacts(resource_path, &source_root, &ctx.output_path, platform)?;
        let content = OutputContent {
            code: transformed.code.clone(),
            map: transformed.map.clone(),
            css: processed.style,
            json: config.clone(),
            template: transformed.template.clone(),
            assets: processed.assets,
        };
        let output_options = OutputOptions {
            output_path,
            mode: options.mode,
            is_typescript_file: is_typescript_file(resource_path),
            turn_off_source_map: options.turn_off_source_map,
        };
        self.writer.write(&content, &raw_source, &output_options)?;

        let constant_dirs = ConstantDirs::under_root(&ctx.root_context, &options.constant_dir);
        let classification = classify_imports(
            &transformed.imported,
            &config,
            resource_path,
            &constant_dirs,
            options,
        );
        let code = generate_module(resource_path, &classification.dependencies, &ctx.loaders)?;

        log::debug!(
            "[{}] {} -> {} dependencies, {} work items",
            platform.name(),
            resource_path.display(),
            classification.dependencies.len(),
            classification.work_items.len()
        );

        Ok(LoaderOutput {
            code,
            file_dependencies: transformed.dependencies,
            work_items: classification.work_items,
            dependencies: classification.dependencies,
        })
    }

    fn compile(
        &self,
        ctx: &LoaderContext,
        raw_source: &str,
        source_root: &Path,
    ) -> Result<TransformationResult> {
        let resource_path = &ctx.resource_path;
        let options = &ctx.options;

        let compiler_options = CompilerOptions {
            resource_path: resource_path.to_string_lossy().to_string(),
            output_path: ctx.output_path.to_string_lossy().to_string(),
            source_path: source_root.to_string_lossy().to_string(),
            kind: COMPONENT_TYPE.to_string(),
            platform: options.platform,
            source_file_name: resource_path.to_string_lossy().to_string(),
            disable_copy_npm: options.disable_copy_npm,
            turn_off_source_map: options.turn_off_source_map,
        };

        let cache = match &options.cache_dir {
            Some(dir) => Some(TransformCache::new(ctx.root_context.join(dir))?),
            None => None,
        };
        if let Some(hit) = cache
            .as_ref()
            .and_then(|c| c.get(resource_path, raw_source, &compiler_options))
        {
            return Ok(hit);
        }

        let transformed = match self.compiler.compile(raw_source, &compiler_options) {
            Ok(t) => t,
            Err(source) => {
                let err = LoaderError::Compile {
                    platform: options.platform,
                    resource: resource_path.clone(),
                    source,
                };
                log::error!(
                    "[{}] Error occured when handling Component {}\n{}",
                    options.platform.name(),
                    resource_path.display(),
                    render_error_chain(&err)
                );
                return Err(err);
            }
        };

        if let Some(cache) = &cache {
            cache.set(resource_path, raw_source, &compiler_options, &transformed);
        }
        Ok(transformed)
    }
}
