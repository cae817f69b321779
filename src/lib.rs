//! # Mini-App Component Loader (native core)
//!
//! Transformation core of the mini-app build pipeline. The host build tool calls it once per
//! component source file.
//!
//! ## Pipeline
//!
//! 1. **Compile**: the external [`ComponentCompiler`] turns the source into code, config,
//!    template, style file list and the imports it discovered.
//! 2. **Styles**: the [`StyleProcessor`] resolves the style files into one style text plus the
//!    assets it references. This is the only async step.
//! 3. **Config rewrite**: `usingComponents` paths are made relative to the component and
//!    normalized for output ([`rewrite_using_components`]).
//! 4. **Staging**: all artifacts share one base path under the output root
//!    ([`stage_artifacts`]) and are handed to an [`ArtifactWriter`].
//! 5. **Classification**: every import becomes a dependency record routed to the component
//!    loader, the script loader or nothing, and is rendered as an import statement of the
//!    generated module ([`classify_imports`], [`generate_dependencies`]).
//!
//! The style declaration transformer ([`transformer`], [`stylesheet`]) converts parsed CSS
//! rules into style objects for platforms that take styles as data.
//!
//! ## Invariants
//!
//! - Nothing is written for a file whose compilation fails.
//! - Selector and declaration problems are advisory. They go to a [`MessageSink`], never to
//!   the error path.
//! - Generated module paths always use `/`, with backslashes doubled inside string literals.

#[cfg(feature = "napi")]
mod native;

pub mod cache;
pub mod compiler;
pub mod dependency;
pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod normalize_color;
pub mod options;
pub mod output;
pub mod particular;
pub mod path_helper;
pub mod platform;
pub mod stylesheet;
pub mod transformer;
pub mod validation;


pub use compiler::{
    ComponentCompiler, ConcatStyleProcessor, ImportUsage, ProcessedStyle, StyleProcessor,
    TransformationResult,
};
pub use dependency::{
    classify_imports, generate_dependencies, generate_module, rewrite_using_components,
    Dependency, LoaderKind, LoaderPaths, WorkItem,
};
pub use diagnostics::{Diagnostics, MessageSink, Position};
pub use error::{LoaderError, Result};
pub use loader::{ComponentLoader, LoaderContext, LoaderOutput};
pub use options::{LoaderOptions, MixedUsagePolicy, Mode};
pub use output::{
    stage_artifacts, ArtifactPaths, ArtifactWriter, FsArtifactWriter, OutputContent, OutputOptions,
};
pub use platform::Platform;
pub use stylesheet::{transform_stylesheet, Rule, StyleObject, StyleValue};
pub use transformer::{convert, convert_prop, convert_value, sanitize_selector, StyleQuery};

#[cfg(feature = "napi")]
pub use native::{
    generate_dependencies_native, rewrite_using_components_native, transform_rule_native,
    transform_stylesheet_native,
};
