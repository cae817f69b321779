//! Dependency Classifier & Code Generator
//!
//! Every module name the compiler reports in `imported` becomes one or more dependency records,
//! and every record becomes one import statement of the generated module. Records with a loader
//! are rendered with loader-chaining syntax so the host re-routes them:
//!
//! ```text
//! import '<loader path>?<json options>!<module>';
//! import '<module>';
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::compiler::ImportUsage;
use crate::error::Result;
use crate::options::{LoaderOptions, MixedUsagePolicy};
use crate::path_helper::{
    add_relative_path_prefix, double_backslash, normalize_output_path, normalize_path,
    relative_path, resolve, strip_extension, strip_script_extension, to_slash, ConstantDirs,
};

/// Config key holding the component map.
pub const USING_COMPONENTS: &str = "usingComponents";

/// Keys with this prefix name user-authored components.
const CUSTOM_COMPONENT_PREFIX: &str = "c-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoaderKind {
    ComponentLoader,
    ScriptLoader,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader: Option<LoaderKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<LoaderOptions>,
}

impl Dependency {
    pub fn pass_through(name: &str) -> Self {
        Dependency {
            name: name.to_string(),
            loader: None,
            options: None,
        }
    }

    pub fn routed(name: &str, loader: LoaderKind, options: LoaderOptions) -> Self {
        Dependency {
            name: name.to_string(),
            loader: Some(loader),
            options: Some(options),
        }
    }
}

/// A custom component the host should schedule through this loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub request: PathBuf,
    pub loader: LoaderKind,
}

/// Resolved module paths of the two downstream loaders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderPaths {
    pub component_loader: String,
    pub script_loader: String,
}

impl LoaderPaths {
    pub fn path_of(&self, kind: LoaderKind) -> &str {
        match kind {
            LoaderKind::ComponentLoader => &self.component_loader,
            LoaderKind::ScriptLoader => &self.script_loader,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub dependencies: Vec<Dependency>,
    pub work_items: Vec<WorkItem>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG REWRITE
// ═══════════════════════════════════════════════════════════════════════════════

/// Rewrite the `usingComponents` entries of a component config.
///
/// Custom component paths become relative to the directory of `resource_path`, with a `./`
/// head and no extension. Every value is normalized for output. Other config keys are copied
/// untouched.
pub fn rewrite_using_components(
    config: &Map<String, Value>,
    resource_path: &Path,
) -> Map<String, Value> {
    let mut config = config.clone();
    let resource_dir = resource_path.parent().unwrap_or(Path::new(""));

    if let Some(Value::Object(using_components)) = config.get_mut(USING_COMPONENTS) {
        for (key, value) in using_components.iter_mut() {
            let Value::String(path) = value else {
                continue;
            };
            let rewritten = if key.starts_with(CUSTOM_COMPONENT_PREFIX) {
                let target = resolve(resource_dir, path);
                let relative = to_slash(&relative_path(resource_dir, &target));
                let relative = add_relative_path_prefix(&relative);
                normalize_output_path(&strip_extension(&relative, None))
            } else {
                normalize_output_path(path)
            };
            *path = rewritten;
        }
    }

    config
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Whether the import `name` points at (or into) one of the rewritten `usingComponents`
/// entries. Both sides are resolved against `resource_dir` and compared component-wise.
///
/// Bare module specifiers (`mini-ali-ui/es/button`) name packages, not files next to the
/// component, and never match.
pub fn is_custom_component(
    name: &str,
    using_components: Option<&Map<String, Value>>,
    resource_dir: &Path,
) -> bool {
    let Some(using_components) = using_components else {
        return false;
    };
    let candidate = normalize_path(&resource_dir.join(strip_script_extension(name)));

    using_components.values().any(|value| match value {
        Value::String(path) if is_file_reference(path) => {
            resolve(resource_dir, path).starts_with(&candidate)
        }
        _ => false,
    })
}

/// Relative (`./`, `../`) or absolute paths. Everything else is a package specifier.
fn is_file_reference(path: &str) -> bool {
    path == "."
        || path == ".."
        || path.starts_with("./")
        || path.starts_with("../")
        || Path::new(path).is_absolute()
}

/// Classify every imported name of one component, in discovery order.
pub fn classify_imports(
    imported: &IndexMap<String, Vec<ImportUsage>>,
    config: &Map<String, Value>,
    resource_path: &Path,
    constant_dirs: &ConstantDirs,
    options: &LoaderOptions,
) -> Classification {
    let resource_dir = resource_path.parent().unwrap_or(Path::new(""));
    let using_components = config.get(USING_COMPONENTS).and_then(Value::as_object);
    let mut classification = Classification::default();

    for (name, usages) in imported {
        if is_custom_component(name, using_components, resource_dir) {
            let component_path = resolve(resource_dir, name);
            if constant_dirs.contains(&component_path) {
                log::debug!("{} is a native component, routing to script loader", name);
                classification
                    .dependencies
                    .push(Dependency::routed(name, LoaderKind::ScriptLoader, options.clone()));
            } else {
                classification
                    .dependencies
                    .push(Dependency::routed(name, LoaderKind::ComponentLoader, options.clone()));
                classification.work_items.push(WorkItem {
                    request: component_path,
                    loader: LoaderKind::ComponentLoader,
                });
            }
            continue;
        }

        classify_usages(name, usages, options, &mut classification.dependencies);
    }

    classification
}

fn classify_usages(
    name: &str,
    usages: &[ImportUsage],
    options: &LoaderOptions,
    out: &mut Vec<Dependency>,
) {
    let first_wins = options.mixed_usage_policy == MixedUsagePolicy::FirstWins;
    let mut library_emitted = false;
    let mut plain_emitted = false;

    for usage in usages {
        if usage.is_from_component_library {
            if library_emitted || (first_wins && plain_emitted) {
                continue;
            }
            out.push(Dependency::routed(
                name,
                LoaderKind::ScriptLoader,
                options.with_imported_component(&usage.local),
            ));
            library_emitted = true;
        } else {
            if plain_emitted || (first_wins && library_emitted) {
                continue;
            }
            out.push(Dependency::pass_through(name));
            plain_emitted = true;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CODE GENERATION
// ═══════════════════════════════════════════════════════════════════════════════

pub fn create_import_statement(request: &str) -> String {
    format!("import '{}';", double_backslash(request))
}

/// One import statement per record, newline separated.
pub fn generate_dependencies(dependencies: &[Dependency], loaders: &LoaderPaths) -> Result<String> {
    let mut statements = Vec::with_capacity(dependencies.len());
    for dependency in dependencies {
        let request = match (dependency.loader, &dependency.options) {
            (Some(kind), Some(options)) => format!(
                "{}?{}!{}",
                loaders.path_of(kind),
                serde_json::to_string(options)?,
                dependency.name
            ),
            (Some(kind), None) => format!("{}!{}", loaders.path_of(kind), dependency.name),
            (None, _) => dependency.name.clone(),
        };
        statements.push(create_import_statement(&request));
    }
    Ok(statements.join("\n"))
}

/// The module handed back to the host for `resource_path`.
pub fn generate_module(
    resource_path: &Path,
    dependencies: &[Dependency],
    loaders: &LoaderPaths,
) -> Result<String> {
    Ok(format!(
        "/* Generated by ComponentLoader, sourceFile: {}. */\n{}",
        resource_path.display(),
        generate_dependencies(dependencies, loaders)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use serde_json::json;

    fn loader_options() -> LoaderOptions {
        LoaderOptions::new(Platform::Ali, "src/app")
    }

    fn loaders() -> LoaderPaths {
        LoaderPaths {
            component_loader: "/loaders/component-loader.js".to_string(),
            script_loader: "/loaders/script-loader.js".to_string(),
        }
    }

    fn config(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn imported(entries: &[(&str, Vec<ImportUsage>)]) -> IndexMap<String, Vec<ImportUsage>> {
        entries
            .iter()
            .map(|(name, usages)| (name.to_string(), usages.clone()))
            .collect()
    }

    #[test]
    fn test_rewrite_custom_component_relative_to_resource() {
        let cfg = config(json!({
            "component": true,
            "usingComponents": {
                "c-Foo": "/project/src/components/Foo.jsx",
                "button": "mini-ali-ui\\es\\button"
            }
        }));
        let rewritten = rewrite_using_components(&cfg, Path::new("/project/src/pages/index.jsx"));
        assert_eq!(rewritten["usingComponents"]["c-Foo"], json!("../components/Foo"));
        assert_eq!(rewritten["usingComponents"]["button"], json!("mini-ali-ui/es/button"));
        assert_eq!(rewritten["component"], json!(true));
    }

    #[test]
    fn test_rewrite_without_using_components_is_identity() {
        let cfg = config(json!({"navigationBarTitleText": "Home"}));
        assert_eq!(rewrite_using_components(&cfg, Path::new("/p/index.jsx")), cfg);
    }

    #[test]
    fn test_rewrite_round_trip_points_at_source() {
        let resource = Path::new("/project/src/pages/home/index.jsx");
        let source = "/project/src/components/Card/index.jsx";
        let cfg = config(json!({"usingComponents": {"c-Card": source}}));
        let rewritten = rewrite_using_components(&cfg, resource);
        let value = rewritten["usingComponents"]["c-Card"].as_str().unwrap();

        let resolved = resolve(resource.parent().unwrap(), value);
        assert_eq!(resolved, PathBuf::from(strip_extension(source, None)));
    }

    #[test]
    fn test_custom_component_routes_to_component_loader() {
        let resource = Path::new("/project/src/pages/index.jsx");
        let cfg = rewrite_using_components(
            &config(json!({"usingComponents": {"c-Foo": "./components/Foo"}})),
            resource,
        );
        let imports = imported(&[("./components/Foo", vec![ImportUsage::plain("Foo")])]);
        let dirs = ConstantDirs::under_root(Path::new("/project"), &["src/public".to_string()]);

        let result = classify_imports(&imports, &cfg, resource, &dirs, &loader_options());
        assert_eq!(result.dependencies.len(), 1);
        assert_eq!(result.dependencies[0].loader, Some(LoaderKind::ComponentLoader));
        assert_eq!(
            result.work_items,
            vec![WorkItem {
                request: PathBuf::from("/project/src/pages/components/Foo"),
                loader: LoaderKind::ComponentLoader,
            }]
        );
    }

    #[test]
    fn test_import_with_extension_still_matches() {
        let resource = Path::new("/project/src/pages/index.jsx");
        let cfg = config(json!({"usingComponents": {"c-Foo": "./components/Foo"}}));
        let dirs = ConstantDirs::new(Vec::new());
        let imports = imported(&[("./components/Foo.jsx", vec![ImportUsage::plain("Foo")])]);
        let result = classify_imports(&imports, &cfg, resource, &dirs, &loader_options());
        assert_eq!(result.dependencies[0].loader, Some(LoaderKind::ComponentLoader));
    }

    #[test]
    fn test_constant_dir_component_routes_to_script_loader() {
        let resource = Path::new("/project/src/pages/index.jsx");
        let cfg = config(json!({"usingComponents": {"c-Native": "../public/native/index"}}));
        let imports = imported(&[("../public/native/index", vec![ImportUsage::plain("Native")])]);
        let dirs = ConstantDirs::under_root(Path::new("/project"), &["src/public".to_string()]);

        let result = classify_imports(&imports, &cfg, resource, &dirs, &loader_options());
        assert_eq!(result.dependencies[0].loader, Some(LoaderKind::ScriptLoader));
        assert!(result.work_items.is_empty());
    }

    #[test]
    fn test_sibling_prefix_is_not_custom_component() {
        let cfg = config(json!({"c-Foo": "x", "FooBar": "./components/FooBar"}));
        assert!(!is_custom_component("./components/Foo", Some(&cfg), Path::new("/src")));
        assert!(is_custom_component("./components/FooBar", Some(&cfg), Path::new("/src")));
        assert!(!is_custom_component("./components/Foo", None, Path::new("/src")));
    }

    #[test]
    fn test_library_listed_in_using_components_routes_to_script_loader() {
        let resource = Path::new("/project/src/pages/index.jsx");
        let cfg = rewrite_using_components(
            &config(json!({"usingComponents": {"button": "mini-ali-ui/es/button/index"}})),
            resource,
        );
        let imports = imported(&[("mini-ali-ui", vec![ImportUsage::library("Button")])]);
        let dirs = ConstantDirs::new(Vec::new());

        let result = classify_imports(&imports, &cfg, resource, &dirs, &loader_options());
        assert_eq!(result.dependencies.len(), 1);
        let dep = &result.dependencies[0];
        assert_eq!(dep.loader, Some(LoaderKind::ScriptLoader));
        assert_eq!(
            dep.options.as_ref().unwrap().imported_component.as_deref(),
            Some("Button")
        );
        assert!(result.work_items.is_empty());
    }

    #[test]
    fn test_file_reference_detection() {
        assert!(is_file_reference("./components/Foo"));
        assert!(is_file_reference("../Foo"));
        assert!(is_file_reference("/project/src/Foo"));
        assert!(!is_file_reference("mini-ali-ui/es/button/index"));
        assert!(!is_file_reference("x"));
    }

    #[test]
    fn test_plain_usages_deduplicated() {
        let imports = imported(&[(
            "./utils",
            vec![ImportUsage::plain("a"), ImportUsage::plain("b")],
        )]);
        let result = classify_imports(
            &imports,
            &Map::new(),
            Path::new("/src/index.jsx"),
            &ConstantDirs::new(Vec::new()),
            &loader_options(),
        );
        assert_eq!(result.dependencies, vec![Dependency::pass_through("./utils")]);
    }

    #[test]
    fn test_library_usage_carries_imported_component() {
        let imports = imported(&[(
            "mini-ali-ui",
            vec![ImportUsage::library("Button"), ImportUsage::library("Card")],
        )]);
        let result = classify_imports(
            &imports,
            &Map::new(),
            Path::new("/src/index.jsx"),
            &ConstantDirs::new(Vec::new()),
            &loader_options(),
        );
        assert_eq!(result.dependencies.len(), 1);
        let dep = &result.dependencies[0];
        assert_eq!(dep.loader, Some(LoaderKind::ScriptLoader));
        assert_eq!(
            dep.options.as_ref().unwrap().imported_component.as_deref(),
            Some("Button")
        );
    }

    #[test]
    fn test_mixed_usages_independent_policy() {
        let imports = imported(&[(
            "rax-view",
            vec![
                ImportUsage::library("View"),
                ImportUsage::plain("x"),
                ImportUsage::library("Other"),
                ImportUsage::plain("y"),
            ],
        )]);
        let result = classify_imports(
            &imports,
            &Map::new(),
            Path::new("/src/index.jsx"),
            &ConstantDirs::new(Vec::new()),
            &loader_options(),
        );
        let loaders: Vec<Option<LoaderKind>> =
            result.dependencies.iter().map(|d| d.loader).collect();
        assert_eq!(loaders, vec![Some(LoaderKind::ScriptLoader), None]);
    }

    #[test]
    fn test_mixed_usages_first_wins_policy() {
        let mut options = loader_options();
        options.mixed_usage_policy = MixedUsagePolicy::FirstWins;
        let imports = imported(&[
            ("a", vec![ImportUsage::plain("a"), ImportUsage::library("A")]),
            ("b", vec![ImportUsage::library("B"), ImportUsage::plain("b")]),
        ]);
        let result = classify_imports(
            &imports,
            &Map::new(),
            Path::new("/src/index.jsx"),
            &ConstantDirs::new(Vec::new()),
            &options,
        );
        assert_eq!(result.dependencies.len(), 2);
        assert_eq!(result.dependencies[0], Dependency::pass_through("a"));
        assert_eq!(result.dependencies[1].loader, Some(LoaderKind::ScriptLoader));
    }

    #[test]
    fn test_generate_dependencies_syntax() {
        let mut options = loader_options();
        options.constant_dir = vec!["src/public".to_string()];
        let deps = vec![
            Dependency::pass_through("./utils"),
            Dependency::routed("./components/Foo", LoaderKind::ComponentLoader, options),
        ];
        let code = generate_dependencies(&deps, &loaders()).unwrap();
        let lines: Vec<&str> = code.lines().collect();
        assert_eq!(lines[0], "import './utils';");
        assert_eq!(
            lines[1],
            r#"import '/loaders/component-loader.js?{"platform":"ali","entryPath":"src/app","constantDir":["src/public"],"mode":"build","disableCopyNpm":false,"turnOffSourceMap":false}!./components/Foo';"#
        );
    }

    #[test]
    fn test_generate_dependencies_doubles_backslashes() {
        let loaders = LoaderPaths {
            component_loader: "C:\\loaders\\component.js".to_string(),
            script_loader: "C:\\loaders\\script.js".to_string(),
        };
        let deps = vec![Dependency {
            name: "mod".to_string(),
            loader: Some(LoaderKind::ScriptLoader),
            options: None,
        }];
        assert_eq!(
            generate_dependencies(&deps, &loaders).unwrap(),
            "import 'C:\\\\loaders\\\\script.js!mod';"
        );
    }

    #[test]
    fn test_generate_module_header() {
        let module = generate_module(Path::new("/src/index.jsx"), &[], &loaders()).unwrap();
        assert_eq!(module, "/* Generated by ComponentLoader, sourceFile: /src/index.jsx. */\n");
    }
}
