use crate::compiler::TransformationResult;
use crate::error::{LoaderError, Result};
use crate::options::CompilerOptions;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Length of the resource-path digest used in entry file names.
const PATH_DIGEST_LEN: usize = 16;

#[derive(Serialize, Deserialize)]
pub struct CacheEntry {
    pub fingerprint: String,
    pub result: TransformationResult,
}

/// Compiler results per resource and platform, valid while the fingerprint of the source and
/// the compiler options matches.
#[derive(Debug, Clone)]
pub struct TransformCache {
    cache_dir: PathBuf,
}

impl TransformCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(|e| LoaderError::io(&cache_dir, e))?;
        Ok(Self { cache_dir })
    }

    /// sha256 over the source text followed by the JSON form of the compiler options.
    pub fn fingerprint(source: &str, options: &CompilerOptions) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update([0u8]);
        hasher.update(serde_json::to_vec(options).unwrap_or_default());
        format!("{:x}", hasher.finalize())
    }

    /// `<file name>.<platform>.<path digest>.json`: readable, one entry per platform, and
    /// distinct for same-named files in different directories.
    fn entry_path(&self, resource_path: &Path, options: &CompilerOptions) -> PathBuf {
        let digest = format!("{:x}", Sha256::digest(resource_path.to_string_lossy().as_bytes()));
        let file_name = resource_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.cache_dir.join(format!(
            "{}.{}.{}.json",
            file_name,
            options.platform.type_tag(),
            &digest[..PATH_DIGEST_LEN]
        ))
    }

    pub fn get(
        &self,
        resource_path: &Path,
        source: &str,
        options: &CompilerOptions,
    ) -> Option<TransformationResult> {
        let entry_path = self.entry_path(resource_path, options);
        let data = fs::read_to_string(&entry_path).ok()?;

        let entry: CacheEntry = match serde_json::from_str(&data) {
            Ok(e) => e,
            Err(e) => {
                log::warn!(
                    "cache entry for {} is corrupt, discarding: {}",
                    resource_path.display(),
                    e
                );
                fs::remove_file(entry_path).ok();
                return None;
            }
        };

        if entry.fingerprint == Self::fingerprint(source, options) {
            log::debug!("cache hit for {}", resource_path.display());
            Some(entry.result)
        } else {
            None
        }
    }

    pub fn set(
        &self,
        resource_path: &Path,
        source: &str,
        options: &CompilerOptions,
        result: &TransformationResult,
    ) {
        let entry = CacheEntry {
            fingerprint: Self::fingerprint(source, options),
            result: result.clone(),
        };

        if let Ok(data) = serde_json::to_string(&entry) {
            if let Err(e) = fs::write(self.entry_path(resource_path, options), data) {
                log::warn!(
                    "failed to write cache entry for {}: {}",
                    resource_path.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use tempfile::TempDir;

    fn result(code: &str) -> TransformationResult {
        TransformationResult {
            code: code.to_string(),
            css_files: vec!["index.css".to_string()],
            ..TransformationResult::default()
        }
    }

    fn compiler_options(platform: Platform) -> CompilerOptions {
        CompilerOptions {
            resource_path: "/src/pages/index.jsx".to_string(),
            output_path: "/dist".to_string(),
            source_path: "/src".to_string(),
            kind: "component".to_string(),
            platform,
            source_file_name: "/src/pages/index.jsx".to_string(),
            disable_copy_npm: false,
            turn_off_source_map: false,
        }
    }

    #[test]
    fn test_cache_hit_requires_same_source() {
        let dir = TempDir::new().unwrap();
        let cache = TransformCache::new(dir.path().join("cache")).unwrap();
        let resource = Path::new("/src/pages/index.jsx");
        let options = compiler_options(Platform::Ali);

        assert!(cache.get(resource, "v1", &options).is_none());
        cache.set(resource, "v1", &options, &result("a"));
        assert_eq!(cache.get(resource, "v1", &options), Some(result("a")));
        assert!(cache.get(resource, "v2", &options).is_none());
    }

    #[test]
    fn test_cache_separates_platforms() {
        let dir = TempDir::new().unwrap();
        let cache = TransformCache::new(dir.path()).unwrap();
        let resource = Path::new("/src/pages/index.jsx");
        let ali = compiler_options(Platform::Ali);
        let wechat = compiler_options(Platform::Wechat);

        cache.set(resource, "v1", &ali, &result("ali"));
        assert!(cache.get(resource, "v1", &wechat).is_none());

        cache.set(resource, "v1", &wechat, &result("wechat"));
        assert_eq!(cache.get(resource, "v1", &ali), Some(result("ali")));
        assert_eq!(cache.get(resource, "v1", &wechat), Some(result("wechat")));
    }

    #[test]
    fn test_cache_miss_when_compiler_options_change() {
        let dir = TempDir::new().unwrap();
        let cache = TransformCache::new(dir.path()).unwrap();
        let resource = Path::new("/src/pages/index.jsx");
        let options = compiler_options(Platform::Ali);
        let mut no_maps = options.clone();
        no_maps.turn_off_source_map = true;

        cache.set(resource, "v1", &options, &result("a"));
        assert!(cache.get(resource, "v1", &no_maps).is_none());
    }

    #[test]
    fn test_same_file_name_in_different_directories() {
        let dir = TempDir::new().unwrap();
        let cache = TransformCache::new(dir.path()).unwrap();
        let options = compiler_options(Platform::Ali);
        let home = Path::new("/src/pages/home/index.jsx");
        let about = Path::new("/src/pages/about/index.jsx");

        cache.set(home, "v1", &options, &result("home"));
        cache.set(about, "v1", &options, &result("about"));
        assert_eq!(cache.get(home, "v1", &options), Some(result("home")));
        assert_eq!(cache.get(about, "v1", &options), Some(result("about")));
    }

    #[test]
    fn test_corrupt_entry_is_removed() {
        let dir = TempDir::new().unwrap();
        let cache = TransformCache::new(dir.path()).unwrap();
        let resource = Path::new("/src/index.jsx");
        let options = compiler_options(Platform::Ali);
        let entry = cache.entry_path(resource, &options);
        fs::write(&entry, "{not json").unwrap();

        assert!(cache.get(resource, "v1", &options).is_none());
        assert!(!entry.exists());
    }
}
