use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::context::DeviceContext;
use crate::error::Error;

/// Loads WGSL shader text from disk and hands out cached modules.
///
/// Modules are keyed by their source path, so repeated pipeline builds
/// against the same file reuse one `wgpu::ShaderModule`.
#[derive(Default)]
pub struct ShaderCatalog {
    modules: HashMap<PathBuf, wgpu::ShaderModule>,
}

impl ShaderCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `path` and creates the module for it, or returns the cached one.
    pub fn load(
        &mut self,
        context: &DeviceContext,
        path: &Path,
    ) -> Result<wgpu::ShaderModule, Error> {
        if let Some(module) = self.modules.get(path) {
            return Ok(module.clone());
        }

        let source = read_source(path)?;
        let module = context
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: path.file_name().and_then(|name| name.to_str()),
                source: wgpu::ShaderSource::Wgsl(Cow::Owned(source)),
            });
        tracing::debug!(path = %path.display(), "created shader module");
        self.modules.insert(path.to_path_buf(), module.clone());
        Ok(module)
    }

    /// Number of distinct modules created so far.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

fn read_source(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|err| Error::ShaderLoad {
        path: path.to_path_buf(),
        source: err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_reports_shader_load_failure() {
        let err = read_source(Path::new("does/not/exist.wgsl")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("failed to load shader"), "{message}");
        assert!(message.contains("exist.wgsl"), "{message}");
    }

    #[test]
    fn present_source_is_read_verbatim() {
        let dir = std::env::temp_dir().join("orchestrator-shader-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("unit.wgsl");
        fs::write(&path, "@vertex fn vertex_main() {}").unwrap();
        assert_eq!(read_source(&path).unwrap(), "@vertex fn vertex_main() {}");
        fs::remove_file(&path).ok();
    }
}
