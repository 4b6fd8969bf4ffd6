use crate::error::{Error, Result};
use crate::model::config::{ModelDefinition, ModelFile};
use crate::units::Converter;
use std::collections::HashMap;
use std::path::Path;

/// Record type definitions keyed by model name.
pub struct ModelRegistry {
    models: HashMap<String, ModelDefinition>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    pub fn register(&mut self, definition: ModelDefinition) -> Result<()> {
        let name = definition.record_type.name().to_string();
        if self.models.contains_key(&name) {
            return Err(Error::InvalidConfig(format!(
                "model '{}' is defined more than once",
                name
            )));
        }
        self.models.insert(name, definition);
        Ok(())
    }

    /// Load every `*.toml` model definition found in `dir`.
    pub fn load_directory<P: AsRef<Path>>(&mut self, dir: P, converter: &dyn Converter) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Err(Error::InvalidConfig(format!(
                "model directory {} not found",
                dir.display()
            )));
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            log::debug!("loading model definition {}", path.display());
            let definition = ModelFile::load_from_file(&path)?.into_definition(converter)?;
            self.register(definition)?;
        }

        Ok(())
    }

    /// Load model definitions from file contents (filename -> content map)
    pub fn load_from_files(
        &mut self,
        files: HashMap<String, String>,
        converter: &dyn Converter,
    ) -> Result<()> {
        let mut files: Vec<_> = files.into_iter().collect();
        files.sort_by(|a, b| a.0.cmp(&b.0));

        for (_filename, content) in files {
            let definition = ModelFile::parse(&content)?.into_definition(converter)?;
            self.register(definition)?;
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ModelDefinition> {
        self.models.get(name)
    }

    pub fn list_models(&self) -> Vec<&String> {
        let mut names: Vec<_> = self.models.keys().collect();
        names.sort();
        names
    }

    /// Input-validation predicate: does `field` of `model` accept `value` as a unit (id or symbol)?
    pub fn supports_unit(&self, model: &str, field: &str, value: &str) -> Result<bool> {
        let definition = self
            .get(model)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown model '{}'", model)))?;
        Ok(definition.record_type.field(field)?.supports(value))
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
