use crate::definition::LanguageDefinition;
use crate::error::LanguageConfigError;
use std::path::Path;
use std::sync::Arc;

const BUNDLED: &[&str] = &[
    include_str!("../languages/rust.yaml"),
    include_str!("../languages/haskell.yaml"),
    include_str!("../languages/tcl.yaml"),
    include_str!("../languages/scss.yaml"),
    include_str!("../languages/gibiane.yaml"),
    include_str!("../languages/r.yaml"),
    include_str!("../languages/sql.yaml"),
];

#[derive(Debug, Default, Clone)]
/// A collection of language definitions, looked up by name or file extension.
pub struct LanguageSet {
    languages: Vec<Arc<LanguageDefinition>>,
}

impl LanguageSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The definitions shipped with this crate.
    pub fn bundled() -> Result<Self, LanguageConfigError> {
        let mut set = Self::new();
        for yaml in BUNDLED {
            set.load_from_str(yaml)?;
        }
        Ok(set)
    }

    /// Parse a definition from YAML and add it.
    pub fn load_from_str(&mut self, yaml: &str) -> Result<Arc<LanguageDefinition>, LanguageConfigError> {
        let definition: LanguageDefinition = serde_yaml::from_str(yaml)?;
        self.insert(definition)
    }

    /// Read a definition from a YAML file and add it.
    pub fn load_from_path(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<Arc<LanguageDefinition>, LanguageConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading language definition");
        self.load_from_str(&yaml)
    }

    /// Load every `*.yaml` file in `dir`, in file-name order.
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, LanguageConfigError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml") {
                paths.push(path);
            }
        }
        paths.sort();
        for path in &paths {
            self.load_from_path(path)?;
        }
        Ok(paths.len())
    }

    /// Add an already-parsed definition.
    pub fn insert(
        &mut self,
        definition: LanguageDefinition,
    ) -> Result<Arc<LanguageDefinition>, LanguageConfigError> {
        if definition.name.trim().is_empty() {
            return Err(LanguageConfigError::MissingField("name"));
        }
        if self.get(&definition.name).is_some() {
            return Err(LanguageConfigError::DuplicateLanguage(definition.name));
        }
        let definition = Arc::new(definition);
        self.languages.push(definition.clone());
        Ok(definition)
    }

    /// Find a definition by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<Arc<LanguageDefinition>> {
        self.languages
            .iter()
            .find(|lang| lang.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Find the first definition claiming `extension`.
    pub fn for_extension(&self, extension: &str) -> Option<Arc<LanguageDefinition>> {
        self.languages
            .iter()
            .find(|lang| lang.matches_extension(extension))
            .cloned()
    }

    /// Find a definition from a file path's extension.
    pub fn for_path(&self, path: impl AsRef<Path>) -> Option<Arc<LanguageDefinition>> {
        let extension = path.as_ref().extension()?.to_str()?;
        self.for_extension(extension)
    }

    /// All definitions in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<LanguageDefinition>> {
        self.languages.iter()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Returns `true` when the set is empty.
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
