use super::{CppEcosystem, Ecosystem, GoEcosystem, RustEcosystem};
use std::path::Path;

/// Fixed, ordered list of known ecosystems, built once per run.
///
/// Registration order is significant: it decides job iteration order during
/// assembly, and therefore which job wins when two ecosystems emit the same
/// job name (later-merged wins).
pub struct EcosystemRegistry {
    ecosystems: Vec<Box<dyn Ecosystem>>,
}

impl EcosystemRegistry {
    pub fn new() -> Self {
        Self {
            ecosystems: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(GoEcosystem));
        registry.register(Box::new(RustEcosystem));
        registry.register(Box::new(CppEcosystem));
        registry
    }

    /// Adds an ecosystem. Names must be unique; a duplicate is a mistake
    /// in registry construction, not a runtime condition.
    pub fn register(&mut self, ecosystem: Box<dyn Ecosystem>) {
        assert!(
            self.ecosystems.iter().all(|e| e.name() != ecosystem.name()),
            "duplicate ecosystem registered: {}",
            ecosystem.name()
        );
        self.ecosystems.push(ecosystem);
    }

    /// All registered ecosystems, in registration order.
    pub fn all(&self) -> impl Iterator<Item = &dyn Ecosystem> {
        self.ecosystems.iter().map(|e| e.as_ref())
    }

    /// Ecosystems whose presence check passes for `repo_root`, in
    /// registration order.
    pub fn used_in<'a>(&'a self, repo_root: &'a Path) -> impl Iterator<Item = &'a dyn Ecosystem> {
        self.all().filter(move |e| e.used(repo_root))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.ecosystems.iter().map(|e| e.name()).collect()
    }
}

impl Default for EcosystemRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_registry_empty() {
        let registry = EcosystemRegistry::new();
        assert!(registry.names().is_empty());
    }

    #[test]
    fn test_registry_with_defaults_order() {
        let registry = EcosystemRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["golang", "rust", "cpp"]);
    }

    #[test]
    #[should_panic(expected = "duplicate ecosystem registered: rust")]
    fn test_duplicate_name_rejected() {
        let mut registry = EcosystemRegistry::with_defaults();
        registry.register(Box::new(RustEcosystem));
    }

    #[test]
    fn test_used_in_filters_by_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();

        let registry = EcosystemRegistry::with_defaults();
        let used: Vec<&str> = registry.used_in(dir.path()).map(|e| e.name()).collect();
        assert_eq!(used, vec!["rust"]);
    }
}
