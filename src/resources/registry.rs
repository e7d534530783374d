use std::{collections::HashMap, sync::Arc};

use crate::error::ResourceError;

/// Name-keyed store shared by the shader, mesh and texture registries.
///
/// Entries are handed out as `Arc`s so scene objects can hold on to them for
/// the rest of the run without borrowing the registry.
#[derive(Debug)]
pub struct Registry<T> {
    kind: &'static str,
    entries: HashMap<String, Arc<T>>,
}

impl<T> Registry<T> {
    /// `kind` names the registry in `NotFound` errors.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    /// Registers `value` under `name`, replacing an earlier entry.
    pub fn insert(&mut self, name: &str, value: T) -> Arc<T> {
        let value = Arc::new(value);
        if self.entries.insert(name.to_string(), value.clone()).is_some() {
            log::warn!("{} `{}` was registered twice, keeping the newer one", self.kind, name);
        }
        value
    }

    pub fn get_by_name(&self, name: &str) -> Result<Arc<T>, ResourceError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| ResourceError::not_found(self.kind, name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_share_the_registered_value() {
        let mut registry = Registry::new("mesh");
        let inserted = registry.insert("cube", 36u32);
        let found = registry.get_by_name("cube").expect("cube is registered");
        assert!(Arc::ptr_eq(&inserted, &found));
    }

    #[test]
    fn unknown_names_are_not_found() {
        let registry: Registry<u32> = Registry::new("texture");
        match registry.get_by_name("gravel") {
            Err(ResourceError::NotFound { kind, name }) => {
                assert_eq!(kind, "texture");
                assert_eq!(name, "gravel");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
