//! Local object definition store
//!
//! MISP object definitions live on disk in the misp-objects repository
//! layout: `<root>/<object-name>/definition.json`. Each definition maps
//! attribute relation names (the CSV column base names) to MISP attribute
//! types. Attribute generation needs a definition for every object kind it
//! encounters; a kind without one is a fatal error.

use crate::error::{CliError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// How one attribute relation maps to a MISP attribute type.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeSpec {
    /// MISP attribute type (e.g. "ip-dst", "sha256", "text")
    #[serde(rename = "misp-attribute")]
    pub misp_attribute: String,

    /// Whether values of this relation should feed detection (IDS) exports
    #[serde(default)]
    pub to_ids: Option<bool>,

    /// Whether correlation is disabled for this relation
    #[serde(default)]
    pub disable_correlation: Option<bool>,
}

/// One object definition (`definition.json`)
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectDefinition {
    /// Object name; matches the directory name in the misp-objects layout
    pub name: String,

    /// Template uuid, carried into the submitted object
    pub uuid: String,

    /// Template version, carried into the submitted object
    pub version: u64,

    #[serde(rename = "meta-category", default)]
    pub meta_category: Option<String>,

    /// Relation name -> attribute spec
    pub attributes: HashMap<String, AttributeSpec>,
}

/// Loads object definitions from a local misp-objects directory.
pub struct DefinitionStore {
    root: Option<PathBuf>,
}

impl DefinitionStore {
    /// Create a store rooted at `root` (the directory containing one
    /// subdirectory per object). `None` means no definitions are available
    /// and every lookup fails.
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Load the definition for `kind`.
    ///
    /// Reads `<root>/<kind>/definition.json` on every call; records are
    /// processed once each, so there is nothing worth caching.
    pub fn lookup(&self, kind: &str) -> Result<ObjectDefinition> {
        let Some(root) = &self.root else {
            return Err(CliError::attribute_generation(
                kind,
                "no object definitions directory is configured",
            ));
        };

        let path = root.join(kind).join("definition.json");
        if !path.exists() {
            return Err(CliError::attribute_generation(
                kind,
                format!("no definition at {}", path.display()),
            ));
        }

        let content = std::fs::read_to_string(&path)?;
        let definition: ObjectDefinition = serde_json::from_str(&content).map_err(|e| {
            CliError::attribute_generation(
                kind,
                format!("invalid definition at {}: {}", path.display(), e),
            )
        })?;

        Ok(definition)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PERSON_DEFINITION: &str = r#"{
        "name": "person",
        "uuid": "a15b0477-e9d1-4b9c-9546-abe78a4f4248",
        "version": 14,
        "meta-category": "misc",
        "attributes": {
            "full-name": {"misp-attribute": "text", "disable_correlation": true},
            "alias": {"misp-attribute": "text"}
        }
    }"#;

    fn store_with_person() -> (TempDir, DefinitionStore) {
        let dir = TempDir::new().unwrap();
        let person_dir = dir.path().join("person");
        std::fs::create_dir_all(&person_dir).unwrap();
        std::fs::write(person_dir.join("definition.json"), PERSON_DEFINITION).unwrap();

        let store = DefinitionStore::new(Some(dir.path().to_path_buf()));
        (dir, store)
    }

    #[test]
    fn test_lookup_known_definition() {
        let (_dir, store) = store_with_person();

        let definition = store.lookup("person").unwrap();
        assert_eq!(definition.name, "person");
        assert_eq!(definition.version, 14);
        assert_eq!(definition.meta_category.as_deref(), Some("misc"));

        let full_name = &definition.attributes["full-name"];
        assert_eq!(full_name.misp_attribute, "text");
        assert_eq!(full_name.disable_correlation, Some(true));
        assert_eq!(full_name.to_ids, None);
    }

    #[test]
    fn test_lookup_unknown_kind() {
        let (_dir, store) = store_with_person();

        let err = store.lookup("no-such-object").unwrap_err();
        assert!(matches!(err, CliError::AttributeGeneration { .. }));
    }

    #[test]
    fn test_lookup_without_root() {
        let store = DefinitionStore::new(None);
        let err = store.lookup("person").unwrap_err();
        assert!(matches!(err, CliError::AttributeGeneration { .. }));
    }

    #[test]
    fn test_lookup_invalid_json() {
        let dir = TempDir::new().unwrap();
        let bad_dir = dir.path().join("broken");
        std::fs::create_dir_all(&bad_dir).unwrap();
        std::fs::write(bad_dir.join("definition.json"), "{not json").unwrap();

        let store = DefinitionStore::new(Some(dir.path().to_path_buf()));
        let err = store.lookup("broken").unwrap_err();
        assert!(matches!(err, CliError::AttributeGeneration { .. }));
    }
}
