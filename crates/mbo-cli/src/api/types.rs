//! MISP wire types
//!
//! Only the slices of the MISP JSON surface this tool touches are modeled;
//! unknown fields are ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An object template as MISP describes it (read-only for this tool).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectTemplate {
    /// Opaque identifier, used in the submission URL
    pub id: String,

    /// Template name, matched against `ObjectRecord::kind`
    pub name: String,
}

/// Wrapper element in the template listing (`{"ObjectTemplate": {...}}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectTemplateEntry {
    #[serde(rename = "ObjectTemplate")]
    pub object_template: ObjectTemplate,
}

/// Template listing envelope; a response without the `response` key is a
/// fetch failure regardless of HTTP status.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateListResponse {
    pub response: Option<Vec<ObjectTemplateEntry>>,
}

/// Name -> template id mapping, built once right after the template fetch.
///
/// MISP does not guarantee template names are unique; when duplicates occur
/// the first one in listing order wins.
#[derive(Debug, Clone)]
pub struct TemplateIndex {
    by_name: HashMap<String, String>,
    names: Vec<String>,
}

impl TemplateIndex {
    /// Build the index from the template listing, in listing order.
    pub fn new(entries: &[ObjectTemplateEntry]) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut names = Vec::with_capacity(entries.len());

        for entry in entries {
            let template = &entry.object_template;
            by_name
                .entry(template.name.clone())
                .or_insert_with(|| template.id.clone());
            names.push(template.name.clone());
        }

        Self { by_name, names }
    }

    /// Resolve a kind to a template id (case-sensitive exact match).
    pub fn resolve(&self, kind: &str) -> Option<&str> {
        self.by_name.get(kind).map(String::as_str)
    }

    /// Every template name in listing order, for diagnostics.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Request body for `POST /events/add`.
#[derive(Debug, Clone, Serialize)]
pub struct AddEventRequest {
    #[serde(rename = "Event")]
    pub event: NewEvent,
}

/// The event to create.
#[derive(Debug, Clone, Serialize)]
pub struct NewEvent {
    /// Event title (the `info` field)
    pub info: String,

    /// Distribution level 0-4, new events only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<u8>,
}

/// Response from `POST /events/add`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddEventResponse {
    #[serde(rename = "Event")]
    pub event: Option<CreatedEvent>,

    pub errors: Option<serde_json::Value>,
}

/// The slice of a created event the tool needs.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEvent {
    pub uuid: String,
}

/// Response from `POST /objects/add/...`; only the error payload matters.
#[derive(Debug, Clone, Deserialize)]
pub struct AddObjectResponse {
    pub errors: Option<serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> ObjectTemplateEntry {
        ObjectTemplateEntry {
            object_template: ObjectTemplate {
                id: id.to_string(),
                name: name.to_string(),
            },
        }
    }

    #[test]
    fn test_index_resolves_names() {
        let index = TemplateIndex::new(&[entry("1", "person"), entry("2", "file")]);

        assert_eq!(index.resolve("person"), Some("1"));
        assert_eq!(index.resolve("file"), Some("2"));
        assert_eq!(index.resolve("domain-ip"), None);
        // Case-sensitive by design
        assert_eq!(index.resolve("Person"), None);
    }

    #[test]
    fn test_index_first_match_wins_on_duplicates() {
        let index =
            TemplateIndex::new(&[entry("1", "person"), entry("2", "person"), entry("3", "file")]);

        assert_eq!(index.resolve("person"), Some("1"));
        // Diagnostics still list every entry
        assert_eq!(index.names(), &["person", "person", "file"]);
    }

    #[test]
    fn test_template_list_deserialization() {
        let json = r#"{"response": [{"ObjectTemplate": {"id": "9", "name": "person", "version": "14"}}]}"#;
        let parsed: TemplateListResponse = serde_json::from_str(json).unwrap();
        let entries = parsed.response.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].object_template.name, "person");
        assert_eq!(entries[0].object_template.id, "9");
    }

    #[test]
    fn test_template_list_without_response_key() {
        let json = r#"{"message": "Authentication failed"}"#;
        let parsed: TemplateListResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.response.is_none());
    }

    #[test]
    fn test_add_event_request_shape() {
        let request = AddEventRequest {
            event: NewEvent {
                info: "Batch import".to_string(),
                distribution: Some(3),
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["Event"]["info"], "Batch import");
        assert_eq!(json["Event"]["distribution"], 3);
    }
}
