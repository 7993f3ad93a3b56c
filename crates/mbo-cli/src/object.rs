//! MISP object construction
//!
//! Builds the submission payload for one [`ObjectRecord`]: every record
//! field becomes one attribute, typed by the object definition. The payload
//! shape matches what `POST /objects/add` expects.

use crate::definitions::ObjectDefinition;
use crate::error::{CliError, Result};
use crate::records::ObjectRecord;
use serde::Serialize;

/// One attribute of a MISP object.
#[derive(Debug, Clone, Serialize)]
pub struct MispAttribute {
    /// MISP attribute type, taken from the definition
    #[serde(rename = "type")]
    pub attribute_type: String,

    /// Relation name inside the object (the CSV column base name)
    pub object_relation: String,

    /// Attribute value, verbatim from the CSV cell
    pub value: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_ids: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_correlation: Option<bool>,
}

/// A fully-built object, ready for dry-run printing or submission.
#[derive(Debug, Clone, Serialize)]
pub struct MispObject {
    /// Object kind (template name)
    pub name: String,

    /// Template uuid from the local definition
    pub template_uuid: String,

    /// Template version from the local definition
    pub template_version: u64,

    #[serde(rename = "meta-category", skip_serializing_if = "Option::is_none")]
    pub meta_category: Option<String>,

    /// Per-object distribution override (CSV `distribution` column)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,

    /// Per-object comment (CSV `comment` column)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(rename = "Attribute")]
    pub attributes: Vec<MispAttribute>,
}

impl MispObject {
    /// Build an object from a record and its definition.
    ///
    /// Every field's name must be a relation the definition knows; an
    /// unknown relation fails the whole run. Duplicate field names each
    /// produce their own attribute.
    pub fn from_record(record: &ObjectRecord, definition: &ObjectDefinition) -> Result<Self> {
        let mut attributes = Vec::with_capacity(record.fields.len());

        for (name, value) in &record.fields {
            let spec = definition.attributes.get(name).ok_or_else(|| {
                CliError::attribute_generation(
                    &record.kind,
                    format!("'{}' is not a relation of this object", name),
                )
            })?;

            attributes.push(MispAttribute {
                attribute_type: spec.misp_attribute.clone(),
                object_relation: name.clone(),
                value: value.clone(),
                to_ids: spec.to_ids,
                disable_correlation: spec.disable_correlation,
            });
        }

        Ok(Self {
            name: record.kind.clone(),
            template_uuid: definition.uuid.clone(),
            template_version: definition.version,
            meta_category: definition.meta_category.clone(),
            distribution: record.distribution.clone(),
            comment: record.comment.clone(),
            attributes,
        })
    }
}
