//! The `datamodelInfo` metadata document.
//!
//! ```text
//! module.exports = {
//!   "uniqueFieldsByModel": { "User": ["id", "email"] },
//!   "embeddedTypes": [],
//!   "schema": { "__schema": { ... } }
//! }
//! ```
//!
//! The body is JSON, which keeps the document a valid JavaScript module and
//! lets [`DatamodelInfo::parse_document`] read it back.

use indexmap::IndexMap;
use nexus_prisma_datamodel::Datamodel;
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, MetadataError, SchemaError};
use crate::introspection::{introspect, IntrospectionQuery};
use crate::schema::Schema;

/// Export prefix of a CommonJS module.
pub const DEFAULT_EXPORT_PREFIX: &str = "module.exports =";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamodelInfo {
    /// Entity name to its unique field names, both in declaration order.
    pub unique_fields_by_model: IndexMap<String, Vec<String>>,
    pub embedded_types: Vec<String>,
    pub schema: IntrospectionQuery,
}

impl DatamodelInfo {
    pub fn new(datamodel: &Datamodel, schema: &Schema) -> Result<Self, SchemaError> {
        Ok(Self {
            unique_fields_by_model: datamodel
                .types
                .iter()
                .map(|entity| (entity.name.clone(), entity.unique_field_names()))
                .collect(),
            embedded_types: datamodel.embedded_type_names(),
            schema: introspect(schema)?,
        })
    }

    /// Render the document body wrapped in `export_prefix`.
    pub fn render(&self, export_prefix: &str) -> Result<String, serde_json::Error> {
        let body = serde_json::to_string_pretty(self)?;
        Ok(format!("{} {}\n", export_prefix, body))
    }

    /// Read a document produced by [`DatamodelInfo::render`].
    pub fn parse_document(document: &str, export_prefix: &str) -> Result<Self, MetadataError> {
        let body = document
            .trim_start()
            .strip_prefix(export_prefix)
            .ok_or_else(|| MetadataError::MissingExportPrefix(export_prefix.to_string()))?;
        let body = body.trim().trim_end_matches(';');
        Ok(serde_json::from_str(body)?)
    }

    /// The GraphQL schema the document was rendered from.
    pub fn build_schema(&self) -> Result<Schema, SchemaError> {
        Schema::from_introspection(&self.schema)
    }

    pub fn unique_fields(&self, model: &str) -> Option<&[String]> {
        self.unique_fields_by_model.get(model).map(Vec::as_slice)
    }

    pub fn is_embedded(&self, model: &str) -> bool {
        self.embedded_types.iter().any(|t| t == model)
    }
}

/// Render the metadata document for `datamodel` and `schema`.
pub fn render_datamodel_info(
    datamodel: &Datamodel,
    schema: &Schema,
    export_prefix: &str,
) -> Result<String, GenerationError> {
    let info = DatamodelInfo::new(datamodel, schema)?;
    Ok(info.render(export_prefix)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_prisma_datamodel::{Entity, EntityField};
    use pretty_assertions::assert_eq;

    fn datamodel() -> Datamodel {
        Datamodel {
            types: vec![
                Entity::new(
                    "User",
                    vec![
                        EntityField::new("id", "ID").required().unique(),
                        EntityField::new("email", "String").required().unique(),
                        EntityField::new("age", "Int"),
                    ],
                ),
                Entity::new("Tag", vec![EntityField::new("label", "String")]),
                Entity::new("Address", vec![EntityField::new("city", "String")]).embedded(),
            ],
            enums: vec![],
        }
    }

    fn schema() -> Schema {
        Schema::parse("type Query { users: [User!]! }\ntype User { id: ID! email: String! age: Int }")
            .unwrap()
    }

    #[test]
    fn test_unique_fields_and_embedded_types() {
        let info = DatamodelInfo::new(&datamodel(), &schema()).unwrap();

        assert_eq!(info.unique_fields("User").unwrap().to_vec(), vec!["id", "email"]);
        assert!(info.unique_fields("Tag").unwrap().is_empty());
        assert_eq!(info.embedded_types, vec!["Address"]);
        assert!(!info.is_embedded("User"));
    }

    #[test]
    fn test_document_shape() {
        let document = render_datamodel_info(&datamodel(), &schema(), DEFAULT_EXPORT_PREFIX).unwrap();

        assert!(document.starts_with("module.exports = {\n  \"uniqueFieldsByModel\": {\n    \"User\": [\n      \"id\",\n      \"email\"\n    ],\n"));
        let value: serde_json::Value =
            serde_json::from_str(document.strip_prefix(DEFAULT_EXPORT_PREFIX).unwrap()).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["uniqueFieldsByModel", "embeddedTypes", "schema"]);
        assert_eq!(value["schema"]["__schema"]["queryType"]["name"], "Query");
    }

    #[test]
    fn test_parse_document_roundtrip() {
        let info = DatamodelInfo::new(&datamodel(), &schema()).unwrap();
        let document = info.render("export default").unwrap();

        let parsed = DatamodelInfo::parse_document(&document, "export default").unwrap();
        assert_eq!(parsed, info);
        assert_eq!(parsed.build_schema().unwrap(), schema());
    }

    #[test]
    fn test_parse_document_wrong_prefix() {
        let document = DatamodelInfo::new(&datamodel(), &schema())
            .unwrap()
            .render(DEFAULT_EXPORT_PREFIX)
            .unwrap();

        let err = DatamodelInfo::parse_document(&document, "export default").unwrap_err();
        assert!(matches!(err, MetadataError::MissingExportPrefix(_)));
    }
}
