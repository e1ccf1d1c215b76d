//! Datamodel SDL parsing.
//!
//! A datamodel is GraphQL SDL annotated with prisma directives:
//!
//! ```graphql
//! type User {
//!   id: ID! @id
//!   email: String! @unique
//!   address: Address
//! }
//!
//! type Address @embedded {
//!   street: String!
//! }
//! ```

use graphql_parser::schema::{
    parse_schema, Definition, Directive, Document, Type, TypeDefinition,
};
use std::collections::HashSet;
use std::fs;
use tracing::{debug, warn};

use crate::config::{DatabaseType, PrismaConfig};
use crate::entity::{Datamodel, DatamodelEnum, Entity, EntityField};
use crate::DatamodelError;

/// Output of [`resolve_datamodel`].
#[derive(Debug, Clone)]
pub struct ResolvedDatamodel {
    pub datamodel: Datamodel,
    pub database_type: DatabaseType,
}

/// Read every datamodel file referenced by `config` and parse the
/// concatenation.
pub fn resolve_datamodel(config: &PrismaConfig) -> Result<ResolvedDatamodel, DatamodelError> {
    let mut all_types = String::new();

    for path in config.datamodel_paths() {
        if !path.exists() {
            return Err(DatamodelError::TypesFileNotFound(path));
        }
        all_types.push_str(&fs::read_to_string(&path)?);
        all_types.push('\n');
    }

    let database_type = config.database_type();
    let datamodel = parse_datamodel(&all_types)?;

    if database_type == DatabaseType::Relational {
        if let Some(embedded) = datamodel.types.iter().find(|t| t.is_embedded) {
            return Err(DatamodelError::EmbeddedNotSupported(embedded.name.clone()));
        }
    }

    debug!(
        types = datamodel.types.len(),
        enums = datamodel.enums.len(),
        ?database_type,
        "resolved datamodel"
    );

    Ok(ResolvedDatamodel {
        datamodel,
        database_type,
    })
}

/// Parse datamodel SDL into entities and enums.
pub fn parse_datamodel(sdl: &str) -> Result<Datamodel, DatamodelError> {
    let doc: Document<String> =
        parse_schema::<String>(sdl).map_err(|e| DatamodelError::Syntax(e.to_string()))?;

    let mut datamodel = Datamodel::default();
    let mut seen = HashSet::new();

    for def in doc.definitions {
        let Definition::TypeDefinition(type_def) = def else {
            warn!("ignoring non-type definition in datamodel");
            continue;
        };

        match type_def {
            TypeDefinition::Object(object) => {
                if !seen.insert(object.name.clone()) {
                    return Err(DatamodelError::DuplicateType(object.name));
                }

                let fields = object
                    .fields
                    .iter()
                    .map(|field| {
                        let mut entity_field =
                            EntityField::new(field.name.clone(), innermost_name(&field.field_type));
                        entity_field.is_required =
                            matches!(field.field_type, Type::NonNullType(_));
                        entity_field.is_list = contains_list(&field.field_type);
                        entity_field.is_id = has_directive(&field.directives, "id");
                        entity_field.is_unique =
                            entity_field.is_id || has_directive(&field.directives, "unique");
                        entity_field
                    })
                    .collect();

                datamodel.types.push(Entity {
                    name: object.name,
                    fields,
                    is_embedded: has_directive(&object.directives, "embedded"),
                });
            }
            TypeDefinition::Enum(e) => {
                if !seen.insert(e.name.clone()) {
                    return Err(DatamodelError::DuplicateType(e.name));
                }
                datamodel.enums.push(DatamodelEnum {
                    name: e.name,
                    values: e.values.into_iter().map(|v| v.name).collect(),
                });
            }
            other => {
                warn!(definition = ?other, "unsupported datamodel definition, skipping");
            }
        }
    }

    Ok(datamodel)
}

fn has_directive(directives: &[Directive<String>], name: &str) -> bool {
    directives.iter().any(|d| d.name == name)
}

fn innermost_name(ty: &Type<String>) -> String {
    match ty {
        Type::NamedType(name) => name.clone(),
        Type::ListType(inner) | Type::NonNullType(inner) => innermost_name(inner),
    }
}

fn contains_list(ty: &Type<String>) -> bool {
    match ty {
        Type::NamedType(_) => false,
        Type::ListType(_) => true,
        Type::NonNullType(inner) => contains_list(inner),
    }
}
