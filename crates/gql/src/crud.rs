//! CRUD schema synthesis from a datamodel.
//!
//! Emits SDL for the API a Prisma server exposes over a datamodel and parses
//! it into a [`Schema`]. For every non-embedded entity `User`:
//! - `type User` (implementing `Node` when it has an `id: ID` field),
//! - `Query.user(where: UserWhereUniqueInput!)` and `Query.users(...)`,
//! - `Mutation.createUser`, `updateUser`, `deleteUser`,
//! - `UserWhereUniqueInput`, `UserWhereInput`, `UserCreateInput`,
//!   `UserUpdateInput` and the `UserOrderByInput` enum.
//!
//! Embedded entities only get an object type and a create input.
//!
//! Datamodels with embedded types must come from a document database;
//! datamodel resolution rejects them for relational ones.

use std::collections::HashSet;

use nexus_prisma_datamodel::{DatabaseType, Datamodel, Entity, EntityField};
use tracing::debug;

use crate::error::SchemaError;
use crate::schema::Schema;

const BUILTIN_SCALARS: &[&str] = &["ID", "String", "Int", "Float", "Boolean"];
const CUSTOM_SCALARS: &[&str] = &["DateTime", "Json"];
const PAGINATION_ARGS: &str = "skip: Int, after: String, before: String, first: Int, last: Int";

/// Generate the CRUD schema for `datamodel`.
pub fn generate_crud_schema(
    datamodel: &Datamodel,
    database_type: DatabaseType,
) -> Result<Schema, SchemaError> {
    let sdl = generate_crud_sdl(datamodel, database_type)?;
    Schema::parse(&sdl)
}

/// Generate the CRUD schema SDL for `datamodel`.
pub fn generate_crud_sdl(
    datamodel: &Datamodel,
    database_type: DatabaseType,
) -> Result<String, SchemaError> {
    let mut generator = CrudGenerator {
        datamodel,
        writable_embedded: HashSet::new(),
    };
    generator.validate()?;
    generator.writable_embedded = generator.compute_writable_embedded();
    let sdl = generator.render();
    debug!(bytes = sdl.len(), ?database_type, "generated CRUD schema SDL");
    Ok(sdl)
}

#[derive(Clone, Copy)]
enum FieldKind<'a> {
    Scalar,
    Enum,
    Relation(&'a Entity),
}

struct CrudGenerator<'a> {
    datamodel: &'a Datamodel,
    /// Embedded entities whose create input has at least one field.
    writable_embedded: HashSet<&'a str>,
}

impl<'a> CrudGenerator<'a> {
    fn validate(&self) -> Result<(), SchemaError> {
        for entity in &self.datamodel.types {
            for field in &entity.fields {
                let type_name = field.type_name.as_str();
                let known = BUILTIN_SCALARS.contains(&type_name)
                    || CUSTOM_SCALARS.contains(&type_name)
                    || self.datamodel.is_enum(type_name)
                    || self.datamodel.is_entity(type_name);
                if !known {
                    return Err(SchemaError::InvalidDatamodel(format!(
                        "field `{}.{}` has unknown type `{}`",
                        entity.name, field.name, field.type_name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Least fixed point over the embedded entities: one is writable when any
    /// non-id field is a scalar or enum, a relation to an entity with unique
    /// fields, or a relation to an embedded entity already known writable.
    fn compute_writable_embedded(&self) -> HashSet<&'a str> {
        let mut writable = HashSet::new();
        loop {
            let mut changed = false;
            for entity in self.datamodel.types.iter().filter(|t| t.is_embedded) {
                if writable.contains(entity.name.as_str()) {
                    continue;
                }
                let has_writable_field = entity.fields.iter().filter(|f| !f.is_id).any(|f| {
                    match self.kind(f) {
                        FieldKind::Scalar | FieldKind::Enum => true,
                        FieldKind::Relation(target) if target.is_embedded => {
                            writable.contains(target.name.as_str())
                        }
                        FieldKind::Relation(target) => self.has_where_unique(target),
                    }
                });
                if has_writable_field {
                    writable.insert(entity.name.as_str());
                    changed = true;
                }
            }
            if !changed {
                return writable;
            }
        }
    }

    fn kind(&self, field: &EntityField) -> FieldKind<'a> {
        if let Some(entity) = self.datamodel.entity(&field.type_name) {
            FieldKind::Relation(entity)
        } else if self.datamodel.is_enum(&field.type_name) {
            FieldKind::Enum
        } else {
            FieldKind::Scalar
        }
    }

    fn api_entities(&self) -> impl Iterator<Item = &'a Entity> {
        self.datamodel.types.iter().filter(|t| !t.is_embedded)
    }

    fn has_where_unique(&self, entity: &Entity) -> bool {
        !entity.is_embedded && entity.unique_fields().next().is_some()
    }

    /// Non-list scalar and enum fields, excluding `Json`.
    fn orderable_fields<'e>(&self, entity: &'e Entity) -> Vec<&'e EntityField> {
        entity
            .fields
            .iter()
            .filter(|f| {
                !f.is_list && f.type_name != "Json" && !matches!(self.kind(f), FieldKind::Relation(_))
            })
            .collect()
    }

    fn has_order_by(&self, entity: &Entity) -> bool {
        !self.orderable_fields(entity).is_empty()
    }

    fn render(&self) -> String {
        let mut output = String::new();

        let used_scalars: Vec<&str> = CUSTOM_SCALARS
            .iter()
            .copied()
            .filter(|scalar| {
                self.datamodel
                    .types
                    .iter()
                    .flat_map(|t| &t.fields)
                    .any(|f| f.type_name == *scalar)
            })
            .collect();
        if !used_scalars.is_empty() {
            output.push_str("# Custom Scalars\n");
            for scalar in used_scalars {
                output.push_str(&format!("scalar {}\n", scalar));
            }
            output.push('\n');
        }

        if !self.datamodel.enums.is_empty() {
            output.push_str("# Enum Types\n");
            for e in &self.datamodel.enums {
                push_block(&mut output, &format!("enum {}", e.name), e.values.clone());
            }
        }

        output.push_str("# Node Interface\n");
        output.push_str("interface Node {\n  id: ID!\n}\n\n");

        output.push_str("# Object Types\n");
        for entity in &self.datamodel.types {
            let implements = if !entity.is_embedded
                && entity.field("id").is_some_and(|f| f.type_name == "ID")
            {
                " implements Node"
            } else {
                ""
            };
            let fields = entity
                .fields
                .iter()
                .map(|field| format!("{}{}: {}", field.name, self.relation_args(field), object_field_type(field)))
                .collect();
            push_block(&mut output, &format!("type {}{}", entity.name, implements), fields);
        }

        output.push_str("# Query Root Type\n");
        let mut queries = Vec::new();
        for entity in self.api_entities() {
            let singular = lower_first(&entity.name);
            if self.has_where_unique(entity) {
                queries.push(format!(
                    "{}(where: {}WhereUniqueInput!): {}",
                    singular, entity.name, entity.name
                ));
            }
            queries.push(format!(
                "{}({}): [{}]!",
                pluralize(&singular),
                self.list_args(entity),
                entity.name
            ));
        }
        queries.push("node(id: ID!): Node".to_string());
        push_block(&mut output, "type Query", queries);

        let mut mutations = Vec::new();
        for entity in self.api_entities() {
            if !self.create_fields(entity).is_empty() {
                mutations.push(format!(
                    "create{}(data: {}CreateInput!): {}!",
                    entity.name, entity.name, entity.name
                ));
            }
            if self.has_where_unique(entity) {
                if !self.update_fields(entity).is_empty() {
                    mutations.push(format!(
                        "update{}(data: {}UpdateInput!, where: {}WhereUniqueInput!): {}",
                        entity.name, entity.name, entity.name, entity.name
                    ));
                }
                mutations.push(format!(
                    "delete{}(where: {}WhereUniqueInput!): {}",
                    entity.name, entity.name, entity.name
                ));
            }
        }
        if !mutations.is_empty() {
            output.push_str("# Mutation Root Type\n");
            push_block(&mut output, "type Mutation", mutations);
        }

        output.push_str("# Input Types\n");
        for entity in &self.datamodel.types {
            if self.has_where_unique(entity) {
                let fields = entity
                    .unique_fields()
                    .map(|f| format!("{}: {}", f.name, f.type_name))
                    .collect();
                push_block(&mut output, &format!("input {}WhereUniqueInput", entity.name), fields);
            }

            if !entity.is_embedded {
                push_block(
                    &mut output,
                    &format!("input {}WhereInput", entity.name),
                    self.where_fields(entity),
                );
            }

            push_block(
                &mut output,
                &format!("input {}CreateInput", entity.name),
                self.create_fields(entity),
            );

            if !entity.is_embedded {
                push_block(
                    &mut output,
                    &format!("input {}UpdateInput", entity.name),
                    self.update_fields(entity),
                );
            }
        }

        output.push_str("# Ordering Types\n");
        for entity in self.api_entities() {
            let values = self
                .orderable_fields(entity)
                .into_iter()
                .flat_map(|f| [format!("{}_ASC", f.name), format!("{}_DESC", f.name)])
                .collect();
            push_block(&mut output, &format!("enum {}OrderByInput", entity.name), values);
        }

        output
    }

    fn list_args(&self, entity: &Entity) -> String {
        let order_by = if self.has_order_by(entity) {
            format!("orderBy: {}OrderByInput, ", entity.name)
        } else {
            String::new()
        };
        format!("where: {}WhereInput, {}{}", entity.name, order_by, PAGINATION_ARGS)
    }

    /// List relations to API entities accept the same arguments as the
    /// top-level list query.
    fn relation_args(&self, field: &EntityField) -> String {
        match self.kind(field) {
            FieldKind::Relation(target) if field.is_list && !target.is_embedded => {
                format!("({})", self.list_args(target))
            }
            _ => String::new(),
        }
    }

    fn where_fields(&self, entity: &Entity) -> Vec<String> {
        let mut fields: Vec<String> = entity
            .fields
            .iter()
            .filter(|f| !f.is_list && f.type_name != "Json")
            .filter_map(|f| match self.kind(f) {
                FieldKind::Scalar | FieldKind::Enum => Some(format!("{}: {}", f.name, f.type_name)),
                FieldKind::Relation(target) if !target.is_embedded => {
                    Some(format!("{}: {}WhereInput", f.name, target.name))
                }
                FieldKind::Relation(_) => None,
            })
            .collect();

        for combinator in ["AND", "OR", "NOT"] {
            fields.push(format!("{}: [{}WhereInput!]", combinator, entity.name));
        }
        fields
    }

    /// Input type of a writable field, `None` when the field cannot be written.
    fn input_field_type(&self, field: &EntityField) -> Option<String> {
        let base = match self.kind(field) {
            FieldKind::Scalar | FieldKind::Enum => field.type_name.clone(),
            FieldKind::Relation(target) if target.is_embedded => {
                if !self.writable_embedded.contains(target.name.as_str()) {
                    return None;
                }
                format!("{}CreateInput", target.name)
            }
            FieldKind::Relation(target) => {
                if !self.has_where_unique(target) {
                    return None;
                }
                format!("{}WhereUniqueInput", target.name)
            }
        };

        Some(if field.is_list {
            format!("[{}!]", base)
        } else {
            base
        })
    }

    fn create_fields(&self, entity: &Entity) -> Vec<String> {
        entity
            .fields
            .iter()
            .filter(|f| !f.is_id)
            .filter_map(|f| {
                let ty = self.input_field_type(f)?;
                let required = if f.is_required && !f.is_list { "!" } else { "" };
                Some(format!("{}: {}{}", f.name, ty, required))
            })
            .collect()
    }

    fn update_fields(&self, entity: &Entity) -> Vec<String> {
        entity
            .fields
            .iter()
            .filter(|f| !f.is_id)
            .filter_map(|f| Some(format!("{}: {}", f.name, self.input_field_type(f)?)))
            .collect()
    }
}

fn object_field_type(field: &EntityField) -> String {
    let required = if field.is_required { "!" } else { "" };
    if field.is_list {
        format!("[{}!]{}", field.type_name, required)
    } else {
        format!("{}{}", field.type_name, required)
    }
}

/// Append `header { ... }`, or nothing when there are no lines: GraphQL does
/// not allow empty field sets.
fn push_block(output: &mut String, header: &str, lines: Vec<String>) {
    if lines.is_empty() {
        return;
    }
    output.push_str(header);
    output.push_str(" {\n");
    for line in lines {
        output.push_str("  ");
        output.push_str(&line);
        output.push('\n');
    }
    output.push_str("}\n\n");
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

fn pluralize(word: &str) -> String {
    if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        format!("{}es", word)
    } else if word.ends_with('y')
        && !word
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| "aeiou".contains(c))
    {
        format!("{}ies", &word[..word.len() - 1])
    } else {
        format!("{}s", word)
    }
}
