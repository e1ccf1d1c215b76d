//! Standard GraphQL introspection result, serialized with serde.
//!
//! [`introspect`] produces the JSON shape of a canonical introspection
//! response for the schema's own types and directives. The `__Schema`,
//! `__Type`, `__Field` and other meta types are not part of a [`Schema`] and
//! are not emitted. [`schema_from_introspection`] rebuilds a [`Schema`] from
//! the result. The metadata document embeds the former, the builder runtime
//! uses the latter.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::schema::{
    DirectiveDefinition, EnumType, EnumValue, Field, InputObjectType, InputValue, InterfaceType,
    NamedType, ObjectType, RootTypes, ScalarType, Schema, TypeRef, UnionType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

/// `{ "__schema": { ... } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectionQuery {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    pub query_type: Option<RootTypeName>,
    pub mutation_type: Option<RootTypeName>,
    pub subscription_type: Option<RootTypeName>,
    pub types: Vec<FullType>,
    pub directives: Vec<IntrospectionDirective>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootTypeName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullType {
    pub kind: TypeKind,
    pub name: String,
    pub description: Option<String>,
    pub fields: Option<Vec<IntrospectionField>>,
    pub input_fields: Option<Vec<IntrospectionInputValue>>,
    pub interfaces: Option<Vec<IntrospectionTypeRef>>,
    pub enum_values: Option<Vec<IntrospectionEnumValue>>,
    pub possible_types: Option<Vec<IntrospectionTypeRef>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionField {
    pub name: String,
    pub description: Option<String>,
    pub args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    pub ty: IntrospectionTypeRef,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInputValue {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: IntrospectionTypeRef,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionTypeRef {
    pub kind: TypeKind,
    pub name: Option<String>,
    pub of_type: Option<Box<IntrospectionTypeRef>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionEnumValue {
    pub name: String,
    pub description: Option<String>,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectionDirective {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<String>,
    pub args: Vec<IntrospectionInputValue>,
}

fn kind_of(ty: &NamedType) -> TypeKind {
    match ty {
        NamedType::Scalar(_) => TypeKind::Scalar,
        NamedType::Object(_) => TypeKind::Object,
        NamedType::Interface(_) => TypeKind::Interface,
        NamedType::Union(_) => TypeKind::Union,
        NamedType::Enum(_) => TypeKind::Enum,
        NamedType::InputObject(_) => TypeKind::InputObject,
    }
}

/// Serialize `schema` into the introspection result shape, one entry per
/// schema type in declaration order and no `__*` meta types.
pub fn introspect(schema: &Schema) -> Result<IntrospectionQuery, SchemaError> {
    let introspector = Introspector { schema };

    let root = |name: &Option<String>| name.clone().map(|name| RootTypeName { name });

    Ok(IntrospectionQuery {
        schema: IntrospectionSchema {
            query_type: root(&schema.roots().query),
            mutation_type: root(&schema.roots().mutation),
            subscription_type: root(&schema.roots().subscription),
            types: schema
                .types()
                .iter()
                .map(|ty| introspector.full_type(ty))
                .collect::<Result<_, _>>()?,
            directives: schema
                .directives()
                .iter()
                .map(|d| introspector.directive(d))
                .collect::<Result<_, _>>()?,
        },
    })
}

struct Introspector<'s> {
    schema: &'s Schema,
}

impl<'s> Introspector<'s> {
    fn named_ref(&self, name: &str) -> Result<IntrospectionTypeRef, SchemaError> {
        let ty = self
            .schema
            .get_type(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))?;
        Ok(IntrospectionTypeRef {
            kind: kind_of(ty),
            name: Some(name.to_string()),
            of_type: None,
        })
    }

    fn type_ref(&self, ty: &TypeRef) -> Result<IntrospectionTypeRef, SchemaError> {
        match ty {
            TypeRef::Named(name) => self.named_ref(name),
            TypeRef::List(inner) => Ok(IntrospectionTypeRef {
                kind: TypeKind::List,
                name: None,
                of_type: Some(Box::new(self.type_ref(inner)?)),
            }),
            TypeRef::NonNull(inner) => Ok(IntrospectionTypeRef {
                kind: TypeKind::NonNull,
                name: None,
                of_type: Some(Box::new(self.type_ref(inner)?)),
            }),
        }
    }

    fn input_value(&self, value: &InputValue) -> Result<IntrospectionInputValue, SchemaError> {
        Ok(IntrospectionInputValue {
            name: value.name.clone(),
            description: value.description.clone(),
            ty: self.type_ref(&value.ty)?,
            default_value: value.default_value.clone(),
        })
    }

    fn input_values(&self, values: &[InputValue]) -> Result<Vec<IntrospectionInputValue>, SchemaError> {
        values.iter().map(|v| self.input_value(v)).collect()
    }

    fn fields(&self, fields: &[Field]) -> Result<Vec<IntrospectionField>, SchemaError> {
        fields
            .iter()
            .map(|field| {
                Ok(IntrospectionField {
                    name: field.name.clone(),
                    description: field.description.clone(),
                    args: self.input_values(&field.args)?,
                    ty: self.type_ref(&field.ty)?,
                    is_deprecated: field.deprecation_reason.is_some(),
                    deprecation_reason: field.deprecation_reason.clone(),
                })
            })
            .collect()
    }

    fn named_refs<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<IntrospectionTypeRef>, SchemaError> {
        names.into_iter().map(|name| self.named_ref(name)).collect()
    }

    fn full_type(&self, ty: &NamedType) -> Result<FullType, SchemaError> {
        let mut full = FullType {
            kind: kind_of(ty),
            name: ty.name().to_string(),
            description: ty.description().map(str::to_string),
            fields: None,
            input_fields: None,
            interfaces: None,
            enum_values: None,
            possible_types: None,
        };

        match ty {
            NamedType::Scalar(_) => {}
            NamedType::Object(object) => {
                full.fields = Some(self.fields(&object.fields)?);
                full.interfaces = Some(self.named_refs(object.interfaces.iter().map(String::as_str))?);
            }
            NamedType::Interface(interface) => {
                full.fields = Some(self.fields(&interface.fields)?);
                full.possible_types = Some(self.named_refs(
                    self.schema
                        .implementations(&interface.name)
                        .into_iter()
                        .map(|o| o.name.as_str()),
                )?);
            }
            NamedType::Union(union) => {
                full.possible_types = Some(self.named_refs(union.members.iter().map(String::as_str))?);
            }
            NamedType::Enum(e) => {
                full.enum_values = Some(
                    e.values
                        .iter()
                        .map(|v| IntrospectionEnumValue {
                            name: v.name.clone(),
                            description: v.description.clone(),
                            is_deprecated: v.deprecation_reason.is_some(),
                            deprecation_reason: v.deprecation_reason.clone(),
                        })
                        .collect(),
                );
            }
            NamedType::InputObject(input) => {
                full.input_fields = Some(self.input_values(&input.fields)?);
            }
        }

        Ok(full)
    }

    fn directive(&self, directive: &DirectiveDefinition) -> Result<IntrospectionDirective, SchemaError> {
        Ok(IntrospectionDirective {
            name: directive.name.clone(),
            description: directive.description.clone(),
            locations: directive.locations.clone(),
            args: self.input_values(&directive.args)?,
        })
    }
}

fn invalid(message: impl Into<String>) -> SchemaError {
    SchemaError::InvalidIntrospection(message.into())
}

fn type_ref_from(ty: &IntrospectionTypeRef) -> Result<TypeRef, SchemaError> {
    match ty.kind {
        TypeKind::List | TypeKind::NonNull => {
            let inner = ty
                .of_type
                .as_deref()
                .ok_or_else(|| invalid(format!("{:?} type reference without `ofType`", ty.kind)))?;
            let inner = type_ref_from(inner)?;
            Ok(if ty.kind == TypeKind::List {
                TypeRef::list(inner)
            } else {
                TypeRef::non_null(inner)
            })
        }
        _ => ty
            .name
            .clone()
            .map(TypeRef::Named)
            .ok_or_else(|| invalid("named type reference without `name`")),
    }
}

fn input_value_from(value: &IntrospectionInputValue) -> Result<InputValue, SchemaError> {
    Ok(InputValue {
        name: value.name.clone(),
        description: value.description.clone(),
        ty: type_ref_from(&value.ty)?,
        default_value: value.default_value.clone(),
    })
}

fn input_values_from(values: &[IntrospectionInputValue]) -> Result<Vec<InputValue>, SchemaError> {
    values.iter().map(input_value_from).collect()
}

fn fields_from(full: &FullType) -> Result<Vec<Field>, SchemaError> {
    full.fields
        .as_deref()
        .ok_or_else(|| invalid(format!("type `{}` has no `fields`", full.name)))?
        .iter()
        .map(|field| {
            Ok(Field {
                name: field.name.clone(),
                description: field.description.clone(),
                ty: type_ref_from(&field.ty)?,
                args: input_values_from(&field.args)?,
                deprecation_reason: field.deprecation_reason.clone(),
            })
        })
        .collect()
}

fn ref_names(refs: &Option<Vec<IntrospectionTypeRef>>) -> Vec<String> {
    refs.iter()
        .flatten()
        .filter_map(|r| r.name.clone())
        .collect()
}

fn named_type_from(full: &FullType) -> Result<NamedType, SchemaError> {
    let name = full.name.clone();
    let description = full.description.clone();

    Ok(match full.kind {
        TypeKind::Scalar => NamedType::Scalar(ScalarType { name, description }),
        TypeKind::Object => NamedType::Object(ObjectType {
            fields: fields_from(full)?,
            interfaces: ref_names(&full.interfaces),
            name,
            description,
        }),
        TypeKind::Interface => NamedType::Interface(InterfaceType {
            fields: fields_from(full)?,
            name,
            description,
        }),
        TypeKind::Union => NamedType::Union(UnionType {
            members: ref_names(&full.possible_types),
            name,
            description,
        }),
        TypeKind::Enum => NamedType::Enum(EnumType {
            values: full
                .enum_values
                .iter()
                .flatten()
                .map(|v| EnumValue {
                    name: v.name.clone(),
                    description: v.description.clone(),
                    deprecation_reason: v.deprecation_reason.clone(),
                })
                .collect(),
            name,
            description,
        }),
        TypeKind::InputObject => NamedType::InputObject(InputObjectType {
            fields: input_values_from(
                full.input_fields
                    .as_deref()
                    .ok_or_else(|| invalid(format!("input type `{}` has no `inputFields`", full.name)))?,
            )?,
            name,
            description,
        }),
        TypeKind::List | TypeKind::NonNull => {
            return Err(invalid(format!("`{}` is declared as a wrapper type", full.name)))
        }
    })
}

/// Rebuild a schema from an introspection result.
pub fn schema_from_introspection(introspection: &IntrospectionQuery) -> Result<Schema, SchemaError> {
    let schema = &introspection.schema;
    let root = |r: &Option<RootTypeName>| r.as_ref().map(|r| r.name.clone());

    let types = schema
        .types
        .iter()
        .map(named_type_from)
        .collect::<Result<Vec<_>, _>>()?;

    let directives = schema
        .directives
        .iter()
        .map(|d| {
            Ok(DirectiveDefinition {
                name: d.name.clone(),
                description: d.description.clone(),
                locations: d.locations.clone(),
                args: input_values_from(&d.args)?,
            })
        })
        .collect::<Result<Vec<_>, SchemaError>>()?;

    Schema::from_parts(
        RootTypes {
            query: root(&schema.query_type),
            mutation: root(&schema.mutation_type),
            subscription: root(&schema.subscription_type),
        },
        types,
        directives,
    )
}

impl Schema {
    /// Rebuild a schema from an introspection result.
    pub fn from_introspection(introspection: &IntrospectionQuery) -> Result<Schema, SchemaError> {
        schema_from_introspection(introspection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SDL: &str = r#"
        type Query {
          users(first: Int = 10): [User!]!
          node(id: ID!): Node
          search: SearchResult
        }

        interface Node {
          id: ID!
        }

        type User implements Node {
          id: ID!
          role: Role
          legacy: String @deprecated(reason: "use role")
        }

        union SearchResult = User

        enum Role {
          ADMIN
          USER
        }

        input UserWhereInput {
          id: ID
        }
    "#;

    #[test]
    fn test_type_ref_json_shape() {
        let schema = Schema::parse(SDL).unwrap();
        let introspection = introspect(&schema).unwrap();
        let value = serde_json::to_value(&introspection).unwrap();

        let users = &value["__schema"]["types"][0]["fields"][0];
        assert_eq!(
            users["type"],
            json!({
                "kind": "NON_NULL",
                "name": null,
                "ofType": {
                    "kind": "LIST",
                    "name": null,
                    "ofType": {
                        "kind": "NON_NULL",
                        "name": null,
                        "ofType": { "kind": "OBJECT", "name": "User", "ofType": null }
                    }
                }
            })
        );
        assert_eq!(users["args"][0]["defaultValue"], json!("10"));
        assert_eq!(value["__schema"]["queryType"], json!({ "name": "Query" }));
        assert_eq!(value["__schema"]["mutationType"], json!(null));
    }

    #[test]
    fn test_kinds_and_relations() {
        let schema = Schema::parse(SDL).unwrap();
        let introspection = introspect(&schema).unwrap();
        let types = &introspection.schema.types;

        let node = types.iter().find(|t| t.name == "Node").unwrap();
        assert_eq!(node.kind, TypeKind::Interface);
        assert_eq!(node.possible_types.as_ref().unwrap()[0].name.as_deref(), Some("User"));

        let user = types.iter().find(|t| t.name == "User").unwrap();
        let legacy = &user.fields.as_ref().unwrap()[2];
        assert!(legacy.is_deprecated);
        assert_eq!(legacy.deprecation_reason.as_deref(), Some("use role"));

        let input = types.iter().find(|t| t.name == "UserWhereInput").unwrap();
        assert_eq!(input.kind, TypeKind::InputObject);
        assert!(input.fields.is_none());

        let directive_names: Vec<_> = introspection
            .schema
            .directives
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(directive_names, vec!["include", "skip", "deprecated"]);
    }

    #[test]
    fn test_meta_types_are_not_emitted() {
        let schema = Schema::parse(SDL).unwrap();
        let introspection = introspect(&schema).unwrap();
        let names: Vec<_> = introspection.schema.types.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names.len(), schema.types().len());
        assert!(names.iter().all(|name| !name.starts_with("__")));
        assert!(names.contains(&"Boolean"));
    }

    #[test]
    fn test_roundtrip_preserves_schema() {
        let schema = Schema::parse(SDL).unwrap();
        let json = serde_json::to_string_pretty(&introspect(&schema).unwrap()).unwrap();

        let parsed: IntrospectionQuery = serde_json::from_str(&json).unwrap();
        let rebuilt = Schema::from_introspection(&parsed).unwrap();

        assert_eq!(rebuilt, schema);
    }

    #[test]
    fn test_dangling_reference() {
        let schema = Schema::parse("type Query { a: Missing }").unwrap();
        let err = introspect(&schema).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType(name) if name == "Missing"));
    }

    #[test]
    fn test_wrapper_without_of_type_is_invalid() {
        let ty = IntrospectionTypeRef {
            kind: TypeKind::List,
            name: None,
            of_type: None,
        };
        assert!(matches!(type_ref_from(&ty), Err(SchemaError::InvalidIntrospection(_))));
    }
}
