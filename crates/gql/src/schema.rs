//! In-memory GraphQL schema model.
//!
//! A [`Schema`] is an immutable snapshot of a GraphQL type system. Types keep
//! the order they were declared in, which is the order every renderer
//! iterates them in, so generation output is deterministic.

use graphql_parser::schema::{
    parse_schema, Definition, Directive, Document, Type, TypeDefinition as GqlTypeDefinition,
    TypeExtension, Value,
};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::error::SchemaError;

/// Scalars every GraphQL schema provides without declaring them.
pub const BUILTIN_SCALARS: &[(&str, &str)] = &[
    (
        "String",
        "The `String` scalar type represents textual data, represented as UTF-8 character sequences. The String type is most often used by GraphQL to represent free-form human-readable text.",
    ),
    (
        "Boolean",
        "The `Boolean` scalar type represents `true` or `false`.",
    ),
    (
        "ID",
        "The `ID` scalar type represents a unique identifier, often used to refetch an object or as key for a cache. The ID type appears in a JSON response as a String; however, it is not intended to be human-readable. When expected as an input type, any string (such as `\"4\"`) or integer (such as `4`) input value will be accepted as an ID.",
    ),
    (
        "Int",
        "The `Int` scalar type represents non-fractional signed whole numeric values. Int can represent values between -(2^31) and 2^31 - 1.",
    ),
    (
        "Float",
        "The `Float` scalar type represents signed double-precision fractional values as specified by [IEEE 754](https://en.wikipedia.org/wiki/IEEE_floating_point).",
    ),
];

const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// A reference to a type as written at a use site: `[Post!]!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    fn from_parser(ty: &Type<String>) -> Self {
        match ty {
            Type::NamedType(name) => TypeRef::Named(name.clone()),
            Type::ListType(inner) => TypeRef::list(TypeRef::from_parser(inner)),
            Type::NonNullType(inner) => TypeRef::non_null(TypeRef::from_parser(inner)),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// An argument or an input object field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    /// Default value printed as a GraphQL literal.
    pub default_value: Option<String>,
}

impl InputValue {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            default_value: None,
        }
    }
}

/// A field of an object or interface type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub args: Vec<InputValue>,
    pub deprecation_reason: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            args: Vec::new(),
            deprecation_reason: None,
        }
    }

    pub fn with_args(mut self, args: Vec<InputValue>) -> Self {
        self.args = args;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<InputValue>,
}

impl InputObjectType {
    /// The input type used as a bare (nullable) type reference.
    pub fn as_type_ref(&self) -> TypeRef {
        TypeRef::named(self.name.clone())
    }
}

/// Any type with an intrinsic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedType {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl NamedType {
    pub fn name(&self) -> &str {
        match self {
            NamedType::Scalar(t) => &t.name,
            NamedType::Object(t) => &t.name,
            NamedType::Interface(t) => &t.name,
            NamedType::Union(t) => &t.name,
            NamedType::Enum(t) => &t.name,
            NamedType::InputObject(t) => &t.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            NamedType::Scalar(t) => t.description.as_deref(),
            NamedType::Object(t) => t.description.as_deref(),
            NamedType::Interface(t) => t.description.as_deref(),
            NamedType::Union(t) => t.description.as_deref(),
            NamedType::Enum(t) => t.description.as_deref(),
            NamedType::InputObject(t) => t.description.as_deref(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, NamedType::Scalar(_))
    }

    pub fn is_input_object(&self) -> bool {
        matches!(self, NamedType::InputObject(_))
    }

    /// Types whose names start with `__` belong to the introspection system.
    pub fn is_introspection(&self) -> bool {
        self.name().starts_with("__")
    }
}

/// A directive definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    /// Locations in their GraphQL spelling (`FIELD_DEFINITION`, ...).
    pub locations: Vec<String>,
    pub args: Vec<InputValue>,
}

/// `@include`, `@skip` and `@deprecated`.
pub fn builtin_directives() -> Vec<DirectiveDefinition> {
    let if_arg = |description: &str| InputValue {
        name: "if".to_string(),
        description: Some(description.to_string()),
        ty: TypeRef::non_null(TypeRef::named("Boolean")),
        default_value: None,
    };
    let executable_locations = vec![
        "FIELD".to_string(),
        "FRAGMENT_SPREAD".to_string(),
        "INLINE_FRAGMENT".to_string(),
    ];

    vec![
        DirectiveDefinition {
            name: "include".to_string(),
            description: Some(
                "Directs the executor to include this field or fragment only when the `if` argument is true."
                    .to_string(),
            ),
            locations: executable_locations.clone(),
            args: vec![if_arg("Included when true.")],
        },
        DirectiveDefinition {
            name: "skip".to_string(),
            description: Some(
                "Directs the executor to skip this field or fragment when the `if` argument is true."
                    .to_string(),
            ),
            locations: executable_locations,
            args: vec![if_arg("Skipped when true.")],
        },
        DirectiveDefinition {
            name: "deprecated".to_string(),
            description: Some("Marks an element of a GraphQL schema as no longer supported.".to_string()),
            locations: vec!["FIELD_DEFINITION".to_string(), "ENUM_VALUE".to_string()],
            args: vec![InputValue {
                name: "reason".to_string(),
                description: Some(
                    "Explains why this element was deprecated, usually also including a suggestion for how to access supported similar data. Formatted using the Markdown syntax (as specified by [CommonMark](https://commonmark.org/)."
                        .to_string(),
                ),
                ty: TypeRef::named("String"),
                default_value: Some(format!("\"{}\"", DEFAULT_DEPRECATION_REASON)),
            }],
        },
    ]
}

/// Root operation type names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootTypes {
    pub query: Option<String>,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
}

/// An immutable GraphQL type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    roots: RootTypes,
    types: Vec<NamedType>,
    index: HashMap<String, usize>,
    directives: Vec<DirectiveDefinition>,
}

impl Schema {
    /// Parse a schema from SDL text.
    ///
    /// Object type extensions are merged into their base type. Built-in
    /// scalars referenced but not declared are appended after the declared
    /// types, and the built-in directives are added when not redefined.
    pub fn parse(sdl: &str) -> Result<Schema, SchemaError> {
        let doc: Document<String> =
            parse_schema::<String>(sdl).map_err(|e| SchemaError::Syntax(e.to_string()))?;

        let mut roots = RootTypes::default();
        let mut types = Vec::new();
        let mut extensions = Vec::new();
        let mut directives = Vec::new();

        for def in doc.definitions {
            match def {
                Definition::SchemaDefinition(schema_def) => {
                    roots = RootTypes {
                        query: schema_def.query,
                        mutation: schema_def.mutation,
                        subscription: schema_def.subscription,
                    };
                }
                Definition::TypeDefinition(type_def) => types.push(convert_type_definition(type_def)),
                Definition::TypeExtension(TypeExtension::Object(ext)) => extensions.push(ext),
                Definition::TypeExtension(other) => {
                    warn!(extension = ?other, "only object type extensions are supported, skipping");
                }
                Definition::DirectiveDefinition(directive) => directives.push(DirectiveDefinition {
                    name: directive.name,
                    description: directive.description,
                    locations: directive
                        .locations
                        .iter()
                        .map(|l| l.as_str().to_string())
                        .collect(),
                    args: directive.arguments.iter().map(convert_input_value).collect(),
                }),
            }
        }

        for ext in extensions {
            let target = types.iter_mut().find_map(|t| match t {
                NamedType::Object(object) if object.name == ext.name => Some(object),
                _ => None,
            });
            let Some(object) = target else {
                return Err(SchemaError::UnknownType(ext.name));
            };
            object.interfaces.extend(ext.implements_interfaces);
            object.fields.extend(ext.fields.iter().map(convert_field));
        }

        Schema::from_parts(roots, types, directives)
    }

    /// Assemble a schema from already converted parts.
    ///
    /// Missing root names default to `Query`, `Mutation` and `Subscription`
    /// when object types with those names exist.
    pub fn from_parts(
        mut roots: RootTypes,
        mut types: Vec<NamedType>,
        mut directives: Vec<DirectiveDefinition>,
    ) -> Result<Schema, SchemaError> {
        for builtin in builtin_directives() {
            if !directives.iter().any(|d| d.name == builtin.name) {
                directives.push(builtin);
            }
        }

        let mut index = HashMap::new();
        for (i, ty) in types.iter().enumerate() {
            if index.insert(ty.name().to_string(), i).is_some() {
                return Err(SchemaError::DuplicateType(ty.name().to_string()));
            }
        }

        let referenced = referenced_names(&types, &directives);
        for (name, description) in BUILTIN_SCALARS {
            if !index.contains_key(*name) && referenced.iter().any(|r| r == name) {
                index.insert(name.to_string(), types.len());
                types.push(NamedType::Scalar(ScalarType {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                }));
            }
        }

        let default_root = |name: &str| {
            matches!(index.get(name).map(|&i| &types[i]), Some(NamedType::Object(_)))
                .then(|| name.to_string())
        };
        roots.query = roots.query.or_else(|| default_root("Query"));
        roots.mutation = roots.mutation.or_else(|| default_root("Mutation"));
        roots.subscription = roots.subscription.or_else(|| default_root("Subscription"));

        Ok(Schema {
            roots,
            types,
            index,
            directives,
        })
    }

    pub fn roots(&self) -> &RootTypes {
        &self.roots
    }

    pub fn query_type(&self) -> Option<&ObjectType> {
        self.roots.query.as_deref().and_then(|name| self.object_type(name))
    }

    pub fn get_type(&self, name: &str) -> Option<&NamedType> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        match self.get_type(name) {
            Some(NamedType::Object(object)) => Some(object),
            _ => None,
        }
    }

    /// Every named type in declaration order.
    pub fn types(&self) -> &[NamedType] {
        &self.types
    }

    pub fn object_types(&self) -> impl Iterator<Item = &ObjectType> {
        self.types.iter().filter_map(|t| match t {
            NamedType::Object(object) => Some(object),
            _ => None,
        })
    }

    pub fn input_types(&self) -> impl Iterator<Item = &InputObjectType> {
        self.types.iter().filter_map(|t| match t {
            NamedType::InputObject(input) => Some(input),
            _ => None,
        })
    }

    pub fn enum_types(&self) -> impl Iterator<Item = &EnumType> {
        self.types.iter().filter_map(|t| match t {
            NamedType::Enum(e) => Some(e),
            _ => None,
        })
    }

    pub fn directives(&self) -> &[DirectiveDefinition] {
        &self.directives
    }

    /// Object types implementing the given interface, in declaration order.
    pub fn implementations(&self, interface: &str) -> Vec<&ObjectType> {
        self.object_types()
            .filter(|object| object.interfaces.iter().any(|i| i == interface))
            .collect()
    }
}

fn referenced_names(types: &[NamedType], directives: &[DirectiveDefinition]) -> Vec<String> {
    fn push_ref(out: &mut Vec<String>, ty: &TypeRef) {
        match ty {
            TypeRef::Named(name) => out.push(name.clone()),
            TypeRef::List(inner) | TypeRef::NonNull(inner) => push_ref(out, inner),
        }
    }

    fn push_fields(out: &mut Vec<String>, fields: &[Field]) {
        for field in fields {
            push_ref(out, &field.ty);
            for arg in &field.args {
                push_ref(out, &arg.ty);
            }
        }
    }

    let mut out = Vec::new();

    for ty in types {
        match ty {
            NamedType::Object(object) => push_fields(&mut out, &object.fields),
            NamedType::Interface(interface) => push_fields(&mut out, &interface.fields),
            NamedType::InputObject(input) => {
                for field in &input.fields {
                    push_ref(&mut out, &field.ty);
                }
            }
            NamedType::Scalar(_) | NamedType::Union(_) | NamedType::Enum(_) => {}
        }
    }
    for directive in directives {
        for arg in &directive.args {
            push_ref(&mut out, &arg.ty);
        }
    }
    out
}

fn deprecation_reason(directives: &[Directive<String>]) -> Option<String> {
    let directive = directives.iter().find(|d| d.name == "deprecated")?;
    let reason = directive
        .arguments
        .iter()
        .find(|(name, _)| name == "reason")
        .and_then(|(_, value)| match value {
            Value::String(reason) => Some(reason.clone()),
            _ => None,
        });
    Some(reason.unwrap_or_else(|| DEFAULT_DEPRECATION_REASON.to_string()))
}

fn convert_input_value(value: &graphql_parser::schema::InputValue<String>) -> InputValue {
    InputValue {
        name: value.name.clone(),
        description: value.description.clone(),
        ty: TypeRef::from_parser(&value.value_type),
        default_value: value.default_value.as_ref().map(|v| v.to_string()),
    }
}

fn convert_field(field: &graphql_parser::schema::Field<String>) -> Field {
    Field {
        name: field.name.clone(),
        description: field.description.clone(),
        ty: TypeRef::from_parser(&field.field_type),
        args: field.arguments.iter().map(convert_input_value).collect(),
        deprecation_reason: deprecation_reason(&field.directives),
    }
}

fn convert_type_definition(def: GqlTypeDefinition<String>) -> NamedType {
    match def {
        GqlTypeDefinition::Scalar(scalar) => NamedType::Scalar(ScalarType {
            name: scalar.name,
            description: scalar.description,
        }),
        GqlTypeDefinition::Object(object) => NamedType::Object(ObjectType {
            fields: object.fields.iter().map(convert_field).collect(),
            name: object.name,
            description: object.description,
            interfaces: object.implements_interfaces,
        }),
        GqlTypeDefinition::Interface(interface) => NamedType::Interface(InterfaceType {
            fields: interface.fields.iter().map(convert_field).collect(),
            name: interface.name,
            description: interface.description,
        }),
        GqlTypeDefinition::Union(union) => NamedType::Union(UnionType {
            name: union.name,
            description: union.description,
            members: union.types,
        }),
        GqlTypeDefinition::Enum(e) => NamedType::Enum(EnumType {
            values: e
                .values
                .iter()
                .map(|v| EnumValue {
                    name: v.name.clone(),
                    description: v.description.clone(),
                    deprecation_reason: deprecation_reason(&v.directives),
                })
                .collect(),
            name: e.name,
            description: e.description,
        }),
        GqlTypeDefinition::InputObject(input) => NamedType::InputObject(InputObjectType {
            fields: input.fields.iter().map(convert_input_value).collect(),
            name: input.name,
            description: input.description,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_declaration_order() {
        let sdl = r#"
            type Query {
              posts: [Post!]!
            }

            enum Status {
              DRAFT
              PUBLISHED
            }

            type Post {
              title: String!
              status: Status
            }
        "#;

        let schema = Schema::parse(sdl).unwrap();
        let names: Vec<_> = schema.types().iter().map(|t| t.name()).collect();

        // Boolean is referenced by the built-in directives
        assert_eq!(names, vec!["Query", "Status", "Post", "String", "Boolean"]);
        assert_eq!(schema.roots().query.as_deref(), Some("Query"));
        assert_eq!(schema.roots().mutation, None);
    }

    #[test]
    fn test_type_ref_display() {
        let ty = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("Post"))));
        assert_eq!(ty.to_string(), "[Post!]!");
    }

    #[test]
    fn test_duplicate_type() {
        let err = Schema::parse("type A { id: ID }\ntype A { id: ID }").unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateType(name) if name == "A"));
    }

    #[test]
    fn test_object_extension_is_merged() {
        let schema = Schema::parse(
            "type Query { a: Int }\nextend type Query { b: String }",
        )
        .unwrap();

        let query = schema.query_type().unwrap();
        let fields: Vec<_> = query.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["a", "b"]);
    }

    #[test]
    fn test_deprecation_and_defaults() {
        let schema = Schema::parse(
            r#"
            type Query {
              old: String @deprecated
              items(first: Int = 10): [String]
            }
            "#,
        )
        .unwrap();

        let query = schema.query_type().unwrap();
        assert_eq!(
            query.fields[0].deprecation_reason.as_deref(),
            Some("No longer supported")
        );
        assert_eq!(query.fields[1].args[0].default_value.as_deref(), Some("10"));
    }

    #[test]
    fn test_explicit_schema_definition() {
        let schema = Schema::parse(
            "schema { query: Root }\ntype Root { ok: Boolean }",
        )
        .unwrap();
        assert_eq!(schema.query_type().unwrap().name, "Root");
    }
}
