//! TypeScript declaration rendering.
//!
//! Walks a [`Schema`] and emits the `types.d.ts` module consumed by the
//! nexus-prisma schema builder. The document contains:
//! - the `NexusPrismaTypes` registry,
//! - per object type: selectable fields, exposable field names, argument
//!   names and the field-details map with resolver signatures,
//! - per input type: a field interface and its selectable fields,
//! - per enum type: the union of its values.
//!
//! # Example
//!
//! ```ignore
//! use nexus_prisma_gql::{render_nexus_prisma_types, Schema};
//!
//! let schema = Schema::parse(&sdl)?;
//! let declarations = render_nexus_prisma_types(&schema, "../prisma-client")?;
//! ```

use itertools::Itertools;
use tracing::debug;

use crate::error::{GenerationError, Result};
use crate::naming::{
    enum_values_name, exposable_fields_name, field_args_name, input_object_fields_name,
    input_object_type_name, object_field_details_name, object_fields_name,
};
use crate::schema::{EnumType, Field, InputObjectType, InputValue, NamedType, ObjectType, Schema, TypeRef};
use crate::shape::{final_type, is_list, is_required, type_name};

/// GraphQL scalar to TypeScript type. Scalars missing here are a generation
/// fault.
pub const SCALAR_TS_TYPES: &[(&str, &str)] = &[
    ("String", "string"),
    ("Boolean", "boolean"),
    ("ID", "string"),
    ("Int", "number"),
    ("Float", "number"),
    ("DateTime", "string"),
];

pub fn scalar_ts_type(scalar: &str) -> Option<&'static str> {
    SCALAR_TS_TYPES
        .iter()
        .find(|(name, _)| *name == scalar)
        .map(|(_, ts)| *ts)
}

/// Render the complete declaration document.
///
/// `prisma_client_path` is used verbatim as the module specifier of the
/// generated client import.
pub fn render_nexus_prisma_types(schema: &Schema, prisma_client_path: &str) -> Result<String> {
    let object_types: Vec<&ObjectType> = schema
        .object_types()
        .filter(|t| !t.name.starts_with("__") && t.name != "Node")
        .collect();
    let input_types: Vec<&InputObjectType> = schema.input_types().collect();
    let enum_types: Vec<&EnumType> = schema
        .enum_types()
        .filter(|t| !t.name.starts_with("__"))
        .collect();

    let mut blocks = vec![
        format!(
            "import {{ core }} from 'nexus'\nimport {{ GraphQLResolveInfo }} from 'graphql'\nimport * as prisma from '{}'",
            prisma_client_path
        ),
        "export interface NexusPrismaGen extends NexusPrismaTypes {}".to_string(),
        render_registry(&object_types, &input_types, &enum_types),
    ];

    for object in &object_types {
        blocks.push(render_object_type(schema, object)?);
    }
    for input in &input_types {
        blocks.push(render_input_type(schema, input)?);
    }
    for e in &enum_types {
        blocks.push(render_enum_type(e));
    }

    debug!(
        objects = object_types.len(),
        inputs = input_types.len(),
        enums = enum_types.len(),
        "rendered type declarations"
    );

    let mut output = blocks.join("\n\n");
    output.push('\n');
    Ok(output)
}

fn push_lines(output: &mut String, lines: impl IntoIterator<Item = String>) {
    for line in lines {
        output.push_str(&line);
        output.push('\n');
    }
}

/// The registry the schema builder reads at type-resolution time.
fn render_registry(
    object_types: &[&ObjectType],
    input_types: &[&InputObjectType],
    enum_types: &[&EnumType],
) -> String {
    let mut output = String::from("export interface NexusPrismaTypes {\n");

    output.push_str("  objectTypes: {\n    fields: {\n");
    push_lines(
        &mut output,
        object_types
            .iter()
            .map(|t| format!("      {}: {}", t.name, object_fields_name(&t.name))),
    );
    output.push_str("    }\n    fieldsDetails: {\n");
    push_lines(
        &mut output,
        object_types
            .iter()
            .map(|t| format!("      {}: {}", t.name, object_field_details_name(&t.name))),
    );
    output.push_str("    }\n  }\n");

    output.push_str("  inputTypes: {\n    fields: {\n");
    push_lines(
        &mut output,
        input_types.iter().map(|t| {
            format!(
                "      {}: {}",
                input_object_type_name(&t.name),
                input_object_fields_name(&t.name)
            )
        }),
    );
    output.push_str("    }\n  }\n");

    output.push_str("  enumTypes: {\n");
    push_lines(
        &mut output,
        enum_types
            .iter()
            .map(|t| format!("    {}: {},", t.name, enum_values_name(&t.name))),
    );
    output.push_str("  }\n}");

    output
}

/// `Query.node` is served by the builder itself.
fn exposed_fields(object: &ObjectType) -> Vec<&Field> {
    object
        .fields
        .iter()
        .filter(|f| !(object.name == "Query" && f.name == "node"))
        .collect()
}

fn render_object_type(schema: &Schema, object: &ObjectType) -> Result<String> {
    let fields = exposed_fields(object);

    let mut sections = vec![
        format!("// Types for {}", object.name),
        render_fields(object, &fields),
        render_exposable_fields(object, &fields),
    ];

    let args = render_fields_args(object, &fields);
    if !args.is_empty() {
        sections.push(args);
    }

    sections.push(render_type_field_details(schema, object, &fields)?);
    Ok(sections.join("\n\n"))
}

fn render_fields(object: &ObjectType, fields: &[&Field]) -> String {
    let mut output = format!(
        "type {} =\n  | {}",
        object_fields_name(&object.name),
        exposable_fields_name(&object.name)
    );

    for field in fields {
        let args = if field.args.is_empty() {
            "[] | false".to_string()
        } else {
            format!("{}[] | false", field_args_name(&object.name, &field.name))
        };
        output.push_str(&format!(
            "\n  | {{ name: '{}', args?: {}, alias?: string }}",
            field.name, args
        ));
    }

    output
}

fn render_exposable_fields(object: &ObjectType, fields: &[&Field]) -> String {
    let name = exposable_fields_name(&object.name);
    if fields.is_empty() {
        return format!("type {} = never", name);
    }
    format!(
        "type {} =\n{}",
        name,
        fields.iter().map(|f| format!("  | '{}'", f.name)).join("\n")
    )
}

/// One literal union per field that declares arguments. Empty when no field
/// has any.
fn render_fields_args(object: &ObjectType, fields: &[&Field]) -> String {
    fields
        .iter()
        .filter(|field| !field.args.is_empty())
        .map(|field| {
            format!(
                "type {} =\n{}",
                field_args_name(&object.name, &field.name),
                field.args.iter().map(|arg| format!("  | '{}'", arg.name)).join("\n")
            )
        })
        .join("\n\n")
}

fn render_type_field_details(schema: &Schema, object: &ObjectType, fields: &[&Field]) -> Result<String> {
    let mut output = format!(
        "export interface {} {{\n",
        object_field_details_name(&object.name)
    );

    for field in fields {
        let args = if field.args.is_empty() {
            "{}".to_string()
        } else {
            format!(
                "Record<{}, core.NexusArgDef<string>>",
                field_args_name(&object.name, &field.name)
            )
        };

        output.push_str(&format!("  {}: {{\n", field.name));
        output.push_str(&format!("    type: '{}'\n", type_name(&field.ty)));
        output.push_str(&format!("    args: {}\n", args));
        output.push_str("    description: string\n");
        output.push_str(&format!(
            "    list: {}\n",
            if is_list(&field.ty) { "true" } else { "undefined" }
        ));
        output.push_str(&format!("    nullable: {}\n", !is_required(&field.ty)));

        // Scalar fields resolve to their parent's property, no signature needed
        if !final_type(schema, &field.ty)?.is_scalar() {
            output.push_str(&format!(
                "    resolve: (\n      root: core.RootValue<\"{}\">,\n      args: {},\n      context: core.GetGen<\"context\">,\n      info?: GraphQLResolveInfo\n    ) => {}\n",
                object.name,
                render_resolver_args(schema, object, field)?,
                render_resolver_return_type(schema, object, field)?
            ));
        }

        output.push_str("  }\n");
    }

    output.push('}');
    Ok(output)
}

fn render_resolver_args(schema: &Schema, object: &ObjectType, field: &Field) -> Result<String> {
    if field.args.is_empty() {
        return Ok("{}".to_string());
    }

    let members = field
        .args
        .iter()
        .map(|arg| {
            Ok(format!(
                "{}{}: {}",
                arg.name,
                if is_required(&arg.ty) { "" } else { "?" },
                ts_type(schema, arg, &object.name)?
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(format!("{{ {} }}", members.join(", ")))
}

fn render_resolver_return_type(schema: &Schema, object: &ObjectType, field: &Field) -> Result<String> {
    let return_type = derive_ts_type(schema, &field.ty, &object.name, &field.name)?;
    Ok(format!("Promise<{}> | {}", return_type, return_type))
}

fn ts_type(schema: &Schema, value: &InputValue, owner: &str) -> Result<String> {
    derive_ts_type(schema, &value.ty, owner, &value.name)
}

/// TypeScript type of a reference: scalars through [`SCALAR_TS_TYPES`],
/// input types by name, everything else from the generated client.
fn derive_ts_type(schema: &Schema, ty: &TypeRef, owner: &str, member: &str) -> Result<String> {
    let mut ts = match final_type(schema, ty)? {
        NamedType::Scalar(scalar) => scalar_ts_type(&scalar.name)
            .ok_or_else(|| GenerationError::UnmappedScalar {
                scalar: scalar.name.clone(),
                owner: owner.to_string(),
                field: member.to_string(),
            })?
            .to_string(),
        NamedType::InputObject(input) => input_object_type_name(&input.name),
        other => format!("prisma.{}", other.name()),
    };

    if is_list(ty) {
        ts.push_str("[]");
    }

    if !is_required(ty) {
        ts.push_str(" | null");
    }

    Ok(ts)
}

fn render_input_type(schema: &Schema, input: &InputObjectType) -> Result<String> {
    // Optionality is keyed off the input type's own reference, which is never
    // non-null, so every field comes out optional.
    let optional = if is_required(&input.as_type_ref()) { "" } else { "?" };

    let mut output = format!("export interface {} {{\n", input_object_type_name(&input.name));
    for field in &input.fields {
        output.push_str(&format!(
            "  {}{}: {}\n",
            field.name,
            optional,
            ts_type(schema, field, &input.name)?
        ));
    }
    output.push_str("}\n");

    output.push_str(&format!(
        "export type {} =\n  | Extract<keyof {}, string>",
        input_object_fields_name(&input.name),
        input_object_type_name(&input.name)
    ));
    for field in &input.fields {
        output.push_str(&format!("\n  | {{ name: '{}', alias?: string }}", field.name));
    }

    Ok(output)
}

fn render_enum_type(e: &EnumType) -> String {
    format!(
        "export type {} =\n{}",
        enum_values_name(&e.name),
        e.values.iter().map(|v| format!("  | '{}'", v.name)).join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BLOG_SDL: &str = r#"
        type Query {
          post(id: ID!): Post
          posts(where: PostWhereInput, first: Int): [Post!]!
          node(id: ID!): Node
        }

        interface Node {
          id: ID!
        }

        type Post implements Node {
          id: ID!
          title: String!
          tags: [String!]!
          author(filter: FilterInput): User
        }

        type User implements Node {
          id: ID!
          name: String
          role: Role!
        }

        input FilterInput {
          name: String
        }

        input PostWhereInput {
          title: String
          AND: [PostWhereInput!]
        }

        enum Role {
          ADMIN
          USER
        }
    "#;

    fn render(sdl: &str) -> String {
        let schema = Schema::parse(sdl).unwrap();
        render_nexus_prisma_types(&schema, "./prisma-client").unwrap()
    }

    #[test]
    fn test_scalar_field_details() {
        let code = render(BLOG_SDL);

        let expected = "  title: {\n    type: 'String'\n    args: {}\n    description: string\n    list: undefined\n    nullable: false\n  }\n";
        assert!(code.contains(expected), "Missing title details in:\n{}", code);
    }

    #[test]
    fn test_object_field_resolver_signature() {
        let code = render(BLOG_SDL);

        let expected = r#"  author: {
    type: 'User'
    args: Record<PostAuthorArgs, core.NexusArgDef<string>>
    description: string
    list: undefined
    nullable: true
    resolve: (
      root: core.RootValue<"Post">,
      args: { filter?: FilterInput | null },
      context: core.GetGen<"context">,
      info?: GraphQLResolveInfo
    ) => Promise<prisma.User | null> | prisma.User | null
  }"#;
        assert!(code.contains(expected), "Missing author details in:\n{}", code);
    }

    #[test]
    fn test_list_of_non_null_has_single_array_suffix() {
        let code = render(BLOG_SDL);

        assert!(code.contains("    type: 'String'\n    args: {}\n    description: string\n    list: true\n    nullable: false\n"));
        assert!(code.contains(") => Promise<prisma.Post[]> | prisma.Post[]\n"));
        assert!(!code.contains("[][]"));
    }

    #[test]
    fn test_query_node_is_excluded() {
        let code = render(BLOG_SDL);

        assert!(code.contains("type QueryFields =\n  | 'post'\n  | 'posts'\n\n"));
        assert!(!code.contains("'node'"));
        assert!(!code.contains("QueryNodeArgs"));
        assert!(!code.contains("  node: {"));
        // Node interface never gets declarations
        assert!(!code.contains("NodeObject"));
    }

    #[test]
    fn test_no_args_union_without_arguments() {
        let code = render(BLOG_SDL);

        assert!(!code.contains("type UserIdArgs"));
        assert!(!code.contains("type UserNameArgs"));
        assert!(code.contains("type PostAuthorArgs =\n  | 'filter'"));
        assert!(code.contains("type QueryPostsArgs =\n  | 'where'\n  | 'first'"));
        assert!(code.contains("  | { name: 'name', args?: [] | false, alias?: string }"));
        assert!(code.contains("  | { name: 'author', args?: PostAuthorArgs[] | false, alias?: string }"));
    }

    #[test]
    fn test_enum_values_keep_declared_order() {
        let code = render(BLOG_SDL);
        assert!(code.contains("export type RoleValues =\n  | 'ADMIN'\n  | 'USER'"));
        assert!(code.contains("    Role: RoleValues,\n"));
    }

    #[test]
    fn test_input_fields_are_all_optional() {
        let code = render("input Required { id: ID! tags: [String!]! }");

        assert_eq!(
            code.split("\n\n").last().unwrap(),
            "export interface Required {\n  id?: string\n  tags?: string[]\n}\nexport type RequiredInputObject =\n  | Extract<keyof Required, string>\n  | { name: 'id', alias?: string }\n  | { name: 'tags', alias?: string }\n"
        );
    }

    #[test]
    fn test_registry() {
        let code = render(BLOG_SDL);

        let expected = "export interface NexusPrismaTypes {
  objectTypes: {
    fields: {
      Query: QueryObject
      Post: PostObject
      User: UserObject
    }
    fieldsDetails: {
      Query: QueryFieldDetails
      Post: PostFieldDetails
      User: UserFieldDetails
    }
  }
  inputTypes: {
    fields: {
      FilterInput: FilterInputInputObject
      PostWhereInput: PostWhereInputInputObject
    }
  }
  enumTypes: {
    Role: RoleValues,
  }
}";
        assert!(code.contains(expected), "Registry mismatch in:\n{}", code);
        assert!(code.starts_with("import { core } from 'nexus'\nimport { GraphQLResolveInfo } from 'graphql'\nimport * as prisma from './prisma-client'\n"));
    }

    #[test]
    fn test_enum_field_resolves_through_client() {
        let code = render(BLOG_SDL);
        assert!(code.contains(") => Promise<prisma.Role> | prisma.Role\n"));
    }

    #[test]
    fn test_unmapped_scalar_is_a_fault() {
        let schema = Schema::parse("scalar Json\ninput Meta { data: Json }").unwrap();
        let err = render_nexus_prisma_types(&schema, "prisma").unwrap_err();

        assert!(matches!(
            err,
            GenerationError::UnmappedScalar { ref scalar, ref owner, ref field }
                if scalar == "Json" && owner == "Meta" && field == "data"
        ));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let schema = Schema::parse(BLOG_SDL).unwrap();
        let first = render_nexus_prisma_types(&schema, "prisma").unwrap();
        let second = render_nexus_prisma_types(&schema, "prisma").unwrap();
        assert_eq!(first, second);
    }
}
