//! Classification of type references.

use crate::error::GenerationError;
use crate::schema::{NamedType, Schema, TypeRef};

/// True if any wrapping layer of `ty` is a list.
pub fn is_list(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Named(_) => false,
        TypeRef::List(_) => true,
        TypeRef::NonNull(inner) => is_list(inner),
    }
}

/// True if the outermost wrapper is non-null.
pub fn is_required(ty: &TypeRef) -> bool {
    matches!(ty, TypeRef::NonNull(_))
}

/// Name of the innermost named type.
pub fn type_name(ty: &TypeRef) -> &str {
    match ty {
        TypeRef::Named(name) => name,
        TypeRef::List(inner) | TypeRef::NonNull(inner) => type_name(inner),
    }
}

/// The innermost named type, resolved against `schema`.
pub fn final_type<'s>(schema: &'s Schema, ty: &TypeRef) -> Result<&'s NamedType, GenerationError> {
    let name = type_name(ty);
    schema
        .get_type(name)
        .ok_or_else(|| GenerationError::UnknownType(name.to_string()))
}
