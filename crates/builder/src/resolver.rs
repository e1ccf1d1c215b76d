//! Resolution of type names the host builder does not know.

use nexus_prisma_gql::{NamedType, Schema};

pub trait MissingTypeResolver {
    fn resolve_missing_type(&self, name: &str) -> Option<NamedType>;
}

impl<F> MissingTypeResolver for F
where
    F: Fn(&str) -> Option<NamedType>,
{
    fn resolve_missing_type(&self, name: &str) -> Option<NamedType> {
        self(name)
    }
}

/// Resolves names against the schema of the generated metadata.
#[derive(Debug, Clone, Copy)]
pub struct GeneratedTypeResolver<'a> {
    schema: &'a Schema,
}

impl<'a> GeneratedTypeResolver<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }
}

impl MissingTypeResolver for GeneratedTypeResolver<'_> {
    fn resolve_missing_type(&self, name: &str) -> Option<NamedType> {
        self.schema
            .get_type(name)
            .filter(|t| !t.is_introspection())
            .cloned()
    }
}

/// Tries `primary`, then `fallback`.
#[derive(Debug, Clone, Copy)]
pub struct FallbackChain<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackChain<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P, F> MissingTypeResolver for FallbackChain<P, F>
where
    P: MissingTypeResolver,
    F: MissingTypeResolver,
{
    fn resolve_missing_type(&self, name: &str) -> Option<NamedType> {
        self.primary
            .resolve_missing_type(name)
            .or_else(|| self.fallback.resolve_missing_type(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_prisma_gql::ScalarType;

    fn schema() -> Schema {
        Schema::parse("type Query { user: User }\ntype User { id: ID! }").unwrap()
    }

    fn host_default(name: &str) -> Option<NamedType> {
        (name == "Upload").then(|| {
            NamedType::Scalar(ScalarType {
                name: "Upload".to_string(),
                description: None,
            })
        })
    }

    #[test]
    fn test_generated_types_resolve_first() {
        let schema = schema();
        let chain = FallbackChain::new(GeneratedTypeResolver::new(&schema), host_default);

        let user = chain.resolve_missing_type("User").unwrap();
        assert_eq!(user.name(), "User");

        let upload = chain.resolve_missing_type("Upload").unwrap();
        assert!(upload.is_scalar());

        assert!(chain.resolve_missing_type("Missing").is_none());
    }
}
