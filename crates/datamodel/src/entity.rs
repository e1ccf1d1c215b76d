//! The resolved data-model graph.

/// A field of a data-model entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityField {
    pub name: String,
    /// Innermost type name (`String`, `DateTime`, another entity, an enum, ...).
    pub type_name: String,
    pub is_required: bool,
    pub is_list: bool,
    pub is_unique: bool,
    pub is_id: bool,
}

impl EntityField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_required: false,
            is_list: false,
            is_unique: false,
            is_id: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Mark as the id field. Id fields are always unique.
    pub fn id(mut self) -> Self {
        self.is_id = true;
        self.is_unique = true;
        self
    }
}

/// A modeled storage object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub fields: Vec<EntityField>,
    pub is_embedded: bool,
}

impl Entity {
    pub fn new(name: impl Into<String>, fields: Vec<EntityField>) -> Self {
        Self {
            name: name.into(),
            fields,
            is_embedded: false,
        }
    }

    pub fn embedded(mut self) -> Self {
        self.is_embedded = true;
        self
    }

    pub fn field(&self, name: &str) -> Option<&EntityField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &EntityField> {
        self.fields.iter().filter(|f| f.is_unique)
    }

    /// Unique field names in declaration order.
    pub fn unique_field_names(&self) -> Vec<String> {
        self.unique_fields().map(|f| f.name.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatamodelEnum {
    pub name: String,
    pub values: Vec<String>,
}

/// Every entity and enum of a project, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Datamodel {
    pub types: Vec<Entity>,
    pub enums: Vec<DatamodelEnum>,
}

impl Datamodel {
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn is_entity(&self, name: &str) -> bool {
        self.entity(name).is_some()
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.iter().any(|e| e.name == name)
    }

    pub fn embedded_type_names(&self) -> Vec<String> {
        self.types
            .iter()
            .filter(|t| t.is_embedded)
            .map(|t| t.name.clone())
            .collect()
    }
}
