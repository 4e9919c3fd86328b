use async_graphql::dynamic::{Enum, Field, InputObject, Object, Type};
use indexmap::IndexMap;
use indexql_core::schema::app;

/// GraphQL enum types, keyed by declared enum name.
pub type EnumTypes = IndexMap<String, Enum>;

/// Filter input types, keyed by table name.
pub type FilterTypes = IndexMap<String, InputObject>;

/// Output types produced by [`TypeBuilders::build_entity_types`].
#[derive(Default)]
pub struct EntityTypes {
    /// Entity object types, keyed by table name.
    pub entities: IndexMap<String, Object>,

    /// Page object types, keyed by table name.
    pub pages: IndexMap<String, Object>,

    /// Shared types the entities depend on (scalars, `PageInfo`, ...).
    pub extra: Vec<Type>,
}

/// Produces the GraphQL types and root fields for an abstract schema.
///
/// [`build_schema`](crate::build_schema) calls the three type builders once
/// each, in declaration order of this trait, then asks for a singular and a
/// plural root field per table.
pub trait TypeBuilders {
    fn build_enum_types(&self, schema: &app::Schema) -> EnumTypes;

    fn build_filter_types(&self, schema: &app::Schema, enums: &EnumTypes) -> FilterTypes;

    fn build_entity_types(
        &self,
        schema: &app::Schema,
        enums: &EnumTypes,
        filters: &FilterTypes,
    ) -> EntityTypes;

    fn build_singular_field(&self, field_name: &str, table: &app::Table, entity: &Object) -> Field;

    fn build_plural_field(
        &self,
        field_name: &str,
        table: &app::Table,
        page: &Object,
        filter: &InputObject,
    ) -> Field;
}
