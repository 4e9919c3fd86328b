use super::Serializer;

use indexql_core::{driver::Kind, schema::db};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    Postgresql,
    Sqlite,
}

impl<'a> Serializer<'a> {
    pub fn sqlite(schema: &'a db::Schema) -> Serializer<'a> {
        Serializer {
            schema,
            flavor: Flavor::Sqlite,
        }
    }

    pub fn postgresql(schema: &'a db::Schema) -> Serializer<'a> {
        Serializer {
            schema,
            flavor: Flavor::Postgresql,
        }
    }

    /// Picks the flavor matching the engine the schema was translated for.
    pub fn for_schema(schema: &'a db::Schema) -> Serializer<'a> {
        match schema.kind {
            Kind::Sqlite => Serializer::sqlite(schema),
            Kind::Postgresql => Serializer::postgresql(schema),
        }
    }
}
