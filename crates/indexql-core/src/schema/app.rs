mod column;
pub use column::{
    Column, ColumnKind, EnumColumn, JsonColumn, ManyColumn, OneColumn, ReferenceColumn, Scalar,
    ScalarColumn,
};

mod enumeration;
pub use enumeration::Enum;

mod schema;
pub use schema::{Schema, SchemaBuilder};

mod table;
pub use table::Table;
