use super::{Flavor, Formatter, ToSql};

use indexql_core::{schema::db, stmt};

pub trait Params {
    /// Records a bound value. `storage_ty` is the type of the column the
    /// value is compared against, when known.
    fn push(&mut self, value: &stmt::Value, storage_ty: Option<db::Type>) -> Placeholder;
}

/// A 1-based parameter position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

/// A bound value paired with the storage type it is encoded for.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    pub value: stmt::Value,
    pub storage_ty: Option<db::Type>,
}

impl Params for Vec<stmt::Value> {
    fn push(&mut self, value: &stmt::Value, _storage_ty: Option<db::Type>) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

impl Params for Vec<TypedValue> {
    fn push(&mut self, value: &stmt::Value, storage_ty: Option<db::Type>) -> Placeholder {
        self.push(TypedValue {
            value: value.clone(),
            storage_ty,
        });
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: super::Params>(self, f: &mut Formatter<'_, P>) {
        use std::fmt::Write;

        let _ = match f.serializer.flavor {
            Flavor::Postgresql => write!(f.dst, "${}", self.0),
            Flavor::Sqlite => write!(f.dst, "?{}", self.0),
        };
    }
}
