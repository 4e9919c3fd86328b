pub mod serializer;
pub use serializer::{Params, Placeholder, Serializer, TypedValue};

pub mod stmt;
pub use stmt::Statement;
