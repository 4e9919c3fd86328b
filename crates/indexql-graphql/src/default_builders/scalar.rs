use async_graphql::{
    dynamic::{Scalar, Type},
    Value as GqlValue,
};
use indexql_core::BigInt;

pub(super) const BIG_INT: &str = "BigInt";
pub(super) const JSON: &str = "JSON";

/// Custom scalars shared by every schema.
pub(super) fn scalar_types() -> Vec<Type> {
    vec![
        Scalar::new(BIG_INT)
            .description("Arbitrary-precision integer, as a decimal string")
            .validator(is_bigint)
            .into(),
        Scalar::new(JSON)
            .description("Arbitrary JSON value")
            .into(),
    ]
}

fn is_bigint(value: &GqlValue) -> bool {
    match value {
        GqlValue::String(text) => text.parse::<BigInt>().is_ok(),
        GqlValue::Number(n) => n.is_i64() || n.is_u64(),
        _ => false,
    }
}
