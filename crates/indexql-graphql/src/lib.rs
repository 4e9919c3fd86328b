mod assemble;
pub use assemble::{build_schema, plural_name, singular_name};

mod builders;
pub use builders::{EntityTypes, EnumTypes, FilterTypes, TypeBuilders};

mod context;
pub use context::{Loaders, RequestContext};

pub mod default_builders;
pub use default_builders::{DefaultTypeBuilders, Limits};

mod loader;
pub use loader::{LoaderConfig, RelationLoader};

pub use async_graphql::{dynamic, Request, Response};

/// Executes `request` against `schema` with `context` attached as request
/// data. The context, and with it every loader it created, is dropped when
/// execution finishes.
pub async fn execute(
    schema: &dynamic::Schema,
    context: RequestContext,
    request: impl Into<Request>,
) -> Response {
    schema.execute(request.into().data(context)).await
}
