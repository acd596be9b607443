pub mod common;
pub mod movie;
pub mod schema;
pub mod user;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::Extension,
    response::{self, IntoResponse},
};

use self::schema::MarqueeSchema;

pub const ENDPOINT: &str = "/graphql";

pub async fn graphql_handler(
    Extension(schema): Extension<MarqueeSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

pub async fn graphiql() -> impl IntoResponse {
    response::Html(GraphiQLSource::build().endpoint(ENDPOINT).finish())
}
