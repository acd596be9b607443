pub mod access_log;
pub mod graphql;
pub mod security;

use anyhow::anyhow;
use axum::{extract::Extension, middleware, routing::post, Router};
use graphql::schema::{MarqueeSchema, MovieSvc, SchemaBuilder, UserSvc};
use std::{future::Future, net::SocketAddr};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
};

use self::{
    access_log::access_log,
    graphql::{graphiql, graphql_handler, ENDPOINT},
    security::security_headers,
};
use crate::infrastructure::config::Environment;

pub struct ServerBuilder {
    user_svc: Option<UserSvc>,
    movie_svc: Option<MovieSvc>,
    environment: Environment,
    enable_graphiql: bool,
    body_limit: usize,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self {
            user_svc: None,
            movie_svc: None,
            environment: Environment::default(),
            enable_graphiql: false,
            body_limit: 100 * 1024,
        }
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_svc(self, user_svc: UserSvc) -> Self {
        Self {
            user_svc: Some(user_svc),
            ..self
        }
    }

    pub fn with_movie_svc(self, movie_svc: MovieSvc) -> Self {
        Self {
            movie_svc: Some(movie_svc),
            ..self
        }
    }

    pub fn with_environment(self, environment: Environment) -> Self {
        Self {
            environment,
            ..self
        }
    }

    pub fn with_body_limit(self, body_limit: usize) -> Self {
        Self { body_limit, ..self }
    }

    pub fn enable_graphiql(self) -> Self {
        Self {
            enable_graphiql: true,
            ..self
        }
    }

    pub fn build(self) -> Result<Server, anyhow::Error> {
        let user_svc = self.user_svc.ok_or_else(|| anyhow!("no user service"))?;
        let movie_svc = self.movie_svc.ok_or_else(|| anyhow!("no movie service"))?;

        let schema = SchemaBuilder::new()
            .user_svc(user_svc)
            .movie_svc(movie_svc)
            .build();

        Ok(Server::new(
            schema,
            self.environment,
            self.enable_graphiql,
            self.body_limit,
        ))
    }
}

pub struct Server {
    router: Router,
}

impl Server {
    pub fn new(
        schema: MarqueeSchema,
        environment: Environment,
        enable_graphiql: bool,
        body_limit: usize,
    ) -> Self {
        let mut route = post(graphql_handler);
        if enable_graphiql {
            route = route.get(graphiql);
        }

        let router = Router::new()
            .route(ENDPOINT, route)
            .layer(Extension(schema))
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(middleware::from_fn_with_state(
                environment,
                security_headers,
            ))
            .layer(CompressionLayer::new())
            .layer(
                CorsLayer::new()
                    .allow_origin(AllowOrigin::mirror_request())
                    .allow_methods(AllowMethods::mirror_request())
                    .allow_headers(AllowHeaders::mirror_request())
                    .allow_credentials(true),
            )
            .layer(middleware::from_fn(access_log));

        Self { router }
    }

    /// Serve until `shutdown` resolves, then let in-flight requests finish.
    pub async fn serve<A, F>(self, addr: A, shutdown: F) -> Result<(), anyhow::Error>
    where
        A: Into<SocketAddr>,
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("server is running at port {}", listener.local_addr()?.port());

        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        Ok(())
    }
}
