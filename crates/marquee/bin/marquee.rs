#[macro_use]
extern crate log;

use std::sync::Arc;

use clap::Parser;
use marquee::{
    domain::{
        repositories::{movie::MovieRepository, user::UserRepository},
        services::{movie::MovieService, user::UserService},
    },
    infrastructure::{
        config::Config,
        database,
        repositories::{movie::MovieRepositoryImpl, user::UserRepositoryImpl},
    },
    presentation::ServerBuilder,
};

#[derive(Parser)]
#[command(version, about)]
struct Opts {
    /// Path to config file
    #[clap(long)]
    config: Option<String>,
}

fn init_logger() {
    let default_filter = match std::env::var("MARQUEE_LOG") {
        Ok(level) => format!("marquee={level}"),
        Err(_) => "marquee=info".to_string(),
    };

    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", default_filter))
        .init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("ctrl+c signal"),
        Err(e) => error!("failed to listen for ctrl+c: {e}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let dotenv = dotenvy::dotenv();

    init_logger();

    if let Ok(path) = dotenv {
        debug!("loaded environment from {}", path.display());
    }

    let opts: Opts = Opts::parse();
    let config = Config::open(opts.config)?;

    debug!("config: {config:?}");

    let db = database::establish_connection(config.database_url()?).await?;

    let user_repo = UserRepositoryImpl::new(db.clone());
    user_repo.create_indexes().await?;
    let user_repo: Arc<dyn UserRepository> = Arc::new(user_repo);
    let user_svc = UserService::new(user_repo);

    let movie_repo = MovieRepositoryImpl::new(db.clone());
    movie_repo.create_indexes().await?;
    let movie_repo: Arc<dyn MovieRepository> = Arc::new(movie_repo);
    let movie_svc = MovieService::new(movie_repo);

    let mut server_builder = ServerBuilder::new()
        .with_user_svc(user_svc)
        .with_movie_svc(movie_svc)
        .with_environment(config.environment)
        .with_body_limit(config.body_limit);

    if config.enable_graphiql {
        server_builder = server_builder.enable_graphiql();
    }

    let res = server_builder
        .build()?
        .serve(([0, 0, 0, 0], config.port), shutdown_signal())
        .await;

    match &res {
        Ok(()) => info!("server shutdown"),
        Err(e) => error!("server error: {e}"),
    }

    info!("closing database...");
    db.close().await;

    res
}
