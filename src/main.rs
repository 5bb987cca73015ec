mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use actix_web::{App, HttpServer, web};
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::services::clock::{Clock, SystemClock};
use crate::services::notifier::{LogNotifier, MailTemplate, Notifier, SmtpNotifier};
use crate::services::token_issuer::TokenIssuer;
use crate::services::token_store::{SeaOrmTokenStore, TokenStore};
use crate::services::token_sweeper::spawn_sweeper;
use crate::services::token_validator::TokenValidator;
use crate::utils::jwt::JwtSecret;

#[cfg(not(test))]
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    tracing::info!("🔌 Connecting to database...");
    let db = db::establish_connection(&config.database_url)
        .await
        .map_err(io::Error::other)?;
    db::create_tables(&db).await.map_err(io::Error::other)?;
    tracing::info!("✅ Database connected!");

    // Un seul handle BD, injecté dans le store
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: Arc<dyn TokenStore> = Arc::new(SeaOrmTokenStore::new(db.clone()));

    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => Arc::new(
            SmtpNotifier::new(smtp).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?,
        ),
        None => {
            tracing::warn!("⚠️  SMTP_HOST not set, emails will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let issuer = web::Data::new(TokenIssuer::new(
        store.clone(),
        notifier,
        clock.clone(),
        MailTemplate::new(config.mail_company.clone()),
    ));
    let validator = web::Data::new(TokenValidator::new(store.clone(), clock.clone()));
    let secret = web::Data::new(JwtSecret::new(config.jwt_secret.clone()));
    let db_data = web::Data::new(db.clone());

    let sweeper = config.purge.map(|purge| {
        tracing::info!(interval = ?purge.interval, retention = ?purge.retention, "token sweeper enabled");
        spawn_sweeper(store.clone(), clock.clone(), purge)
    });

    tracing::info!("🚀 Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(db_data.clone())
            .app_data(issuer.clone())
            .app_data(validator.clone())
            .app_data(secret.clone())
            .configure(routes::configure_routes)
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    // Arrêt : stopper le sweeper puis fermer la connexion
    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    db.close().await.map_err(io::Error::other)?;
    tracing::info!("👋 Server stopped");

    Ok(())
}
