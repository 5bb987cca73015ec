// connexion BD + création des tables au démarrage

use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

use crate::models::{tokens, users};

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Crée les tables users et tokens si elles n'existent pas encore
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    tracing::info!("Creating/verifying tables...");

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut users_table = schema.create_table_from_entity(users::Entity);
    users_table.if_not_exists();
    db.execute(backend.build(&users_table)).await?;

    let mut tokens_table = schema.create_table_from_entity(tokens::Entity);
    tokens_table.if_not_exists();
    db.execute(backend.build(&tokens_table)).await?;

    // Recherche par code à chaque validation
    let code_index = Index::create()
        .if_not_exists()
        .name("idx_tokens_code")
        .table(tokens::Entity)
        .col(tokens::Column::Code)
        .to_owned();
    db.execute(backend.build(&code_index)).await?;

    tracing::info!("Tables 'users' and 'tokens' ready");
    Ok(())
}
