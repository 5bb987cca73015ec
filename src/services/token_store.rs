use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;

use crate::models::tokens::{self, NewToken, VerificationToken};

/// Stockage durable des tokens émis
///
/// Chaque opération est un seul accès au store (insert, lecture ou delete),
/// aucun verrou applicatif n'est nécessaire.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Ajoute un token et le renvoie avec son id
    async fn put(&self, token: NewToken) -> Result<VerificationToken, DbErr>;

    /// Token dont le code correspond et qui expire strictement après `now`.
    /// Si plusieurs tokens vivants partagent le code, le plus récent gagne
    /// (issued_at puis id décroissants).
    async fn find_valid(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationToken>, DbErr>;

    /// Supprime les tokens expirés avant `before` (expires_at <= before)
    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<u64, DbErr>;
}

/// Store PostgreSQL via SeaORM
#[cfg_attr(not(test), derive(Clone))]
pub struct SeaOrmTokenStore {
    db: DatabaseConnection,
}

impl SeaOrmTokenStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Requête de validation : code égal, non expiré, plus récent d'abord
pub fn valid_token_query(code: &str, now: DateTime<Utc>) -> Select<tokens::Entity> {
    tokens::Entity::find()
        .filter(tokens::Column::Code.eq(code))
        .filter(tokens::Column::ExpiresAt.gt(now))
        .order_by_desc(tokens::Column::IssuedAt)
        .order_by_desc(tokens::Column::Id)
}

#[async_trait]
impl TokenStore for SeaOrmTokenStore {
    async fn put(&self, token: NewToken) -> Result<VerificationToken, DbErr> {
        token.into_active_model().insert(&self.db).await
    }

    async fn find_valid(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationToken>, DbErr> {
        valid_token_query(code, now).one(&self.db).await
    }

    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = tokens::Entity::delete_many()
            .filter(tokens::Column::ExpiresAt.lte(before))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
