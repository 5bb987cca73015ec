use sea_orm::*;
use sea_orm::sqlx;

use crate::error::AppError;
use crate::models::users::{self, Role};

pub struct AccountService;

impl AccountService {
    /// Crée un compte staff. L'email doit être unique.
    pub async fn create_account(
        db: &DatabaseConnection,
        name: &str,
        email: &str,
        credential: &str,
        role: Role,
    ) -> Result<users::Model, AppError> {
        let email = email.trim();

        // 1. Vérifier si l'email existe déjà
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?;

        if existing.is_some() {
            tracing::warn!(%email, "email already registered");
            return Err(AppError::EmailTaken);
        }

        // 2. Créer le compte
        let new_user = users::ActiveModel {
            name: Set(name.trim().to_string()),
            email: Set(email.to_string()),
            credential: Set(credential.to_string()),
            role: Set(role),
            ..Default::default()
        };

        // Création concurrente : l'index UNIQUE tranche
        let user = new_user.insert(db).await.map_err(|e| {
            if is_unique_violation(&e) {
                tracing::warn!(%email, "email registered concurrently");
                AppError::EmailTaken
            } else {
                AppError::Storage(e)
            }
        })?;
        tracing::info!(user_id = user.id, role = ?user.role, "user created");
        Ok(user)
    }

    /// Vérifie email + credential (comparaison directe, pas de hash)
    pub async fn authenticate(
        db: &DatabaseConnection,
        email: &str,
        credential: &str,
    ) -> Result<users::Model, AppError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.trim()))
            .one(db)
            .await?;

        match user {
            Some(user) if user.credential == credential => Ok(user),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Option<users::Model>, AppError> {
        Ok(users::Entity::find_by_id(user_id).one(db).await?)
    }
}

/// Violation d'unicité Postgres (SQLSTATE `23505`)
fn is_unique_violation(err: &DbErr) -> bool {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db_err)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db_err))) => {
            db_err.code().is_some_and(|code| code.as_ref() == "23505")
        }
        _ => false,
    }
}
