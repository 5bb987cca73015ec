// ============================================================================
// MODÈLE : TOKENS (codes de vérification client)
// ============================================================================
//
// Description:
//   Modèle de la table tokens. Une ligne = un code envoyé par email à un
//   client pendant une visite ou un appel au support.
//
// Colonnes de la table tokens:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - client_name (TEXT, NOT NULL)
//   - client_email (TEXT, NOT NULL)
//   - code (TEXT, NOT NULL) - 6 chiffres, 100000..=999999
//   - issued_at (TIMESTAMPTZ, NOT NULL)
//   - expires_at (TIMESTAMPTZ, NOT NULL) - issued_at + 5 minutes
//
// Workflow:
//   1. Le collaborateur appelle POST /api/tokens/issue (nom + email du client)
//   2. Backend génère le code et l'insère dans cette table
//   3. Backend envoie l'email au client
//   4. Le client dicte le code au collaborateur
//   5. Le collaborateur appelle POST /api/tokens/validate
//   6. Backend vérifie: code existe ET expires_at > maintenant
//
// Points d'attention:
//   - Le code n'est PAS unique (deux clients peuvent recevoir le même)
//   - La validation ne consomme pas le token (pas de colonne used)
//   - Les lignes expirées restent en base sauf si le sweeper est activé
//
// ============================================================================

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub client_name: String,

    pub client_email: String,

    pub code: String,

    pub issued_at: DateTimeUtc,

    pub expires_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Token tel qu'il est manipulé par l'émetteur et le validateur
pub type VerificationToken = Model;

impl Model {
    /// Vrai tant que `now` est strictement avant `expires_at`
    pub fn is_live_at(&self, now: DateTimeUtc) -> bool {
        now < self.expires_at
    }
}

/// Données d'un token pas encore persisté (l'id est attribué par le store)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewToken {
    pub client_name: String,
    pub client_email: String,
    pub code: String,
    pub issued_at: DateTimeUtc,
    pub expires_at: DateTimeUtc,
}

impl NewToken {
    pub fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            client_name: Set(self.client_name),
            client_email: Set(self.client_email),
            code: Set(self.code),
            issued_at: Set(self.issued_at),
            expires_at: Set(self.expires_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_expiry_bound_is_exclusive() {
        let issued_at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        let token = Model {
            id: 1,
            client_name: "Ana".to_string(),
            client_email: "ana@x.com".to_string(),
            code: "482913".to_string(),
            issued_at,
            expires_at: issued_at + Duration::minutes(5),
        };

        assert!(token.is_live_at(issued_at));
        assert!(token.is_live_at(issued_at + Duration::seconds(299)));
        assert!(!token.is_live_at(issued_at + Duration::minutes(5)));
    }
}
