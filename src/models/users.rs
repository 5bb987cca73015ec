use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;

/// Rôle d'un compte : ne sert qu'à choisir la page d'accueil après validation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "administrator")]
    Administrator,
    #[default]
    #[sea_orm(string_value = "collaborator")]
    Collaborator,
}

impl Role {
    /// Page d'accueil (bouton "INÍCIO") associée au rôle
    pub fn landing_path(self) -> &'static str {
        match self {
            Role::Administrator => "/painel_administrador",
            Role::Collaborator => "/painel_colaborador",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)] // Ne jamais exposer le credential en JSON
    pub credential: String,
    pub role: Role,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
