// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque table PostgreSQL est décrite avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - dto : Requêtes / réponses de l'API
//   - users : Comptes du staff (administrator / collaborator)
//   - tokens : Codes de vérification envoyés aux clients (expire 5 min)
//
// Points d'attention:
//   - Les tables sont créées au démarrage (CREATE TABLE IF NOT EXISTS),
//     voir db::create_tables
//
// ============================================================================

pub mod health;
pub mod dto;
pub mod users;
pub mod tokens;
