mod auth;

pub use auth::{current_role, landing_for, AuthUser};
