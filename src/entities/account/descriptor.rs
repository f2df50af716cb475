//! Route descriptor for accounts

use super::handlers::{current_user, get_profile, login, register, update_profile};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{
    Router,
    routing::{get, post},
};

/// Registration, login and the caller's own user/profile
pub struct AccountDescriptor {
    host: ServerHost,
}

impl AccountDescriptor {
    pub fn new(host: ServerHost) -> Self {
        Self { host }
    }
}

impl EntityDescriptor for AccountDescriptor {
    fn entity_type(&self) -> &str {
        "account"
    }

    fn plural(&self) -> &str {
        "auth"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route("/auth/user", get(current_user))
            .route("/auth/profile", get(get_profile).put(update_profile))
            .with_state(self.host.clone())
    }
}
