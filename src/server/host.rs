//! Server host: the shared state every handler receives
//!
//! The host holds trait objects only, so handlers never know which storage
//! backend is behind them.

use crate::config::AppConfig;
use crate::core::error::ConfigError;
use crate::core::auth::{AuthProvider, JwtAuthProvider};
use crate::core::password::PasswordPolicy;
use crate::core::service::{AccountService, CourseQuery, DataService, GraphReader};
use crate::core::token::TokenService;
use crate::entities::account::User;
use crate::entities::author::Author;
use crate::entities::comment::Comment;
use crate::entities::course::Course;
use crate::serialization::Renderer;
use crate::storage::CatalogStore;
use axum::extract::FromRef;
use std::sync::Arc;

/// Service handles backed by one storage backend
#[derive(Clone)]
pub struct Services {
    pub authors: Arc<dyn DataService<Author>>,
    pub courses: Arc<dyn DataService<Course>>,
    pub comments: Arc<dyn DataService<Comment>>,
    pub users: Arc<dyn DataService<User>>,
    pub course_query: Arc<dyn CourseQuery>,
    pub graph: Arc<dyn GraphReader>,
    pub accounts: Arc<dyn AccountService>,
}

impl Services {
    /// Expose every service of a single store
    pub fn from_store<S: CatalogStore>(store: S) -> Self {
        let store = Arc::new(store);
        Self {
            authors: store.clone(),
            courses: store.clone(),
            comments: store.clone(),
            users: store.clone(),
            course_query: store.clone(),
            graph: store.clone(),
            accounts: store,
        }
    }
}

/// Host context containing all application state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::new(Services::from_store(InMemoryStore::new()), &config)?;
/// let app = Router::new()
///     .route("/authors", get(list_authors))
///     .with_state(host);
/// ```
#[derive(Clone)]
pub struct ServerHost {
    pub authors: Arc<dyn DataService<Author>>,
    pub courses: Arc<dyn DataService<Course>>,
    pub comments: Arc<dyn DataService<Comment>>,
    pub users: Arc<dyn DataService<User>>,
    pub course_query: Arc<dyn CourseQuery>,
    pub graph: Arc<dyn GraphReader>,
    pub accounts: Arc<dyn AccountService>,

    /// Builds populated/flat response views
    pub renderer: Renderer,

    /// Issues session tokens at login
    pub tokens: TokenService,

    /// Resolves bearer tokens into callers
    pub auth: Arc<dyn AuthProvider>,

    pub password_policy: Arc<PasswordPolicy>,
}

impl ServerHost {
    pub fn new(services: Services, config: &AppConfig) -> Result<Self, ConfigError> {
        let tokens = TokenService::from_config(&config.auth)?;
        let auth = Arc::new(JwtAuthProvider::new(tokens.clone(), services.accounts.clone()));

        Ok(Self {
            authors: services.authors,
            courses: services.courses,
            comments: services.comments,
            users: services.users,
            course_query: services.course_query,
            accounts: services.accounts,
            renderer: Renderer::new(services.graph.clone()),
            graph: services.graph,
            tokens,
            auth,
            password_policy: Arc::new(PasswordPolicy::from_config(&config.password)),
        })
    }
}

impl FromRef<ServerHost> for Arc<dyn AuthProvider> {
    fn from_ref(host: &ServerHost) -> Self {
        host.auth.clone()
    }
}
