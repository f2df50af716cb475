//! Authorization for the catalog
//!
//! Provides context-based authorization:
//! - [`AuthContext`] says who is calling (a user or nobody)
//! - [`AuthPolicy`] says who may call
//! - [`AccessGate`] maps each resource/operation pair to its policy
//! - [`AuthProvider`] turns request headers into an [`AuthContext`]

use crate::core::error::{AuthError, CatalogError, Result};
use crate::core::service::AccountService;
use crate::core::token::TokenService;
use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use std::sync::Arc;
use uuid::Uuid;

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Caller presented a valid token for an existing user
    User { user_id: Uuid },

    /// No credentials were presented
    Anonymous,
}

impl AuthContext {
    /// Get user_id if available
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthContext::User { user_id } => Some(*user_id),
            AuthContext::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::User { .. })
    }

    /// The caller's id, or `NotAuthenticated` for anonymous callers
    pub fn require_user(&self) -> std::result::Result<Uuid, AuthError> {
        self.user_id().ok_or(AuthError::NotAuthenticated)
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Public access (no auth required)
    Public,

    /// Any authenticated user
    Authenticated,

    /// Only the user owning the resource
    Owner(Uuid),

    /// Combination of policies (AND)
    And(Vec<AuthPolicy>),

    /// Combination of policies (OR)
    Or(Vec<AuthPolicy>),
}

impl AuthPolicy {
    /// Check if auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Public => true,

            AuthPolicy::Authenticated => context.is_authenticated(),

            AuthPolicy::Owner(owner_id) => context.user_id() == Some(*owner_id),

            AuthPolicy::And(policies) => policies.iter().all(|p| p.check(context)),

            AuthPolicy::Or(policies) => policies.iter().any(|p| p.check(context)),
        }
    }
}

/// Protected resource families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Author,
    Course,
    Comment,
    Profile,
}

/// Operation attempted on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn is_read(self) -> bool {
        matches!(self, Operation::List | Operation::Read)
    }
}

/// Per-endpoint access rules
///
/// | resource        | read            | write                         |
/// |-----------------|-----------------|-------------------------------|
/// | author, course  | public          | authenticated                 |
/// | comment         | authenticated   | create: authenticated; update/delete: owner |
/// | profile         | authenticated   | owner                         |
pub struct AccessGate;

impl AccessGate {
    /// Policy for `operation` on `resource`, given the owner when one exists
    pub fn policy(resource: Resource, operation: Operation, owner: Option<Uuid>) -> AuthPolicy {
        match (resource, operation) {
            (Resource::Author | Resource::Course, op) if op.is_read() => AuthPolicy::Public,
            (Resource::Author | Resource::Course, _) => AuthPolicy::Authenticated,

            (Resource::Comment, Operation::Update | Operation::Delete)
            | (Resource::Profile, Operation::Update | Operation::Delete) => match owner {
                Some(owner_id) => {
                    AuthPolicy::And(vec![AuthPolicy::Authenticated, AuthPolicy::Owner(owner_id)])
                }
                None => AuthPolicy::Authenticated,
            },

            (Resource::Comment | Resource::Profile, _) => AuthPolicy::Authenticated,
        }
    }

    /// Evaluate the policy for this request
    ///
    /// Anonymous callers that fail get `NotAuthenticated`; authenticated
    /// callers that fail get `Forbidden`.
    pub fn authorize(
        context: &AuthContext,
        resource: Resource,
        operation: Operation,
        owner: Option<Uuid>,
    ) -> Result<()> {
        if Self::policy(resource, operation, owner).check(context) {
            return Ok(());
        }

        match context {
            AuthContext::Anonymous => Err(AuthError::NotAuthenticated.into()),
            AuthContext::User { user_id } => {
                tracing::warn!(
                    user_id = %user_id,
                    resource = ?resource,
                    operation = ?operation,
                    "ownership check rejected"
                );
                Err(AuthError::forbidden(forbidden_message(resource, operation)).into())
            }
        }
    }
}

fn forbidden_message(resource: Resource, operation: Operation) -> String {
    let noun = match resource {
        Resource::Author => "author",
        Resource::Course => "course",
        Resource::Comment => "comment",
        Resource::Profile => "profile",
    };
    let verb = match operation {
        Operation::List | Operation::Read => "view",
        Operation::Create => "create",
        Operation::Update => "edit",
        Operation::Delete => "delete",
    };
    format!("You do not have permission to {} this {}.", verb, noun)
}

/// Trait for auth providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Extract auth context from request headers
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext>;
}

/// Bearer-token provider backed by the token service and the user store
pub struct JwtAuthProvider {
    tokens: TokenService,
    accounts: Arc<dyn AccountService>,
}

impl JwtAuthProvider {
    pub fn new(tokens: TokenService, accounts: Arc<dyn AccountService>) -> Self {
        Self { tokens, accounts }
    }
}

#[async_trait]
impl AuthProvider for JwtAuthProvider {
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext> {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return Ok(AuthContext::Anonymous);
        };

        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidToken)?;

        let user_id = self.tokens.validate(token)?;

        // A token can outlive its user.
        match self.accounts.user(&user_id).await? {
            Some(_) => Ok(AuthContext::User { user_id }),
            None => {
                tracing::debug!(user_id = %user_id, "token subject no longer exists");
                Err(CatalogError::Auth(AuthError::InvalidToken))
            }
        }
    }
}

/// Provider that treats every request as anonymous
pub struct NoAuthProvider;

#[async_trait]
impl AuthProvider for NoAuthProvider {
    async fn extract_context(&self, _headers: &HeaderMap) -> Result<AuthContext> {
        Ok(AuthContext::Anonymous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthContext {
        AuthContext::User {
            user_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_policy_check() {
        let user_context = user();
        assert!(AuthPolicy::Authenticated.check(&user_context));
        assert!(!AuthPolicy::Owner(Uuid::new_v4()).check(&user_context));

        let anon_context = AuthContext::Anonymous;
        assert!(AuthPolicy::Public.check(&anon_context));
        assert!(!AuthPolicy::Authenticated.check(&anon_context));
    }

    #[test]
    fn test_owner_policy_matches_user_id() {
        let ctx = user();
        let owner = ctx.user_id().unwrap();
        assert!(AuthPolicy::Owner(owner).check(&ctx));
        assert!(!AuthPolicy::Owner(owner).check(&AuthContext::Anonymous));
    }

    #[test]
    fn test_policy_combinators() {
        let ctx = user();
        let owner = ctx.user_id().unwrap();

        let both = AuthPolicy::And(vec![AuthPolicy::Authenticated, AuthPolicy::Owner(owner)]);
        assert!(both.check(&ctx));

        let one_fails =
            AuthPolicy::And(vec![AuthPolicy::Authenticated, AuthPolicy::Owner(Uuid::new_v4())]);
        assert!(!one_fails.check(&ctx));

        let either = AuthPolicy::Or(vec![AuthPolicy::Owner(Uuid::new_v4()), AuthPolicy::Public]);
        assert!(either.check(&AuthContext::Anonymous));
    }

    #[test]
    fn test_catalog_reads_are_public_writes_are_not() {
        for resource in [Resource::Author, Resource::Course] {
            assert!(AccessGate::authorize(&AuthContext::Anonymous, resource, Operation::List, None).is_ok());
            assert!(AccessGate::authorize(&AuthContext::Anonymous, resource, Operation::Read, None).is_ok());

            let err = AccessGate::authorize(&AuthContext::Anonymous, resource, Operation::Create, None)
                .unwrap_err();
            assert!(matches!(err, CatalogError::Auth(AuthError::NotAuthenticated)));

            assert!(AccessGate::authorize(&user(), resource, Operation::Delete, None).is_ok());
        }
    }

    #[test]
    fn test_comments_require_authentication_even_to_read() {
        let err = AccessGate::authorize(&AuthContext::Anonymous, Resource::Comment, Operation::List, None)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Auth(AuthError::NotAuthenticated)));
        assert!(AccessGate::authorize(&user(), Resource::Comment, Operation::Read, None).is_ok());
    }

    #[test]
    fn test_comment_delete_requires_owner() {
        let owner = user();
        let owner_id = owner.user_id();

        assert!(AccessGate::authorize(&owner, Resource::Comment, Operation::Delete, owner_id).is_ok());

        let err = AccessGate::authorize(&user(), Resource::Comment, Operation::Delete, owner_id)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Auth(AuthError::Forbidden { .. })));
        assert_eq!(err.to_string(), "You do not have permission to delete this comment.");
    }

    #[test]
    fn test_require_user() {
        assert!(user().require_user().is_ok());
        assert!(matches!(
            AuthContext::Anonymous.require_user(),
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_no_auth_provider_is_anonymous() {
        let ctx = NoAuthProvider
            .extract_context(&HeaderMap::new())
            .await
            .unwrap();
        assert_eq!(ctx, AuthContext::Anonymous);
    }
}
