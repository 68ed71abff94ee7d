//! Gate extractors: each wraps a capability-gate predicate so the check
//! runs before any request body is read. An unauthorized caller learns
//! nothing about validation or existence.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::authz;
use crate::error::AppError;
use crate::middleware::auth::principal_from_parts;
use crate::models::{Principal, Role};

/// Principal allowed to mutate the roster (exact elder role).
pub struct RosterEditor(pub Principal);

/// Principal allowed to read the roster (elder or servant).
pub struct RosterViewer(pub Principal);

/// Principal allowed to read notifications (any active role).
pub struct NotificationViewer(pub Principal);

/// Principal with the superuser override set.
pub struct Superuser(pub Principal);

macro_rules! gate_extractor {
    ($name:ident, $check:expr) => {
        #[axum::async_trait]
        impl<S> FromRequestParts<S> for $name
        where
            S: Send + Sync,
        {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                _state: &S,
            ) -> Result<Self, Self::Rejection> {
                let principal = principal_from_parts(parts)?;
                let check: fn(&Principal) -> Result<(), authz::Denial> = $check;
                check(&principal)?;
                Ok($name(principal))
            }
        }
    };
}

gate_extractor!(RosterEditor, |p| authz::require_exact_role(p, Role::Elder));
gate_extractor!(RosterViewer, |p| authz::require_any_of(
    p,
    authz::ROSTER_READERS
));
gate_extractor!(NotificationViewer, |p| authz::require_any_of(
    p,
    authz::ACTIVE_ROLES
));
gate_extractor!(Superuser, |p| authz::require_superuser(p));
