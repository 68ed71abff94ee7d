//! Capability gate: pure predicates deciding what a principal may do.
//!
//! Every rule goes through [`with_superuser_override`], so the superuser
//! escape hatch applies uniformly and a new endpoint cannot forget it.

use crate::error::AppError;
use crate::models::{Principal, Role};

/// Roles allowed to read the roster.
pub const ROSTER_READERS: &[Role] = &[Role::Elder, Role::Servant];

/// Roles allowed to read notifications.
pub const ACTIVE_ROLES: &[Role] = &[Role::Elder, Role::Servant, Role::Publisher];

/// A denied capability check, carrying the specific reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    RoleMismatch { required: Role, actual: Role },
    RoleNotAllowed { allowed: &'static [Role], actual: Role },
    NotSuperuser,
}

impl Denial {
    pub fn reason(&self) -> String {
        match self {
            Denial::RoleMismatch { required, actual } => {
                format!("requires the {} role, caller holds {}", required, actual)
            }
            Denial::RoleNotAllowed { allowed, actual } => {
                let names: Vec<&str> = allowed.iter().map(Role::as_str).collect();
                format!(
                    "requires one of the roles [{}], caller holds {}",
                    names.join(", "),
                    actual
                )
            }
            Denial::NotSuperuser => "superuser access required".to_string(),
        }
    }
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        AppError::Forbidden(denial.reason())
    }
}

fn with_superuser_override<F>(principal: &Principal, rule: F) -> Result<(), Denial>
where
    F: FnOnce(&Principal) -> Result<(), Denial>,
{
    if principal.is_superuser {
        return Ok(());
    }
    rule(principal)
}

/// Allow iff the principal holds exactly `required` (or is a superuser).
/// Roster mutation wants one specific accountable role.
pub fn require_exact_role(principal: &Principal, required: Role) -> Result<(), Denial> {
    with_superuser_override(principal, |p| {
        if p.role == required {
            Ok(())
        } else {
            Err(Denial::RoleMismatch {
                required,
                actual: p.role,
            })
        }
    })
}

/// Allow iff the principal's role is in `allowed` (or is a superuser).
/// Read access is shared across a set of roles.
pub fn require_any_of(principal: &Principal, allowed: &'static [Role]) -> Result<(), Denial> {
    with_superuser_override(principal, |p| {
        if allowed.contains(&p.role) {
            Ok(())
        } else {
            Err(Denial::RoleNotAllowed {
                allowed,
                actual: p.role,
            })
        }
    })
}

/// Allow only superusers, regardless of role.
pub fn require_superuser(principal: &Principal) -> Result<(), Denial> {
    with_superuser_override(principal, |_| Err(Denial::NotSuperuser))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 4] = [Role::Pending, Role::Publisher, Role::Servant, Role::Elder];

    fn principal(role: Role, is_superuser: bool) -> Principal {
        Principal {
            id: "p1".to_string(),
            email: "p1@example.com".to_string(),
            name: "Test Principal".to_string(),
            role,
            is_superuser,
            assigned_group: None,
        }
    }

    #[test]
    fn exact_role_allows_only_the_required_role() {
        for role in ALL_ROLES {
            let outcome = require_exact_role(&principal(role, false), Role::Elder);
            if role == Role::Elder {
                assert_eq!(outcome, Ok(()));
            } else {
                assert_eq!(
                    outcome,
                    Err(Denial::RoleMismatch {
                        required: Role::Elder,
                        actual: role
                    })
                );
            }
        }
    }

    #[test]
    fn roster_read_allows_elder_and_servant_only() {
        for role in ALL_ROLES {
            let outcome = require_any_of(&principal(role, false), ROSTER_READERS);
            assert_eq!(outcome.is_ok(), matches!(role, Role::Elder | Role::Servant));
        }
    }

    #[test]
    fn notification_read_allows_every_active_role() {
        for role in ALL_ROLES {
            let outcome = require_any_of(&principal(role, false), ACTIVE_ROLES);
            assert_eq!(outcome.is_ok(), role != Role::Pending);
        }
    }

    #[test]
    fn superuser_check_denies_every_plain_role() {
        for role in ALL_ROLES {
            assert_eq!(
                require_superuser(&principal(role, false)),
                Err(Denial::NotSuperuser)
            );
        }
    }

    #[test]
    fn superuser_flag_overrides_every_rule_for_every_role() {
        for role in ALL_ROLES {
            let p = principal(role, true);
            assert_eq!(require_exact_role(&p, Role::Elder), Ok(()));
            assert_eq!(require_any_of(&p, ROSTER_READERS), Ok(()));
            assert_eq!(require_any_of(&p, ACTIVE_ROLES), Ok(()));
            assert_eq!(require_superuser(&p), Ok(()));
        }
    }

    #[test]
    fn denial_reasons_distinguish_role_mismatch_from_missing_superuser() {
        let p = principal(Role::Publisher, false);

        let mismatch = require_exact_role(&p, Role::Elder).unwrap_err();
        assert!(mismatch.reason().contains("elder"));
        assert!(mismatch.reason().contains("publisher"));

        let not_superuser = require_superuser(&p).unwrap_err();
        assert!(not_superuser.reason().contains("superuser"));
    }
}
