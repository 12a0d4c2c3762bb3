//! Caller role resolution.
//!
//! The operator is the identity fixed at genesis; everyone else is classified
//! from their member record. A validator whose approval was withdrawn (for
//! example by a block) is no longer treated as a validator.

use vetmint_registry::UserRegistry;
use vetmint_types::{CallerId, Role};

/// Minimum standing an operation demands of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any member record, approved or not.
    Registered,
    /// An approved member, validator or the operator.
    Approved,
    /// Same standing as `Approved`, but a caller without a record is told
    /// it is not approved rather than not registered.
    Vetted,
    /// A validator or the operator.
    Validator,
    /// The operator only.
    Operator,
}

/// Why a caller was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("You are not an owner.")]
    NotOperator,

    #[error("You are not a validator.")]
    NotValidator,

    #[error("You are still not approved.")]
    NotApproved,

    #[error("You are still not registered.")]
    NotRegistered,
}

/// Resolve the role of `caller`.
pub fn classify(caller: &CallerId, operator: &CallerId, registry: &UserRegistry) -> Role {
    if caller == operator {
        return Role::Operator;
    }
    match registry.get(caller) {
        None => Role::Unregistered,
        Some(member) if member.is_validator && member.is_approved => Role::Validator,
        Some(member) if member.is_approved => Role::ApprovedMember,
        Some(_) => Role::UnapprovedMember,
    }
}

/// Check a resolved role against a requirement.
pub fn authorize(role: Role, requirement: Requirement) -> Result<(), AccessDenied> {
    match requirement {
        Requirement::Operator => match role {
            Role::Operator => Ok(()),
            Role::Validator
            | Role::ApprovedMember
            | Role::UnapprovedMember
            | Role::Unregistered => Err(AccessDenied::NotOperator),
        },
        Requirement::Validator => match role {
            Role::Operator | Role::Validator => Ok(()),
            Role::ApprovedMember | Role::UnapprovedMember | Role::Unregistered => {
                Err(AccessDenied::NotValidator)
            }
        },
        Requirement::Approved => match role {
            Role::Operator | Role::Validator | Role::ApprovedMember => Ok(()),
            Role::UnapprovedMember => Err(AccessDenied::NotApproved),
            Role::Unregistered => Err(AccessDenied::NotRegistered),
        },
        Requirement::Vetted => match role {
            Role::Operator | Role::Validator | Role::ApprovedMember => Ok(()),
            Role::UnapprovedMember | Role::Unregistered => Err(AccessDenied::NotApproved),
        },
        Requirement::Registered => match role {
            Role::Operator | Role::Validator | Role::ApprovedMember | Role::UnapprovedMember => {
                Ok(())
            }
            Role::Unregistered => Err(AccessDenied::NotRegistered),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_677_672_000;

    fn id(n: u8) -> CallerId {
        CallerId::from_bytes([n; 20])
    }

    fn registry() -> UserRegistry {
        let mut registry = UserRegistry::new();
        registry.register(id(1), "admin", 1, T0).expect("admin");
        registry.register(id(2), "second", 2, T0).expect("second");
        registry.register(id(3), "third", 3, T0).expect("third");
        registry.register(id(4), "forth", 2, T0).expect("forth");
        registry.add_validator(&id(2)).expect("validator");
        registry.approve(&id(3)).expect("approve");
        registry
    }

    #[test]
    fn test_classify_each_tier() {
        let registry = registry();
        assert_eq!(classify(&id(1), &id(1), &registry), Role::Operator);
        assert_eq!(classify(&id(2), &id(1), &registry), Role::Validator);
        assert_eq!(classify(&id(3), &id(1), &registry), Role::ApprovedMember);
        assert_eq!(classify(&id(4), &id(1), &registry), Role::UnapprovedMember);
        assert_eq!(classify(&id(5), &id(1), &registry), Role::Unregistered);
    }

    #[test]
    fn test_blocked_validator_loses_standing() {
        let mut registry = registry();
        registry
            .block(&id(2), "spamming the gallery")
            .expect("block");
        assert_eq!(classify(&id(2), &id(1), &registry), Role::UnapprovedMember);
    }

    #[test]
    fn test_operator_requirement() {
        assert!(authorize(Role::Operator, Requirement::Operator).is_ok());
        for role in [
            Role::Validator,
            Role::ApprovedMember,
            Role::UnapprovedMember,
            Role::Unregistered,
        ] {
            assert_eq!(
                authorize(role, Requirement::Operator),
                Err(AccessDenied::NotOperator)
            );
        }
    }

    #[test]
    fn test_validator_requirement() {
        assert!(authorize(Role::Operator, Requirement::Validator).is_ok());
        assert!(authorize(Role::Validator, Requirement::Validator).is_ok());
        assert_eq!(
            authorize(Role::ApprovedMember, Requirement::Validator),
            Err(AccessDenied::NotValidator)
        );
        assert_eq!(
            authorize(Role::Unregistered, Requirement::Validator),
            Err(AccessDenied::NotValidator)
        );
    }

    #[test]
    fn test_approved_requirement_messages() {
        assert!(authorize(Role::ApprovedMember, Requirement::Approved).is_ok());
        assert_eq!(
            authorize(Role::UnapprovedMember, Requirement::Approved),
            Err(AccessDenied::NotApproved)
        );
        assert_eq!(
            authorize(Role::Unregistered, Requirement::Approved),
            Err(AccessDenied::NotRegistered)
        );
        assert_eq!(
            AccessDenied::NotRegistered.to_string(),
            "You are still not registered."
        );
    }

    #[test]
    fn test_vetted_requirement_never_mentions_registration() {
        for role in [Role::Operator, Role::Validator, Role::ApprovedMember] {
            assert!(authorize(role, Requirement::Vetted).is_ok());
        }
        for role in [Role::UnapprovedMember, Role::Unregistered] {
            assert_eq!(
                authorize(role, Requirement::Vetted),
                Err(AccessDenied::NotApproved)
            );
        }
    }

    #[test]
    fn test_registered_requirement() {
        assert!(authorize(Role::UnapprovedMember, Requirement::Registered).is_ok());
        assert_eq!(
            authorize(Role::Unregistered, Requirement::Registered),
            Err(AccessDenied::NotRegistered)
        );
    }
}
