//! Access checks over a verified identity.

use auth::{Identity, Role};

use crate::{Error, Result};

/// Require the subject to hold exactly `role`.
pub fn require_role(identity: &Identity, role: Role) -> Result<()> {
    if identity.role == role {
        Ok(())
    } else {
        Err(Error::Forbidden(format!("{role} role required")))
    }
}

/// Require the subject to own the record outright.
///
/// Used for mutations that not even an admin may perform on someone else's
/// behalf, such as editing or withdrawing a pending request.
pub fn require_owner(identity: &Identity, owner_id: &str) -> Result<()> {
    if identity.subject_id == owner_id {
        Ok(())
    } else {
        Err(Error::Forbidden(
            "not the owner of this record".to_string(),
        ))
    }
}

/// Require the subject to own the record, or to hold `role`.
///
/// Ownership is matched on the subject id; there is no other path by which
/// one student may act on another student's record.
pub fn require_owner_or_role(identity: &Identity, owner_id: &str, role: Role) -> Result<()> {
    if identity.subject_id == owner_id || identity.role == role {
        Ok(())
    } else {
        Err(Error::Forbidden(
            "not the owner of this record".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_role_passes() {
        let admin = Identity::new("a-1", Role::Admin);
        assert!(require_role(&admin, Role::Admin).is_ok());
    }

    #[test]
    fn wrong_role_is_forbidden() {
        let student = Identity::new("s-1", Role::Student);
        assert!(matches!(
            require_role(&student, Role::Admin),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn owner_check_ignores_role() {
        let owner = Identity::new("s-1", Role::Student);
        let admin = Identity::new("a-1", Role::Admin);
        assert!(require_owner(&owner, "s-1").is_ok());
        assert!(matches!(
            require_owner(&admin, "s-1"),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn owner_passes_without_role() {
        let student = Identity::new("s-1", Role::Student);
        assert!(require_owner_or_role(&student, "s-1", Role::Admin).is_ok());
    }

    #[test]
    fn role_passes_without_ownership() {
        let admin = Identity::new("a-1", Role::Admin);
        assert!(require_owner_or_role(&admin, "s-1", Role::Admin).is_ok());
    }

    #[test]
    fn stranger_is_forbidden() {
        let other = Identity::new("s-2", Role::Student);
        assert!(matches!(
            require_owner_or_role(&other, "s-1", Role::Admin),
            Err(Error::Forbidden(_))
        ));
    }
}
