//! Authentication, roles and the acting user.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - The seven fixed organizational roles and their routing class
//! - `Actor`, the authenticated identity handed to every operation

mod password;

pub use password::{PasswordError, hash_password, validate_password_strength, verify_password};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Organizational roles.
///
/// Roles are business data, not a permission graph: endpoints check the
/// acting role against an explicit allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Secretariat admin: registers, numbers and sends letters.
    Admin,
    /// Chair of the board, the top approver who signs outgoing letters.
    KetuaPengurus,
    /// Board secretary.
    SekretarisPengurus,
    /// Board treasurer.
    BendaharaPengurus,
    /// Head of the human resources department.
    KabagPsdm,
    /// Head of the finance department.
    KabagKeuangan,
    /// Head of the general affairs department.
    KabagUmum,
}

/// How a role is treated when it receives a routed letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleClass {
    /// The signer; routing to this class always asks for a signature.
    TopApprover,
    /// The secretariat; routing to this class always sends the letter back to processing.
    Administrative,
    /// Everyone else; the next status depends on the current one.
    Reviewer,
}

impl Role {
    /// All roles.
    pub const ALL: [Self; 7] = [
        Self::Admin,
        Self::KetuaPengurus,
        Self::SekretarisPengurus,
        Self::BendaharaPengurus,
        Self::KabagPsdm,
        Self::KabagKeuangan,
        Self::KabagUmum,
    ];

    /// Every role except the top approver.
    pub const ALL_BUT_TOP: [Self; 6] = [
        Self::Admin,
        Self::SekretarisPengurus,
        Self::BendaharaPengurus,
        Self::KabagPsdm,
        Self::KabagKeuangan,
        Self::KabagUmum,
    ];

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::KetuaPengurus => "KETUA_PENGURUS",
            Self::SekretarisPengurus => "SEKRETARIS_PENGURUS",
            Self::BendaharaPengurus => "BENDAHARA_PENGURUS",
            Self::KabagPsdm => "KABAG_PSDM",
            Self::KabagKeuangan => "KABAG_KEUANGAN",
            Self::KabagUmum => "KABAG_UMUM",
        }
    }

    /// Parses a role from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL.into_iter().find(|role| role.as_str() == upper)
    }

    /// Returns the routing class of this role.
    #[must_use]
    pub const fn class(&self) -> RoleClass {
        match self {
            Self::KetuaPengurus => RoleClass::TopApprover,
            Self::Admin => RoleClass::Administrative,
            Self::SekretarisPengurus
            | Self::BendaharaPengurus
            | Self::KabagPsdm
            | Self::KabagKeuangan
            | Self::KabagUmum => RoleClass::Reviewer,
        }
    }

    /// Returns true for the three department-head (Kabag) sub-roles.
    #[must_use]
    pub const fn is_kabag(&self) -> bool {
        matches!(self, Self::KabagPsdm | Self::KabagKeuangan | Self::KabagUmum)
    }

    /// Human-readable title used in notifications.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Admin => "Admin Sekretariat",
            Self::KetuaPengurus => "Ketua Pengurus",
            Self::SekretarisPengurus => "Sekretaris Pengurus",
            Self::BendaharaPengurus => "Bendahara Pengurus",
            Self::KabagPsdm => "Kabag PSDM",
            Self::KabagKeuangan => "Kabag Keuangan",
            Self::KabagUmum => "Kabag Umum",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user performing an operation.
///
/// Resolved once per request from the bearer token and the stored user row,
/// then passed explicitly into every workflow operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User ID.
    pub id: Uuid,
    /// Stored role of the user.
    pub role: Role,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns true if the actor is the secretariat admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Returns true if the actor's role is in the allow-list.
    #[must_use]
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }

    /// Returns true if the actor owns the record or is the admin.
    #[must_use]
    pub fn owns_or_admin(&self, owner_id: Uuid) -> bool {
        self.is_admin() || self.id == owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Admin, RoleClass::Administrative)]
    #[case(Role::KetuaPengurus, RoleClass::TopApprover)]
    #[case(Role::SekretarisPengurus, RoleClass::Reviewer)]
    #[case(Role::BendaharaPengurus, RoleClass::Reviewer)]
    #[case(Role::KabagPsdm, RoleClass::Reviewer)]
    #[case(Role::KabagKeuangan, RoleClass::Reviewer)]
    #[case(Role::KabagUmum, RoleClass::Reviewer)]
    fn test_role_class(#[case] role: Role, #[case] class: RoleClass) {
        assert_eq!(role.class(), class);
    }

    #[test]
    fn test_role_parse() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("kabag_umum"), Some(Role::KabagUmum));
        assert_eq!(Role::parse("owner"), None);
    }

    #[test]
    fn test_kabag_sub_roles() {
        let kabag: Vec<_> = Role::ALL.into_iter().filter(Role::is_kabag).collect();
        assert_eq!(
            kabag,
            vec![Role::KabagPsdm, Role::KabagKeuangan, Role::KabagUmum]
        );
    }

    #[test]
    fn test_all_but_top_excludes_only_top() {
        assert!(!Role::ALL_BUT_TOP.contains(&Role::KetuaPengurus));
        assert_eq!(Role::ALL_BUT_TOP.len(), Role::ALL.len() - 1);
    }

    #[test]
    fn test_actor_permissions() {
        let owner = Uuid::new_v4();
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let kabag = Actor::new(owner, Role::KabagUmum);
        let other = Actor::new(Uuid::new_v4(), Role::SekretarisPengurus);

        assert!(admin.is_admin());
        assert!(admin.owns_or_admin(owner));
        assert!(kabag.owns_or_admin(owner));
        assert!(!other.owns_or_admin(owner));
        assert!(kabag.has_any_role(&Role::ALL_BUT_TOP));
        assert!(!Actor::new(owner, Role::KetuaPengurus).has_any_role(&Role::ALL_BUT_TOP));
    }
}
