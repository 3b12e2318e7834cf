//! Person model and roles.

use serde::{Deserialize, Serialize};

use crate::models::PersonId;

/// A role held by a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Ordinary user.
    User,
    /// Office staff; sees everyone.
    Office,
    /// Management; sees everyone.
    Boss,
    /// Head of one or more departments.
    DepartmentHead,
    /// Second approval stage for departments.
    SecondStageAuthority,
    /// Deactivated account; hidden from overviews.
    Inactive,
}

/// A person whose absences are tracked.
///
/// # Example
///
/// ```
/// use absence_engine::models::{Person, PersonId, Role};
///
/// let person = Person {
///     id: PersonId(1),
///     first_name: "Marlene".to_string(),
///     last_name: "Muster".to_string(),
///     email: "muster@example.org".to_string(),
///     roles: vec![Role::User, Role::Boss],
///     manages: vec![],
/// };
///
/// assert!(person.is_active());
/// assert!(person.sees_everyone());
/// assert_eq!(person.nice_name(), "Marlene Muster");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier for the person.
    pub id: PersonId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// E-mail address.
    #[serde(default)]
    pub email: String,
    /// Roles held by the person.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Persons whose absence details this person may see, e.g. the members
    /// of departments they head.
    #[serde(default)]
    pub manages: Vec<PersonId>,
}

impl Person {
    /// True if the person holds `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// True unless the person is deactivated.
    pub fn is_active(&self) -> bool {
        !self.has_role(Role::Inactive)
    }

    /// True for office staff and bosses, who may see every person.
    pub fn sees_everyone(&self) -> bool {
        self.has_role(Role::Boss) || self.has_role(Role::Office)
    }

    /// First and last name separated by a space.
    pub fn nice_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
