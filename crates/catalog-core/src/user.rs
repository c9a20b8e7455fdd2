//! User records and queries.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::collection::{Collection, Record};

/// Access role of a user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    /// Creates a user record.
    pub fn new(id: u32, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
        }
    }
}

impl Record for User {
    #[inline]
    fn id(&self) -> u32 {
        self.id
    }
}

/// The user collection.
pub type Users = Collection<User>;

impl Collection<User> {
    /// Returns users whose role label equals `role`.
    ///
    /// The comparison is exact and case-sensitive; an unknown role is not an
    /// error and yields an empty vector.
    pub fn filter_by_role(&self, role: &str) -> Vec<&User> {
        self.filter(|user| user.role.as_ref() == role)
    }
}
