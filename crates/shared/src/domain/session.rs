use crate::model::{User, UserRole};
use serde::{Deserialize, Serialize};

/// The authenticated caller, resolved from an access token against the user table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i32,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl TryFrom<&User> for Session {
    type Error = String;

    fn try_from(user: &User) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: user.user_id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.parse()?,
        })
    }
}
