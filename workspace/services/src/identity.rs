use model::entities::user;
use serde::{Deserialize, Serialize};

pub use model::entities::user::Role;

/// The authenticated identity kept in a browser session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&user::Model> for Identity {
    fn from(user: &user::Model) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
