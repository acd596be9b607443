use bson::oid::ObjectId;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ObjectId,
    pub email: String,
    pub username: String,
    /// bcrypt hash for records created through `addUser`
    pub password: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: ObjectId::new(),
            email: "".to_string(),
            username: "".to_string(),
            password: "".to_string(),
            is_admin: false,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub is_admin: bool,
}

/// Replacement values for every mutable field of a user.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub email: String,
    pub username: String,
    pub password: String,
    pub is_admin: bool,
}
