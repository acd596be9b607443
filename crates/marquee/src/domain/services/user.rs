use bson::oid::ObjectId;
use thiserror::Error;

use crate::{
    domain::{
        entities::{
            now,
            user::{NewUser, User, UserChanges},
        },
        repositories::user::{UserRepository, UserRepositoryError},
    },
    infrastructure::password::{self, PasswordError},
};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    UserNotFound,
    #[error("invalid user id \"{0}\"")]
    InvalidId(String),
    #[error("user validation failed: {0} is required")]
    MissingField(&'static str),
    #[error("password error: {0}")]
    Password(#[from] PasswordError),
    #[error("{0}")]
    RepositoryError(#[from] UserRepositoryError),
}

fn parse_id(id: &str) -> Result<ObjectId, UserError> {
    ObjectId::parse_str(id).map_err(|_| UserError::InvalidId(id.to_string()))
}

fn require(field: &'static str, value: &str) -> Result<(), UserError> {
    if value.is_empty() {
        return Err(UserError::MissingField(field));
    }

    Ok(())
}

#[derive(Clone)]
pub struct UserService<R>
where
    R: UserRepository,
{
    repo: R,
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_user(&self, input: NewUser) -> Result<User, UserError> {
        require("email", &input.email)?;
        require("username", &input.username)?;
        require("password", &input.password)?;

        let hash = password::hash_password(&input.password).await?;

        let created_at = now();
        let user = User {
            email: input.email,
            username: input.username,
            password: hash,
            is_admin: input.is_admin,
            created_at,
            updated_at: created_at,
            ..Default::default()
        };

        Ok(self.repo.insert_user(user).await?)
    }

    pub async fn fetch_all_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.repo.get_users().await?)
    }

    /// Unlike movies, a missing user is an error rather than `None`.
    pub async fn fetch_user_by_id(&self, id: &str) -> Result<User, UserError> {
        let id = parse_id(id)?;

        self.repo
            .get_user_by_id(id)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    /// Replaces every field in `changes`. The password is written as given and
    /// is NOT hashed, which differs from [`UserService::create_user`].
    pub async fn update_user(
        &self,
        id: &str,
        changes: UserChanges,
    ) -> Result<Option<User>, UserError> {
        let id = parse_id(id)?;

        require("email", &changes.email)?;
        require("username", &changes.username)?;
        require("password", &changes.password)?;

        Ok(self.repo.update_user(id, changes, now()).await?)
    }

    pub async fn delete_user(&self, id: &str) -> Result<Option<User>, UserError> {
        let id = parse_id(id)?;

        Ok(self.repo.delete_user(id).await?)
    }
}
