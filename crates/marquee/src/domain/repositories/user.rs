use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::entities::user::{User, UserChanges};

#[derive(Debug, Error)]
pub enum UserRepositoryError {
    #[error("E11000 duplicate key error collection: users index: {field}_1 dup key: {{ {field}: \"{value}\" }}")]
    DuplicateKey { field: String, value: String },
    #[error("database return error: {0}")]
    DbError(#[from] mongodb::error::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: User) -> Result<User, UserRepositoryError>;

    async fn get_users(&self) -> Result<Vec<User>, UserRepositoryError>;

    async fn get_user_by_id(&self, id: ObjectId) -> Result<Option<User>, UserRepositoryError>;

    async fn update_user(
        &self,
        id: ObjectId,
        changes: UserChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserRepositoryError>;

    async fn delete_user(&self, id: ObjectId) -> Result<Option<User>, UserRepositoryError>;
}

#[async_trait]
impl<T> UserRepository for Arc<T>
where
    T: UserRepository + ?Sized,
{
    async fn insert_user(&self, user: User) -> Result<User, UserRepositoryError> {
        (**self).insert_user(user).await
    }

    async fn get_users(&self) -> Result<Vec<User>, UserRepositoryError> {
        (**self).get_users().await
    }

    async fn get_user_by_id(&self, id: ObjectId) -> Result<Option<User>, UserRepositoryError> {
        (**self).get_user_by_id(id).await
    }

    async fn update_user(
        &self,
        id: ObjectId,
        changes: UserChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserRepositoryError> {
        (**self).update_user(id, changes, updated_at).await
    }

    async fn delete_user(&self, id: ObjectId) -> Result<Option<User>, UserRepositoryError> {
        (**self).delete_user(id).await
    }
}
