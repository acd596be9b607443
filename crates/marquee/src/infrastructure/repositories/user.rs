use async_trait::async_trait;
use bson::{doc, oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use serde::{Deserialize, Serialize};

use super::duplicate_key_field;
use crate::{
    domain::{
        entities::user::{User, UserChanges},
        repositories::user::{UserRepository, UserRepositoryError},
    },
    infrastructure::database::Database,
};

pub const COLLECTION: &str = "users";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    email: String,
    username: String,
    password: String,
    #[serde(default)]
    is_admin: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    updated_at: DateTime<Utc>,
}

impl From<User> for UserDocument {
    fn from(val: User) -> Self {
        Self {
            id: val.id,
            email: val.email,
            username: val.username,
            password: val.password,
            is_admin: val.is_admin,
            created_at: val.created_at,
            updated_at: val.updated_at,
        }
    }
}

impl From<UserDocument> for User {
    fn from(val: UserDocument) -> Self {
        Self {
            id: val.id,
            email: val.email,
            username: val.username,
            password: val.password,
            is_admin: val.is_admin,
            created_at: val.created_at,
            updated_at: val.updated_at,
        }
    }
}

fn write_error(err: mongodb::error::Error, email: &str, username: &str) -> UserRepositoryError {
    match duplicate_key_field(&err) {
        Some(field) => {
            let value = match field.as_str() {
                "email" => email,
                "username" => username,
                _ => "",
            };
            UserRepositoryError::DuplicateKey {
                value: value.to_string(),
                field,
            }
        }
        None => err.into(),
    }
}

#[derive(Clone)]
pub struct UserRepositoryImpl {
    db: Database,
}

impl UserRepositoryImpl {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<UserDocument> {
        self.db.collection(COLLECTION)
    }

    /// Unique indexes on `email` and `username`.
    pub async fn create_indexes(&self) -> Result<(), UserRepositoryError> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.collection()
            .create_indexes([
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique())
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(unique())
                    .build(),
            ])
            .await?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn insert_user(&self, user: User) -> Result<User, UserRepositoryError> {
        let document = UserDocument::from(user);

        self.collection()
            .insert_one(&document)
            .await
            .map_err(|e| write_error(e, &document.email, &document.username))?;

        Ok(document.into())
    }

    async fn get_users(&self) -> Result<Vec<User>, UserRepositoryError> {
        let users = self
            .collection()
            .find(doc! {})
            .await?
            .try_collect::<Vec<_>>()
            .await?
            .into_iter()
            .map(User::from)
            .collect();

        Ok(users)
    }

    async fn get_user_by_id(&self, id: ObjectId) -> Result<Option<User>, UserRepositoryError> {
        let user = self.collection().find_one(doc! { "_id": id }).await?;

        Ok(user.map(User::from))
    }

    async fn update_user(
        &self,
        id: ObjectId,
        changes: UserChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserRepositoryError> {
        let update = doc! {
            "$set": {
                "email": changes.email.as_str(),
                "username": changes.username.as_str(),
                "password": changes.password.as_str(),
                "isAdmin": changes.is_admin,
                "updatedAt": bson::DateTime::from_chrono(updated_at),
            }
        };

        let user = self
            .collection()
            .find_one_and_update(doc! { "_id": id }, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| write_error(e, &changes.email, &changes.username))?;

        Ok(user.map(User::from))
    }

    async fn delete_user(&self, id: ObjectId) -> Result<Option<User>, UserRepositoryError> {
        let user = self
            .collection()
            .find_one_and_delete(doc! { "_id": id })
            .await?;

        Ok(user.map(User::from))
    }
}
