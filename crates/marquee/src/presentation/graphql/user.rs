use super::{common::iso8601, schema::UserSvc};
use crate::domain::entities::user::{NewUser, UserChanges};
use async_graphql::{Context, Object, Result, SimpleObject, ID};

#[derive(Debug, SimpleObject)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub username: String,
    /// Stored password value, a bcrypt hash for users created with `addUser`
    pub password: String,
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<crate::domain::entities::user::User> for User {
    fn from(val: crate::domain::entities::user::User) -> Self {
        Self {
            id: ID(val.id.to_hex()),
            email: val.email,
            username: val.username,
            password: val.password,
            is_admin: val.is_admin,
            created_at: iso8601(&val.created_at),
            updated_at: iso8601(&val.updated_at),
        }
    }
}

#[derive(Default)]
pub struct UserRoot;

#[Object]
impl UserRoot {
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let users = ctx
            .data::<UserSvc>()?
            .fetch_all_users()
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(users)
    }

    /// Fails when no user has this id.
    async fn user(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "user id")] id: String,
    ) -> Result<Option<User>> {
        let user = ctx.data::<UserSvc>()?.fetch_user_by_id(&id).await?;

        Ok(Some(user.into()))
    }
}

#[derive(Default)]
pub struct UserMutationRoot;

#[Object]
impl UserMutationRoot {
    async fn add_user(
        &self,
        ctx: &Context<'_>,
        email: String,
        username: String,
        #[graphql(secret)] password: String,
        is_admin: bool,
    ) -> Result<User> {
        let user = ctx
            .data::<UserSvc>()?
            .create_user(NewUser {
                email,
                username,
                password,
                is_admin,
            })
            .await?;

        Ok(user.into())
    }

    /// The password is stored as given, without hashing.
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "user id")] id: String,
        email: String,
        username: String,
        #[graphql(secret)] password: String,
        is_admin: bool,
    ) -> Result<Option<User>> {
        let user = ctx
            .data::<UserSvc>()?
            .update_user(
                &id,
                UserChanges {
                    email,
                    username,
                    password,
                    is_admin,
                },
            )
            .await?;

        Ok(user.map(Into::into))
    }

    async fn delete_user(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "user id")] id: String,
    ) -> Result<Option<User>> {
        let user = ctx.data::<UserSvc>()?.delete_user(&id).await?;

        Ok(user.map(Into::into))
    }
}
