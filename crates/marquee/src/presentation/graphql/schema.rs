use std::{any::Any, sync::Arc};

use super::{
    movie::{MovieMutationRoot, MovieRoot},
    user::{UserMutationRoot, UserRoot},
};
use crate::domain::{
    repositories::{movie::MovieRepository, user::UserRepository},
    services::{movie::MovieService, user::UserService},
};

use async_graphql::{extensions::Logger, EmptySubscription, MergedObject, Schema};

pub type MarqueeSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub type UserSvc = UserService<Arc<dyn UserRepository>>;
pub type MovieSvc = MovieService<Arc<dyn MovieRepository>>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(UserRoot, MovieRoot);

#[derive(MergedObject, Default)]
pub struct MutationRoot(UserMutationRoot, MovieMutationRoot);

pub struct SchemaBuilder(async_graphql::SchemaBuilder<QueryRoot, MutationRoot, EmptySubscription>);

impl Default for SchemaBuilder {
    fn default() -> Self {
        let builder = Schema::build(
            QueryRoot::default(),
            MutationRoot::default(),
            EmptySubscription,
        )
        .extension(Logger);

        Self(builder)
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_svc(self, user_svc: UserSvc) -> Self {
        self.data(user_svc)
    }

    pub fn movie_svc(self, movie_svc: MovieSvc) -> Self {
        self.data(movie_svc)
    }

    pub fn data<D>(self, data: D) -> Self
    where
        D: Any + Send + Sync,
    {
        Self(self.0.data(data))
    }

    pub fn build(self) -> MarqueeSchema {
        self.0.finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::infrastructure::{
        password::verify_password,
        repositories::memory::{MovieRepositoryMemory, UserRepositoryMemory},
    };
    use async_graphql::{Request, Variables};
    use serde_json::{json, Value};

    fn schema() -> MarqueeSchema {
        let user_repo: Arc<dyn UserRepository> = Arc::new(UserRepositoryMemory::new());
        let movie_repo: Arc<dyn MovieRepository> = Arc::new(MovieRepositoryMemory::new());

        SchemaBuilder::new()
            .user_svc(UserService::new(user_repo))
            .movie_svc(MovieService::new(movie_repo))
            .build()
    }

    async fn execute(schema: &MarqueeSchema, query: &str, variables: Value) -> (Value, Vec<String>) {
        let response = schema
            .execute(Request::new(query).variables(Variables::from_json(variables)))
            .await;
        let errors = response.errors.iter().map(|e| e.message.clone()).collect();
        let data = response.data.into_json().unwrap();

        (data, errors)
    }

    const ADD_USER: &str = r#"
        mutation ($email: String!, $username: String!, $password: String!) {
            addUser(email: $email, username: $username, password: $password, isAdmin: false) {
                id email username password isAdmin createdAt updatedAt
            }
        }"#;

    const ADD_MOVIE: &str = r#"
        mutation ($title: String!) {
            addMovie(title: $title, genre: "Sci-Fi", rating: 9, duration: "2h 28m") { id }
        }"#;

    async fn add_user(schema: &MarqueeSchema, email: &str, username: &str) -> (Value, Vec<String>) {
        execute(
            schema,
            ADD_USER,
            json!({ "email": email, "username": username, "password": "s3cret!" }),
        )
        .await
    }

    #[tokio::test]
    async fn test_add_user_never_returns_plaintext() {
        let schema = schema();

        let (data, errors) = add_user(&schema, "ann@example.com", "ann").await;
        assert!(errors.is_empty(), "{errors:?}");
        let id = data["addUser"]["id"].as_str().unwrap().to_string();

        let (data, errors) = execute(
            &schema,
            "query ($id: String!) { user(id: $id) { email password isAdmin } }",
            json!({ "id": id }),
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        let password = data["user"]["password"].as_str().unwrap();
        assert_ne!(password, "s3cret!");
        assert!(verify_password("s3cret!", password).await.unwrap());
        assert_eq!(data["user"]["email"], "ann@example.com");
        assert_eq!(data["user"]["isAdmin"], false);
    }

    #[tokio::test]
    async fn test_users_timestamps_are_iso8601() {
        let schema = schema();
        add_user(&schema, "ann@example.com", "ann").await;

        let (data, errors) =
            execute(&schema, "{ users { id createdAt updatedAt } }", json!({})).await;

        assert!(errors.is_empty(), "{errors:?}");
        let users = data["users"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        let created_at = users[0]["createdAt"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
        assert!(created_at.ends_with('Z'));
        assert_eq!(users[0]["id"].as_str().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn test_add_user_duplicate_email_fails() {
        let schema = schema();
        add_user(&schema, "ann@example.com", "ann").await;

        let (_, errors) = add_user(&schema, "ann@example.com", "someone-else").await;

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("duplicate key"), "{errors:?}");
    }

    #[tokio::test]
    async fn test_add_user_duplicate_username_fails() {
        let schema = schema();
        add_user(&schema, "ann@example.com", "ann").await;

        let (_, errors) = add_user(&schema, "other@example.com", "ann").await;

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("username"), "{errors:?}");
    }

    #[tokio::test]
    async fn test_missing_user_fails_but_missing_movie_is_null() {
        let schema = schema();
        let id = bson::oid::ObjectId::new().to_hex();

        let (data, errors) = execute(
            &schema,
            "query ($id: String!) { user(id: $id) { id } }",
            json!({ "id": id }),
        )
        .await;
        assert_eq!(errors, vec!["user not found".to_string()]);
        assert_eq!(data["user"], Value::Null);

        let (data, errors) = execute(
            &schema,
            "query ($id: String!) { movie(id: $id) { id } }",
            json!({ "id": id }),
        )
        .await;
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data["movie"], Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_id_is_an_error() {
        let schema = schema();

        let (_, errors) = execute(&schema, r#"{ movie(id: "nope") { id } }"#, json!({})).await;

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("invalid movie id"), "{errors:?}");
    }

    #[tokio::test]
    async fn test_update_user_keeps_password_unhashed() {
        let schema = schema();
        let (data, _) = add_user(&schema, "ann@example.com", "ann").await;
        let id = data["addUser"]["id"].as_str().unwrap().to_string();

        let (_, errors) = execute(
            &schema,
            r#"mutation ($id: String!) {
                updateUser(id: $id, email: "anne@example.com", username: "anne", password: "plaintext", isAdmin: true) { id }
            }"#,
            json!({ "id": id }),
        )
        .await;
        assert!(errors.is_empty(), "{errors:?}");

        let (data, errors) = execute(
            &schema,
            "query ($id: String!) { user(id: $id) { email username password isAdmin } }",
            json!({ "id": id }),
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            data["user"],
            json!({
                "email": "anne@example.com",
                "username": "anne",
                // known inconsistency: updateUser does not hash
                "password": "plaintext",
                "isAdmin": true,
            })
        );
    }

    #[tokio::test]
    async fn test_delete_user() {
        let schema = schema();
        let (data, _) = add_user(&schema, "ann@example.com", "ann").await;
        let id = data["addUser"]["id"].as_str().unwrap().to_string();
        let delete = "mutation ($id: String!) { deleteUser(id: $id) { id email } }";

        let (data, errors) = execute(&schema, delete, json!({ "id": id })).await;
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data["deleteUser"]["email"], "ann@example.com");

        let (data, errors) = execute(&schema, delete, json!({ "id": id })).await;
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data["deleteUser"], Value::Null);
    }

    #[tokio::test]
    async fn test_add_movie_then_fetch() {
        let schema = schema();

        let (data, errors) = execute(
            &schema,
            r#"mutation {
                addMovie(title: "Inception", genre: "Sci-Fi", rating: 9, duration: "2h 28m") { id }
            }"#,
            json!({}),
        )
        .await;
        assert!(errors.is_empty(), "{errors:?}");
        let id = data["addMovie"]["id"].as_str().unwrap().to_string();

        let (data, errors) = execute(
            &schema,
            "query ($id: String!) { movie(id: $id) { id title genre rating duration } }",
            json!({ "id": id }),
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            data["movie"],
            json!({
                "id": id,
                "title": "Inception",
                "genre": "Sci-Fi",
                "rating": 9,
                "duration": "2h 28m",
            })
        );
    }

    #[tokio::test]
    async fn test_add_movie_duplicate_title_fails() {
        let schema = schema();
        execute(&schema, ADD_MOVIE, json!({ "title": "Inception" })).await;

        let (_, errors) = execute(&schema, ADD_MOVIE, json!({ "title": "Inception" })).await;

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("title"), "{errors:?}");
    }

    #[tokio::test]
    async fn test_add_movie_rejects_empty_title() {
        let schema = schema();

        let (_, errors) = execute(&schema, ADD_MOVIE, json!({ "title": "" })).await;
        let (data, _) = execute(&schema, "{ movies { id } }", json!({})).await;

        assert_eq!(
            errors,
            vec!["movie validation failed: title is required".to_string()]
        );
        assert_eq!(data["movies"], json!([]));
    }

    #[tokio::test]
    async fn test_add_movie_requires_arguments() {
        let schema = schema();

        let (_, errors) = execute(
            &schema,
            r#"mutation { addMovie(title: "Inception", genre: "Sci-Fi", duration: "2h") { id } }"#,
            json!({}),
        )
        .await;

        assert_eq!(errors.len(), 1);
    }

    #[tokio::test]
    async fn test_update_movie() {
        let schema = schema();
        let (data, _) = execute(&schema, ADD_MOVIE, json!({ "title": "Inception" })).await;
        let id = data["addMovie"]["id"].as_str().unwrap().to_string();

        let (data, errors) = execute(
            &schema,
            r#"mutation ($id: String!) {
                updateMovie(id: $id, title: "Tenet", genre: "Action", rating: 7, duration: "2h 30m") {
                    id title genre rating duration
                }
            }"#,
            json!({ "id": id }),
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            data["updateMovie"],
            json!({
                "id": id,
                "title": "Tenet",
                "genre": "Action",
                "rating": 7,
                "duration": "2h 30m",
            })
        );
    }

    #[tokio::test]
    async fn test_delete_movie_removes_it_from_movies() {
        let schema = schema();
        let (data, _) = execute(&schema, ADD_MOVIE, json!({ "title": "Inception" })).await;
        let id = data["addMovie"]["id"].as_str().unwrap().to_string();
        execute(&schema, ADD_MOVIE, json!({ "title": "Tenet" })).await;
        let delete = "mutation ($id: String!) { deleteMovie(id: $id) { id title } }";

        let (data, errors) = execute(&schema, delete, json!({ "id": id })).await;
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data["deleteMovie"]["title"], "Inception");

        let (data, _) = execute(&schema, "{ movies { title } }", json!({})).await;
        assert_eq!(data["movies"], json!([{ "title": "Tenet" }]));

        let (data, errors) = execute(&schema, delete, json!({ "id": id })).await;
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data["deleteMovie"], Value::Null);
    }
}
