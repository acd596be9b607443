//! In-process repositories with the same uniqueness and not-found behaviour
//! as the MongoDB ones. Records are kept in insertion order.

use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{
    entities::{
        movie::{Movie, MovieChanges},
        user::{User, UserChanges},
    },
    repositories::{
        movie::{MovieRepository, MovieRepositoryError},
        user::{UserRepository, UserRepositoryError},
    },
};

#[derive(Clone, Default)]
pub struct UserRepositoryMemory {
    users: Arc<RwLock<Vec<User>>>,
}

impl UserRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique_user(
    users: &[User],
    skip: Option<ObjectId>,
    email: &str,
    username: &str,
) -> Result<(), UserRepositoryError> {
    for user in users.iter().filter(|u| Some(u.id) != skip) {
        if user.email == email {
            return Err(UserRepositoryError::DuplicateKey {
                field: "email".to_string(),
                value: email.to_string(),
            });
        }
        if user.username == username {
            return Err(UserRepositoryError::DuplicateKey {
                field: "username".to_string(),
                value: username.to_string(),
            });
        }
    }

    Ok(())
}

#[async_trait]
impl UserRepository for UserRepositoryMemory {
    async fn insert_user(&self, user: User) -> Result<User, UserRepositoryError> {
        let mut users = self.users.write().await;
        check_unique_user(&users, None, &user.email, &user.username)?;
        users.push(user.clone());

        Ok(user)
    }

    async fn get_users(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.users.read().await.clone())
    }

    async fn get_user_by_id(&self, id: ObjectId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn update_user(
        &self,
        id: ObjectId,
        changes: UserChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut users = self.users.write().await;
        if !users.iter().any(|u| u.id == id) {
            return Ok(None);
        }
        check_unique_user(&users, Some(id), &changes.email, &changes.username)?;

        let user = users.iter_mut().find(|u| u.id == id).map(|user| {
            user.email = changes.email;
            user.username = changes.username;
            user.password = changes.password;
            user.is_admin = changes.is_admin;
            user.updated_at = updated_at;
            user.clone()
        });

        Ok(user)
    }

    async fn delete_user(&self, id: ObjectId) -> Result<Option<User>, UserRepositoryError> {
        let mut users = self.users.write().await;
        let user = users
            .iter()
            .position(|u| u.id == id)
            .map(|index| users.remove(index));

        Ok(user)
    }
}

#[derive(Clone, Default)]
pub struct MovieRepositoryMemory {
    movies: Arc<RwLock<Vec<Movie>>>,
}

impl MovieRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique_movie(
    movies: &[Movie],
    skip: Option<ObjectId>,
    title: &str,
) -> Result<(), MovieRepositoryError> {
    if movies
        .iter()
        .any(|m| Some(m.id) != skip && m.title == title)
    {
        return Err(MovieRepositoryError::DuplicateKey {
            field: "title".to_string(),
            value: title.to_string(),
        });
    }

    Ok(())
}

#[async_trait]
impl MovieRepository for MovieRepositoryMemory {
    async fn insert_movie(&self, movie: Movie) -> Result<Movie, MovieRepositoryError> {
        let mut movies = self.movies.write().await;
        check_unique_movie(&movies, None, &movie.title)?;
        movies.push(movie.clone());

        Ok(movie)
    }

    async fn get_movies(&self) -> Result<Vec<Movie>, MovieRepositoryError> {
        Ok(self.movies.read().await.clone())
    }

    async fn get_movie_by_id(&self, id: ObjectId) -> Result<Option<Movie>, MovieRepositoryError> {
        Ok(self.movies.read().await.iter().find(|m| m.id == id).cloned())
    }

    async fn update_movie(
        &self,
        id: ObjectId,
        changes: MovieChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Movie>, MovieRepositoryError> {
        let mut movies = self.movies.write().await;
        if !movies.iter().any(|m| m.id == id) {
            return Ok(None);
        }
        check_unique_movie(&movies, Some(id), &changes.title)?;

        let movie = movies.iter_mut().find(|m| m.id == id).map(|movie| {
            movie.title = changes.title;
            movie.genre = changes.genre;
            movie.rating = changes.rating;
            movie.duration = changes.duration;
            movie.updated_at = updated_at;
            movie.clone()
        });

        Ok(movie)
    }

    async fn delete_movie(&self, id: ObjectId) -> Result<Option<Movie>, MovieRepositoryError> {
        let mut movies = self.movies.write().await;
        let movie = movies
            .iter()
            .position(|m| m.id == id)
            .map(|index| movies.remove(index));

        Ok(movie)
    }
}
