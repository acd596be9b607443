use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::entities::movie::{Movie, MovieChanges};

#[derive(Debug, Error)]
pub enum MovieRepositoryError {
    #[error("E11000 duplicate key error collection: movies index: {field}_1 dup key: {{ {field}: \"{value}\" }}")]
    DuplicateKey { field: String, value: String },
    #[error("database return error: {0}")]
    DbError(#[from] mongodb::error::Error),
}

#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn insert_movie(&self, movie: Movie) -> Result<Movie, MovieRepositoryError>;

    async fn get_movies(&self) -> Result<Vec<Movie>, MovieRepositoryError>;

    async fn get_movie_by_id(&self, id: ObjectId) -> Result<Option<Movie>, MovieRepositoryError>;

    async fn update_movie(
        &self,
        id: ObjectId,
        changes: MovieChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Movie>, MovieRepositoryError>;

    async fn delete_movie(&self, id: ObjectId) -> Result<Option<Movie>, MovieRepositoryError>;
}

#[async_trait]
impl<T> MovieRepository for Arc<T>
where
    T: MovieRepository + ?Sized,
{
    async fn insert_movie(&self, movie: Movie) -> Result<Movie, MovieRepositoryError> {
        (**self).insert_movie(movie).await
    }

    async fn get_movies(&self) -> Result<Vec<Movie>, MovieRepositoryError> {
        (**self).get_movies().await
    }

    async fn get_movie_by_id(&self, id: ObjectId) -> Result<Option<Movie>, MovieRepositoryError> {
        (**self).get_movie_by_id(id).await
    }

    async fn update_movie(
        &self,
        id: ObjectId,
        changes: MovieChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Movie>, MovieRepositoryError> {
        (**self).update_movie(id, changes, updated_at).await
    }

    async fn delete_movie(&self, id: ObjectId) -> Result<Option<Movie>, MovieRepositoryError> {
        (**self).delete_movie(id).await
    }
}
