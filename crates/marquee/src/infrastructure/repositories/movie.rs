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
        entities::movie::{Movie, MovieChanges},
        repositories::movie::{MovieRepository, MovieRepositoryError},
    },
    infrastructure::database::Database,
};

pub const COLLECTION: &str = "movies";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    genre: String,
    rating: i32,
    duration: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    updated_at: DateTime<Utc>,
}

impl From<Movie> for MovieDocument {
    fn from(val: Movie) -> Self {
        Self {
            id: val.id,
            title: val.title,
            genre: val.genre,
            rating: val.rating,
            duration: val.duration,
            created_at: val.created_at,
            updated_at: val.updated_at,
        }
    }
}

impl From<MovieDocument> for Movie {
    fn from(val: MovieDocument) -> Self {
        Self {
            id: val.id,
            title: val.title,
            genre: val.genre,
            rating: val.rating,
            duration: val.duration,
            created_at: val.created_at,
            updated_at: val.updated_at,
        }
    }
}

fn write_error(err: mongodb::error::Error, title: &str) -> MovieRepositoryError {
    match duplicate_key_field(&err) {
        Some(field) => MovieRepositoryError::DuplicateKey {
            field,
            value: title.to_string(),
        },
        None => err.into(),
    }
}

#[derive(Clone)]
pub struct MovieRepositoryImpl {
    db: Database,
}

impl MovieRepositoryImpl {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<MovieDocument> {
        self.db.collection(COLLECTION)
    }

    /// Unique index on `title`.
    pub async fn create_indexes(&self) -> Result<(), MovieRepositoryError> {
        self.collection()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "title": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;

        Ok(())
    }
}

#[async_trait]
impl MovieRepository for MovieRepositoryImpl {
    async fn insert_movie(&self, movie: Movie) -> Result<Movie, MovieRepositoryError> {
        let document = MovieDocument::from(movie);

        self.collection()
            .insert_one(&document)
            .await
            .map_err(|e| write_error(e, &document.title))?;

        Ok(document.into())
    }

    async fn get_movies(&self) -> Result<Vec<Movie>, MovieRepositoryError> {
        let movies = self
            .collection()
            .find(doc! {})
            .await?
            .try_collect::<Vec<_>>()
            .await?
            .into_iter()
            .map(Movie::from)
            .collect();

        Ok(movies)
    }

    async fn get_movie_by_id(&self, id: ObjectId) -> Result<Option<Movie>, MovieRepositoryError> {
        let movie = self.collection().find_one(doc! { "_id": id }).await?;

        Ok(movie.map(Movie::from))
    }

    async fn update_movie(
        &self,
        id: ObjectId,
        changes: MovieChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Movie>, MovieRepositoryError> {
        let update = doc! {
            "$set": {
                "title": changes.title.as_str(),
                "genre": changes.genre.as_str(),
                "rating": changes.rating,
                "duration": changes.duration.as_str(),
                "updatedAt": bson::DateTime::from_chrono(updated_at),
            }
        };

        let movie = self
            .collection()
            .find_one_and_update(doc! { "_id": id }, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| write_error(e, &changes.title))?;

        Ok(movie.map(Movie::from))
    }

    async fn delete_movie(&self, id: ObjectId) -> Result<Option<Movie>, MovieRepositoryError> {
        let movie = self
            .collection()
            .find_one_and_delete(doc! { "_id": id })
            .await?;

        Ok(movie.map(Movie::from))
    }
}
