use bson::oid::ObjectId;
use thiserror::Error;

use crate::domain::{
    entities::{
        movie::{Movie, MovieChanges, NewMovie},
        now,
    },
    repositories::movie::{MovieRepository, MovieRepositoryError},
};

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("invalid movie id \"{0}\"")]
    InvalidId(String),
    #[error("movie validation failed: {0} is required")]
    MissingField(&'static str),
    #[error("{0}")]
    RepositoryError(#[from] MovieRepositoryError),
}

fn parse_id(id: &str) -> Result<ObjectId, MovieError> {
    ObjectId::parse_str(id).map_err(|_| MovieError::InvalidId(id.to_string()))
}

fn validate(title: &str, genre: &str, duration: &str) -> Result<(), MovieError> {
    for (field, value) in [("title", title), ("genre", genre), ("duration", duration)] {
        if value.is_empty() {
            return Err(MovieError::MissingField(field));
        }
    }

    Ok(())
}

#[derive(Clone)]
pub struct MovieService<R>
where
    R: MovieRepository,
{
    repo: R,
}

impl<R> MovieService<R>
where
    R: MovieRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_movie(&self, input: NewMovie) -> Result<Movie, MovieError> {
        validate(&input.title, &input.genre, &input.duration)?;

        let created_at = now();
        let movie = Movie {
            title: input.title,
            genre: input.genre,
            rating: input.rating,
            duration: input.duration,
            created_at,
            updated_at: created_at,
            ..Default::default()
        };

        Ok(self.repo.insert_movie(movie).await?)
    }

    pub async fn fetch_all_movies(&self) -> Result<Vec<Movie>, MovieError> {
        Ok(self.repo.get_movies().await?)
    }

    pub async fn fetch_movie_by_id(&self, id: &str) -> Result<Option<Movie>, MovieError> {
        let id = parse_id(id)?;

        Ok(self.repo.get_movie_by_id(id).await?)
    }

    pub async fn update_movie(
        &self,
        id: &str,
        changes: MovieChanges,
    ) -> Result<Option<Movie>, MovieError> {
        let id = parse_id(id)?;
        validate(&changes.title, &changes.genre, &changes.duration)?;

        Ok(self.repo.update_movie(id, changes, now()).await?)
    }

    pub async fn delete_movie(&self, id: &str) -> Result<Option<Movie>, MovieError> {
        let id = parse_id(id)?;

        Ok(self.repo.delete_movie(id).await?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::infrastructure::repositories::memory::MovieRepositoryMemory;

    fn inception() -> NewMovie {
        NewMovie {
            title: "Inception".to_string(),
            genre: "Sci-Fi".to_string(),
            rating: 9,
            duration: "2h 28m".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_movie() {
        let svc = MovieService::new(MovieRepositoryMemory::new());

        let movie = svc.create_movie(inception()).await.unwrap();
        let fetched = svc
            .fetch_movie_by_id(&movie.id.to_hex())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetched, movie);
        assert_eq!(fetched.title, "Inception");
        assert_eq!(fetched.rating, 9);
    }

    #[tokio::test]
    async fn test_fetch_missing_movie_is_none() {
        let svc = MovieService::new(MovieRepositoryMemory::new());

        let result = svc
            .fetch_movie_by_id(&ObjectId::new().to_hex())
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_movie_duplicate_title() {
        let svc = MovieService::new(MovieRepositoryMemory::new());

        svc.create_movie(inception()).await.unwrap();
        let result = svc.create_movie(inception()).await;

        assert!(matches!(
            result,
            Err(MovieError::RepositoryError(
                MovieRepositoryError::DuplicateKey { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_create_movie_requires_fields() {
        let svc = MovieService::new(MovieRepositoryMemory::new());

        let result = svc
            .create_movie(NewMovie {
                genre: "".to_string(),
                ..inception()
            })
            .await;

        assert!(matches!(result, Err(MovieError::MissingField("genre"))));
    }

    #[tokio::test]
    async fn test_update_movie() {
        let svc = MovieService::new(MovieRepositoryMemory::new());
        let movie = svc.create_movie(inception()).await.unwrap();

        let updated = svc
            .update_movie(
                &movie.id.to_hex(),
                MovieChanges {
                    title: "Inception (Director's Cut)".to_string(),
                    genre: "Thriller".to_string(),
                    rating: 10,
                    duration: "2h 30m".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, movie.id);
        assert_eq!(updated.title, "Inception (Director's Cut)");
        assert_eq!(updated.genre, "Thriller");
        assert_eq!(updated.rating, 10);
        assert_eq!(updated.duration, "2h 30m");
    }

    #[tokio::test]
    async fn test_update_movie_title_collision() {
        let svc = MovieService::new(MovieRepositoryMemory::new());
        svc.create_movie(inception()).await.unwrap();
        let other = svc
            .create_movie(NewMovie {
                title: "Tenet".to_string(),
                ..inception()
            })
            .await
            .unwrap();

        let result = svc
            .update_movie(
                &other.id.to_hex(),
                MovieChanges {
                    title: "Inception".to_string(),
                    genre: "Sci-Fi".to_string(),
                    rating: 7,
                    duration: "2h 30m".to_string(),
                },
            )
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_movie() {
        let svc = MovieService::new(MovieRepositoryMemory::new());
        let movie = svc.create_movie(inception()).await.unwrap();

        let deleted = svc.delete_movie(&movie.id.to_hex()).await.unwrap();
        let movies = svc.fetch_all_movies().await.unwrap();
        let missing = svc.delete_movie(&movie.id.to_hex()).await.unwrap();

        assert_eq!(deleted.map(|m| m.id), Some(movie.id));
        assert!(movies.iter().all(|m| m.id != movie.id));
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_movie_invalid_id() {
        let svc = MovieService::new(MovieRepositoryMemory::new());

        let result = svc.delete_movie("1234").await;

        assert!(matches!(result, Err(MovieError::InvalidId(_))));
    }
}
