use super::schema::MovieSvc;
use crate::domain::entities::movie::{MovieChanges, NewMovie};
use async_graphql::{Context, Object, Result, SimpleObject, ID};

#[derive(Debug, SimpleObject)]
pub struct Movie {
    pub id: ID,
    pub title: String,
    pub genre: String,
    pub rating: i32,
    pub duration: String,
}

impl From<crate::domain::entities::movie::Movie> for Movie {
    fn from(val: crate::domain::entities::movie::Movie) -> Self {
        Self {
            id: ID(val.id.to_hex()),
            title: val.title,
            genre: val.genre,
            rating: val.rating,
            duration: val.duration,
        }
    }
}

#[derive(Default)]
pub struct MovieRoot;

#[Object]
impl MovieRoot {
    async fn movies(&self, ctx: &Context<'_>) -> Result<Vec<Movie>> {
        let movies = ctx
            .data::<MovieSvc>()?
            .fetch_all_movies()
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(movies)
    }

    /// Null when no movie has this id.
    async fn movie(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "movie id")] id: String,
    ) -> Result<Option<Movie>> {
        let movie = ctx.data::<MovieSvc>()?.fetch_movie_by_id(&id).await?;

        Ok(movie.map(Into::into))
    }
}

#[derive(Default)]
pub struct MovieMutationRoot;

#[Object]
impl MovieMutationRoot {
    async fn add_movie(
        &self,
        ctx: &Context<'_>,
        title: String,
        genre: String,
        rating: i32,
        #[graphql(desc = "free-form, e.g. \"2 hours\"")] duration: String,
    ) -> Result<Movie> {
        let movie = ctx
            .data::<MovieSvc>()?
            .create_movie(NewMovie {
                title,
                genre,
                rating,
                duration,
            })
            .await?;

        Ok(movie.into())
    }

    async fn update_movie(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "movie id")] id: String,
        title: String,
        genre: String,
        rating: i32,
        duration: String,
    ) -> Result<Option<Movie>> {
        let movie = ctx
            .data::<MovieSvc>()?
            .update_movie(
                &id,
                MovieChanges {
                    title,
                    genre,
                    rating,
                    duration,
                },
            )
            .await?;

        Ok(movie.map(Into::into))
    }

    async fn delete_movie(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "movie id")] id: String,
    ) -> Result<Option<Movie>> {
        let movie = ctx.data::<MovieSvc>()?.delete_movie(&id).await?;

        Ok(movie.map(Into::into))
    }
}
