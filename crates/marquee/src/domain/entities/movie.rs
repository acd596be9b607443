use bson::oid::ObjectId;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: ObjectId,
    pub title: String,
    pub genre: String,
    pub rating: i32,
    /// free-form, e.g. "2 hours"
    pub duration: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Movie {
    fn default() -> Self {
        Self {
            id: ObjectId::new(),
            title: "".to_string(),
            genre: "".to_string(),
            rating: 0,
            duration: "".to_string(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub genre: String,
    pub rating: i32,
    pub duration: String,
}

#[derive(Debug, Clone)]
pub struct MovieChanges {
    pub title: String,
    pub genre: String,
    pub rating: i32,
    pub duration: String,
}
