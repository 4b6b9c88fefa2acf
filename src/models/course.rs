// src/models/course.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use validator::Validate;

use crate::models::comment::Comment;

/// Select list for course rows, shared by every query returning a full course.
pub const COURSE_COLUMNS: &str = "id, title, description, full_description, image, created_by, \
     is_free, duration, course_link, tags, likes, liked_by, comments, created_at, updated_at";

/// Embedded author record: a denormalized snapshot of the external identity,
/// not a reference to a user row. `id` is the opaque string the identity
/// provider assigned to the creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseAuthor {
    pub name: String,
    pub avatar: Option<String>,
    pub id: String,
}

/// Represents one row of the 'courses' table.
///
/// The id is serialized as `_id` and the remaining fields as camelCase, which
/// is the wire format the client consumes.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,
    pub description: Option<String>,
    pub full_description: String,

    /// URL of the externally hosted cover image. The client uploads the
    /// image to the media host and sends the resulting URL here.
    pub image: String,

    pub created_by: Json<CourseAuthor>,

    pub is_free: Option<bool>,
    pub duration: Option<String>,
    pub course_link: Option<String>,
    pub tags: Json<Vec<String>>,

    /// Kept in lockstep with `liked_by` by the toggle operation.
    pub likes: i32,
    /// External identity strings of everyone who currently likes the course.
    pub liked_by: Json<Vec<String>>,

    pub comments: Json<Vec<Comment>>,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new course.
///
/// Required fields are `Option` so that an absent or null value fails the
/// `required` check with a 400 instead of being rejected by the extractor.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[validate(required, length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(required, length(min = 1, message = "Full description must not be empty"))]
    pub full_description: Option<String>,

    #[validate(required, length(min = 1, message = "Image must not be empty"))]
    pub image: Option<String>,

    #[validate(required, nested)]
    pub created_by: Option<CourseAuthorRequest>,

    pub is_free: Option<bool>,
    pub duration: Option<String>,
    pub course_link: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Author record as submitted by the client.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CourseAuthorRequest {
    #[validate(required, length(min = 1, message = "Author name must not be empty"))]
    pub name: Option<String>,

    pub avatar: Option<String>,

    #[validate(required, length(min = 1, message = "Author id must not be empty"))]
    pub id: Option<String>,
}

impl CourseAuthorRequest {
    /// Converts the validated request into the embedded record. Returns
    /// `None` when a required field is missing, which validation has
    /// already rejected on the normal path.
    pub fn into_record(self) -> Option<CourseAuthor> {
        Some(CourseAuthor {
            name: self.name?,
            avatar: self.avatar,
            id: self.id?,
        })
    }
}

/// DTO for partially updating a course.
///
/// A field that is absent or null keeps its stored value; any present value,
/// including `false` or an empty string, overwrites it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub duration: Option<String>,
    pub course_link: Option<String>,
    pub is_free: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub image: Option<String>,
}

/// Projection of a course down to its comment sequence, used by the
/// creator's comments-management view.
#[derive(Debug, Serialize, FromRow)]
pub struct CourseCommentsView {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub comments: Json<Vec<Comment>>,
}
