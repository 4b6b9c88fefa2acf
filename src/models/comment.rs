// src/models/comment.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A comment embedded in its parent course document. Comments have no
/// lifecycle of their own: they are written and deleted only through
/// updates of the owning course row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,

    pub user: CommentUser,
    pub text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Denormalized snapshot of the commenting user, taken verbatim from the
/// identity provider at comment time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentUser {
    pub name: String,
    pub avatar: Option<String>,
}

/// DTO for adding a comment to a course.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(required, length(min = 1, message = "Comment text must not be empty"))]
    pub text: Option<String>,

    #[validate(required, nested)]
    pub user: Option<CommentUserRequest>,
}

/// Commenting user as submitted by the client. The avatar is required here
/// even though the stored snapshot tolerates its absence.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CommentUserRequest {
    #[validate(required, length(min = 1, message = "Comment user name must not be empty"))]
    pub name: Option<String>,

    #[validate(required, length(min = 1, message = "Comment user avatar must not be empty"))]
    pub avatar: Option<String>,
}

impl CommentUserRequest {
    /// Converts the validated request into the embedded snapshot. Returns
    /// `None` when a required field is missing, which validation has
    /// already rejected on the normal path.
    pub fn into_record(self) -> Option<CommentUser> {
        Some(CommentUser {
            name: self.name?,
            avatar: Some(self.avatar?),
        })
    }
}
