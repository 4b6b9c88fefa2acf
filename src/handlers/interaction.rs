use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::PgPool;
use sqlx::types::Json as SqlxJson;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::comment::{Comment, CommentUserRequest, CreateCommentRequest},
    models::course::{COURSE_COLUMNS, Course},
};

/// Body of a toggle-like request: the caller's external identity, trusted
/// as-is.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeRequest {
    pub user_id: Option<String>,
}

/// Toggle Like on a course.
///
/// Membership in `liked_by` decides the direction: present means unlike,
/// absent means like. The whole flip happens in one statement, with both
/// CASE branches reading the pre-update row, so concurrent toggles cannot
/// lose updates.
pub async fn toggle_like(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Json(payload): Json<ToggleLikeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = payload
        .user_id
        .filter(|user_id| !user_id.is_empty())
        .ok_or(AppError::AuthError("Unauthorized".to_string()))?;

    let query = format!(
        "UPDATE courses SET \
            liked_by = CASE \
                WHEN liked_by @> to_jsonb($2::text) THEN liked_by - $2 \
                ELSE liked_by || to_jsonb($2::text) \
            END, \
            likes = CASE \
                WHEN liked_by @> to_jsonb($2::text) THEN likes - 1 \
                ELSE likes + 1 \
            END, \
            updated_at = now() \
         WHERE id = $1 \
         RETURNING {COURSE_COLUMNS}"
    );

    let course = sqlx::query_as::<_, Course>(&query)
        .bind(&id)
        .bind(&user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Course not found".to_string()))?;

    Ok(Json(course))
}

/// Append a comment to a course and return the full updated sequence.
pub async fn add_comment(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let (Some(text), Some(user)) = (
        payload.text,
        payload.user.and_then(CommentUserRequest::into_record),
    ) else {
        return Err(AppError::BadRequest("Invalid comment data".to_string()));
    };

    let comment = Comment {
        id: Uuid::new_v4().to_string(),
        user,
        text,
        created_at: chrono::Utc::now(),
    };

    let comments = sqlx::query_scalar::<_, SqlxJson<Vec<Comment>>>(
        "UPDATE courses \
         SET comments = comments || jsonb_build_array($2::jsonb), \
             updated_at = now() \
         WHERE id = $1 \
         RETURNING comments",
    )
    .bind(&id)
    .bind(SqlxJson(&comment))
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Course not found".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Comment added successfully",
            "comments": comments.0,
        })),
    ))
}

/// Remove one comment from a course's sequence by its id.
///
/// The containment predicate makes the update match only when the comment
/// actually exists, so a missing course and a missing comment stay
/// distinguishable without a second round trip on the success path.
pub async fn delete_comment(
    State(pool): State<PgPool>,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let comments = sqlx::query_scalar::<_, SqlxJson<Vec<Comment>>>(
        "UPDATE courses \
         SET comments = ( \
                 SELECT COALESCE(jsonb_agg(c), '[]'::jsonb) \
                 FROM jsonb_array_elements(comments) AS c \
                 WHERE c->>'_id' <> $2 \
             ), \
             updated_at = now() \
         WHERE id = $1 \
           AND comments @> jsonb_build_array(jsonb_build_object('_id', $2::text)) \
         RETURNING comments",
    )
    .bind(&id)
    .bind(&comment_id)
    .fetch_optional(&pool)
    .await?;

    let Some(comments) = comments else {
        let course_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
                .bind(&id)
                .fetch_one(&pool)
                .await?;

        if !course_exists {
            return Err(AppError::NotFound("Course not found".to_string()));
        }
        return Err(AppError::NotFound("Comment not found".to_string()));
    };

    Ok(Json(serde_json::json!({
        "message": "Comment deleted successfully",
        "comments": comments.0,
    })))
}
