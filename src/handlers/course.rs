use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use sqlx::types::Json as SqlxJson;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::course::{
        COURSE_COLUMNS, Course, CourseAuthorRequest, CourseCommentsView, CreateCourseRequest,
        UpdateCourseRequest,
    },
};

/// List all courses, newest first.
pub async fn list_courses(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let query =
        format!("SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC");

    let courses = sqlx::query_as::<_, Course>(&query)
        .fetch_all(&pool)
        .await?;

    Ok(Json(courses))
}

/// Create a new course.
///
/// The caller's identity arrives embedded in `createdBy` and is trusted
/// as-is; the identity provider already authenticated the user on the
/// client side.
pub async fn create_course(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Validation has already established these are present.
    let (Some(title), Some(full_description), Some(image), Some(created_by)) = (
        payload.title,
        payload.full_description,
        payload.image,
        payload
            .created_by
            .and_then(CourseAuthorRequest::into_record),
    ) else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let query = format!(
        "INSERT INTO courses \
            (id, title, description, full_description, image, created_by, \
             is_free, duration, course_link, tags) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {COURSE_COLUMNS}"
    );

    // likes, liked_by, comments and the timestamps come from column defaults.
    let course = sqlx::query_as::<_, Course>(&query)
        .bind(Uuid::new_v4().to_string())
        .bind(&title)
        .bind(&payload.description)
        .bind(&full_description)
        .bind(&image)
        .bind(SqlxJson(&created_by))
        .bind(payload.is_free)
        .bind(&payload.duration)
        .bind(&payload.course_link)
        .bind(SqlxJson(payload.tags.unwrap_or_default()))
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create course: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok((StatusCode::CREATED, Json(course)))
}

/// Partially update a course.
///
/// COALESCE keeps the stored value for every field the client omitted or
/// sent as null, while a present `false` or empty string still overwrites.
pub async fn update_course(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let query = format!(
        "UPDATE courses SET \
            title = COALESCE($2, title), \
            description = COALESCE($3, description), \
            full_description = COALESCE($4, full_description), \
            duration = COALESCE($5, duration), \
            course_link = COALESCE($6, course_link), \
            is_free = COALESCE($7, is_free), \
            tags = COALESCE($8, tags), \
            image = COALESCE($9, image), \
            updated_at = now() \
         WHERE id = $1 \
         RETURNING {COURSE_COLUMNS}"
    );

    let course = sqlx::query_as::<_, Course>(&query)
        .bind(&id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.full_description)
        .bind(&payload.duration)
        .bind(&payload.course_link)
        .bind(payload.is_free)
        .bind(payload.tags.map(SqlxJson))
        .bind(&payload.image)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Course not found".to_string()))?;

    Ok(Json(course))
}

/// Delete a course. Its embedded comments go with the row.
pub async fn delete_course(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(&id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "message": "Course deleted successfully",
    })))
}

/// List the courses a creator has published. Matches on the author's
/// external id, not the display name.
pub async fn list_user_courses(
    State(pool): State<PgPool>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let query = format!(
        "SELECT {COURSE_COLUMNS} FROM courses \
         WHERE created_by->>'id' = $1 \
         ORDER BY created_at DESC"
    );

    let courses = sqlx::query_as::<_, Course>(&query)
        .bind(&user_id)
        .fetch_all(&pool)
        .await?;

    Ok(Json(courses))
}

/// List the courses a user has liked.
pub async fn list_favorite_courses(
    State(pool): State<PgPool>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let query = format!(
        "SELECT {COURSE_COLUMNS} FROM courses \
         WHERE liked_by @> to_jsonb($1::text) \
         ORDER BY created_at DESC"
    );

    let courses = sqlx::query_as::<_, Course>(&query)
        .bind(&user_id)
        .fetch_all(&pool)
        .await?;

    Ok(Json(courses))
}

/// List a creator's courses projected down to their comment sequences,
/// for the comments-management dashboard view.
pub async fn list_user_course_comments(
    State(pool): State<PgPool>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let courses = sqlx::query_as::<_, CourseCommentsView>(
        "SELECT id, title, comments FROM courses \
         WHERE created_by->>'id' = $1 \
         ORDER BY created_at DESC",
    )
    .bind(&user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(courses))
}
