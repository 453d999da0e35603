use axum::extract::{Path, Query, State};
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use wayfinder_shared::errors::{AppError, AppResult, ErrorCode};
use wayfinder_shared::middleware::ModeratorUser;
use wayfinder_shared::types::api::ApiResponse;
use wayfinder_shared::types::pagination::{Paginated, PaginationParams};

use crate::models::{
    ModerationLog, ModerationStatus, Place, ReportStatus, Review, ReviewReport,
};
use crate::schema::{contributions, moderation_logs, places, review_reports, reviews};
use crate::services::moderation;
use crate::AppState;

// --- Request / response types ---

#[derive(Debug, Deserialize)]
pub struct PlaceQueueParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewQueueParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub reported: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQueueParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub status: Option<String>,
}

fn default_page() -> u64 { 1 }
fn default_per_page() -> u64 { 20 }

fn pagination(page: u64, per_page: u64) -> PaginationParams {
    PaginationParams { page, per_page }
}

#[derive(Debug, Serialize)]
pub struct ModerationStats {
    pub pending_places: i64,
    pub reported_reviews: i64,
    pub pending_reports: i64,
    pub restricted_users: i64,
}

// --- Place queue ---

pub async fn list_places(
    State(state): State<Arc<AppState>>,
    _moderator: ModeratorUser,
    Query(params): Query<PlaceQueueParams>,
) -> AppResult<Json<ApiResponse<Paginated<Place>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let status = params
        .status
        .as_deref()
        .map(|raw| {
            raw.parse::<ModerationStatus>()
                .map_err(|_| AppError::new(ErrorCode::ValidationError, "unknown status filter"))
        })
        .transpose()?;

    let pagination = pagination(params.page, params.per_page);

    let (items, total): (Vec<Place>, i64) = if let Some(status) = status {
        let items = places::table
            .filter(places::moderation_status.eq(status.as_str()))
            .order(places::created_at.desc())
            .offset(pagination.offset() as i64)
            .limit(pagination.limit() as i64)
            .load(&mut conn)?;
        let total = places::table
            .filter(places::moderation_status.eq(status.as_str()))
            .count()
            .get_result(&mut conn)?;
        (items, total)
    } else {
        let items = places::table
            .order(places::created_at.desc())
            .offset(pagination.offset() as i64)
            .limit(pagination.limit() as i64)
            .load(&mut conn)?;
        let total = places::table.count().get_result(&mut conn)?;
        (items, total)
    };

    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &pagination))))
}

fn load_place(conn: &mut diesel::pg::PgConnection, place_id: Uuid) -> AppResult<Place> {
    places::table
        .find(place_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::PlaceNotFound, "place not found"))
}

pub async fn approve_place(
    State(state): State<Arc<AppState>>,
    moderator: ModeratorUser,
    Path(place_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Place>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let place = load_place(&mut conn, place_id)?;

    if place.moderation_status == ModerationStatus::Approved.as_str() {
        return Ok(Json(ApiResponse::ok(place)));
    }

    let updated = conn.transaction::<Place, AppError, _>(|conn| {
        Ok(moderation::approve_place(conn, place, moderator.0.id)?)
    })?;

    Ok(Json(ApiResponse::ok_with_message(updated, "Place approved.")))
}

pub async fn reject_place(
    State(state): State<Arc<AppState>>,
    moderator: ModeratorUser,
    Path(place_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Place>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let place = load_place(&mut conn, place_id)?;

    let updated = conn.transaction::<Place, AppError, _>(|conn| {
        Ok(moderation::reject_place(conn, place, moderator.0.id)?)
    })?;

    Ok(Json(ApiResponse::ok_with_message(updated, "Place rejected.")))
}

pub async fn archive_place(
    State(state): State<Arc<AppState>>,
    moderator: ModeratorUser,
    Path(place_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Place>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let place = load_place(&mut conn, place_id)?;

    if place.is_archived {
        return Ok(Json(ApiResponse::ok(place)));
    }

    let updated = conn.transaction::<Place, AppError, _>(|conn| {
        Ok(moderation::archive_place(conn, place, moderator.0.id)?)
    })?;

    Ok(Json(ApiResponse::ok_with_message(updated, "Place archived (soft delete).")))
}

pub async fn restore_place(
    State(state): State<Arc<AppState>>,
    moderator: ModeratorUser,
    Path(place_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Place>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let place = load_place(&mut conn, place_id)?;

    if !place.is_archived {
        return Ok(Json(ApiResponse::ok(place)));
    }

    let updated = conn.transaction::<Place, AppError, _>(|conn| {
        Ok(moderation::restore_place(conn, place, moderator.0.id)?)
    })?;

    Ok(Json(ApiResponse::ok_with_message(
        updated,
        "Place restored from archive. It must be re-approved before it is visible.",
    )))
}

/// DELETE redirects to archival: nothing is ever physically removed through
/// the management surface.
pub async fn delete_place(
    state: State<Arc<AppState>>,
    moderator: ModeratorUser,
    path: Path<Uuid>,
) -> AppResult<Json<ApiResponse<Place>>> {
    archive_place(state, moderator, path).await
}

// --- Review queue ---

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    _moderator: ModeratorUser,
    Query(params): Query<ReviewQueueParams>,
) -> AppResult<Json<ApiResponse<Paginated<Review>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let reported_only = params.reported.as_deref() == Some("1");
    let pagination = pagination(params.page, params.per_page);

    let (items, total): (Vec<Review>, i64) = if reported_only {
        let items = reviews::table
            .filter(reviews::reported.eq(true))
            .filter(reviews::is_archived.eq(false))
            .order(reviews::created_at.desc())
            .offset(pagination.offset() as i64)
            .limit(pagination.limit() as i64)
            .load(&mut conn)?;
        let total = reviews::table
            .filter(reviews::reported.eq(true))
            .filter(reviews::is_archived.eq(false))
            .count()
            .get_result(&mut conn)?;
        (items, total)
    } else {
        let items = reviews::table
            .order(reviews::created_at.desc())
            .offset(pagination.offset() as i64)
            .limit(pagination.limit() as i64)
            .load(&mut conn)?;
        let total = reviews::table.count().get_result(&mut conn)?;
        (items, total)
    };

    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &pagination))))
}

fn load_review(conn: &mut diesel::pg::PgConnection, review_id: Uuid) -> AppResult<Review> {
    reviews::table
        .find(review_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::ReviewNotFound, "review not found"))
}

pub async fn uphold_review(
    State(state): State<Arc<AppState>>,
    moderator: ModeratorUser,
    Path(review_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let review = load_review(&mut conn, review_id)?;

    if !review.reported || review.is_archived {
        return Err(AppError::new(
            ErrorCode::NotReported,
            "This review has no reports to moderate.",
        ));
    }

    let updated = conn.transaction::<Review, AppError, _>(|conn| {
        Ok(moderation::uphold_review(conn, review, moderator.0.id)?)
    })?;

    Ok(Json(ApiResponse::ok_with_message(
        updated,
        "Reports upheld. The review is hidden and the author penalized.",
    )))
}

pub async fn dismiss_review(
    State(state): State<Arc<AppState>>,
    moderator: ModeratorUser,
    Path(review_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let review = load_review(&mut conn, review_id)?;

    if !review.reported || review.is_archived {
        return Err(AppError::new(
            ErrorCode::NotReported,
            "This review has no reports to moderate.",
        ));
    }

    let updated = conn.transaction::<Review, AppError, _>(|conn| {
        Ok(moderation::dismiss_review(conn, review, moderator.0.id)?)
    })?;

    Ok(Json(ApiResponse::ok_with_message(
        updated,
        "Reports dismissed. The review stays visible.",
    )))
}

pub async fn archive_review(
    State(state): State<Arc<AppState>>,
    moderator: ModeratorUser,
    Path(review_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let review = load_review(&mut conn, review_id)?;

    if review.is_archived {
        return Ok(Json(ApiResponse::ok(review)));
    }

    let updated = conn.transaction::<Review, AppError, _>(|conn| {
        Ok(moderation::archive_review(conn, review, moderator.0.id)?)
    })?;

    Ok(Json(ApiResponse::ok_with_message(updated, "Review archived (soft delete).")))
}

pub async fn restore_review(
    State(state): State<Arc<AppState>>,
    moderator: ModeratorUser,
    Path(review_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let review = load_review(&mut conn, review_id)?;

    if !review.is_archived {
        return Ok(Json(ApiResponse::ok(review)));
    }

    let updated = conn.transaction::<Review, AppError, _>(|conn| {
        Ok(moderation::restore_review(conn, review, moderator.0.id)?)
    })?;

    Ok(Json(ApiResponse::ok_with_message(updated, "Review restored from archive.")))
}

/// DELETE redirects to archival, same as for places.
pub async fn delete_review(
    state: State<Arc<AppState>>,
    moderator: ModeratorUser,
    path: Path<Uuid>,
) -> AppResult<Json<ApiResponse<Review>>> {
    archive_review(state, moderator, path).await
}

// --- Reports ---

pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    _moderator: ModeratorUser,
    Query(params): Query<ReportQueueParams>,
) -> AppResult<Json<ApiResponse<Paginated<ReviewReport>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let status = params
        .status
        .as_deref()
        .map(|raw| {
            raw.parse::<ReportStatus>()
                .map_err(|_| AppError::new(ErrorCode::ValidationError, "unknown status filter"))
        })
        .transpose()?;

    let pagination = pagination(params.page, params.per_page);

    let (items, total): (Vec<ReviewReport>, i64) = if let Some(status) = status {
        let items = review_reports::table
            .filter(review_reports::status.eq(status.as_str()))
            .order(review_reports::created_at.desc())
            .offset(pagination.offset() as i64)
            .limit(pagination.limit() as i64)
            .load(&mut conn)?;
        let total = review_reports::table
            .filter(review_reports::status.eq(status.as_str()))
            .count()
            .get_result(&mut conn)?;
        (items, total)
    } else {
        let items = review_reports::table
            .order(review_reports::created_at.desc())
            .offset(pagination.offset() as i64)
            .limit(pagination.limit() as i64)
            .load(&mut conn)?;
        let total = review_reports::table.count().get_result(&mut conn)?;
        (items, total)
    };

    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &pagination))))
}

// --- Audit log & stats ---

pub async fn audit_log(
    State(state): State<Arc<AppState>>,
    _moderator: ModeratorUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<ModerationLog>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let items: Vec<ModerationLog> = moderation_logs::table
        .order(moderation_logs::created_at.desc())
        .offset(params.offset() as i64)
        .limit(params.limit() as i64)
        .load(&mut conn)?;
    let total: i64 = moderation_logs::table.count().get_result(&mut conn)?;

    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &params))))
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    _moderator: ModeratorUser,
) -> AppResult<Json<ApiResponse<ModerationStats>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let pending_places: i64 = places::table
        .filter(places::moderation_status.eq(ModerationStatus::Pending.as_str()))
        .filter(places::is_archived.eq(false))
        .count()
        .get_result(&mut conn)?;

    let reported_reviews: i64 = reviews::table
        .filter(reviews::reported.eq(true))
        .filter(reviews::is_archived.eq(false))
        .count()
        .get_result(&mut conn)?;

    let pending_reports: i64 = review_reports::table
        .filter(review_reports::status.eq(ReportStatus::Pending.as_str()))
        .count()
        .get_result(&mut conn)?;

    let restricted_users: i64 = contributions::table
        .filter(contributions::review_restriction_active.eq(true))
        .count()
        .get_result(&mut conn)?;

    Ok(Json(ApiResponse::ok(ModerationStats {
        pending_places,
        reported_reviews,
        pending_reports,
        restricted_users,
    })))
}
