use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wayfinder_shared::errors::{AppError, AppResult, ErrorCode};
use wayfinder_shared::middleware::{OptionalAuthUser, SessionId};
use wayfinder_shared::types::auth::AuthUser;
use wayfinder_shared::types::{ApiResponse, Paginated, PaginationParams};

use crate::models::{NewReview, NewReviewReport, Place, Review};
use crate::routes::client_ip;
use crate::schema::{places, review_reports, reviews};
use crate::services::{spam, trust};
use crate::AppState;

const REVIEW_PER_PAGE_OPTIONS: [u64; 3] = [5, 10, 20];
const DEFAULT_REVIEW_PER_PAGE: u64 = 5;

#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub id: Uuid,
    pub place_id: Uuid,
    pub user_id: Option<Uuid>,
    pub rating: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id,
            place_id: review.place_id,
            user_id: review.user_id,
            rating: review.rating,
            text: review.text.clone(),
            created_at: review.created_at,
        }
    }
}

// --- Listing ---

#[derive(Debug, Deserialize)]
pub struct ReviewListParams {
    pub rating: Option<String>,
    pub sort: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    pub per_page: Option<String>,
}

fn default_page() -> u64 { 1 }

pub async fn list_place_reviews(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<Uuid>,
    Query(params): Query<ReviewListParams>,
) -> AppResult<Json<ApiResponse<Paginated<ReviewView>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let place: Place = places::table
        .find(place_id)
        .filter(places::is_archived.eq(false))
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::PlaceNotFound, "place not found"))?;

    let mut query = reviews::table
        .filter(reviews::place_id.eq(place.id))
        .filter(reviews::is_approved.eq(true))
        .filter(reviews::is_archived.eq(false))
        .into_boxed();
    let mut count_query = reviews::table
        .filter(reviews::place_id.eq(place.id))
        .filter(reviews::is_approved.eq(true))
        .filter(reviews::is_archived.eq(false))
        .into_boxed();

    let rating_filter = params
        .rating
        .as_deref()
        .and_then(|raw| raw.parse::<i32>().ok())
        .filter(|value| (1..=5).contains(value));
    if let Some(rating) = rating_filter {
        query = query.filter(reviews::rating.eq(rating));
        count_query = count_query.filter(reviews::rating.eq(rating));
    }

    query = match params.sort.as_deref() {
        Some("oldest") => query.order(reviews::created_at.asc()),
        Some("highest") => query.order((reviews::rating.desc(), reviews::created_at.desc())),
        Some("lowest") => query.order((reviews::rating.asc(), reviews::created_at.desc())),
        _ => query.order(reviews::created_at.desc()),
    };

    let per_page = params
        .per_page
        .as_deref()
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|value| REVIEW_PER_PAGE_OPTIONS.contains(value))
        .unwrap_or(DEFAULT_REVIEW_PER_PAGE);
    let pagination = PaginationParams { page: params.page.max(1), per_page };

    let total: i64 = count_query.count().get_result(&mut conn)?;
    let items: Vec<Review> = query
        .offset(pagination.offset() as i64)
        .limit(pagination.limit() as i64)
        .load(&mut conn)?;

    let views: Vec<ReviewView> = items.iter().map(ReviewView::from).collect();
    Ok(Json(ApiResponse::ok(Paginated::new(views, total as u64, &pagination))))
}

// --- Submission ---

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub text: String,
    /// Honeypot: hidden on the form, must stay empty.
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub captcha_answer: String,
}

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(auth): OptionalAuthUser,
    session_id: SessionId,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(place_id): Path<Uuid>,
    Json(req): Json<CreateReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewView>>> {
    let ip = client_ip(&headers, addr);
    let allowed = state
        .redis
        .rate_limit_check(
            &format!("rl:{ip}:post:review"),
            state.config.review_rate_per_hour,
            3600,
        )
        .await
        .map_err(|e| AppError::internal(format!("rate limiter error: {e}")))?;
    if !allowed {
        // The breach arms the CAPTCHA rather than hard-blocking the session.
        state
            .sessions
            .require_captcha(session_id)
            .await
            .map_err(|e| AppError::internal(format!("session store error: {e}")))?;
        return Err(AppError::new(
            ErrorCode::SecurityCheckRequired,
            "Too many attempts detected. Please complete the security check.",
        ));
    }

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let place: Place = places::table
        .find(place_id)
        .filter(places::is_approved.eq(true))
        .filter(places::is_archived.eq(false))
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::PlaceNotFound, "place not found"))?;

    // A filled honeypot gets the same generic failure as any invalid form.
    if !req.website.is_empty() {
        return Err(AppError::new(ErrorCode::ValidationError, "Please correct the errors below."));
    }
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::new(ErrorCode::ValidationError, "Rating must be between 1 and 5."));
    }
    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::new(ErrorCode::ValidationError, "Please write a review."));
    }
    spam::validate_review_text(&text)
        .map_err(|message| AppError::new(ErrorCode::ValidationError, message))?;

    let captcha_required = spam::get_or_create_captcha(&state.sessions, session_id)
        .await?
        .is_some();
    if captcha_required
        && !spam::validate_captcha(&state.sessions, session_id, &req.captcha_answer).await?
    {
        return Err(AppError::new(
            ErrorCode::CaptchaIncorrect,
            "Security answer was incorrect. Please try again.",
        ));
    }

    match &auth {
        Some(user) => {
            let contribution = trust::get_or_create(&mut conn, user.id)?;
            if contribution.review_restriction_active {
                return Err(AppError::new(
                    ErrorCode::ReviewRestricted,
                    "Your account is currently restricted from posting reviews.",
                ));
            }

            let existing: i64 = reviews::table
                .filter(reviews::place_id.eq(place.id))
                .filter(reviews::user_id.eq(user.id))
                .filter(reviews::is_archived.eq(false))
                .count()
                .get_result(&mut conn)?;
            if existing > 0 {
                return Err(AppError::new(
                    ErrorCode::AlreadyReviewed,
                    "You have already reviewed this place.",
                ));
            }
        }
        None => {
            let already = state
                .sessions
                .guest_has_reviewed(session_id, place.id)
                .await
                .map_err(|e| AppError::internal(format!("session store error: {e}")))?;
            if already {
                return Err(AppError::new(
                    ErrorCode::GuestReviewLimit,
                    "Guest users can only submit one review per place in this session. \
                     Please sign in to edit or add another review.",
                ));
            }
        }
    }

    if spam::is_duplicate_or_similar_review(&mut conn, place.id, &text)? {
        return Err(AppError::new(
            ErrorCode::DuplicateReview,
            "This review looks too similar to an existing one for this place.",
        ));
    }

    let author_id = auth.as_ref().map(|user| user.id);
    let created = conn.transaction::<Review, AppError, _>(|conn| {
        let review: Review = diesel::insert_into(reviews::table)
            .values(&NewReview {
                place_id: place.id,
                user_id: author_id,
                rating: req.rating,
                text: text.clone(),
            })
            .get_result(conn)?;

        if let Some(user_id) = author_id {
            trust::record_review_created(conn, user_id)?;
        }

        Ok(review)
    });

    let review = match created {
        Ok(review) => review,
        // The partial unique index on (place, user) wins the race against a
        // concurrent duplicate; surface it as the normal duplicate message.
        Err(err) if err.is_unique_violation() => {
            return Err(AppError::new(
                ErrorCode::AlreadyReviewed,
                "You have already reviewed this place.",
            ));
        }
        Err(err) => return Err(err),
    };

    if auth.is_none() {
        if let Err(e) = state.sessions.mark_guest_reviewed(session_id, place.id).await {
            tracing::warn!(error = %e, "failed to record guest review in session");
        }
    }

    tracing::info!(review_id = %review.id, place_id = %place.id, "review submitted");

    Ok(Json(ApiResponse::ok_with_message(
        ReviewView::from(&review),
        "Review submitted!",
    )))
}

// --- Reporting ---

#[derive(Debug, Deserialize)]
pub struct ReportReviewRequest {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ReportReviewResponse {
    pub review_id: Uuid,
    pub reported: bool,
}

pub async fn report_review(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(review_id): Path<Uuid>,
    Json(req): Json<ReportReviewRequest>,
) -> AppResult<Json<ApiResponse<ReportReviewResponse>>> {
    let ip = client_ip(&headers, addr);
    let allowed = state
        .redis
        .rate_limit_check(
            &format!("rl:{ip}:post:report"),
            state.config.report_rate_per_hour,
            3600,
        )
        .await
        .map_err(|e| AppError::internal(format!("rate limiter error: {e}")))?;
    if !allowed {
        return Err(AppError::new(
            ErrorCode::RateLimited,
            "Too many report attempts. Please wait before submitting another report.",
        ));
    }

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let review: Review = reviews::table
        .find(review_id)
        .filter(reviews::is_archived.eq(false))
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::ReviewNotFound, "review not found"))?;

    if review.user_id == Some(auth.id) {
        return Err(AppError::new(
            ErrorCode::CannotReportSelf,
            "You cannot report your own review.",
        ));
    }

    let reason: String = req.reason.trim().chars().take(255).collect();

    let result = conn.transaction::<(), AppError, _>(|conn| {
        diesel::insert_into(review_reports::table)
            .values(&NewReviewReport {
                review_id: review.id,
                reporter_id: auth.id,
                reason: reason.clone(),
            })
            .execute(conn)?;

        diesel::update(reviews::table.find(review.id))
            .set((reviews::reported.eq(true), reviews::report_reason.eq(&reason)))
            .execute(conn)?;

        Ok(())
    });

    match result {
        Ok(()) => {}
        Err(err) if err.is_unique_violation() => {
            return Err(AppError::new(
                ErrorCode::DuplicateReport,
                "You have already reported this review.",
            ));
        }
        Err(err) => return Err(err),
    }

    tracing::info!(review_id = %review.id, reporter_id = %auth.id, "review reported");

    Ok(Json(ApiResponse::ok_with_message(
        ReportReviewResponse { review_id: review.id, reported: true },
        "Review reported for moderation.",
    )))
}
