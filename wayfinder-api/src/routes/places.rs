use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, NaiveTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use wayfinder_shared::errors::{AppError, AppResult, ErrorCode};
use wayfinder_shared::middleware::{OptionalAuthUser, SessionId};
use wayfinder_shared::types::auth::AuthUser;
use wayfinder_shared::types::{ApiResponse, Paginated, PaginationParams};

use crate::models::{
    ModerationStatus, NewPlace, NewPlaceLike, Place, PlaceCategory, PlaceDetails, PlaceLike,
};
use crate::routes::client_ip;
use crate::schema::{place_likes, places, reviews};
use crate::services::{geo, spam};
use crate::AppState;

const SEARCH_PER_PAGE_OPTIONS: [u64; 3] = [6, 12, 24];
const DEFAULT_SEARCH_PER_PAGE: u64 = 12;

// --- Shared view types ---

/// Per-place aggregates computed over approved, non-archived reviews and
/// the likes table.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PlaceStats {
    pub average_rating: Option<f64>,
    pub reviews_total: i64,
    pub likes_total: i64,
}

pub(crate) fn load_place_stats(
    conn: &mut PgConnection,
    ids: &[Uuid],
) -> QueryResult<HashMap<Uuid, PlaceStats>> {
    let mut stats: HashMap<Uuid, PlaceStats> = HashMap::new();
    if ids.is_empty() {
        return Ok(stats);
    }

    let ratings: Vec<(Uuid, i32)> = reviews::table
        .filter(reviews::place_id.eq_any(ids))
        .filter(reviews::is_approved.eq(true))
        .filter(reviews::is_archived.eq(false))
        .select((reviews::place_id, reviews::rating))
        .load(conn)?;

    let mut totals: HashMap<Uuid, (i64, i64)> = HashMap::new();
    for (place_id, rating) in ratings {
        let entry = totals.entry(place_id).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += rating as i64;
    }
    for (place_id, (count, sum)) in totals {
        let average = (sum as f64 / count as f64 * 100.0).round() / 100.0;
        stats.insert(
            place_id,
            PlaceStats {
                average_rating: Some(average),
                reviews_total: count,
                likes_total: 0,
            },
        );
    }

    let likes: Vec<Uuid> = place_likes::table
        .filter(place_likes::place_id.eq_any(ids))
        .select(place_likes::place_id)
        .load(conn)?;
    for place_id in likes {
        stats.entry(place_id).or_default().likes_total += 1;
    }

    Ok(stats)
}

#[derive(Debug, Serialize)]
pub struct PlaceSummary {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub town_city: String,
    pub postcode: String,
    pub average_rating: Option<f64>,
    pub reviews_total: i64,
    pub likes_total: i64,
    pub is_open_now: Option<bool>,
}

impl PlaceSummary {
    fn build(place: &Place, stats: PlaceStats) -> Self {
        Self {
            id: place.id,
            name: place.name.clone(),
            category: place.category.clone(),
            description: place.description.clone(),
            town_city: place.town_city.clone(),
            postcode: place.postcode.clone(),
            average_rating: stats.average_rating,
            reviews_total: stats.reviews_total,
            likes_total: stats.likes_total,
            is_open_now: place.is_open_now(),
        }
    }
}

/// Public representation of a place: moderation bookkeeping stays internal.
#[derive(Debug, Serialize)]
pub struct PlaceView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub details: PlaceDetails,
    pub location_text: String,
    pub address_line_1: String,
    pub town_city: String,
    pub postcode: String,
    pub website_url: String,
    pub phone_number: String,
    pub best_time_to_visit: String,
    pub child_friendly: bool,
    pub pet_friendly: bool,
    pub estimated_visit_minutes: Option<i32>,
    pub opening_days: String,
    pub opening_days_display: String,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub supports_opening_hours: bool,
    pub is_open_now: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub moderation_status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Place> for PlaceView {
    fn from(place: &Place) -> Self {
        Self {
            id: place.id,
            name: place.name.clone(),
            description: place.description.clone(),
            category: place.category.clone(),
            details: place.details(),
            location_text: place.location_text.clone(),
            address_line_1: place.address_line_1.clone(),
            town_city: place.town_city.clone(),
            postcode: place.postcode.clone(),
            website_url: place.website_url.clone(),
            phone_number: place.phone_number.clone(),
            best_time_to_visit: place.best_time_to_visit.clone(),
            child_friendly: place.child_friendly,
            pet_friendly: place.pet_friendly,
            estimated_visit_minutes: place.estimated_visit_minutes,
            opening_days: place.opening_days.clone(),
            opening_days_display: place.opening_days_display(),
            opening_time: place.opening_time,
            closing_time: place.closing_time,
            supports_opening_hours: place.supports_opening_hours(),
            is_open_now: place.is_open_now(),
            latitude: place.latitude,
            longitude: place.longitude,
            moderation_status: place.moderation_status.clone(),
            created_at: place.created_at,
        }
    }
}

fn visible_place(conn: &mut PgConnection, place_id: Uuid) -> AppResult<Place> {
    places::table
        .find(place_id)
        .filter(places::is_approved.eq(true))
        .filter(places::is_archived.eq(false))
        .first(conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::PlaceNotFound, "place not found"))
}

// --- Categories ---

#[derive(Debug, Serialize)]
pub struct CategoryOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub async fn list_categories() -> Json<ApiResponse<Vec<CategoryOption>>> {
    let options = PlaceCategory::ALL
        .iter()
        .map(|category| CategoryOption {
            value: category.as_str(),
            label: category.label(),
        })
        .collect();
    Json(ApiResponse::ok(options))
}

// --- Search ---

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_rating: Option<String>,
    pub open_now: Option<String>,
    pub sort: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    pub per_page: Option<String>,
}

fn default_page() -> u64 { 1 }

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn parse_per_page(raw: Option<&str>, options: &[u64], fallback: u64) -> u64 {
    raw.and_then(|value| value.parse::<u64>().ok())
        .filter(|value| options.contains(value))
        .unwrap_or(fallback)
}

pub async fn search_places(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ApiResponse<Paginated<PlaceSummary>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let mut query = places::table
        .filter(places::is_approved.eq(true))
        .filter(places::is_archived.eq(false))
        .into_boxed();

    if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", escape_like(q));
        query = query.filter(
            places::name
                .ilike(pattern.clone())
                .or(places::description.ilike(pattern.clone()))
                .or(places::location_text.ilike(pattern.clone()))
                .or(places::town_city.ilike(pattern.clone()))
                .or(places::postcode.ilike(pattern)),
        );
    }

    if let Some(category) = params
        .category
        .as_deref()
        .and_then(|raw| raw.parse::<PlaceCategory>().ok())
    {
        query = query.filter(places::category.eq(category.as_str()));
    }

    let candidates: Vec<Place> = query.load(&mut conn)?;
    let ids: Vec<Uuid> = candidates.iter().map(|place| place.id).collect();
    let stats = load_place_stats(&mut conn, &ids)?;

    let min_rating = params
        .min_rating
        .as_deref()
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|value| (1..=5).contains(value));
    let open_now_only = params.open_now.as_deref() == Some("1");

    let mut results: Vec<(Place, PlaceStats)> = candidates
        .into_iter()
        .map(|place| {
            let place_stats = stats.get(&place.id).copied().unwrap_or_default();
            (place, place_stats)
        })
        .filter(|(_, place_stats)| match min_rating {
            Some(min) => place_stats.average_rating.unwrap_or(0.0) >= min as f64,
            None => true,
        })
        .filter(|(place, _)| !open_now_only || place.is_open_now() == Some(true))
        .collect();

    let sort = params.sort.as_deref().unwrap_or("top_rated");
    let sort = if matches!(
        sort,
        "top_rated" | "most_liked" | "newest" | "name_az" | "rating_low_high"
    ) {
        sort
    } else {
        "top_rated"
    };
    sort_results(&mut results, sort);

    let per_page = parse_per_page(
        params.per_page.as_deref(),
        &SEARCH_PER_PAGE_OPTIONS,
        DEFAULT_SEARCH_PER_PAGE,
    );
    let pagination = PaginationParams { page: params.page.max(1), per_page };
    let total = results.len() as u64;
    let page_items: Vec<PlaceSummary> = results
        .iter()
        .skip(pagination.offset() as usize)
        .take(pagination.limit() as usize)
        .map(|(place, place_stats)| PlaceSummary::build(place, *place_stats))
        .collect();

    Ok(Json(ApiResponse::ok(Paginated::new(page_items, total, &pagination))))
}

fn sort_results(results: &mut [(Place, PlaceStats)], sort: &str) {
    match sort {
        "most_liked" => results.sort_by(|a, b| {
            b.1.likes_total
                .cmp(&a.1.likes_total)
                .then(b.1.average_rating.unwrap_or(0.0).total_cmp(&a.1.average_rating.unwrap_or(0.0)))
                .then_with(|| a.0.name.cmp(&b.0.name))
        }),
        "newest" => results.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at)),
        "name_az" => results.sort_by(|a, b| a.0.name.cmp(&b.0.name)),
        "rating_low_high" => results.sort_by(|a, b| {
            a.1.average_rating
                .unwrap_or(0.0)
                .total_cmp(&b.1.average_rating.unwrap_or(0.0))
                .then(b.1.likes_total.cmp(&a.1.likes_total))
                .then_with(|| a.0.name.cmp(&b.0.name))
        }),
        _ => results.sort_by(|a, b| {
            b.1.average_rating
                .unwrap_or(0.0)
                .total_cmp(&a.1.average_rating.unwrap_or(0.0))
                .then(b.1.likes_total.cmp(&a.1.likes_total))
                .then_with(|| a.0.name.cmp(&b.0.name))
        }),
    }
}

// --- Detail ---

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    pub force_captcha: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RatingRow {
    pub star: i32,
    pub count: i64,
    pub percent: i64,
}

#[derive(Debug, Serialize)]
pub struct NearbyPlace {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub town_city: String,
    pub distance_km: f64,
    pub average_rating: Option<f64>,
    pub likes_total: i64,
}

#[derive(Debug, Serialize)]
pub struct PlaceDetailResponse {
    pub place: PlaceView,
    pub average_rating: Option<f64>,
    pub total_reviews: i64,
    pub rating_rows: Vec<RatingRow>,
    pub likes_total: i64,
    pub user_has_liked: bool,
    pub can_edit_opening_hours: bool,
    pub nearby_places: Vec<NearbyPlace>,
    pub nearby_radius_km: f64,
    pub captcha_required: bool,
    pub captcha_question: Option<String>,
}

pub async fn place_detail(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(auth): OptionalAuthUser,
    session_id: SessionId,
    Path(place_id): Path<Uuid>,
    Query(params): Query<DetailParams>,
) -> AppResult<Json<ApiResponse<PlaceDetailResponse>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let place = visible_place(&mut conn, place_id)?;

    let ratings: Vec<i32> = reviews::table
        .filter(reviews::place_id.eq(place.id))
        .filter(reviews::is_approved.eq(true))
        .filter(reviews::is_archived.eq(false))
        .select(reviews::rating)
        .load(&mut conn)?;

    let total_reviews = ratings.len() as i64;
    let average_rating = if ratings.is_empty() {
        None
    } else {
        let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
        Some((sum as f64 / total_reviews as f64 * 100.0).round() / 100.0)
    };
    let rating_rows: Vec<RatingRow> = (1..=5)
        .rev()
        .map(|star| {
            let count = ratings.iter().filter(|r| **r == star).count() as i64;
            let percent = if total_reviews > 0 {
                (count as f64 / total_reviews as f64 * 100.0).round() as i64
            } else {
                0
            };
            RatingRow { star, count, percent }
        })
        .collect();

    let likes_total: i64 = place_likes::table
        .filter(place_likes::place_id.eq(place.id))
        .count()
        .get_result(&mut conn)?;

    let user_has_liked = match &auth {
        Some(user) => {
            let liked: i64 = place_likes::table
                .filter(place_likes::place_id.eq(place.id))
                .filter(place_likes::user_id.eq(user.id))
                .count()
                .get_result(&mut conn)?;
            liked > 0
        }
        None => false,
    };

    let can_edit_opening_hours = match &auth {
        Some(user) => {
            place.supports_opening_hours()
                && (!place.has_opening_hours()
                    || place.created_by == Some(user.id)
                    || user.role.is_moderator())
        }
        None => false,
    };

    let nearby_places = load_nearby(&mut conn, &place)?;

    if params.force_captcha.as_deref() == Some("1") {
        state
            .sessions
            .require_captcha(session_id)
            .await
            .map_err(|e| AppError::internal(format!("session store error: {e}")))?;
    }
    let captcha_question = spam::get_or_create_captcha(&state.sessions, session_id).await?;

    Ok(Json(ApiResponse::ok(PlaceDetailResponse {
        place: PlaceView::from(&place),
        average_rating,
        total_reviews,
        rating_rows,
        likes_total,
        user_has_liked,
        can_edit_opening_hours,
        nearby_places,
        nearby_radius_km: geo::NEARBY_RADIUS_KM,
        captcha_required: captcha_question.is_some(),
        captcha_question,
    })))
}

fn load_nearby(conn: &mut PgConnection, place: &Place) -> AppResult<Vec<NearbyPlace>> {
    let (Some(lat), Some(lon)) = (place.latitude, place.longitude) else {
        return Ok(Vec::new());
    };

    let candidates: Vec<Place> = places::table
        .filter(places::is_approved.eq(true))
        .filter(places::is_archived.eq(false))
        .filter(places::latitude.is_not_null())
        .filter(places::longitude.is_not_null())
        .filter(places::id.ne(place.id))
        .load(conn)?;

    let triples: Vec<(Place, f64, f64)> = candidates
        .into_iter()
        .filter_map(|candidate| match (candidate.latitude, candidate.longitude) {
            (Some(c_lat), Some(c_lon)) => Some((candidate, c_lat, c_lon)),
            _ => None,
        })
        .collect();

    let within = geo::nearby((lat, lon), triples, geo::NEARBY_RADIUS_KM, geo::NEARBY_LIMIT);

    let ids: Vec<Uuid> = within.iter().map(|(candidate, _)| candidate.id).collect();
    let stats = load_place_stats(conn, &ids)?;

    Ok(within
        .into_iter()
        .map(|(candidate, distance_km)| {
            let candidate_stats = stats.get(&candidate.id).copied().unwrap_or_default();
            NearbyPlace {
                id: candidate.id,
                name: candidate.name,
                category: candidate.category,
                town_city: candidate.town_city,
                distance_km,
                average_rating: candidate_stats.average_rating,
                likes_total: candidate_stats.likes_total,
            }
        })
        .collect())
}

// --- Submission ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlaceRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub details: Option<PlaceDetails>,
    #[serde(default)]
    pub location_text: String,
    #[serde(default)]
    pub address_line_1: String,
    #[serde(default)]
    pub town_city: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub best_time_to_visit: String,
    #[serde(default)]
    pub child_friendly: bool,
    #[serde(default)]
    pub pet_friendly: bool,
    #[serde(default)]
    pub estimated_visit_minutes: Option<i32>,
    #[serde(default)]
    pub opening_days: String,
    #[serde(default)]
    pub opening_time: Option<String>,
    #[serde(default)]
    pub closing_time: Option<String>,
}

fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| {
            AppError::new(ErrorCode::ValidationError, "Please correct the opening hours details.")
        })
}

fn parse_hours(
    opening: Option<&str>,
    closing: Option<&str>,
) -> Result<(Option<NaiveTime>, Option<NaiveTime>), AppError> {
    match (opening, closing) {
        (None, None) => Ok((None, None)),
        (Some(open), Some(close)) => Ok((Some(parse_time(open)?), Some(parse_time(close)?))),
        _ => Err(AppError::new(
            ErrorCode::ValidationError,
            "Please provide both an opening and a closing time.",
        )),
    }
}

pub async fn create_place(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<CreatePlaceRequest>,
) -> AppResult<Json<ApiResponse<PlaceView>>> {
    let ip = client_ip(&headers, addr);
    let allowed = state
        .redis
        .rate_limit_check(
            &format!("rl:{ip}:post:place"),
            state.config.place_rate_per_hour,
            3600,
        )
        .await
        .map_err(|e| AppError::internal(format!("rate limiter error: {e}")))?;
    if !allowed {
        return Err(AppError::new(
            ErrorCode::RateLimited,
            "Too many place submissions. Please wait and try again.",
        ));
    }

    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;

    let category: PlaceCategory = req
        .category
        .parse()
        .map_err(|_| AppError::new(ErrorCode::ValidationError, "Please select a valid place category."))?;

    let (opening_time, closing_time) =
        parse_hours(req.opening_time.as_deref(), req.closing_time.as_deref())?;

    let geocode_query = if !req.location_text.trim().is_empty() {
        req.location_text.trim().to_string()
    } else if !req.postcode.trim().is_empty() {
        req.postcode.trim().to_string()
    } else {
        [&req.address_line_1, &req.town_city, &req.postcode]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let Some((latitude, longitude)) = state.geocoder.lookup(&geocode_query).await else {
        return Err(AppError::new(ErrorCode::GeocodeFailed, "We couldn't find that location."));
    };

    let details = req.details.unwrap_or_default();
    let details_value = serde_json::to_value(&details)
        .map_err(|e| AppError::internal(format!("details serialization failed: {e}")))?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let place: Place = diesel::insert_into(places::table)
        .values(&NewPlace {
            name: req.name.trim().to_string(),
            description: req.description,
            category: category.as_str().to_string(),
            details: details_value,
            location_text: req.location_text.trim().to_string(),
            address_line_1: req.address_line_1.trim().to_string(),
            town_city: req.town_city.trim().to_string(),
            postcode: req.postcode.trim().to_string(),
            website_url: req.website_url.trim().to_string(),
            phone_number: req.phone_number.trim().to_string(),
            best_time_to_visit: req.best_time_to_visit.trim().to_string(),
            child_friendly: req.child_friendly,
            pet_friendly: req.pet_friendly,
            estimated_visit_minutes: req.estimated_visit_minutes,
            opening_days: req.opening_days.trim().to_string(),
            opening_time,
            closing_time,
            latitude: Some(latitude),
            longitude: Some(longitude),
            created_by: Some(auth.id),
            moderation_status: ModerationStatus::Pending.as_str().to_string(),
            is_approved: false,
        })
        .get_result(&mut conn)?;

    tracing::info!(place_id = %place.id, "place submitted for review");

    Ok(Json(ApiResponse::ok_with_message(
        PlaceView::from(&place),
        "Place submitted successfully and is pending approval.",
    )))
}

// --- Opening hours ---

#[derive(Debug, Deserialize)]
pub struct UpdateOpeningHoursRequest {
    #[serde(default)]
    pub opening_days: String,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
}

pub async fn update_opening_hours(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(place_id): Path<Uuid>,
    Json(req): Json<UpdateOpeningHoursRequest>,
) -> AppResult<Json<ApiResponse<PlaceView>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let place = visible_place(&mut conn, place_id)?;

    if !place.supports_opening_hours() {
        return Err(AppError::new(
            ErrorCode::OpeningHoursNotApplicable,
            "Opening hours are not applicable for this place type.",
        ));
    }

    let can_edit = !place.has_opening_hours()
        || place.created_by == Some(auth.id)
        || auth.role.is_moderator();
    if !can_edit {
        return Err(AppError::new(
            ErrorCode::OpeningHoursLocked,
            "Opening hours are already set for this place.",
        ));
    }

    let (opening_time, closing_time) =
        parse_hours(req.opening_time.as_deref(), req.closing_time.as_deref())?;

    let updated: Place = diesel::update(places::table.find(place.id))
        .set((
            places::opening_days.eq(req.opening_days.trim()),
            places::opening_time.eq(opening_time),
            places::closing_time.eq(closing_time),
        ))
        .get_result(&mut conn)?;

    Ok(Json(ApiResponse::ok_with_message(
        PlaceView::from(&updated),
        "Opening hours saved.",
    )))
}

// --- Likes ---

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: i64,
}

pub async fn toggle_like(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(place_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LikeResponse>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let place = visible_place(&mut conn, place_id)?;

    let liked = conn.transaction::<bool, AppError, _>(|conn| {
        let existing: Option<PlaceLike> = place_likes::table
            .filter(place_likes::place_id.eq(place.id))
            .filter(place_likes::user_id.eq(auth.id))
            .first(conn)
            .optional()?;

        if let Some(like) = existing {
            diesel::delete(place_likes::table.find(like.id)).execute(conn)?;
            Ok(false)
        } else {
            diesel::insert_into(place_likes::table)
                .values(&NewPlaceLike { place_id: place.id, user_id: auth.id })
                .on_conflict((place_likes::place_id, place_likes::user_id))
                .do_nothing()
                .execute(conn)?;
            Ok(true)
        }
    })?;

    let likes_count: i64 = place_likes::table
        .filter(place_likes::place_id.eq(place.id))
        .count()
        .get_result(&mut conn)?;

    Ok(Json(ApiResponse::ok(LikeResponse { liked, likes_count })))
}
