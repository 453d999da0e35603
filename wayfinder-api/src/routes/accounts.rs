use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use wayfinder_shared::errors::{AppError, AppResult, ErrorCode};
use wayfinder_shared::types::auth::{AuthToken, AuthUser, UserRole};
use wayfinder_shared::types::ApiResponse;

use crate::models::{
    Account, AccountActivation, Contribution, ModerationStatus, NewAccount, NewAccountActivation,
    Place,
};
use crate::schema::{account_activations, accounts, place_likes, places};
use crate::services::{auth_service, trust};
use crate::AppState;

// --- Signup ---

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> AppResult<Json<ApiResponse<Account>>> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;

    if req.password != req.password_confirm {
        return Err(AppError::new(ErrorCode::ValidationError, "Passwords do not match."));
    }
    auth_service::validate_password(&req.password)?;

    let password_hash = auth_service::hash_password(&req.password)?;
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let username_taken: i64 = accounts::table
        .filter(accounts::username.eq(&req.username))
        .count()
        .get_result(&mut conn)?;
    if username_taken > 0 {
        return Err(AppError::new(ErrorCode::UsernameTaken, "Username already exists."));
    }

    let email_taken: i64 = accounts::table
        .filter(accounts::email.eq(req.email.to_lowercase()))
        .count()
        .get_result(&mut conn)?;
    if email_taken > 0 {
        return Err(AppError::new(ErrorCode::EmailAlreadyExists, "Email address already in use."));
    }

    let code = auth_service::generate_activation_code();

    let account: Account = conn.transaction::<_, AppError, _>(|conn| {
        let account: Account = diesel::insert_into(accounts::table)
            .values(&NewAccount {
                username: req.username.clone(),
                email: req.email.to_lowercase(),
                password_hash: password_hash.clone(),
                role: UserRole::User.to_string(),
                is_active: false,
            })
            .get_result(conn)?;

        trust::get_or_create(conn, account.id)?;

        diesel::insert_into(account_activations::table)
            .values(&NewAccountActivation {
                account_id: account.id,
                code_hash: auth_service::hash_activation_code(&code),
                expires_at: Utc::now() + Duration::hours(24),
            })
            .execute(conn)?;

        Ok(account)
    })?;

    if let Err(e) = state.email.send_activation_code(&account.email, &code).await {
        tracing::error!(error = %e, "failed to send activation email");
    }

    tracing::info!(account_id = %account.id, "account created, pending activation");

    Ok(Json(ApiResponse::ok_with_message(
        account,
        "Account created! Check your email to activate your account.",
    )))
}

// --- Activation ---

#[derive(Debug, Deserialize)]
pub struct ActivateRequest {
    pub email: String,
    pub code: String,
}

pub async fn activate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ActivateRequest>,
) -> AppResult<Json<ApiResponse<Account>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let account: Account = accounts::table
        .filter(accounts::email.eq(req.email.to_lowercase()))
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ActivationInvalid, "Activation code is invalid or expired.")
        })?;

    if account.is_active {
        return Ok(Json(ApiResponse::ok_with_message(
            account,
            "Your account is already active.",
        )));
    }

    let submitted_hash = auth_service::hash_activation_code(req.code.trim());
    let activation: Option<AccountActivation> = account_activations::table
        .filter(account_activations::account_id.eq(account.id))
        .filter(account_activations::code_hash.eq(&submitted_hash))
        .first(&mut conn)
        .optional()?;
    let valid = activation
        .map(|activation| activation.expires_at > Utc::now())
        .unwrap_or(false);
    if !valid {
        return Err(AppError::new(
            ErrorCode::ActivationInvalid,
            "Activation code is invalid or expired.",
        ));
    }

    let activated: Account = conn.transaction::<_, AppError, _>(|conn| {
        let activated: Account = diesel::update(accounts::table.find(account.id))
            .set(accounts::is_active.eq(true))
            .get_result(conn)?;

        diesel::delete(
            account_activations::table.filter(account_activations::account_id.eq(account.id)),
        )
        .execute(conn)?;

        Ok(activated)
    })?;

    tracing::info!(account_id = %activated.id, "account activated");

    Ok(Json(ApiResponse::ok_with_message(
        activated,
        "Your account has been activated! You can now log in.",
    )))
}

// --- Login ---

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthToken>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let account: Account = accounts::table
        .filter(accounts::username.eq(&req.username))
        .first(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::InvalidCredentials, "Invalid username or password."))?;

    let valid = auth_service::verify_password(&req.password, &account.password_hash)?;
    if !valid {
        return Err(AppError::new(ErrorCode::InvalidCredentials, "Invalid username or password."));
    }

    if !account.is_active {
        return Err(AppError::new(
            ErrorCode::AccountNotActivated,
            "Please activate your account via email.",
        ));
    }

    let role = account.role.parse::<UserRole>().unwrap_or(UserRole::User);
    let token = auth_service::create_access_token(
        account.id,
        role,
        &state.config.jwt_secret,
        state.config.jwt_access_ttl,
    )?;

    tracing::info!(account_id = %account.id, "user logged in");

    Ok(Json(ApiResponse::ok(token)))
}

// --- Profile & contributions ---

#[derive(Debug, Serialize)]
pub struct ContributionSummary {
    pub places_added: i32,
    pub reviews_added: i32,
    pub points: i32,
    pub upheld_reports_count: i32,
    pub review_restriction_active: bool,
    pub level_name: &'static str,
    pub level_badge_class: &'static str,
    pub next_level_name: Option<&'static str>,
    pub points_to_next_level: i32,
    pub level_progress_percent: i32,
    pub is_trusted: bool,
}

impl From<&Contribution> for ContributionSummary {
    fn from(contribution: &Contribution) -> Self {
        Self {
            places_added: contribution.places_added,
            reviews_added: contribution.reviews_added,
            points: contribution.points,
            upheld_reports_count: contribution.upheld_reports_count,
            review_restriction_active: contribution.review_restriction_active,
            level_name: contribution.level_name(),
            level_badge_class: contribution.level_badge_class(),
            next_level_name: contribution.next_level_name(),
            points_to_next_level: contribution.points_to_next_level(),
            level_progress_percent: contribution.level_progress_percent(),
            is_trusted: contribution.is_trusted(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfilePlace {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub moderation_status: String,
    pub is_archived: bool,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<&Place> for ProfilePlace {
    fn from(place: &Place) -> Self {
        Self {
            id: place.id,
            name: place.name.clone(),
            category: place.category.clone(),
            moderation_status: place.moderation_status.clone(),
            is_archived: place.is_archived,
            created_at: place.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub contribution: ContributionSummary,
    pub pending_places: Vec<ProfilePlace>,
    pub approved_places: Vec<ProfilePlace>,
    pub rejected_places: Vec<ProfilePlace>,
    pub liked_places: Vec<ProfilePlace>,
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<ProfileResponse>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let contribution = trust::get_or_create(&mut conn, auth.id)?;

    let submitted: Vec<Place> = places::table
        .filter(places::created_by.eq(auth.id))
        .order(places::created_at.desc())
        .load(&mut conn)?;

    let by_status = |status: ModerationStatus| -> Vec<ProfilePlace> {
        submitted
            .iter()
            .filter(|place| place.moderation_status == status.as_str())
            .map(ProfilePlace::from)
            .collect()
    };

    let liked: Vec<Place> = places::table
        .inner_join(place_likes::table)
        .filter(place_likes::user_id.eq(auth.id))
        .filter(places::is_approved.eq(true))
        .filter(places::is_archived.eq(false))
        .select(places::all_columns)
        .order(places::name.asc())
        .load(&mut conn)?;

    Ok(Json(ApiResponse::ok(ProfileResponse {
        contribution: ContributionSummary::from(&contribution),
        pending_places: by_status(ModerationStatus::Pending),
        approved_places: by_status(ModerationStatus::Approved),
        rejected_places: by_status(ModerationStatus::Rejected),
        liked_places: liked.iter().map(ProfilePlace::from).collect(),
    })))
}

pub async fn contributions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<ContributionSummary>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let contribution = trust::get_or_create(&mut conn, auth.id)?;
    Ok(Json(ApiResponse::ok(ContributionSummary::from(&contribution))))
}
