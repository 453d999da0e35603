//! Moderation state machine for places and reviews.
//!
//! Every transition writes exactly one audit log entry naming the actor,
//! the action, and the target. Callers are expected to run these inside a
//! transaction so the status change, ledger side effects, and audit entry
//! land together. Archival is the only deletion path exposed anywhere;
//! nothing in the management surface physically deletes a row.

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::models::{
    ModerationAction, ModerationStatus, NewModerationLog, Place, ReportStatus, Review, TargetKind,
};
use crate::schema::{moderation_logs, places, review_reports, reviews};
use crate::services::trust;

pub fn log_action(
    conn: &mut PgConnection,
    actor_id: Option<Uuid>,
    action: ModerationAction,
    target_kind: TargetKind,
    target_id: Uuid,
    notes: &str,
) -> QueryResult<()> {
    diesel::insert_into(moderation_logs::table)
        .values(&NewModerationLog {
            actor_id,
            action: action.as_str().to_string(),
            target_kind: target_kind.as_str().to_string(),
            target_id,
            notes: notes.to_string(),
        })
        .execute(conn)?;
    Ok(())
}

// --- Place transitions ---

pub fn approve_place(conn: &mut PgConnection, place: Place, actor_id: Uuid) -> QueryResult<Place> {
    let previous_status = place.moderation_status.clone();

    let updated: Place = diesel::update(places::table.find(place.id))
        .set((
            places::moderation_status.eq(ModerationStatus::Approved.as_str()),
            places::is_approved.eq(true),
        ))
        .get_result(conn)?;

    trust::record_place_approved(conn, &updated, &previous_status)?;
    log_action(
        conn,
        Some(actor_id),
        ModerationAction::PlaceApproved,
        TargetKind::Place,
        updated.id,
        "Approved from the moderation queue.",
    )?;

    Ok(updated)
}

pub fn reject_place(conn: &mut PgConnection, place: Place, actor_id: Uuid) -> QueryResult<Place> {
    let updated: Place = diesel::update(places::table.find(place.id))
        .set((
            places::moderation_status.eq(ModerationStatus::Rejected.as_str()),
            places::is_approved.eq(false),
        ))
        .get_result(conn)?;

    log_action(
        conn,
        Some(actor_id),
        ModerationAction::PlaceRejected,
        TargetKind::Place,
        updated.id,
        "Rejected from the moderation queue.",
    )?;

    Ok(updated)
}

pub fn archive_place(conn: &mut PgConnection, place: Place, actor_id: Uuid) -> QueryResult<Place> {
    let updated: Place = diesel::update(places::table.find(place.id))
        .set((
            places::is_archived.eq(true),
            places::archived_at.eq(Some(Utc::now())),
            places::archived_by.eq(Some(actor_id)),
            places::is_approved.eq(false),
        ))
        .get_result(conn)?;

    log_action(
        conn,
        Some(actor_id),
        ModerationAction::PlaceArchived,
        TargetKind::Place,
        updated.id,
        "Archived (soft delete).",
    )?;

    Ok(updated)
}

/// Clears the archive fields only. A restored place is NOT visible again
/// until a moderator re-approves it.
pub fn restore_place(conn: &mut PgConnection, place: Place, actor_id: Uuid) -> QueryResult<Place> {
    let updated: Place = diesel::update(places::table.find(place.id))
        .set((
            places::is_archived.eq(false),
            places::archived_at.eq(None::<chrono::DateTime<Utc>>),
            places::archived_by.eq(None::<Uuid>),
        ))
        .get_result(conn)?;

    log_action(
        conn,
        Some(actor_id),
        ModerationAction::PlaceRestored,
        TargetKind::Place,
        updated.id,
        "Restored from archive.",
    )?;

    Ok(updated)
}

// --- Review transitions ---

/// Uphold the pending reports against a review: the review is hidden, the
/// reports flip to `upheld`, and the author is penalized at most once.
pub fn uphold_review(conn: &mut PgConnection, review: Review, actor_id: Uuid) -> QueryResult<Review> {
    diesel::update(
        review_reports::table
            .filter(review_reports::review_id.eq(review.id))
            .filter(review_reports::status.eq(ReportStatus::Pending.as_str())),
    )
    .set(review_reports::status.eq(ReportStatus::Upheld.as_str()))
    .execute(conn)?;

    trust::record_upheld_report(conn, &review)?;

    let updated: Review = diesel::update(reviews::table.find(review.id))
        .set((reviews::is_approved.eq(false), reviews::reported.eq(false)))
        .get_result(conn)?;

    log_action(
        conn,
        Some(actor_id),
        ModerationAction::ReviewUpheld,
        TargetKind::Review,
        updated.id,
        "Upheld reported review and penalized the author.",
    )?;

    Ok(updated)
}

/// Dismiss the pending reports; the review stays visible.
pub fn dismiss_review(conn: &mut PgConnection, review: Review, actor_id: Uuid) -> QueryResult<Review> {
    diesel::update(
        review_reports::table
            .filter(review_reports::review_id.eq(review.id))
            .filter(review_reports::status.eq(ReportStatus::Pending.as_str())),
    )
    .set(review_reports::status.eq(ReportStatus::Dismissed.as_str()))
    .execute(conn)?;

    let updated: Review = diesel::update(reviews::table.find(review.id))
        .set(reviews::reported.eq(false))
        .get_result(conn)?;

    log_action(
        conn,
        Some(actor_id),
        ModerationAction::ReviewDismissed,
        TargetKind::Review,
        updated.id,
        "Dismissed reports and kept the review visible.",
    )?;

    Ok(updated)
}

pub fn archive_review(conn: &mut PgConnection, review: Review, actor_id: Uuid) -> QueryResult<Review> {
    let updated: Review = diesel::update(reviews::table.find(review.id))
        .set((
            reviews::is_archived.eq(true),
            reviews::archived_at.eq(Some(Utc::now())),
            reviews::archived_by.eq(Some(actor_id)),
            reviews::is_approved.eq(false),
            reviews::reported.eq(false),
        ))
        .get_result(conn)?;

    log_action(
        conn,
        Some(actor_id),
        ModerationAction::ReviewArchived,
        TargetKind::Review,
        updated.id,
        "Archived (soft delete).",
    )?;

    Ok(updated)
}

pub fn restore_review(conn: &mut PgConnection, review: Review, actor_id: Uuid) -> QueryResult<Review> {
    let updated: Review = diesel::update(reviews::table.find(review.id))
        .set((
            reviews::is_archived.eq(false),
            reviews::archived_at.eq(None::<chrono::DateTime<Utc>>),
            reviews::archived_by.eq(None::<Uuid>),
        ))
        .get_result(conn)?;

    log_action(
        conn,
        Some(actor_id),
        ModerationAction::ReviewRestored,
        TargetKind::Review,
        updated.id,
        "Restored from archive.",
    )?;

    Ok(updated)
}
