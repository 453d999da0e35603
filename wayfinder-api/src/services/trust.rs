//! Contribution ledger: points, counters, and the review restriction.
//!
//! All mutations are explicit functions invoked by handlers after the
//! primary row is written, inside the same transaction. Nothing here runs
//! from implicit save hooks, so ordering and idempotency are auditable at
//! the call sites.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::models::{Contribution, ModerationStatus, NewContribution, Place, Review};
use crate::schema::{contributions, reviews};

pub const REVIEW_REWARD_POINTS: i32 = 10;
pub const PLACE_APPROVAL_POINTS: i32 = 50;
pub const UPHELD_REPORT_PENALTY: i32 = 30;
pub const RESTRICTION_THRESHOLD: i32 = 3;

/// Fetch the ledger row for a user, creating an empty one on first use.
pub fn get_or_create(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Contribution> {
    if let Some(existing) = contributions::table
        .filter(contributions::user_id.eq(user_id))
        .first::<Contribution>(conn)
        .optional()?
    {
        return Ok(existing);
    }

    diesel::insert_into(contributions::table)
        .values(&NewContribution { user_id })
        .on_conflict(contributions::user_id)
        .do_nothing()
        .execute(conn)?;

    contributions::table
        .filter(contributions::user_id.eq(user_id))
        .first(conn)
}

pub fn award_review(contribution: &mut Contribution) {
    contribution.reviews_added += 1;
    contribution.points += REVIEW_REWARD_POINTS;
}

pub fn award_place_approval(contribution: &mut Contribution) {
    contribution.places_added += 1;
    contribution.points += PLACE_APPROVAL_POINTS;
}

/// Penalty for one upheld report. Points floor at zero; the restriction
/// latches on at the threshold and nothing in this module clears it.
pub fn apply_upheld_penalty(contribution: &mut Contribution) {
    contribution.upheld_reports_count += 1;
    contribution.points = (contribution.points - UPHELD_REPORT_PENALTY).max(0);
    if contribution.upheld_reports_count >= RESTRICTION_THRESHOLD {
        contribution.review_restriction_active = true;
    }
}

fn persist(conn: &mut PgConnection, contribution: &Contribution) -> QueryResult<Contribution> {
    diesel::update(contributions::table.find(contribution.id))
        .set(contribution)
        .get_result(conn)
}

/// Reward an authenticated author for a newly created review.
pub fn record_review_created(conn: &mut PgConnection, author_id: Uuid) -> QueryResult<Contribution> {
    let mut contribution = get_or_create(conn, author_id)?;
    award_review(&mut contribution);
    persist(conn, &contribution)
}

/// The approval bonus is due only on a genuine transition into `approved`:
/// the previously stored status was something else and the new one is
/// approved. Re-saving an already-approved place is not a transition.
pub fn approval_award_due(previous_status: &str, new_status: &str) -> bool {
    previous_status != ModerationStatus::Approved.as_str()
        && new_status == ModerationStatus::Approved.as_str()
}

/// Reward the submitter when a place transitions into `approved`.
/// `previous_status` is the stored status before this save.
pub fn record_place_approved(
    conn: &mut PgConnection,
    place: &Place,
    previous_status: &str,
) -> QueryResult<Option<Contribution>> {
    if !approval_award_due(previous_status, &place.moderation_status) {
        return Ok(None);
    }
    let Some(author_id) = place.created_by else {
        return Ok(None);
    };

    let mut contribution = get_or_create(conn, author_id)?;
    award_place_approval(&mut contribution);
    persist(conn, &contribution).map(Some)
}

/// Penalize a review author for an upheld report, at most once per review
/// (`moderation_penalty_applied` is the idempotency latch). Returns whether
/// the penalty was applied.
pub fn record_upheld_report(conn: &mut PgConnection, review: &Review) -> QueryResult<bool> {
    if review.moderation_penalty_applied {
        return Ok(false);
    }
    let Some(author_id) = review.user_id else {
        return Ok(false);
    };

    let mut contribution = get_or_create(conn, author_id)?;
    apply_upheld_penalty(&mut contribution);
    persist(conn, &contribution)?;

    diesel::update(reviews::table.find(review.id))
        .set(reviews::moderation_penalty_applied.eq(true))
        .execute(conn)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_contribution() -> Contribution {
        Contribution {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            places_added: 0,
            reviews_added: 0,
            points: 0,
            upheld_reports_count: 0,
            review_restriction_active: false,
        }
    }

    #[test]
    fn review_award_increments_counter_and_points() {
        let mut c = fresh_contribution();
        award_review(&mut c);
        assert_eq!(c.reviews_added, 1);
        assert_eq!(c.points, REVIEW_REWARD_POINTS);
    }

    #[test]
    fn place_approval_awards_fifty_points() {
        let mut c = fresh_contribution();
        award_place_approval(&mut c);
        assert_eq!(c.places_added, 1);
        assert_eq!(c.points, PLACE_APPROVAL_POINTS);
    }

    #[test]
    fn penalty_floors_points_at_zero() {
        let mut c = fresh_contribution();
        c.points = 10;
        apply_upheld_penalty(&mut c);
        assert_eq!(c.points, 0);
        assert_eq!(c.upheld_reports_count, 1);
        assert!(!c.review_restriction_active);
    }

    #[test]
    fn third_upheld_report_activates_restriction() {
        let mut c = fresh_contribution();
        c.points = 200;
        apply_upheld_penalty(&mut c);
        apply_upheld_penalty(&mut c);
        assert!(!c.review_restriction_active);
        apply_upheld_penalty(&mut c);
        assert!(c.review_restriction_active);
        assert_eq!(c.upheld_reports_count, 3);
        assert_eq!(c.points, 200 - 3 * UPHELD_REPORT_PENALTY);
    }

    #[test]
    fn approval_award_fires_only_on_transition_into_approved() {
        // pending -> approved: award.
        assert!(approval_award_due("pending", "approved"));
        // approved -> approved (re-save): nothing further.
        assert!(!approval_award_due("approved", "approved"));
        // approved -> rejected: nothing.
        assert!(!approval_award_due("approved", "rejected"));
        // rejected -> approved: a fresh transition into approved.
        assert!(approval_award_due("rejected", "approved"));
        // new row with no previous status string.
        assert!(approval_award_due("", "approved"));
    }

    #[test]
    fn restriction_stays_latched_after_threshold() {
        let mut c = fresh_contribution();
        for _ in 0..5 {
            apply_upheld_penalty(&mut c);
        }
        assert!(c.review_restriction_active);
        assert_eq!(c.upheld_reports_count, 5);
        assert_eq!(c.points, 0);
    }
}
