use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{
    account_activations, accounts, contributions, moderation_logs, place_likes, places,
    review_reports, reviews,
};

// --- Accounts ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = accounts)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = accounts)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
}

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = account_activations)]
pub struct AccountActivation {
    pub id: Uuid,
    pub account_id: Uuid,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = account_activations)]
pub struct NewAccountActivation {
    pub account_id: Uuid,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
}

// --- Contribution ledger ---

pub const TRUSTED_THRESHOLD: i32 = 120;

/// (points threshold, level name, badge class), ascending. The lookup below
/// tolerates equal or out-of-order entries (first matching threshold wins)
/// but the table itself is expected to stay monotonically increasing.
pub const LEVELS: [(i32, &str, &str); 4] = [
    (0, "New Explorer", "secondary"),
    (50, "Local Contributor", "info"),
    (120, "Trusted Guide", "success"),
    (250, "Community Champion", "warning"),
];

#[derive(Debug, Queryable, Identifiable, AsChangeset, Serialize, Clone, PartialEq, Eq)]
#[diesel(table_name = contributions)]
pub struct Contribution {
    pub id: Uuid,
    pub user_id: Uuid,
    pub places_added: i32,
    pub reviews_added: i32,
    pub points: i32,
    pub upheld_reports_count: i32,
    pub review_restriction_active: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = contributions)]
pub struct NewContribution {
    pub user_id: Uuid,
}

impl Contribution {
    pub fn is_trusted(&self) -> bool {
        self.points >= TRUSTED_THRESHOLD
    }

    fn level_entry(&self) -> (i32, &'static str, &'static str) {
        let mut best = LEVELS[0];
        for entry in LEVELS.iter().skip(1) {
            if self.points >= entry.0 && entry.0 > best.0 {
                best = *entry;
            }
        }
        best
    }

    pub fn level_name(&self) -> &'static str {
        self.level_entry().1
    }

    pub fn level_badge_class(&self) -> &'static str {
        self.level_entry().2
    }

    pub fn next_level_name(&self) -> Option<&'static str> {
        LEVELS.iter().find(|(t, _, _)| self.points < *t).map(|(_, name, _)| *name)
    }

    pub fn points_to_next_level(&self) -> i32 {
        LEVELS
            .iter()
            .find(|(t, _, _)| self.points < *t)
            .map(|(t, _, _)| t - self.points)
            .unwrap_or(0)
    }

    pub fn level_progress_percent(&self) -> i32 {
        let mut current = 0;
        let mut next = None;
        for (threshold, _, _) in LEVELS {
            if self.points >= threshold {
                current = threshold;
            } else {
                next = Some(threshold);
                break;
            }
        }

        match next {
            None => 100,
            Some(next_threshold) => {
                let span = next_threshold - current;
                if span <= 0 {
                    100
                } else {
                    (self.points - current) * 100 / span
                }
            }
        }
    }
}

// --- Place enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Heritage,
    Beach,
    Park,
    Beauty,
    Nightlife,
    Food,
    Activity,
    Other,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 8] = [
        PlaceCategory::Heritage,
        PlaceCategory::Beach,
        PlaceCategory::Park,
        PlaceCategory::Beauty,
        PlaceCategory::Nightlife,
        PlaceCategory::Food,
        PlaceCategory::Activity,
        PlaceCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceCategory::Heritage => "heritage",
            PlaceCategory::Beach => "beach",
            PlaceCategory::Park => "park",
            PlaceCategory::Beauty => "beauty",
            PlaceCategory::Nightlife => "nightlife",
            PlaceCategory::Food => "food",
            PlaceCategory::Activity => "activity",
            PlaceCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlaceCategory::Heritage => "Heritage",
            PlaceCategory::Beach => "Beach / Lake",
            PlaceCategory::Park => "Park",
            PlaceCategory::Beauty => "Beauty Spot",
            PlaceCategory::Nightlife => "Nightlife",
            PlaceCategory::Food => "Food & Drink",
            PlaceCategory::Activity => "Activity",
            PlaceCategory::Other => "Other",
        }
    }
}

impl std::str::FromStr for PlaceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str() == s.to_lowercase())
            .copied()
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ModerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ModerationStatus::Pending),
            "approved" => Ok(ModerationStatus::Approved),
            "rejected" => Ok(ModerationStatus::Rejected),
            _ => Err(format!("unknown moderation status: {s}")),
        }
    }
}

/// Subtype payload stored in `places.details` (Jsonb). The original data
/// model used table-per-subtype inheritance; only presentation branches on
/// the subtype, so a tagged variant on one table is enough.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlaceDetails {
    Heritage {
        #[serde(default)]
        period: String,
        #[serde(default)]
        is_listed: bool,
        #[serde(default)]
        entry_fee: Option<f64>,
        #[serde(default)]
        guided_tours_available: bool,
    },
    Food {
        #[serde(default)]
        cuisine: String,
        #[serde(default = "default_price_range")]
        price_range: i16,
        #[serde(default)]
        vegetarian_options: bool,
        #[serde(default)]
        vegan_options: bool,
        #[serde(default)]
        takeaway_available: bool,
    },
    Activity {
        #[serde(default)]
        activity_type: String,
        #[serde(default)]
        min_age: Option<i16>,
        #[serde(default)]
        duration_minutes: Option<i32>,
        #[serde(default)]
        booking_required: bool,
    },
    Beach {
        #[serde(default)]
        dog_friendly: bool,
        #[serde(default)]
        lifeguard_present: bool,
        #[serde(default)]
        water_quality: String,
        #[serde(default)]
        facilities_available: bool,
    },
    General,
}

fn default_price_range() -> i16 { 2 }

impl Default for PlaceDetails {
    fn default() -> Self {
        PlaceDetails::General
    }
}

// --- Place ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = places)]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub details: serde_json::Value,
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
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_by: Option<Uuid>,
    pub moderation_status: String,
    pub is_approved: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub archived_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = places)]
pub struct NewPlace {
    pub name: String,
    pub description: String,
    pub category: String,
    pub details: serde_json::Value,
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
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_by: Option<Uuid>,
    pub moderation_status: String,
    pub is_approved: bool,
}

impl Place {
    pub fn details(&self) -> PlaceDetails {
        serde_json::from_value(self.details.clone()).unwrap_or_default()
    }

    /// Beaches are open public spaces, so opening hours are not tracked for
    /// that category.
    pub fn supports_opening_hours(&self) -> bool {
        self.category != PlaceCategory::Beach.as_str()
    }

    pub fn has_opening_hours(&self) -> bool {
        self.opening_time.is_some() && self.closing_time.is_some()
    }

    /// Open/closed state at the current local time, or `None` when opening
    /// hours do not apply to this place.
    pub fn is_open_now(&self) -> Option<bool> {
        use chrono::Datelike;
        let now = chrono::Local::now();
        self.is_open_at(now.weekday().num_days_from_monday(), now.time())
    }

    /// Open/closed state at a given weekday (Monday = 0) and wall-clock time.
    /// The window wraps past midnight when the closing time is before the
    /// opening time.
    pub fn is_open_at(&self, weekday: u32, at: NaiveTime) -> Option<bool> {
        if !self.supports_opening_hours() || !self.has_opening_hours() {
            return None;
        }
        let (open, close) = match (self.opening_time, self.closing_time) {
            (Some(open), Some(close)) => (open, close),
            _ => return None,
        };

        if !allowed_weekdays(&self.opening_days)[weekday as usize % 7] {
            return Some(false);
        }

        if open <= close {
            Some(open <= at && at <= close)
        } else {
            Some(at >= open || at <= close)
        }
    }

    pub fn opening_days_display(&self) -> String {
        opening_days_display(&self.opening_days)
    }
}

fn parse_day_token(token: &str) -> Option<usize> {
    let token = token.trim().to_lowercase();
    match token.get(..3)? {
        "mon" => Some(0),
        "tue" => Some(1),
        "wed" => Some(2),
        "thu" => Some(3),
        "fri" => Some(4),
        "sat" => Some(5),
        "sun" => Some(6),
        _ => None,
    }
}

/// Parse the free-text `opening_days` field into a per-weekday mask
/// (Monday = index 0). Empty input, the `daily` aliases, and input where no
/// token parses all mean "open every day". Ranges may wrap past Sunday.
pub fn allowed_weekdays(opening_days: &str) -> [bool; 7] {
    if opening_days.trim().is_empty() {
        return [true; 7];
    }

    let raw = opening_days.to_lowercase().replace(' ', "");
    if matches!(raw.as_str(), "mon-sun" | "daily" | "everyday") {
        return [true; 7];
    }

    let mut allowed = [false; 7];
    for part in raw.split(',') {
        if let Some((start_raw, end_raw)) = part.split_once('-') {
            let (Some(start), Some(end)) = (parse_day_token(start_raw), parse_day_token(end_raw))
            else {
                continue;
            };
            if start <= end {
                for day in start..=end {
                    allowed[day] = true;
                }
            } else {
                for day in start..7 {
                    allowed[day] = true;
                }
                for day in 0..=end {
                    allowed[day] = true;
                }
            }
        } else if let Some(day) = parse_day_token(part) {
            allowed[day] = true;
        }
    }

    if allowed.iter().all(|open| !open) {
        return [true; 7];
    }
    allowed
}

pub fn opening_days_display(opening_days: &str) -> String {
    if opening_days.trim().is_empty() {
        return "Daily".to_string();
    }

    let labels = [
        ("mon", "Mon"),
        ("tue", "Tue"),
        ("wed", "Wed"),
        ("thu", "Thu"),
        ("fri", "Fri"),
        ("sat", "Sat"),
        ("sun", "Sun"),
    ];

    let tokens: Vec<String> = opening_days
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.is_empty() {
        return "Daily".to_string();
    }

    tokens
        .iter()
        .map(|token| {
            labels
                .iter()
                .find(|(key, _)| key == token)
                .map(|(_, label)| label.to_string())
                .unwrap_or_else(|| title_case(token))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn title_case(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut at_word_start = true;
    for c in token.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

// --- Place likes ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = place_likes)]
pub struct PlaceLike {
    pub id: Uuid,
    pub place_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = place_likes)]
pub struct NewPlaceLike {
    pub place_id: Uuid,
    pub user_id: Uuid,
}

// --- Reviews ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = reviews)]
pub struct Review {
    pub id: Uuid,
    pub place_id: Uuid,
    pub user_id: Option<Uuid>,
    pub rating: i32,
    pub text: String,
    pub is_approved: bool,
    pub reported: bool,
    pub report_reason: String,
    pub moderation_penalty_applied: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub archived_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = reviews)]
pub struct NewReview {
    pub place_id: Uuid,
    pub user_id: Option<Uuid>,
    pub rating: i32,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Upheld,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Upheld => "upheld",
            ReportStatus::Dismissed => "dismissed",
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ReportStatus::Pending),
            "upheld" => Ok(ReportStatus::Upheld),
            "dismissed" => Ok(ReportStatus::Dismissed),
            _ => Err(format!("unknown report status: {s}")),
        }
    }
}

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = review_reports)]
pub struct ReviewReport {
    pub id: Uuid,
    pub review_id: Uuid,
    pub reporter_id: Uuid,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = review_reports)]
pub struct NewReviewReport {
    pub review_id: Uuid,
    pub reporter_id: Uuid,
    pub reason: String,
}

// --- Moderation audit log ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    PlaceApproved,
    PlaceRejected,
    PlaceArchived,
    PlaceRestored,
    ReviewUpheld,
    ReviewDismissed,
    ReviewArchived,
    ReviewRestored,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::PlaceApproved => "place_approved",
            ModerationAction::PlaceRejected => "place_rejected",
            ModerationAction::PlaceArchived => "place_archived",
            ModerationAction::PlaceRestored => "place_restored",
            ModerationAction::ReviewUpheld => "review_upheld",
            ModerationAction::ReviewDismissed => "review_dismissed",
            ModerationAction::ReviewArchived => "review_archived",
            ModerationAction::ReviewRestored => "review_restored",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Place,
    Review,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Place => "place",
            TargetKind::Review => "review",
        }
    }
}

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = moderation_logs)]
pub struct ModerationLog {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub target_kind: String,
    pub target_id: Uuid,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = moderation_logs)]
pub struct NewModerationLog {
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub target_kind: String,
    pub target_id: Uuid,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(points: i32) -> Contribution {
        Contribution {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            places_added: 0,
            reviews_added: 0,
            points,
            upheld_reports_count: 0,
            review_restriction_active: false,
        }
    }

    #[test]
    fn level_name_matches_threshold_boundaries() {
        assert_eq!(contribution(0).level_name(), "New Explorer");
        assert_eq!(contribution(49).level_name(), "New Explorer");
        assert_eq!(contribution(50).level_name(), "Local Contributor");
        assert_eq!(contribution(119).level_name(), "Local Contributor");
        assert_eq!(contribution(120).level_name(), "Trusted Guide");
        assert_eq!(contribution(250).level_name(), "Community Champion");
        assert_eq!(contribution(9999).level_name(), "Community Champion");
    }

    #[test]
    fn level_name_is_monotone_in_points() {
        let mut previous_index = 0;
        for points in 0..400 {
            let name = contribution(points).level_name();
            let index = LEVELS.iter().position(|(_, n, _)| *n == name).unwrap();
            assert!(index >= previous_index, "tier dropped at {points} points");
            previous_index = index;
        }
    }

    #[test]
    fn trusted_flag_tracks_threshold() {
        assert!(!contribution(119).is_trusted());
        assert!(contribution(120).is_trusted());
    }

    #[test]
    fn next_level_and_points_to_next() {
        let c = contribution(60);
        assert_eq!(c.next_level_name(), Some("Trusted Guide"));
        assert_eq!(c.points_to_next_level(), 60);

        let top = contribution(300);
        assert_eq!(top.next_level_name(), None);
        assert_eq!(top.points_to_next_level(), 0);
    }

    #[test]
    fn progress_percent_interpolates_within_band() {
        assert_eq!(contribution(0).level_progress_percent(), 0);
        assert_eq!(contribution(25).level_progress_percent(), 50);
        assert_eq!(contribution(85).level_progress_percent(), 50);
        assert_eq!(contribution(250).level_progress_percent(), 100);
    }

    #[test]
    fn allowed_weekdays_handles_ranges_and_aliases() {
        assert_eq!(allowed_weekdays(""), [true; 7]);
        assert_eq!(allowed_weekdays("Daily"), [true; 7]);
        assert_eq!(allowed_weekdays("Mon-Sun"), [true; 7]);
        assert_eq!(
            allowed_weekdays("Mon-Fri"),
            [true, true, true, true, true, false, false]
        );
        assert_eq!(
            allowed_weekdays("Mon,Wed,Fri"),
            [true, false, true, false, true, false, false]
        );
        // Range wrapping past Sunday.
        assert_eq!(
            allowed_weekdays("Fri-Mon"),
            [true, false, false, false, true, true, true]
        );
        // Nothing parseable falls back to every day.
        assert_eq!(allowed_weekdays("whenever"), [true; 7]);
    }

    fn place_with_hours(category: &str, days: &str, open: &str, close: &str) -> Place {
        Place {
            id: Uuid::new_v4(),
            name: "Quay Cafe".into(),
            description: "Coffee by the water".into(),
            category: category.into(),
            details: serde_json::json!({ "kind": "general" }),
            location_text: String::new(),
            address_line_1: String::new(),
            town_city: String::new(),
            postcode: String::new(),
            website_url: String::new(),
            phone_number: String::new(),
            best_time_to_visit: String::new(),
            child_friendly: false,
            pet_friendly: false,
            estimated_visit_minutes: None,
            opening_days: days.into(),
            opening_time: NaiveTime::parse_from_str(open, "%H:%M").ok(),
            closing_time: NaiveTime::parse_from_str(close, "%H:%M").ok(),
            latitude: None,
            longitude: None,
            created_by: None,
            moderation_status: "approved".into(),
            is_approved: true,
            is_archived: false,
            archived_at: None,
            archived_by: None,
            created_at: Utc::now(),
        }
    }

    fn at(value: &str) -> NaiveTime {
        NaiveTime::parse_from_str(value, "%H:%M").unwrap()
    }

    #[test]
    fn open_within_same_day_window() {
        let place = place_with_hours("food", "Mon-Fri", "09:00", "17:00");
        assert_eq!(place.is_open_at(0, at("12:00")), Some(true));
        assert_eq!(place.is_open_at(0, at("09:00")), Some(true));
        assert_eq!(place.is_open_at(0, at("17:00")), Some(true));
        assert_eq!(place.is_open_at(0, at("08:59")), Some(false));
        // Saturday is outside Mon-Fri.
        assert_eq!(place.is_open_at(5, at("12:00")), Some(false));
    }

    #[test]
    fn open_window_wraps_past_midnight() {
        let place = place_with_hours("nightlife", "", "22:00", "02:00");
        assert_eq!(place.is_open_at(2, at("23:30")), Some(true));
        assert_eq!(place.is_open_at(2, at("01:00")), Some(true));
        assert_eq!(place.is_open_at(2, at("12:00")), Some(false));
    }

    #[test]
    fn beaches_have_no_opening_state() {
        let place = place_with_hours("beach", "", "09:00", "17:00");
        assert_eq!(place.is_open_at(0, at("12:00")), None);
    }

    #[test]
    fn missing_hours_have_no_opening_state() {
        let mut place = place_with_hours("food", "", "09:00", "17:00");
        place.closing_time = None;
        assert_eq!(place.is_open_at(0, at("12:00")), None);
    }

    #[test]
    fn opening_days_display_formats_tokens() {
        assert_eq!(opening_days_display(""), "Daily");
        assert_eq!(opening_days_display("mon, wed, fri"), "Mon, Wed, Fri");
        assert_eq!(opening_days_display("mon-fri"), "Mon-Fri");
    }

    #[test]
    fn place_details_tag_round_trips() {
        let details = PlaceDetails::Food {
            cuisine: "Pub food".into(),
            price_range: 2,
            vegetarian_options: true,
            vegan_options: false,
            takeaway_available: true,
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["kind"], "food");
        assert_eq!(serde_json::from_value::<PlaceDetails>(value).unwrap(), details);
    }

    #[test]
    fn place_details_defaults_to_general_on_unknown_payload() {
        let place = place_with_hours("other", "", "09:00", "17:00");
        assert_eq!(place.details(), PlaceDetails::General);

        let mut broken = place;
        broken.details = serde_json::json!({ "kind": "spaceport" });
        assert_eq!(broken.details(), PlaceDetails::General);
    }
}
