//! Anti-spam checks for review submissions: content rules, near-duplicate
//! detection, and the session CAPTCHA lifecycle.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use rand::Rng;
use uuid::Uuid;

use wayfinder_shared::clients::session::SessionStore;
use wayfinder_shared::middleware::SessionId;
use wayfinder_shared::{AppError, AppResult};

use crate::schema::reviews;

pub const SIMILARITY_THRESHOLD: f64 = 0.85;
pub const SIMILARITY_MIN_CHARS: usize = 25;
pub const RECENT_REVIEWS_WINDOW: i64 = 50;
pub const MAX_REVIEW_CHARS: usize = 1200;
pub const MAX_LINKS: usize = 2;

const BANNED_WORDS: &[&str] = &["badword1", "badword2", "offensiveword"];

diesel::define_sql_function! {
    fn lower(text_value: diesel::sql_types::Text) -> diesel::sql_types::Text
}

/// Lowercase, strip punctuation, collapse whitespace.
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Content rules for review text. Returns the user-facing message on failure.
pub fn validate_review_text(text: &str) -> Result<(), String> {
    let lowered = text.to_lowercase();

    for word in BANNED_WORDS {
        let mut tokens = lowered.split(|c: char| !(c.is_alphanumeric() || c == '_'));
        if tokens.any(|token| token == *word) {
            return Err("Your review contains inappropriate language.".to_string());
        }
    }

    let link_count = lowered.matches("http://").count()
        + lowered.matches("https://").count()
        + lowered.matches("www.").count();
    if link_count > MAX_LINKS {
        return Err("Please do not include excessive links in reviews.".to_string());
    }

    if lowered.chars().count() > MAX_REVIEW_CHARS {
        return Err(format!(
            "Review is too long. Please keep it under {MAX_REVIEW_CHARS} characters."
        ));
    }

    Ok(())
}

/// Similarity pass over recent review texts. Short texts on either side are
/// exempt to avoid false positives on one-liners.
pub fn is_similar_to_recent(candidate_normalized: &str, recent_texts: &[String]) -> bool {
    if candidate_normalized.chars().count() < SIMILARITY_MIN_CHARS {
        return false;
    }

    recent_texts.iter().any(|raw| {
        let existing_normalized = normalize_text(raw);
        existing_normalized.chars().count() >= SIMILARITY_MIN_CHARS
            && strsim::normalized_levenshtein(candidate_normalized, &existing_normalized)
                >= SIMILARITY_THRESHOLD
    })
}

/// Duplicate/near-duplicate check for a candidate review against a place:
/// an exact case-insensitive repeat of any non-archived review is rejected
/// outright, then the normalized candidate is compared against the most
/// recent window of texts.
pub fn is_duplicate_or_similar_review(
    conn: &mut PgConnection,
    place_id: Uuid,
    text: &str,
) -> QueryResult<bool> {
    let candidate = normalize_text(text);
    if candidate.is_empty() {
        return Ok(false);
    }

    let exact_matches: i64 = reviews::table
        .filter(reviews::place_id.eq(place_id))
        .filter(reviews::is_archived.eq(false))
        .filter(lower(reviews::text).eq(text.to_lowercase()))
        .count()
        .get_result(conn)?;
    if exact_matches > 0 {
        return Ok(true);
    }

    let recent_texts: Vec<String> = reviews::table
        .filter(reviews::place_id.eq(place_id))
        .filter(reviews::is_archived.eq(false))
        .order(reviews::created_at.desc())
        .limit(RECENT_REVIEWS_WINDOW)
        .select(reviews::text)
        .load(conn)?;

    Ok(is_similar_to_recent(&candidate, &recent_texts))
}

// --- Session CAPTCHA ---

pub struct CaptchaChallenge {
    pub question: String,
    pub answer: String,
}

pub fn build_captcha_challenge() -> CaptchaChallenge {
    let mut rng = rand::thread_rng();
    let a: u32 = rng.gen_range(2..=9);
    let b: u32 = rng.gen_range(1..=8);
    CaptchaChallenge {
        question: format!("What is {a} + {b}?"),
        answer: (a + b).to_string(),
    }
}

/// Return the active CAPTCHA question for the session, generating and
/// caching one if the flag is armed but no challenge exists yet. `None`
/// means no CAPTCHA is required.
pub async fn get_or_create_captcha(
    sessions: &SessionStore,
    session_id: SessionId,
) -> AppResult<Option<String>> {
    if !sessions.captcha_required(session_id).await.map_err(session_err)? {
        return Ok(None);
    }

    if let Some(question) = sessions.captcha_question(session_id).await.map_err(session_err)? {
        return Ok(Some(question));
    }

    let challenge = build_captcha_challenge();
    sessions
        .store_captcha(session_id, &challenge.question, &challenge.answer)
        .await
        .map_err(session_err)?;
    Ok(Some(challenge.question))
}

/// Check a submitted answer. Only a correct answer clears the requirement;
/// wrong answers leave the challenge armed.
pub async fn validate_captcha(
    sessions: &SessionStore,
    session_id: SessionId,
    submitted: &str,
) -> AppResult<bool> {
    let expected = sessions.captcha_answer(session_id).await.map_err(session_err)?;
    match expected {
        Some(answer) if !answer.is_empty() && submitted.trim() == answer => {
            sessions.clear_captcha(session_id).await.map_err(session_err)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn session_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::internal(format!("session store error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(
            normalize_text("  Great   FOOD, lovely views!! "),
            "great food lovely views"
        );
        assert_eq!(normalize_text("...!!!"), "");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn near_identical_long_texts_are_flagged() {
        let existing = vec!["The fish and chips here were absolutely wonderful today".to_string()];
        let candidate = normalize_text("The fish and chips here were absolutely wonderful tonight");
        assert!(is_similar_to_recent(&candidate, &existing));
    }

    #[test]
    fn short_texts_are_exempt_from_similarity() {
        let existing = vec!["Lovely spot".to_string()];
        let candidate = normalize_text("Lovely spot");
        assert!(candidate.chars().count() < SIMILARITY_MIN_CHARS);
        assert!(!is_similar_to_recent(&candidate, &existing));
    }

    #[test]
    fn dissimilar_long_texts_pass() {
        let existing =
            vec!["A quiet heritage site with fascinating Roman ruins and a small museum".to_string()];
        let candidate =
            normalize_text("Busy beach bar, cocktails were pricey but the sunset made up for it");
        assert!(!is_similar_to_recent(&candidate, &existing));
    }

    #[test]
    fn empty_candidate_is_never_similar() {
        let existing = vec!["Anything at all goes here, even something long enough".to_string()];
        assert!(!is_similar_to_recent("", &existing));
    }

    #[test]
    fn banned_words_match_whole_tokens_only() {
        assert!(validate_review_text("this place is badword1 honestly").is_err());
        assert!(validate_review_text("BADWORD1!").is_err());
        // Substrings inside larger tokens do not trip the filter.
        assert!(validate_review_text("notbadword1ish but fine").is_ok());
    }

    #[test]
    fn excessive_links_are_rejected() {
        assert!(validate_review_text("see https://a.example and www.b.example").is_ok());
        assert!(
            validate_review_text("https://a.example http://b.example www.c.example spam").is_err()
        );
    }

    #[test]
    fn overlong_reviews_are_rejected() {
        let text = "a".repeat(MAX_REVIEW_CHARS + 1);
        assert!(validate_review_text(&text).is_err());
        let fine = "a".repeat(MAX_REVIEW_CHARS);
        assert!(validate_review_text(&fine).is_ok());
    }

    #[test]
    fn captcha_challenge_is_small_addition() {
        for _ in 0..50 {
            let challenge = build_captcha_challenge();
            let numbers: Vec<u32> = challenge
                .question
                .split(|c: char| !c.is_ascii_digit())
                .filter(|part| !part.is_empty())
                .map(|part| part.parse().unwrap())
                .collect();
            assert_eq!(numbers.len(), 2);
            assert!((2..=9).contains(&numbers[0]));
            assert!((1..=8).contains(&numbers[1]));
            assert_eq!(challenge.answer, (numbers[0] + numbers[1]).to_string());
        }
    }
}
