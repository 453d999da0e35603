use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

/// Postcode/address lookup against a postcodes.io-compatible API.
///
/// Treated as a best-effort collaborator: any failure (transport error,
/// non-200, not-found status in the payload, missing coordinates) resolves to
/// `None` and the caller decides what to tell the user.
#[derive(Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PostcodeLookupResponse {
    status: i64,
    result: Option<PostcodeResult>,
}

#[derive(Debug, Deserialize)]
struct PostcodeResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl GeocodeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn lookup(&self, location_text: &str) -> Option<(f64, f64)> {
        let query = location_text.trim();
        if query.is_empty() {
            return None;
        }

        let url = format!("{}/postcodes/{}", self.base_url, urlencode(query));
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| tracing::warn!(error = %e, "geocode request failed"))
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let payload: PostcodeLookupResponse = response.json().await.ok()?;
        if payload.status != 200 {
            return None;
        }

        let result = payload.result?;
        match (result.latitude, result.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

fn urlencode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_passes_through_postcodes() {
        assert_eq!(urlencode("EX44PS"), "EX44PS");
    }

    #[test]
    fn urlencode_escapes_spaces_and_punctuation() {
        assert_eq!(urlencode("EX4 4PS"), "EX4%204PS");
        assert_eq!(urlencode("high st/exeter"), "high%20st%2Fexeter");
    }
}
