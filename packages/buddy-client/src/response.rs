//! Turning raw HTTP responses into typed outcomes.
//!
//! Kept free of any transport so the rules can be exercised without a server.

use serde::de::DeserializeOwned;

use crate::error::{BuddyClientError, Result};
use crate::types::{ErrorBody, MatchResponse, RoutePlan};

/// Message used when a failing response carries no readable `detail`.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Build the error for a non-2xx response.
pub fn server_error(status: u16, body: &str) -> BuddyClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|err| err.detail)
        .and_then(|detail| detail.as_str().map(str::to_string))
        .filter(|detail| !detail.trim().is_empty())
        .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string());

    BuddyClientError::Server { status, message }
}

fn parse_success<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| BuddyClientError::MalformedResponse(e.to_string()))
}

/// Interpret a response of the matching endpoint.
///
/// A 2xx body is only accepted whole: every entry must parse, every distance
/// must be a non-negative number and `count` must agree with the entries.
pub fn interpret_match_response(status: u16, body: &str) -> Result<MatchResponse> {
    if !is_success(status) {
        return Err(server_error(status, body));
    }

    let response: MatchResponse = parse_success(body)?;

    if let Some(bad) = response
        .matches
        .iter()
        .find(|m| !m.distance_km.is_finite() || m.distance_km < 0.0)
    {
        return Err(BuddyClientError::MalformedResponse(format!(
            "invalid distance {} for {}",
            bad.distance_km, bad.user_id
        )));
    }

    if response.count != response.matches.len() as u64 {
        return Err(BuddyClientError::MalformedResponse(format!(
            "count {} does not match {} entries",
            response.count,
            response.matches.len()
        )));
    }

    Ok(response)
}

/// Interpret a response of the route planning endpoint.
pub fn interpret_route_response(status: u16, body: &str) -> Result<RoutePlan> {
    if !is_success(status) {
        return Err(server_error(status, body));
    }

    let plan: RoutePlan = parse_success(body)?;
    if !plan.distance_m.is_finite() || plan.distance_m < 0.0 {
        return Err(BuddyClientError::MalformedResponse(format!(
            "invalid route distance {}",
            plan.distance_m
        )));
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RouteSource;

    const TWO_MATCHES: &str = r#"{
        "count": 2,
        "matches": [
            {"user_id": "a", "start_coord": [43.47, -80.52], "distance_km": 0.5},
            {"user_id": "b", "start_coord": [43.48, -80.53], "distance_km": 1.2}
        ]
    }"#;

    fn assert_malformed(result: Result<MatchResponse>) {
        match result {
            Err(BuddyClientError::MalformedResponse(_)) => {}
            other => panic!("expected malformed response, got {:?}", other),
        }
    }

    #[test]
    fn test_success_preserves_order() {
        let response = interpret_match_response(200, TWO_MATCHES).unwrap();
        assert_eq!(response.count, 2);
        let ids: Vec<_> = response.matches.iter().map(|m| m.user_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(response.matches[1].distance_km, 1.2);
    }

    #[test]
    fn test_empty_success() {
        let response = interpret_match_response(200, r#"{"count": 0, "matches": []}"#).unwrap();
        assert!(response.matches.is_empty());
    }

    #[test]
    fn test_server_detail_is_surfaced() {
        match interpret_match_response(400, r#"{"detail": "bad request"}"#) {
            Err(BuddyClientError::Server { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad request");
            }
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[test]
    fn test_server_error_falls_back_to_generic_message() {
        for body in ["", "not json", "{}", r#"{"detail": [{"loc": ["body"]}]}"#, r#"{"detail": ""}"#] {
            match interpret_match_response(500, body) {
                Err(BuddyClientError::Server { message, .. }) => {
                    assert_eq!(message, GENERIC_SERVER_ERROR, "body: {body}")
                }
                other => panic!("expected server error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        assert_malformed(interpret_match_response(200, "not json"));
        assert_malformed(interpret_match_response(200, r#"{"count": 1}"#));
        assert_malformed(interpret_match_response(
            200,
            r#"{"count": 1, "matches": [{"user_id": "a", "distance_km": 0.5}]}"#,
        ));
    }

    #[test]
    fn test_bad_distance_is_malformed() {
        assert_malformed(interpret_match_response(
            200,
            r#"{"count": 1, "matches": [{"user_id": "a", "start_coord": [43.47, -80.52], "distance_km": "far"}]}"#,
        ));
        assert_malformed(interpret_match_response(
            200,
            r#"{"count": 1, "matches": [{"user_id": "a", "start_coord": [43.47, -80.52], "distance_km": -1.0}]}"#,
        ));
    }

    #[test]
    fn test_out_of_range_coordinate_is_malformed() {
        assert_malformed(interpret_match_response(
            200,
            r#"{"count": 1, "matches": [{"user_id": "a", "start_coord": [143.47, -80.52], "distance_km": 1.0}]}"#,
        ));
    }

    #[test]
    fn test_count_mismatch_is_malformed() {
        assert_malformed(interpret_match_response(
            200,
            r#"{"count": 3, "matches": [{"user_id": "a", "start_coord": [43.47, -80.52], "distance_km": 1.0}]}"#,
        ));
        assert_malformed(interpret_match_response(200, r#"{"count": -1, "matches": []}"#));
    }

    #[test]
    fn test_route_fallback_plan_parses() {
        let body = r#"{
            "start": "Laurier",
            "destination": "Waterloo Station",
            "start_coord": [43.4731, -80.5267],
            "dest_coord": [43.4668, -80.5164],
            "distance_m": 1021.4,
            "duration_s": null,
            "polyline": [[43.4731, -80.5267], [43.4668, -80.5164]],
            "steps": [],
            "source": "haversine_fallback",
            "fallback": true,
            "error": "OSRM route failed"
        }"#;

        let plan = interpret_route_response(200, body).unwrap();
        assert!(plan.fallback);
        assert_eq!(plan.source, RouteSource::HaversineFallback);
        assert_eq!(plan.duration_s, None);
        assert_eq!(plan.polyline.len(), 2);
        assert_eq!(plan.error.as_deref(), Some("OSRM route failed"));
    }

    #[test]
    fn test_route_geocode_failure_is_server_error() {
        let body = r#"{"detail": "Start geocode failed: Geocode failed: nowhere"}"#;
        match interpret_route_response(400, body) {
            Err(BuddyClientError::Server { message, .. }) => {
                assert!(message.starts_with("Start geocode failed"))
            }
            other => panic!("expected server error, got {:?}", other),
        }
    }
}
