//! Canned beaches.ie responses for development without network access.

use serde_json::{Value, json};

pub fn location(beach_id: &str) -> Value {
    json!({
        "beach_id": beach_id,
        "beach_name": "Dollymount Strand (Mock)",
        "name": "Dollymount Strand (Mock)",
        "description": "<p>A beautiful sandy beach on Dublin Bay.</p>",
        "classification": "Excellent Quality",
        "classification_year": 2024,
        "coordinates": {"latitude": 53.2695, "longitude": -6.1544},
        "facilities": {
            "toilets": true,
            "parking": true,
            "lifeguard": true,
            "disability_access": true,
            "blue_flag": true
        },
        "dogs_allowed": false
    })
}

pub fn measurements() -> Value {
    json!({
        "data": [
            {"sample_date": "2024-07-15", "ecoli": 45, "enterococci": 28, "quality": "Excellent"},
            {"sample_date": "2024-07-08", "ecoli": 52, "enterococci": 35, "quality": "Excellent"},
            {"sample_date": "2024-07-01", "ecoli": 38, "enterococci": 22, "quality": "Excellent"}
        ]
    })
}

pub fn alerts() -> Value {
    json!([])
}

/// Routes an endpoint to its canned response.
pub fn response(endpoint: &str, params: &[(&str, String)]) -> Value {
    let beach_id = params
        .iter()
        .find(|(k, _)| *k == "beach_id")
        .map(|(_, v)| v.as_str())
        .unwrap_or_else(|| endpoint.rsplit('/').next().unwrap_or_default());

    if endpoint.contains("location") {
        location(beach_id)
    } else if endpoint.contains("measurement") {
        measurements()
    } else if endpoint.contains("alert") {
        alerts()
    } else {
        json!({})
    }
}
