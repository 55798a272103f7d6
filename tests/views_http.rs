use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{StubSource, VIEW_TTL, app, fifteen_jobs, page_ids, send};

async fn open_view(app: &axum::Router) -> (String, serde_json::Value) {
    let (status, view) = send(app, "POST", "/views", None).await;
    assert_eq!(status, StatusCode::CREATED);
    (view["id"].as_str().unwrap().to_string(), view)
}

#[tokio::test]
async fn healthz_ok() {
    let app = app(StubSource::new(Vec::new()));
    let (status, _) = send(&app, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn new_view_shows_first_page() {
    let app = app(StubSource::new(fifteen_jobs()));
    let (_, view) = open_view(&app).await;

    assert_eq!(view["page"]["total_count"], 15);
    assert_eq!(view["page"]["total_pages"], 2);
    assert_eq!(view["page"]["current_page"], 1);
    assert_eq!(page_ids(&view), (1..=12i64).collect::<Vec<_>>());
    assert_eq!(view["controls"]["pages"], json!([1, 2]));
    assert_eq!(view["active_filters"], json!([]));
    assert_eq!(view["loaded_count"], 15);
    assert!(view.get("notice").is_none());
}

#[tokio::test]
async fn paging_and_out_of_range_requests() {
    let app = app(StubSource::new(fifteen_jobs()));
    let (id, _) = open_view(&app).await;

    let (status, view) = send(&app, "PUT", &format!("/views/{id}/page"), Some(json!({"page": 2}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page_ids(&view), vec![13, 14, 15]);

    let (_, view) = send(&app, "PUT", &format!("/views/{id}/page"), Some(json!({"page": 10}))).await;
    assert_eq!(view["page"]["current_page"], 2);

    let (_, view) = send(&app, "PUT", &format!("/views/{id}/page"), Some(json!({"page": -1}))).await;
    assert_eq!(view["page"]["current_page"], 2);
}

#[tokio::test]
async fn filter_resets_page_and_chips_round_trip() {
    let app = app(StubSource::new(fifteen_jobs()));
    let (id, _) = open_view(&app).await;
    send(&app, "PUT", &format!("/views/{id}/page"), Some(json!({"page": 2}))).await;

    let (status, view) = send(
        &app,
        "PATCH",
        &format!("/views/{id}/filters"),
        Some(json!({
            "search": "engineer",
            "location_categories": ["remote"],
            "experience_levels": ["mid"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page_ids(&view), vec![7]);
    assert_eq!(view["page"]["current_page"], 1);
    assert!(view["controls"].is_null());
    assert_eq!(view["active_filters"][0]["label"], "Search: \"engineer\"");
    assert_eq!(view["active_filters"][1]["chip"], json!({"kind": "location", "value": "remote"}));

    let (_, view) = send(
        &app,
        "POST",
        &format!("/views/{id}/filters/remove"),
        Some(json!({"kind": "search"})),
    )
    .await;
    assert_eq!(view["filters"]["search"], "");
    assert_eq!(view["active_filters"].as_array().unwrap().len(), 2);

    let (_, view) = send(&app, "DELETE", &format!("/views/{id}/filters"), None).await;
    assert_eq!(view["page"]["total_count"], 15);
    assert_eq!(view["active_filters"], json!([]));
}

#[tokio::test]
async fn sort_keeps_current_page() {
    let app = app(StubSource::new(fifteen_jobs()));
    let (id, _) = open_view(&app).await;
    send(&app, "PUT", &format!("/views/{id}/page"), Some(json!({"page": 2}))).await;

    let (status, view) = send(&app, "PUT", &format!("/views/{id}/sort"), Some(json!({"sort": "date"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["sort"], "date-desc");
    assert_eq!(view["page"]["current_page"], 2);
    assert_eq!(page_ids(&view), vec![13, 14, 15]);
}

#[tokio::test]
async fn failed_fetch_yields_empty_view_with_notice() {
    let source = StubSource::new(fifteen_jobs());
    source.fail.store(true, Ordering::SeqCst);
    let app = app(source.clone());

    let (id, view) = open_view(&app).await;
    assert_eq!(view["page"]["total_count"], 0);
    assert_eq!(view["page"]["total_pages"], 1);
    assert!(view["notice"].as_str().unwrap().contains("boom"));

    source.fail.store(false, Ordering::SeqCst);
    let (_, view) = send(&app, "POST", &format!("/views/{id}/reload"), None).await;
    assert_eq!(view["page"]["total_count"], 15);
    assert!(view.get("notice").is_none());
}

#[tokio::test]
async fn views_are_independent() {
    let app = app(StubSource::new(fifteen_jobs()));
    let (first, _) = open_view(&app).await;
    let (second, _) = open_view(&app).await;

    send(&app, "PATCH", &format!("/views/{first}/filters"), Some(json!({"job_types": ["Full-Time"]}))).await;

    let (_, view) = send(&app, "GET", &format!("/views/{first}"), None).await;
    assert_eq!(view["page"]["total_count"], 1);
    let (_, view) = send(&app, "GET", &format!("/views/{second}"), None).await;
    assert_eq!(view["page"]["total_count"], 15);
}

#[tokio::test]
async fn job_detail_and_missing_resources() {
    let app = app(StubSource::new(fifteen_jobs()));
    let (id, _) = open_view(&app).await;

    let (status, job) = send(&app, "GET", &format!("/views/{id}/jobs/7"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["title"], "Backend Engineer");

    let (status, body) = send(&app, "GET", &format!("/views/{id}/jobs/99"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Job 99 not found");

    let (status, _) = send(&app, "DELETE", &format!("/views/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &format!("/views/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_bodies_are_json_bad_requests() {
    let app = app(StubSource::new(fifteen_jobs()));
    let (id, _) = open_view(&app).await;

    let cases = [
        ("PUT", "sort", json!({"sort": "bogus"})),
        ("PUT", "page", json!({"page": "two"})),
        ("PATCH", "filters", json!({"experience_levels": ["junior"]})),
        ("POST", "filters/remove", json!({"kind": "colour", "value": "red"})),
    ];
    for (method, path, body) in cases {
        let (status, resp) = send(&app, method, &format!("/views/{id}/{path}"), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {path}");
        assert!(resp["error"].as_str().is_some_and(|e| !e.is_empty()), "{method} {path}: {resp}");
    }

    // rejected requests leave the view untouched
    let (_, view) = send(&app, "GET", &format!("/views/{id}"), None).await;
    assert_eq!(view["sort"], "relevance");
    assert_eq!(view["page"]["total_count"], 15);
}

#[tokio::test(start_paused = true)]
async fn idle_views_expire() {
    let app = app(StubSource::new(fifteen_jobs()));
    let (idle, _) = open_view(&app).await;
    let (busy, _) = open_view(&app).await;

    tokio::time::advance(VIEW_TTL / 2).await;
    let (status, _) = send(&app, "GET", &format!("/views/{busy}"), None).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::advance(VIEW_TTL / 2 + Duration::from_secs(1)).await;
    let (status, body) = send(&app, "GET", &format!("/views/{idle}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], format!("View {idle} not found"));

    let (status, _) = send(&app, "GET", &format!("/views/{busy}"), None).await;
    assert_eq!(status, StatusCode::OK);
}
