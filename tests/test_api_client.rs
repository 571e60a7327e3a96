//! Integration tests for the YouTube API client and the render-pass
//! pipeline, driven against an in-process mock API.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use tubescope::api::{run_render_pass, ApiError, YouTubeClient};
use tubescope::decoration;
use tubescope::domain::ChannelId;

/// Bind the router on an ephemeral port and return the base URL.
async fn spawn_server(app: Router) -> url::Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock API");
    });
    url::Url::parse(&format!("http://{addr}/")).expect("valid base URL")
}

fn client(base: url::Url) -> YouTubeClient {
    YouTubeClient::new("test-key", Duration::from_secs(5))
        .expect("client builds")
        .with_base_url(base)
}

fn channel_search_items() -> Value {
    json!({
        "items": [
            { "id": { "kind": "youtube#channel", "channelId": "UC123" } },
            { "id": { "kind": "youtube#channel", "channelId": "UC999" } }
        ]
    })
}

fn example_channel_payload() -> Value {
    json!({
        "items": [{
            "snippet": { "title": "Example" },
            "statistics": {
                "subscriberCount": "1000",
                "viewCount": "50000",
                "videoCount": "10"
            }
        }]
    })
}

#[tokio::test]
async fn resolve_returns_first_match_verbatim() {
    let app = Router::new().route("/search", get(|| async { Json(channel_search_items()) }));
    let base = spawn_server(app).await;

    let id = client(base).resolve_channel("@example").await.expect("resolves");
    assert_eq!(id, ChannelId("UC123".to_string()));
}

#[tokio::test]
async fn resolve_not_found_attempts_no_downstream_fetch() {
    let channel_hits = Arc::new(AtomicUsize::new(0));
    let video_hits = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route("/search", get(|| async { Json(json!({ "items": [] })) }))
        .route(
            "/channels",
            get({
                let hits = channel_hits.clone();
                move || {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        Json(example_channel_payload())
                    }
                }
            }),
        )
        .route(
            "/videos",
            get({
                let hits = video_hits.clone();
                move || {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        Json(json!({ "items": [] }))
                    }
                }
            }),
        );
    let base = spawn_server(app).await;

    let err = run_render_pass(&client(base), "@nobody", 50)
        .await
        .expect_err("resolution fails");
    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
    assert_eq!(channel_hits.load(Ordering::SeqCst), 0);
    assert_eq!(video_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn channel_with_zero_items_is_not_found() {
    let app = Router::new().route("/channels", get(|| async { Json(json!({ "items": [] })) }));
    let base = spawn_server(app).await;

    let err = client(base)
        .fetch_channel(&ChannelId("UC404".to_string()))
        .await
        .expect_err("no items");
    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
}

#[tokio::test]
async fn channel_lookup_builds_the_example_record() {
    let app =
        Router::new().route("/channels", get(|| async { Json(example_channel_payload()) }));
    let base = spawn_server(app).await;

    let record = client(base)
        .fetch_channel(&ChannelId("UC123".to_string()))
        .await
        .expect("complete payload");
    assert_eq!(record.name, "Example");
    assert_eq!(record.subscribers, 1000);
    assert_eq!(record.total_views, 50_000);
    assert_eq!(record.video_count, 10);
    assert_eq!(record.average_views_per_video(), Some(5000.0));
}

#[tokio::test]
async fn channel_missing_statistics_is_malformed_not_transport() {
    let app = Router::new().route(
        "/channels",
        get(|| async { Json(json!({ "items": [{ "snippet": { "title": "Example" } }] })) }),
    );
    let base = spawn_server(app).await;

    let err = client(base)
        .fetch_channel(&ChannelId("UC123".to_string()))
        .await
        .expect_err("statistics absent");
    assert!(
        matches!(err, ApiError::MalformedResponse { field: "statistics" }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn video_fetch_is_lenient_ordered_and_kind_filtered() {
    let app = Router::new()
        .route(
            "/search",
            get(|| async {
                Json(json!({
                    "items": [
                        { "id": { "kind": "youtube#video", "videoId": "v1" } },
                        { "id": { "kind": "youtube#playlist", "playlistId": "p1" } },
                        { "id": { "kind": "youtube#video", "videoId": "v2" } }
                    ]
                }))
            }),
        )
        .route(
            "/videos",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                // Statistics come back in a different order than requested
                assert_eq!(params.get("id").map(String::as_str), Some("v1,v2"));
                Json(json!({
                    "items": [
                        {
                            "id": "v2",
                            "snippet": { "title": "Second" },
                            "statistics": { "viewCount": "200", "likeCount": "20", "commentCount": "2" }
                        },
                        {
                            "id": "v1",
                            "snippet": { "title": "First" },
                            "statistics": { "viewCount": "100", "likeCount": "10" }
                        }
                    ]
                }))
            }),
        );
    let base = spawn_server(app).await;

    let table = client(base)
        .fetch_videos(&ChannelId("UC123".to_string()), 50)
        .await
        .expect("video table");

    assert_eq!(table.len(), 2, "playlist result filtered out");
    assert_eq!(table[0].title, "First", "table keeps id-list order");
    assert_eq!(table[0].views, 100);
    assert_eq!(table[0].likes, 10);
    assert_eq!(table[0].comments, 0, "hidden counter defaults to zero");
    assert_eq!(table[0].engagement_rate(), Some(10.0));
    assert_eq!(table[1].title, "Second");
    assert_eq!(table[1].comments, 2);
}

#[tokio::test]
async fn channel_without_videos_yields_empty_table() {
    let app = Router::new()
        .route("/search", get(|| async { Json(json!({ "items": [] })) }))
        .route("/videos", get(|| async { Json(json!({ "items": [] })) }));
    let base = spawn_server(app).await;

    let table = client(base)
        .fetch_videos(&ChannelId("UCempty".to_string()), 50)
        .await
        .expect("empty is not an error");
    assert!(table.is_empty());
}

#[tokio::test]
async fn non_success_status_surfaces_the_api_message() {
    let app = Router::new().route(
        "/channels",
        get(|| async {
            (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": { "code": 403, "message": "quota exceeded" } })),
            )
        }),
    );
    let base = spawn_server(app).await;

    let err = client(base)
        .fetch_channel(&ChannelId("UC123".to_string()))
        .await
        .expect_err("403");
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn full_render_pass_assembles_both_outputs() {
    let app = Router::new()
        .route(
            "/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                if params.contains_key("channelId") {
                    // Recent-video listing
                    Json(json!({
                        "items": [{ "id": { "kind": "youtube#video", "videoId": "v1" } }]
                    }))
                } else {
                    // Channel resolution
                    Json(channel_search_items())
                }
            }),
        )
        .route("/channels", get(|| async { Json(example_channel_payload()) }))
        .route(
            "/videos",
            get(|| async {
                Json(json!({
                    "items": [{
                        "id": "v1",
                        "snippet": { "title": "Only" },
                        "statistics": { "viewCount": "100", "likeCount": "10" }
                    }]
                }))
            }),
        );
    let base = spawn_server(app).await;

    let pass = run_render_pass(&client(base), "@example", 50).await.expect("pipeline runs");
    assert_eq!(pass.channel_id, ChannelId("UC123".to_string()));
    assert_eq!(pass.channel.name, "Example");
    assert_eq!(pass.videos.len(), 1);
    assert_eq!(pass.videos[0].engagement_rate(), Some(10.0));
}

#[tokio::test]
async fn decoration_fetch_is_best_effort() {
    let app = Router::new().route(
        "/ok.json",
        get(|| async {
            Json(json!({ "v": "5.5.2", "nm": "analysis", "fr": 25.0, "ip": 0.0, "op": 120.0 }))
        }),
    );
    let base = spawn_server(app).await;

    let loaded =
        decoration::load(base.join("ok.json").unwrap().as_str(), Duration::from_secs(5)).await;
    let loaded = loaded.expect("valid asset loads");
    assert_eq!(loaded.name.as_deref(), Some("analysis"));

    let missing =
        decoration::load(base.join("missing.json").unwrap().as_str(), Duration::from_secs(5))
            .await;
    assert!(missing.is_none(), "absence of decoration must not fail");
}
