//! Platform API Integration Tests
//!
//! Full routers over an in-memory SQLite database, driven with
//! `tower::ServiceExt::oneshot` and real session tokens.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use ma_platform::shared::middleware::{AppState, AuthLayer};
use ma_platform::{
    init_schema, File, FileStore, Meetup, MeetupStore, Platform, QueueNotificationDispatcher,
    TokenService, User, UserStore,
};
use ma_queue::sqlite::SqliteQueue;
use ma_queue::EmbeddedQueue;

struct TestApp {
    app: Router,
    platform: Platform,
    queue: Arc<SqliteQueue>,
    tokens: Arc<TokenService>,
}

impl TestApp {
    async fn new() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();

        let queue = Arc::new(SqliteQueue::new(pool.clone(), "notifications"));
        queue.init_schema().await.unwrap();

        let dispatcher = Arc::new(QueueNotificationDispatcher::new(queue.clone()));
        let platform = Platform::sqlite(pool, dispatcher, "http://files.test/");
        let tokens = Arc::new(TokenService::new("test-secret", "meetapp", "meetapp"));

        let (router, _openapi) = platform.router().split_for_parts();
        let app = router.layer(AuthLayer::new(AppState { token_service: tokens.clone() }));

        Self { app, platform, queue, tokens }
    }

    async fn user(&self, name: &str) -> (User, String) {
        let user = User::new(name, format!("{}@example.com", name.to_lowercase()));
        self.platform.users.insert(&user).await.unwrap();
        let token = self.tokens.issue(&user.id, Duration::hours(1)).unwrap();
        (user, token)
    }

    async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_meetup(&self, token: &str, date: DateTime<Utc>) -> String {
        let (status, body) = self.request(
            Method::POST,
            "/meetups",
            Some(token),
            Some(json!({
                "title": "Rust Meetup",
                "description": "Async talks",
                "location": "Main Hall",
                "date": date,
            })),
        ).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }
}

fn in_days(days: i64) -> DateTime<Utc> {
    (Utc::now() + Duration::days(days)).trunc_subsecs(0)
}

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let app = TestApp::new().await;
        let (status, body) = app.request(Method::GET, "/subscriptions", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let app = TestApp::new().await;
        let (status, _) = app.request(Method::GET, "/organizing", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_cookie_accepted() {
        let app = TestApp::new().await;
        let (_, token) = app.user("Ana").await;

        let request = Request::builder()
            .uri("/subscriptions")
            .header("cookie", format!("meetapp_session={}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

mod subscription_api_tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_list_and_leave() {
        let app = TestApp::new().await;
        let (organizer, organizer_token) = app.user("Ana").await;
        let (guest, guest_token) = app.user("Bruno").await;
        let meetup_id = app.create_meetup(&organizer_token, in_days(10)).await;
        let path = format!("/meetups/{}/subscriptions", meetup_id);

        let (status, body) = app.request(Method::POST, &path, Some(&guest_token), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["userId"], guest.id.as_str());
        assert_eq!(body["meetupId"], meetup_id.as_str());
        assert_eq!(app.queue.pending_count().await.unwrap(), 1);

        let (status, body) = app.request(Method::GET, "/subscriptions", Some(&guest_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["meetup"]["id"], meetup_id.as_str());
        assert_eq!(body["data"][0]["meetup"]["owner"]["name"], organizer.name.as_str());
        assert_eq!(body["data"][0]["meetup"]["past"], false);

        let (status, _) = app.request(Method::DELETE, &path, Some(&guest_token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = app.request(Method::GET, "/subscriptions", Some(&guest_token), None).await;
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_rejections_map_to_codes() {
        let app = TestApp::new().await;
        let (_, organizer_token) = app.user("Ana").await;
        let (_, guest_token) = app.user("Bruno").await;
        let meetup_id = app.create_meetup(&organizer_token, in_days(10)).await;
        let path = format!("/meetups/{}/subscriptions", meetup_id);

        let (status, body) = app.request(Method::POST, &path, Some(&organizer_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "SELF_SUBSCRIPTION");
        assert_eq!(body["message"], "Can't subscribe to your own meetups");

        app.request(Method::POST, &path, Some(&guest_token), None).await;
        let (status, body) = app.request(Method::POST, &path, Some(&guest_token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "ALREADY_SUBSCRIBED");

        let (status, body) = app
            .request(Method::POST, "/meetups/0000000000000/subscriptions", Some(&guest_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "MEETUP_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_schedule_conflict_over_http() {
        let app = TestApp::new().await;
        let (_, ana_token) = app.user("Ana").await;
        let (_, carla_token) = app.user("Carla").await;
        let (_, guest_token) = app.user("Bruno").await;
        let date = in_days(7);
        let first = app.create_meetup(&ana_token, date).await;
        let second = app.create_meetup(&carla_token, date).await;

        let (status, _) = app
            .request(Method::POST, &format!("/meetups/{}/subscriptions", first), Some(&guest_token), None)
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = app
            .request(Method::POST, &format!("/meetups/{}/subscriptions", second), Some(&guest_token), None)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "SCHEDULE_CONFLICT");
        assert_eq!(body["details"]["meetupId"], first.as_str());
    }

    #[tokio::test]
    async fn test_past_meetup_over_http() {
        let app = TestApp::new().await;
        let (organizer, _) = app.user("Ana").await;
        let (_, guest_token) = app.user("Bruno").await;
        let past = Meetup::new(&organizer.id, "Old", "d", "l", Utc::now() - Duration::days(2));
        app.platform.meetups.insert(&past).await.unwrap();

        let (status, body) = app
            .request(Method::POST, &format!("/meetups/{}/subscriptions", past.id), Some(&guest_token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "PAST_MEETUP");

        let (status, body) = app
            .request(Method::DELETE, &format!("/meetups/{}/subscriptions", past.id), Some(&guest_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "SUBSCRIPTION_NOT_FOUND");
    }
}

mod meetup_api_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_validation() {
        let app = TestApp::new().await;
        let (_, token) = app.user("Ana").await;

        let (status, body) = app.request(
            Method::POST,
            "/meetups",
            Some(&token),
            Some(json!({ "title": "Old", "description": "d", "location": "l", "date": in_days(-1) })),
        ).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "PAST_DATE");

        let (status, body) = app.request(
            Method::POST,
            "/meetups",
            Some(&token),
            Some(json!({ "title": " ", "description": "d", "location": "l", "date": in_days(1) })),
        ).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "TITLE_REQUIRED");

        let (status, body) = app.request(
            Method::POST,
            "/meetups",
            Some(&token),
            Some(json!({
                "title": "t", "description": "d", "location": "l",
                "date": in_days(1), "bannerId": "missing",
            })),
        ).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BANNER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_by_owner_only() {
        let app = TestApp::new().await;
        let (_, owner_token) = app.user("Ana").await;
        let (_, other_token) = app.user("Bruno").await;
        let id = app.create_meetup(&owner_token, in_days(5)).await;
        let path = format!("/meetups/{}", id);

        let (status, body) = app
            .request(Method::PUT, &path, Some(&other_token), Some(json!({ "title": "Hijacked" })))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "NOT_MEETUP_OWNER");

        let new_date = in_days(6);
        let (status, body) = app
            .request(
                Method::PUT,
                &path,
                Some(&owner_token),
                Some(json!({ "title": "Rust Meetup #2", "date": new_date })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Rust Meetup #2");
        assert_eq!(body["location"], "Main Hall");

        let stored = app.platform.meetups.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.date, new_date);

        let (status, body) = app
            .request(Method::PUT, &path, Some(&owner_token), Some(json!({ "date": in_days(-3) })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "PAST_DATE");
    }

    #[tokio::test]
    async fn test_cancel_meetup_drops_subscriptions() {
        let app = TestApp::new().await;
        let (_, owner_token) = app.user("Ana").await;
        let (_, guest_token) = app.user("Bruno").await;
        let id = app.create_meetup(&owner_token, in_days(5)).await;
        app.request(Method::POST, &format!("/meetups/{}/subscriptions", id), Some(&guest_token), None)
            .await;

        let (status, body) = app
            .request(Method::DELETE, &format!("/meetups/{}", id), Some(&guest_token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);

        let (status, _) = app
            .request(Method::DELETE, &format!("/meetups/{}", id), Some(&owner_token), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = app.request(Method::GET, "/subscriptions", Some(&guest_token), None).await;
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_browse_by_day() {
        let app = TestApp::new().await;
        let (_, token) = app.user("Ana").await;
        let day = in_days(3).date_naive().and_hms_opt(10, 0, 0).unwrap().and_utc();
        app.create_meetup(&token, day).await;
        app.create_meetup(&token, day + Duration::hours(1)).await;
        app.create_meetup(&token, day + Duration::days(2)).await;

        let uri = format!("/meetups?date={}&page=1&size=1", day.format("%Y-%m-%d"));
        let (status, body) = app.request(Method::GET, &uri, Some(&token), None).await;

        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["total"], 2);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["owner"]["name"], "Ana");
    }
}

mod organizing_api_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_and_show_with_banner() {
        let app = TestApp::new().await;
        let (_, token) = app.user("Ana").await;
        let (_, other_token) = app.user("Bruno").await;

        let banner = File::new("banner.png", "c0ffee.png");
        app.platform.files.insert(&banner).await.unwrap();

        let later = app.create_meetup(&token, in_days(9)).await;
        let (status, body) = app.request(
            Method::POST,
            "/meetups",
            Some(&token),
            Some(json!({
                "title": "Sooner", "description": "d", "location": "l",
                "date": in_days(2), "bannerId": banner.id,
            })),
        ).await;
        assert_eq!(status, StatusCode::CREATED);
        let sooner = body["id"].as_str().unwrap().to_string();

        let (_, body) = app.request(Method::GET, "/organizing", Some(&token), None).await;
        let ids: Vec<&str> = body.as_array().unwrap().iter().map(|m| m["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec![sooner.as_str(), later.as_str()]);

        let (status, body) = app
            .request(Method::GET, &format!("/organizing/{}", sooner), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["banner"]["url"], "http://files.test/c0ffee.png");
        assert_eq!(body["title"], "Sooner");

        let (status, body) = app
            .request(Method::GET, &format!("/organizing/{}", sooner), Some(&other_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "MEETUP_NOT_FOUND");
    }
}

#[tokio::test]
async fn test_openapi_collects_paths() {
    let app = TestApp::new().await;
    let (_, openapi) = app.platform.router().split_for_parts();

    for path in ["/subscriptions", "/meetups/{id}/subscriptions", "/meetups", "/meetups/{id}", "/organizing/{id}"] {
        assert!(openapi.paths.paths.contains_key(path), "missing {}", path);
    }
}
