pub mod auth;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod plan;
pub mod progress;
pub mod reminder;
pub mod session;

use crate::state::SharedState;
use axum::{routing::get, Router};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::router(state.clone()))
        .nest("/profile", plan::profile_router(state.clone()))
        .nest("/plan", plan::plan_router(state.clone()))
        .nest("/dashboard", dashboard::router(state.clone()))
        .nest("/progress", progress::router(state.clone()))
        .nest("/export", export::router(state.clone()))
        .nest("/reminder", reminder::router(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mailer::testing::RecordingMailer;
    use crate::state::testing::test_state;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Client {
        app: Router,
        state: SharedState,
        mailer: Arc<RecordingMailer>,
        cookie: Option<String>,
    }

    impl Client {
        fn new() -> Self {
            Self::with_mailer(RecordingMailer::default())
        }

        fn with_mailer(mailer: RecordingMailer) -> Self {
            let mailer = Arc::new(mailer);
            let state = test_state(mailer.clone());
            Self {
                app: routes(state.clone()),
                state,
                mailer,
                cookie: None,
            }
        }

        async fn call(&mut self, method: &str, uri: &str, body: Option<Value>) -> Response {
            let mut req = Request::builder().method(method).uri(uri);
            if let Some(cookie) = &self.cookie {
                req = req.header(header::COOKIE, cookie.as_str());
            }
            let req = match body {
                Some(json) => req
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string())),
                None => req.body(Body::empty()),
            }
            .unwrap();
            let resp = self.app.clone().oneshot(req).await.unwrap();
            if let Some(set) = resp.headers().get(header::SET_COOKIE) {
                let pair = set.to_str().unwrap().split(';').next().unwrap().to_string();
                self.cookie = Some(pair);
            }
            resp
        }

        async fn json(&mut self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let resp = self.call(method, uri, body).await;
            let status = resp.status();
            let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, value)
        }

        async fn login(&mut self, email: &str) {
            let (status, _) = self
                .json("POST", "/auth/login", Some(json!({ "email": email, "password": "pw" })))
                .await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn health_is_open() {
        let mut client = Client::new();
        let resp = client.call("GET", "/health", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn goal_options_are_public() {
        let mut client = Client::new();
        let (status, goals) = client.json("GET", "/plan/goals", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            goals,
            json!([
                { "value": "lose_weight", "label": "Lose Weight", "calories": 1700 },
                { "value": "gain_weight", "label": "Gain Weight", "calories": 2500 },
                { "value": "maintain_weight", "label": "Maintain Weight", "calories": 2000 }
            ])
        );
    }

    #[tokio::test]
    async fn missing_credentials_warn_without_session() {
        let mut client = Client::new();
        let (status, body) = client
            .json("POST", "/auth/signup", Some(json!({ "email": "a@b.c", "password": "" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please enter both email and password");
        assert!(client.cookie.is_none());
        assert!(client.state.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn signup_accepts_any_pair_and_sets_cookie() {
        let mut client = Client::new();
        let (status, body) = client
            .json(
                "POST",
                "/auth/signup",
                Some(json!({ "email": "jane.doe@example.com", "password": "x" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["display_name"], "Jane.Doe");
        assert_eq!(body["message"], "Account created! Logged in as jane.doe@example.com");
        assert_eq!(body["hint"], "Password should be at least 6 characters");
        assert!(client.cookie.as_deref().unwrap().starts_with("session="));
    }

    #[tokio::test]
    async fn whitespace_credentials_are_taken_as_given() {
        let mut client = Client::new();
        let (status, body) = client
            .json("POST", "/auth/login", Some(json!({ "email": " a@b.c", "password": "   " })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], " a@b.c");
        assert_eq!(body["message"], "Logged in as  a@b.c");
    }

    #[tokio::test]
    async fn protected_routes_need_a_session() {
        let mut client = Client::new();
        for uri in ["/plan", "/progress", "/dashboard", "/profile", "/export/pdf"] {
            let (status, body) = client.json("GET", uri, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["error"], "Please log in to continue");
        }
        client.cookie = Some("session=forged.token".to_string());
        let (status, _) = client.json("GET", "/plan", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn plan_hides_diet_until_generated() {
        let mut client = Client::new();
        client.login("kai@example.com").await;

        let (status, plan) = client.json("GET", "/plan", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(plan["goal"], "Lose Weight");
        assert_eq!(plan["calories"], 1700);
        assert_eq!(plan["height_display"], "167.6 cm");
        assert!(plan["diet"].is_null());
        assert_eq!(plan["exercise"][0]["label"], "Running");
        assert_eq!(plan["schedule"].as_array().unwrap().len(), 7);
        assert_eq!(plan["schedule"][6], json!({ "day": "Sun", "diet": "Rest", "exercise": "Yoga" }));

        let (_, plan) = client.json("POST", "/plan/diet", None).await;
        assert_eq!(plan["diet"][0]["description"], "Oatmeal & Fruits");

        let (_, plan) = client.json("GET", "/plan", None).await;
        assert_eq!(plan["diet"][2]["label"], "Dinner");
    }

    #[tokio::test]
    async fn profile_update_rederives_plan() {
        let mut client = Client::new();
        client.login("kai@example.com").await;

        let profile = json!({
            "goal": "gain_weight",
            "exercise_minutes": 90,
            "weight": 80.0,
            "height_feet": 6,
            "height_inches": 0,
            "age": 30,
            "gender": "female"
        });
        let (status, saved) = client.json("PUT", "/profile", Some(profile.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved, profile);

        let (_, plan) = client.json("GET", "/plan", None).await;
        assert_eq!(plan["calories"], 2500);
        assert_eq!(plan["height_display"], "182.9 cm");
        assert_eq!(plan["schedule"][3]["exercise"], "Bench Press");
    }

    #[tokio::test]
    async fn profile_outside_form_ranges_is_rejected() {
        let mut client = Client::new();
        client.login("kai@example.com").await;
        let (status, body) = client
            .json(
                "PUT",
                "/profile",
                Some(json!({
                    "goal": "lose_weight",
                    "exercise_minutes": 5,
                    "weight": 70.0,
                    "height_feet": 5,
                    "height_inches": 6,
                    "age": 25,
                    "gender": "male"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "exercise_minutes must be between 10 and 180");
    }

    #[tokio::test]
    async fn progress_flows_from_empty_to_chart() {
        let mut client = Client::new();
        client.login("kai@example.com").await;

        let (_, view) = client.json("GET", "/progress", None).await;
        assert_eq!(view, json!({ "state": "empty" }));

        for (day, weight) in [(1, 70.0), (2, 69.0), (3, 68.0), (2, 71.0)] {
            let (status, body) = client
                .json("POST", "/progress", Some(json!({ "day": day, "weight": weight })))
                .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["message"], "Progress added!");
        }

        let (_, view) = client.json("GET", "/progress", None).await;
        assert_eq!(view["state"], "non_empty");
        assert_eq!(view["completion"], 42);
        let days: Vec<u64> = view["chart"]["points"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["day"].as_u64().unwrap())
            .collect();
        assert_eq!(days, vec![1, 2, 3, 2]);
        assert_eq!(view["chart"]["points"][1]["weight"], 69.0);
    }

    #[tokio::test]
    async fn progress_weight_defaults_to_profile_and_is_range_checked() {
        let mut client = Client::new();
        client.login("kai@example.com").await;

        let (_, body) = client.json("POST", "/progress", Some(json!({ "day": 1 }))).await;
        assert_eq!(body["samples"][0]["weight"], 70.0);

        let (status, _) = client
            .json("POST", "/progress", Some(json!({ "day": 2, "weight": 250.0 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = client
            .json("POST", "/progress", Some(json!({ "day": 0, "weight": 70.0 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, view) = client.json("GET", "/progress", None).await;
        assert_eq!(view["chart"]["points"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_days_get_a_json_error() {
        let mut client = Client::new();
        client.login("kai@example.com").await;

        for day in [json!(-1), json!(1.5), json!("three")] {
            let (status, body) = client
                .json("POST", "/progress", Some(json!({ "day": day, "weight": 70.0 })))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{day}");
            assert!(body["error"].is_string(), "{day}");
        }
        let (_, body) = client
            .json("POST", "/progress", Some(json!({ "day": -1, "weight": 70.0 })))
            .await;
        assert_eq!(body["error"], "day must be a whole number of at least 1");

        let (_, view) = client.json("GET", "/progress", None).await;
        assert_eq!(view, json!({ "state": "empty" }));
    }

    #[tokio::test]
    async fn relogin_keeps_ledger_and_logout_discards_it() {
        let mut client = Client::new();
        client.login("first@example.com").await;
        client
            .json("POST", "/progress", Some(json!({ "day": 1, "weight": 75.0 })))
            .await;

        client.login("second@example.com").await;
        let (_, dash) = client.json("GET", "/dashboard", None).await;
        assert_eq!(dash["display_name"], "Second");
        let (_, view) = client.json("GET", "/progress", None).await;
        assert_eq!(view["completion"], 50);

        let (status, _) = client.json("POST", "/auth/logout", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = client.json("GET", "/progress", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        client.login("first@example.com").await;
        let (_, view) = client.json("GET", "/progress", None).await;
        assert_eq!(view, json!({ "state": "empty" }));
    }

    #[tokio::test]
    async fn dashboard_shows_metrics_and_quote() {
        let mut client = Client::new();
        client.login("max@example.com").await;
        let (status, dash) = client.json("GET", "/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dash["headline"], "Welcome, Max!");
        assert_eq!(dash["metrics"][0]["delta"], "5 kg change");
        assert_eq!(dash["metrics"][1]["value"], "1700 kcal");
        assert!(crate::domain::dashboard::QUOTES.contains(&dash["quote"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn pdf_export_names_the_user() {
        let mut client = Client::new();
        client.login("pdf@example.com").await;
        let resp = client.call("GET", "/export/pdf", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Fitness_Plan.pdf\""
        );
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-"));
        assert!(text.contains("Fitness Plan for pdf@example.com"));
    }

    #[tokio::test]
    async fn reminder_goes_to_session_email() {
        let mut client = Client::new();
        client.login("rem@example.com").await;
        let (status, body) = client.json("POST", "/reminder/email", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["to"], "rem@example.com");

        let sent = client.mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Daily Fitness Reminder");
        assert_eq!(
            sent[0].body,
            "Hello rem@example.com, don't forget your Lose Weight plan today!"
        );
    }

    #[tokio::test]
    async fn reminder_failure_is_reported_not_retried() {
        let mut client = Client::with_mailer(RecordingMailer::failing("connection refused"));
        client.login("rem@example.com").await;
        let (status, body) = client.json("POST", "/reminder/email", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Email failed: connection refused");
        assert!(client.mailer.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn reminders_are_throttled_per_session() {
        let mut client = Client::new();
        client.login("rem@example.com").await;
        // test config allows two per window
        for _ in 0..2 {
            let (status, _) = client.json("POST", "/reminder/email", None).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, _) = client.json("POST", "/reminder/email", None).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn failed_reminders_do_not_use_up_the_budget() {
        let mut client = Client::with_mailer(RecordingMailer::failing("relay down"));
        client.login("rem@example.com").await;
        // test config allows two per window
        for _ in 0..3 {
            let (status, _) = client.json("POST", "/reminder/email", None).await;
            assert_eq!(status, StatusCode::BAD_GATEWAY);
        }

        *client.mailer.fail_with.lock().await = None;
        for _ in 0..2 {
            let (status, _) = client.json("POST", "/reminder/email", None).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, _) = client.json("POST", "/reminder/email", None).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(client.mailer.sent.lock().await.len(), 2);
    }
}
