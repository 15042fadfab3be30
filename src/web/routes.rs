// src/web/routes.rs
use crate::{
    services::document_service,
    state::AppState,
    web::{
        attendance_handlers, dashboard_handlers, document_handlers, schedule_handlers,
        subject_handlers,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Page and health check ---
    let public_routes = Router::new()
        .route("/", get(dashboard_handlers::dashboard_handler))
        .route("/health", get(|| async { "ok" }));

    let subject_routes = Router::new()
        .route(
            "/",
            get(subject_handlers::list_subjects).post(subject_handlers::create_subject),
        )
        .route("/{id}", get(subject_handlers::get_subject))
        .route("/{id}/attendance", patch(subject_handlers::update_attendance));

    // Uploads get their own body limit (the default one is 2 MB). It covers
    // the whole multipart body; the handler enforces the file limit itself.
    let upload_limit = app_state
        .config
        .max_upload_bytes
        .saturating_add(document_service::MULTIPART_HEADROOM_BYTES);
    let upload_routes = Router::new()
        .route("/upload", post(document_handlers::upload_document))
        .layer(DefaultBodyLimit::max(upload_limit));

    // --- JSON API ---
    let api_routes = Router::new()
        .nest("/subjects", subject_routes)
        .route(
            "/attendance",
            get(attendance_handlers::list_attendance).post(attendance_handlers::create_attendance),
        )
        .route(
            "/skip-calculator/{subject_id}",
            get(attendance_handlers::skip_calculator),
        )
        .route(
            "/schedule",
            get(schedule_handlers::list_schedule).post(schedule_handlers::create_schedule_event),
        )
        .route("/documents", get(document_handlers::list_documents))
        .merge(upload_routes);

    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, db};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for `oneshot`

    async fn test_app() -> Router {
        let pool = db::test_pool().await;
        db::seed_sample_data(&pool).await.unwrap();
        create_router(AppState::new(pool, AppConfig::default()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn subjects_are_listed_with_derived_fields() {
        let app = test_app().await;
        let (status, body) = send(&app, Method::GET, "/api/subjects", None).await;
        assert_eq!(status, StatusCode::OK);

        let subjects = body.as_array().unwrap();
        assert_eq!(subjects.len(), 4);
        let physics = subjects.iter().find(|s| s["id"] == "physics-1").unwrap();
        assert_eq!(physics["attendanceRate"], 63.3);
        assert_eq!(physics["canSkip"], 0);
        assert_eq!(physics["status"], "warning");
    }

    #[tokio::test]
    async fn skip_calculator_reports_strategy() {
        let app = test_app().await;
        let (status, body) = send(&app, Method::GET, "/api/skip-calculator/ds-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subjectName"], "Data Structures");
        assert_eq!(body["currentAttendance"], 80.0);
        assert_eq!(body["canSkip"], 1);
        assert_eq!(body["needToAttend"], 0);
        assert_eq!(body["status"], "safe");
        assert_eq!(body["recommendation"], "You can skip up to 1 more classes safely.");
    }

    #[tokio::test]
    async fn unknown_subject_is_404() {
        let app = test_app().await;
        let (status, body) = send(&app, Method::GET, "/api/subjects/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].as_str().unwrap().contains("nope"));

        let (status, _) = send(&app, Method::GET, "/api/skip-calculator/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn posting_attendance_updates_the_subject() {
        let app = test_app().await;
        let (status, record) = send(
            &app,
            Method::POST,
            "/api/attendance",
            Some(json!({ "subjectId": "ds-1", "date": "2025-03-03T09:00:00Z", "attended": true })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(record["subjectId"], "ds-1");
        assert_eq!(record["attended"], true);

        let (_, subject) = send(&app, Method::GET, "/api/subjects/ds-1", None).await;
        assert_eq!(subject["attendedClasses"], 25);
        assert_eq!(subject["attendanceRate"], 83.3);
        assert_eq!(subject["status"], "safe");

        let (_, records) = send(&app, Method::GET, "/api/attendance?subjectId=ds-1", None).await;
        assert_eq!(records.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn overfull_subject_is_flagged_or_rejected_in_strict_mode() {
        let app = test_app().await;
        // math-1 starts at 27/30; four more attended classes overshoot the total
        for _ in 0..4 {
            let (status, _) = send(
                &app,
                Method::POST,
                "/api/attendance",
                Some(json!({ "subjectId": "math-1", "date": "2025-03-03T09:00:00Z" })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, Method::GET, "/api/skip-calculator/math-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentAttendance"], 100.0);
        assert_eq!(body["inconsistencies"][0]["kind"], "attendedExceedsTotal");
        assert_eq!(body["inconsistencies"][0]["attendedClasses"], 31);

        let (status, _) = send(
            &app,
            Method::GET,
            "/api/skip-calculator/math-1?strict=true",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn attendance_for_unknown_subject_is_404() {
        let app = test_app().await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/attendance",
            Some(json!({ "subjectId": "ghost", "date": "2025-03-03T09:00:00Z" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_bodies_are_400() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/subjects/ds-1/attendance",
            Some(json!({ "attendedClasses": "lots" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/subjects",
            Some(json!({ "name": "Art", "minimumAttendance": 120 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_overrides_attended_classes() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/subjects/physics-1/attendance",
            Some(json!({ "attendedClasses": 23 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["attendedClasses"], 23);
        assert_eq!(body["status"], "safe");
        assert_eq!(body["canSkip"], 0);

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/api/subjects/physics-1/attendance",
            Some(json!({ "attendedClasses": 31 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn created_subject_starts_with_defaults() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/subjects",
            Some(json!({ "name": "Operating Systems" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["totalClasses"], 30);
        assert_eq!(body["attendedClasses"], 0);
        assert_eq!(body["status"], "warning");
        assert_eq!(body["needToAttend"], 23);
    }

    #[tokio::test]
    async fn upcoming_schedule_is_limited() {
        let app = test_app().await;
        let (status, body) = send(&app, Method::GET, "/api/schedule?upcoming=true&limit=2", None).await;
        assert_eq!(status, StatusCode::OK);
        let events = body.as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["title"], "Database Lab");
        assert_eq!(events[0]["type"], "class");
    }

    #[tokio::test]
    async fn dashboard_renders_subjects() {
        let app = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Data Structures"));
        assert!(html.contains("63.3%"));
    }

    #[tokio::test]
    async fn upload_rejects_non_pdf() {
        let app = test_app().await;
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\ntimetable\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"pdf\"; filename=\"notes.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nhello\r\n--{b}--\r\n",
            b = boundary
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let (_, documents) = send(&app, Method::GET, "/api/documents", None).await;
        assert!(documents.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_records_pdf() {
        let app = test_app().await;
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\ncalendar\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"pdf\"; filename=\"calendar.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n%PDF-1.4 minimal\r\n--{b}--\r\n",
            b = boundary
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let (_, documents) = send(&app, Method::GET, "/api/documents", None).await;
        let documents = documents.as_array().unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0]["filename"], "calendar.pdf");
        assert_eq!(documents[0]["type"], "calendar");
        assert_eq!(documents[0]["processed"], false);
    }

    fn pdf_upload(boundary: &str, pdf: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\ntimetable\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"pdf\"; filename=\"big.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n",
            b = boundary
        )
        .into_bytes();
        body.extend_from_slice(pdf);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn pdf_of_len(len: usize) -> Vec<u8> {
        let mut pdf = b"%PDF-1.4".to_vec();
        pdf.resize(len, b'x');
        pdf
    }

    #[tokio::test]
    async fn upload_size_limit_applies_to_the_file() {
        let pool = db::test_pool().await;
        let config = AppConfig {
            max_upload_bytes: 1024,
            ..AppConfig::default()
        };
        let app = create_router(AppState::new(pool, config));

        // Exactly at the limit: multipart framing does not count against it
        let response = app
            .clone()
            .oneshot(pdf_upload("XBOUNDARY", &pdf_of_len(1024)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(pdf_upload("XBOUNDARY", &pdf_of_len(1025)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        // Far past the request body limit: rejected while streaming
        let oversized = pdf_of_len(1024 + document_service::MULTIPART_HEADROOM_BYTES + 1);
        let response = app
            .clone()
            .oneshot(pdf_upload("XBOUNDARY", &oversized))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let (_, documents) = send(&app, Method::GET, "/api/documents", None).await;
        assert_eq!(documents.as_array().unwrap().len(), 1);
    }
}
