use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

async fn test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("candidatures.db");
    let pool = candidature_backend::database::pool::create_pool(&format!(
        "sqlite://{}",
        db_path.display()
    ))
    .await
    .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let state = candidature_backend::AppState::new(pool, dir.path().join("uploads"));
    let app = candidature_backend::build_router(state, 16 * 1024 * 1024);
    (app, dir)
}

fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Body {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, filename, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn post_candidature(body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/candidatures")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body)
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn valid_fields<'a>() -> Vec<(&'a str, &'a str)> {
    vec![
        ("full_name", "Jane Doe"),
        ("email", "jane@x.com"),
        ("spi_number", "SPI123"),
        ("phone", "0600000000"),
        ("data_processing_consent", "true"),
        ("documents_validity_confirmed", "true"),
    ]
}

async fn body_json(response: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn list_len(app: &Router) -> usize {
    let response = app
        .clone()
        .oneshot(get("/api/candidatures"))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await.as_array().expect("array").len()
}

#[tokio::test]
async fn valid_submission_round_trips() {
    let (app, _dir) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_candidature(multipart_body(&valid_fields(), &[])))
        .await
        .expect("submit");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["status"], "success");
    let id = created["id"].as_i64().expect("id");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/candidatures/{id}")))
        .await
        .expect("fetch");
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["full_name"], "Jane Doe");
    assert_eq!(record["email"], "jane@x.com");
    assert_eq!(record["spi_number"], "SPI123");
    assert_eq!(record["phone"], "0600000000");
    assert_eq!(record["data_processing_consent"], true);
    assert_eq!(record["documents_validity_confirmed"], true);
    assert!(record["document_front"].is_null());
    assert!(record["document_back"].is_null());
    assert!(record["residence_proof"].is_null());
    assert!(record["submitted_at"].is_string());
}

#[tokio::test]
async fn missing_required_field_is_rejected() {
    let (app, _dir) = test_app().await;

    let mut fields = valid_fields();
    fields.retain(|(name, _)| *name != "phone");
    let response = app
        .clone()
        .oneshot(post_candidature(multipart_body(&fields, &[])))
        .await
        .expect("submit");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().expect("error").contains("phone"));

    assert_eq!(list_len(&app).await, 0);
}

#[tokio::test]
async fn consent_must_be_literal_true() {
    let (app, _dir) = test_app().await;

    let mut fields = valid_fields();
    for (name, value) in &mut fields {
        if *name == "data_processing_consent" {
            *value = "false";
        }
    }
    let response = app
        .clone()
        .oneshot(post_candidature(multipart_body(&fields, &[])))
        .await
        .expect("submit");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error")
        .contains("traitement des données"));

    let mut fields = valid_fields();
    for (name, value) in &mut fields {
        if *name == "documents_validity_confirmed" {
            *value = "no";
        }
    }
    let response = app
        .clone()
        .oneshot(post_candidature(multipart_body(&fields, &[])))
        .await
        .expect("submit");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error")
        .contains("validité de vos documents"));

    assert_eq!(list_len(&app).await, 0);
}

#[tokio::test]
async fn list_is_ordered_newest_first() {
    let (app, _dir) = test_app().await;

    for name in ["First Applicant", "Second Applicant"] {
        let mut fields = valid_fields();
        for (field, value) in &mut fields {
            if *field == "full_name" {
                *value = name;
            }
        }
        let response = app
            .clone()
            .oneshot(post_candidature(multipart_body(&fields, &[])))
            .await
            .expect("submit");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get("/api/candidatures"))
        .await
        .expect("list");
    let body = body_json(response).await;
    let records = body.as_array().expect("array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["full_name"], "Second Applicant");
    assert_eq!(records[1]["full_name"], "First Applicant");
    assert!(records[0]["id"].as_i64() > records[1]["id"].as_i64());
}

#[tokio::test]
async fn disallowed_extension_is_skipped_not_fatal() {
    let (app, _dir) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_candidature(multipart_body(
            &valid_fields(),
            &[("document_front", "payload.exe", b"MZ binary")],
        )))
        .await
        .expect("submit");
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().expect("id");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/candidatures/{id}")))
        .await
        .expect("fetch");
    let record = body_json(response).await;
    assert!(record["document_front"].is_null());
}

#[tokio::test]
async fn uploaded_file_round_trips() {
    let (app, _dir) = test_app().await;
    let content = b"\x89PNG\r\n\x1a\nfake-front-scan";

    let response = app
        .clone()
        .oneshot(post_candidature(multipart_body(
            &valid_fields(),
            &[("document_front", "carte.png", content)],
        )))
        .await
        .expect("submit");
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().expect("id");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/candidatures/{id}")))
        .await
        .expect("fetch");
    let record = body_json(response).await;
    let reference = record["document_front"].as_str().expect("reference");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/uploads/{reference}")))
        .await
        .expect("download");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("bytes");
    assert_eq!(bytes.as_ref(), content);
}

#[tokio::test]
async fn same_original_filename_never_overwrites() {
    let (app, _dir) = test_app().await;

    let mut references = Vec::new();
    for content in [&b"%PDF-1.4 first"[..], &b"%PDF-1.4 second"[..]] {
        let response = app
            .clone()
            .oneshot(post_candidature(multipart_body(
                &valid_fields(),
                &[("residence_proof", "facture.pdf", content)],
            )))
            .await
            .expect("submit");
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = body_json(response).await["id"].as_i64().expect("id");

        let response = app
            .clone()
            .oneshot(get(&format!("/api/candidatures/{id}")))
            .await
            .expect("fetch");
        let record = body_json(response).await;
        references.push(
            record["residence_proof"]
                .as_str()
                .expect("reference")
                .to_string(),
        );
    }
    assert_ne!(references[0], references[1]);

    for (reference, content) in references.iter().zip([
        &b"%PDF-1.4 first"[..],
        &b"%PDF-1.4 second"[..],
    ]) {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/uploads/{reference}")))
            .await
            .expect("download");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("bytes");
        assert_eq!(bytes.as_ref(), content);
    }
}

#[tokio::test]
async fn french_form_aliases_are_accepted() {
    let (app, _dir) = test_app().await;

    let fields = vec![
        ("nom_complet", "Marie Dupont"),
        ("email", "marie@example.fr"),
        ("spi", "SPI999"),
        ("telephone", "0700000000"),
        ("accepte_traitement_donnees", "true"),
        ("confirme_validite_documents", "true"),
        ("motivation", "Je souhaite rejoindre l'équipe."),
    ];
    let response = app
        .clone()
        .oneshot(post_candidature(multipart_body(&fields, &[])))
        .await
        .expect("submit");
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().expect("id");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/candidatures/{id}")))
        .await
        .expect("fetch");
    let record = body_json(response).await;
    assert_eq!(record["full_name"], "Marie Dupont");
    assert_eq!(record["spi_number"], "SPI999");
    assert_eq!(record["phone"], "0700000000");
    assert_eq!(record["motivation"], "Je souhaite rejoindre l'équipe.");
}

#[tokio::test]
async fn unknown_candidature_returns_404() {
    let (app, _dir) = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/candidatures/999"))
        .await
        .expect("fetch");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn source_ip_is_captured_from_forwarded_header() {
    let (app, _dir) = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/candidatures")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .body(multipart_body(&valid_fields(), &[]))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("submit");
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().expect("id");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/candidatures/{id}")))
        .await
        .expect("fetch");
    let record = body_json(response).await;
    assert_eq!(record["source_ip"], "203.0.113.9");
}

#[tokio::test]
async fn admin_report_renders_submissions() {
    let (app, _dir) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_candidature(multipart_body(&valid_fields(), &[])))
        .await
        .expect("submit");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get("/api/admin/candidatures"))
        .await
        .expect("report");
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let html = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(html.contains("Jane Doe"));
    assert!(html.contains("Total Candidatures"));
    assert!(html.contains("Incomplet"));
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let (app, _dir) = test_app().await;

    let response = app.clone().oneshot(get("/health")).await.expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}
