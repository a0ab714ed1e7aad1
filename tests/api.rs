mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;

use common::{app, get, json_request, send, token_for};
use crm_backend::models::auth::Role;

#[tokio::test]
async fn health_is_public() {
    let (response, body) = send(app(), get("/api/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn verify_token_requires_bearer() {
    let (response, body) = send(app(), get("/api/verify-token", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token de autenticação inválido ou ausente.");

    let (response, _) = send(app(), get("/api/verify-token", Some("nao.e.jwt"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let forged = crm_backend::services::auth::JwtKeys::new("outro-segredo", 1)
        .issue(&crm_backend::models::auth::SessionUser {
            id: uuid::Uuid::new_v4(),
            name: "Intruso".into(),
            email: "x@y.com".into(),
            role: Role::Admin,
        })
        .unwrap();

    let (response, _) = send(app(), get("/api/clientes", Some(&forged))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn consultant_cannot_manage_consultants() {
    let token = token_for(Role::Consultor);

    let (response, body) = send(app(), get("/api/consultores", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body["details"]["permission"], "consultants:manage");
}

#[tokio::test]
async fn consultant_cannot_register_closings_or_ads() {
    let token = token_for(Role::Consultor);

    let request = json_request(
        "POST",
        "/api/fechamentos",
        Some(&token),
        json!({ "leadId": uuid::Uuid::new_v4(), "value": 1000 }),
    );
    let (response, _) = send(app(), request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let (response, _) = send(app(), get("/api/meta-ads/precos", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn public_form_validates_phone_and_cpf() {
    let request = Request::post("/api/leads/cadastro")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .body(Body::from(
            json!({ "name": "Maria", "phone": "1234", "cpf": "999" }).to_string(),
        ))
        .unwrap();

    let (response, body) = send(app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "One or more fields are invalid.");
    assert_eq!(body["details"]["phone"][0], "Phone must have 10 or 11 digits including area code.");
    assert_eq!(body["details"]["cpf"][0], "CPF must have 11 digits.");
}

#[tokio::test]
async fn closing_value_must_be_positive() {
    let token = token_for(Role::Admin);
    let request = json_request(
        "POST",
        "/api/fechamentos",
        Some(&token),
        json!({ "leadId": uuid::Uuid::new_v4(), "value": 0 }),
    );

    let (response, body) = send(app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["value"][0], "O valor deve ser maior que zero.");
}

#[tokio::test]
async fn meta_ads_is_unavailable_when_not_configured() {
    let token = token_for(Role::Admin);

    for uri in ["/api/meta-ads/insights", "/api/meta-ads/regioes?since=2025-01-01&until=2025-01-31"] {
        let (response, body) = send(app(), get(uri, Some(&token))).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert_eq!(body["details"]["integration"], "meta_ads");
    }
}

fn multipart_upload(token: &str, content_type: &str, file: &[u8]) -> Request<Body> {
    let boundary = "----crmboundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"contrato\"; filename=\"contrato.pdf\"\r\n");
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(file);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::post(format!("/api/fechamentos/{}/contrato", uuid::Uuid::new_v4()))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn contract_upload_rejects_non_pdf() {
    let token = token_for(Role::Admin);

    let (response, body) = send(app(), multipart_upload(&token, "image/png", b"\x89PNG\r\n")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "O contrato deve ser um arquivo PDF.");
}

#[tokio::test]
async fn contract_upload_without_storage_is_unavailable() {
    let token = token_for(Role::Admin);

    let (response, body) = send(app(), multipart_upload(&token, "application/pdf", b"%PDF-1.4\n%%EOF")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["details"]["integration"], "storage");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (response, body) = send(app(), get("/api-docs/openapi.json", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body["paths"]["/api/clientes"].is_object());
}

#[tokio::test]
async fn anon_supabase_token_is_not_an_admin() {
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": uuid::Uuid::new_v4(),
        "role": "anon",
        "exp": now + 3600,
        "iat": now,
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(common::JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let (response, _) = send(app(), get("/api/meta-ads/insights", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let token = token_for(Role::Admin);
    let request = json_request(
        "POST",
        "/api/clinicas",
        Some(&token),
        json!({ "name": "   ", "city": " \t ", "state": "SP" }),
    );

    let (response, body) = send(app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body["details"]["name"].is_array());
    assert!(body["details"]["city"].is_array());
}
