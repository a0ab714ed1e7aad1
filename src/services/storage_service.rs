// src/services/storage_service.rs
//
// Armazenamento dos contratos (Supabase Storage, API HTTP).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::common::error::AppError;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Envia o arquivo para `path` dentro do bucket, sobrescrevendo se existir.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    /// Gera uma URL assinada para download, válida por `expires_in` segundos.
    async fn signed_url(&self, path: &str, expires_in: u64) -> Result<String, AppError>;

    async fn delete(&self, path: &str) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct SupabaseStorage {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl SupabaseStorage {
    pub fn new(http: reqwest::Client, base_url: &str, service_key: &str, bucket: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn object_url(&self, prefix: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{prefix}{}/{}", self.base_url, self.bucket, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::UpstreamError(format!("storage respondeu {status}: {body}")))
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.object_url("", path))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        Self::check(response).await?;
        tracing::info!(bucket = %self.bucket, path, "arquivo enviado ao storage");
        Ok(())
    }

    async fn signed_url(&self, path: &str, expires_in: u64) -> Result<String, AppError> {
        let response = self
            .http
            .post(self.object_url("sign/", path))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .json(&json!({ "expiresIn": expires_in }))
            .send()
            .await?;

        let signed: SignedUrlResponse = Self::check(response).await?.json().await?;
        // O Supabase devolve o caminho relativo a /storage/v1
        Ok(format!("{}/storage/v1{}", self.base_url, signed.signed_url))
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        let response = self
            .http
            .delete(self.object_url("", path))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await?;

        Self::check(response).await?;
        tracing::info!(bucket = %self.bucket, path, "arquivo removido do storage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::Value;

    fn authorized(headers: &HeaderMap) -> bool {
        headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer service-key")
    }

    async fn spawn_mock() -> String {
        let app = Router::new()
            .route(
                "/storage/v1/object/sign/{bucket}/{*path}",
                post(|Path((bucket, path)): Path<(String, String)>, Json(body): Json<Value>| async move {
                    assert_eq!(body["expiresIn"], 3600);
                    Json(json!({ "signedURL": format!("/object/sign/{bucket}/{path}?token=abc") }))
                }),
            )
            .route(
                "/storage/v1/object/{bucket}/{*path}",
                post(|headers: HeaderMap| async move {
                    if authorized(&headers) { StatusCode::OK } else { StatusCode::UNAUTHORIZED }
                })
                .delete(|Path((_, path)): Path<(String, String)>, headers: HeaderMap| async move {
                    if !authorized(&headers) {
                        StatusCode::UNAUTHORIZED
                    } else if path.ends_with("sumido.pdf") {
                        StatusCode::NOT_FOUND
                    } else {
                        StatusCode::OK
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn upload_sends_service_key() {
        let base = spawn_mock().await;

        let storage = SupabaseStorage::new(reqwest::Client::new(), &base, "service-key", "contratos");
        storage
            .upload("fechamentos/1/1.pdf", b"%PDF-1.4".to_vec(), "application/pdf")
            .await
            .unwrap();

        let wrong_key = SupabaseStorage::new(reqwest::Client::new(), &base, "outra", "contratos");
        let err = wrong_key
            .upload("fechamentos/1/1.pdf", b"%PDF-1.4".to_vec(), "application/pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamError(_)));
    }

    #[tokio::test]
    async fn signed_url_is_absolute() {
        let base = spawn_mock().await;
        let storage = SupabaseStorage::new(reqwest::Client::new(), &format!("{base}/"), "service-key", "contratos");

        let url = storage.signed_url("fechamentos/abc/1.pdf", 3600).await.unwrap();
        assert_eq!(
            url,
            format!("{base}/storage/v1/object/sign/contratos/fechamentos/abc/1.pdf?token=abc")
        );
    }

    #[tokio::test]
    async fn delete_removes_object() {
        let base = spawn_mock().await;
        let storage = SupabaseStorage::new(reqwest::Client::new(), &base, "service-key", "contratos");

        storage.delete("fechamentos/abc/1.pdf").await.unwrap();

        let err = storage.delete("fechamentos/abc/sumido.pdf").await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamError(_)));
    }
}
