//! S3 REST client.
//!
//! COPY is sent with an `Authorization` header (the copy-source header must
//! be signed); DELETE reuses a presigned URL. Neither is retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use estate_core::clock::Clock;
use estate_core::signing::RequestSigner;

use crate::error::StorageError;
use crate::store::ObjectStore;

/// HTTP timeout for a single object-store request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Characters of a failure body kept in logs.
const LOGGED_BODY_CHARS: usize = 500;

pub struct S3Client {
    http: reqwest::Client,
    signer: RequestSigner,
    clock: Arc<dyn Clock>,
}

impl S3Client {
    pub fn new(signer: RequestSigner, clock: Arc<dyn Clock>) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(http, signer, clock))
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling).
    pub fn with_client(http: reqwest::Client, signer: RequestSigner, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            signer,
            clock,
        }
    }

    async fn failure(response: reqwest::Response) -> StorageError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let logged: String = body.chars().take(LOGGED_BODY_CHARS).collect();
        tracing::debug!(status, body = %logged, "Object store rejected request");
        StorageError::RequestFailed { status, body }
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn copy_object(&self, source_key: &str, dest_key: &str) -> Result<(), StorageError> {
        let signed = self.signer.sign_copy(source_key, dest_key, self.clock.now());
        tracing::debug!(source = source_key, dest = dest_key, "S3 copy");

        let mut request = self.http.put(&signed.url);
        for (name, value) in &signed.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }

        // S3 may report a copy failure inside a 200 response body.
        let status = response.status().as_u16();
        let body = response.text().await?;
        if body.contains("<Error>") {
            return Err(StorageError::RequestFailed { status, body });
        }
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        let signed = self.signer.presign("DELETE", key, self.clock.now());
        tracing::debug!(key, "S3 delete");

        let response = self.http.delete(&signed.url).send().await?;
        match response.status().as_u16() {
            200 | 204 => Ok(()),
            _ => Err(Self::failure(response).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::put;
    use axum::Router;
    use estate_core::clock::SystemClock;
    use estate_core::signing::Credentials;

    use super::*;

    /// Object-store stand-in; the first path segment picks the outcome.
    async fn copy(Path(key): Path<String>, headers: HeaderMap) -> (StatusCode, &'static str) {
        if !headers.contains_key("authorization") || !headers.contains_key("x-amz-copy-source") {
            return (StatusCode::BAD_REQUEST, "unsigned copy");
        }
        match key.trim_start_matches('/').split('/').next() {
            Some("broken") => (StatusCode::INTERNAL_SERVER_ERROR, "<Error><Code>InternalError</Code></Error>"),
            Some("lying") => (StatusCode::OK, "<Error><Code>SlowDown</Code></Error>"),
            _ => (StatusCode::OK, "<CopyObjectResult></CopyObjectResult>"),
        }
    }

    async fn delete(Path(key): Path<String>) -> (StatusCode, &'static str) {
        match key.trim_start_matches('/').split('/').next() {
            Some("denied") => (StatusCode::FORBIDDEN, "<Error><Code>AccessDenied</Code></Error>"),
            Some("pending") => (StatusCode::ACCEPTED, ""),
            Some("plain") => (StatusCode::OK, ""),
            _ => (StatusCode::NO_CONTENT, ""),
        }
    }

    async fn client() -> S3Client {
        let app = Router::new().route("/{*key}", put(copy).delete(delete));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let signer = RequestSigner::new(
            "listings",
            "us-east-1",
            Credentials {
                access_key: "AKIDEXAMPLE".to_string(),
                secret_key: "secret".to_string(),
            },
        )
        .with_endpoint(&format!("http://{addr}"));
        S3Client::new(signer, Arc::new(SystemClock)).unwrap()
    }

    #[tokio::test]
    async fn copy_succeeds_on_clean_200() {
        let client = client().await;
        client.copy_object("uploaded_assets/a.jpg", "ok/a.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn copy_failure_keeps_status_and_body() {
        let client = client().await;
        let err = client
            .copy_object("uploaded_assets/a.jpg", "broken/a.jpg")
            .await
            .unwrap_err();
        assert_matches!(
            err,
            StorageError::RequestFailed { status: 500, ref body } if body.contains("InternalError")
        );
    }

    #[tokio::test]
    async fn copy_error_inside_200_is_a_failure() {
        let client = client().await;
        let err = client
            .copy_object("uploaded_assets/a.jpg", "lying/a.jpg")
            .await
            .unwrap_err();
        assert_matches!(
            err,
            StorageError::RequestFailed { status: 200, ref body } if body.contains("SlowDown")
        );
    }

    #[tokio::test]
    async fn delete_accepts_200_and_204() {
        let client = client().await;
        client.delete_object("gone/a.jpg").await.unwrap();
        client.delete_object("plain/a.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn delete_rejects_other_statuses() {
        let client = client().await;

        let err = client.delete_object("denied/a.jpg").await.unwrap_err();
        assert_matches!(
            err,
            StorageError::RequestFailed { status: 403, ref body } if body.contains("AccessDenied")
        );

        let err = client.delete_object("pending/a.jpg").await.unwrap_err();
        assert_matches!(err, StorageError::RequestFailed { status: 202, .. });
    }
}
