use axum::body::to_bytes;
use serde_json::Value;

/// Helper function to extract JSON from an Axum response
///
/// This is useful in tests to easily parse and assert on JSON responses.
pub async fn response_to_json(response: axum::response::Response) -> Value {
    let bytes = response_to_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// Helper function to read a plain-text Axum response body
pub async fn response_to_text(response: axum::response::Response) -> String {
    let bytes = response_to_bytes(response).await;
    String::from_utf8(bytes).unwrap()
}

async fn response_to_bytes(response: axum::response::Response) -> Vec<u8> {
    let body = response.into_body();
    to_bytes(body, usize::MAX).await.unwrap().to_vec()
}
