//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use gateway_types::dto::{EncryptionKeyResponse, TransactionRequest, TransactionResponse};
use gateway_types::error::ErrorKind;
use utoipa::OpenApi;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Issue a single-use encryption key
///
/// The key stays valid until it is used once or its time-to-live elapses.
#[utoipa::path(
    get,
    path = "/api/encryption/key",
    tag = "encryption",
    responses(
        (status = 200, description = "Result envelope carrying an EncryptionKeyResponse", body = inline(serde_json::Value),
            example = json!({
                "isSuccess": true,
                "value": {
                    "key": "q1Jm2H0uS3xk0W6q6v9m3Zkz7mEw3h1G1o8l3zQw3yA=",
                    "keyIdentifier": "0f8fad5b-d9cb-469f-a165-70867728950e",
                    "iv": "AAECAwQFBgcICQoLDA0ODw=="
                }
            }))
    )
)]
async fn issue_key() {}

/// Process an encrypted transaction
///
/// The body is a JSON string: `base64(iv || AES-256-CBC(json TransactionRequest))`
/// under the key named by `X-Key-Identifier`. On success `value` is the
/// `TransactionResponse` encrypted the same way.
#[utoipa::path(
    post,
    path = "/api/transaction/process",
    tag = "transactions",
    params(
        ("X-Key-Identifier" = String, Header, description = "Identifier returned by /api/encryption/key")
    ),
    request_body(content = String, content_type = "application/json", description = "Encrypted transaction envelope"),
    responses(
        (status = 200, description = "Result envelope; failures carry errorKind", body = inline(serde_json::Value),
            example = json!({
                "isSuccess": false,
                "error": "Invalid or expired key",
                "errorKind": "KeyError"
            }))
    )
)]
async fn process_transaction() {}

/// OpenAPI documentation for the gateway API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Encrypted Card Transaction Gateway API",
        version = "1.0.0",
        description = "Accepts card transactions encrypted under single-use keys.\n\n## Flow\n\n1. `GET /api/encryption/key` to obtain a key and its identifier.\n2. Encrypt the JSON transaction with AES-256-CBC, prefix the IV and base64 encode.\n3. `POST /api/transaction/process` with the identifier in `X-Key-Identifier`.\n4. Decrypt `value` with the same key.\n\nEvery response is HTTP 200; check `isSuccess`.",
        license(name = "MIT"),
    ),
    paths(health, issue_key, process_transaction),
    components(
        schemas(
            EncryptionKeyResponse,
            TransactionRequest,
            TransactionResponse,
            ErrorKind,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "encryption", description = "Single-use key issuance"),
        (name = "transactions", description = "Encrypted transaction processing"),
    )
)]
pub struct ApiDoc;
