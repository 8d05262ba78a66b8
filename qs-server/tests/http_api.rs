// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use qs_kem::ml_kem::{CIPHERTEXT_LENGTH, PUBLIC_KEY_LENGTH, SHARED_SECRET_LENGTH};
use qs_kem::{
    Kem, KemCiphertext, KemError, KemKeyPair, KemParameters, KemPublicKey, KemSecretKey,
    MlKem1024, SharedSecret,
};
use qs_server::http::router::build_router;
use qs_server::{build_app_state, Config};
use qs_server_requests::api::models::{
    DecapsulateRequest, DecapsulateResponse, EncapsulateRequest, EncapsulateResponse,
    GenerateKeysResponse, HandshakeState, SessionResponse, StatusResponse,
};
use qs_server_requests::api::ErrorResponse;
use qs_server_requests::routes::api::quantum::{DECAPSULATE, ENCAPSULATE, KEYS, SESSION};
use qs_server_requests::routes::{quantum_route, STATUS};
use qs_server_requests::SESSION_ID_HEADER;
use std::sync::{Arc, Mutex};

// offsets of the embedded public key within an ML-KEM-1024 decapsulation key
const EMBEDDED_PUBLIC_KEY_START: usize = 1536;
const EMBEDDED_PUBLIC_KEY_END: usize = EMBEDDED_PUBLIC_KEY_START + PUBLIC_KEY_LENGTH;

/// Wrapper remembering every secret key it has ever generated.
#[derive(Default)]
struct RecordingKem {
    inner: MlKem1024,
    secret_keys: Mutex<Vec<Vec<u8>>>,
}

impl Kem for RecordingKem {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn parameters(&self) -> KemParameters {
        self.inner.parameters()
    }

    fn keygen(&self) -> Result<KemKeyPair, KemError> {
        let keypair = self.inner.keygen()?;
        self.secret_keys
            .lock()
            .unwrap()
            .push(keypair.secret_key().as_bytes().to_vec());
        Ok(keypair)
    }

    fn encapsulate(
        &self,
        public_key: &KemPublicKey,
    ) -> Result<(KemCiphertext, SharedSecret), KemError> {
        self.inner.encapsulate(public_key)
    }

    fn decapsulate(
        &self,
        secret_key: &KemSecretKey,
        ciphertext: &KemCiphertext,
    ) -> Result<SharedSecret, KemError> {
        self.inner.decapsulate(secret_key, ciphertext)
    }
}

fn test_server_with(config: Config, kem: Arc<dyn Kem>) -> TestServer {
    let state = build_app_state(&config, kem);
    TestServer::new(build_router(state)).unwrap()
}

fn test_server() -> TestServer {
    test_server_with(Config::default(), Arc::new(MlKem1024::new()))
}

fn explicit_sessions_server() -> TestServer {
    let config = Config {
        implicit_session: false,
        ..Default::default()
    };
    test_server_with(config, Arc::new(MlKem1024::new()))
}

fn session_header_name() -> HeaderName {
    HeaderName::from_static(SESSION_ID_HEADER)
}

fn session_header_value(session_id: &str) -> HeaderValue {
    HeaderValue::from_str(session_id).unwrap()
}

fn decode(encoded: &str) -> Vec<u8> {
    STANDARD.decode(encoded).unwrap()
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[tokio::test]
async fn browser_flow_with_implicit_session() {
    let server = test_server();

    // exactly what the ui does: no session token, key posted as a json string
    let response = server.post(&quantum_route(KEYS)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let keys: GenerateKeysResponse = response.json();
    assert_eq!(decode(&keys.public_key).len(), PUBLIC_KEY_LENGTH);
    assert_eq!(keys.algorithm, "ML-KEM-1024");

    let response = server
        .post(&quantum_route(ENCAPSULATE))
        .json(&keys.public_key)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let encapsulation: EncapsulateResponse = response.json();
    assert_eq!(decode(&encapsulation.ciphertext).len(), CIPHERTEXT_LENGTH);
    assert_eq!(
        decode(&encapsulation.shared_secret).len(),
        SHARED_SECRET_LENGTH
    );

    let response = server
        .post(&quantum_route(DECAPSULATE))
        .json(&DecapsulateRequest {
            ciphertext: encapsulation.ciphertext.clone(),
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let decapsulation: DecapsulateResponse = response.json();
    assert_eq!(decapsulation.shared_secret, encapsulation.shared_secret);
    assert_eq!(
        decapsulation.status,
        "Success. Quantum-safe channel established."
    );

    let session: SessionResponse = server.get(&quantum_route(SESSION)).await.json();
    assert_eq!(session.session_id, keys.session_id);
    assert_eq!(session.state, HandshakeState::Completed);
    assert!(session.pinned);
    assert!(session.has_established_secret);
}

#[tokio::test]
async fn handshake_with_explicit_session() {
    let server = explicit_sessions_server();

    let response = server.post(&quantum_route(KEYS)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let keys: GenerateKeysResponse = response.json();
    let header = response
        .headers()
        .get(SESSION_ID_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(header, keys.session_id);

    // the key can also be sent as plain text or within a json object
    let mut ciphertexts = Vec::new();
    for structured in [false, true] {
        let request = server
            .post(&quantum_route(ENCAPSULATE))
            .add_header(session_header_name(), session_header_value(&keys.session_id));
        let request = if structured {
            request.json(&EncapsulateRequest {
                public_key: Some(keys.public_key.clone()),
            })
        } else {
            request.text(keys.public_key.clone())
        };
        let encapsulation: EncapsulateResponse = request.await.json();
        ciphertexts.push(encapsulation.ciphertext.clone());

        // completing the handshake makes the session forget any other bound encapsulation,
        // so every ciphertext is decapsulated before the next one gets created
        let response = server
            .post(&quantum_route(DECAPSULATE))
            .add_header(session_header_name(), session_header_value(&keys.session_id))
            .json(&DecapsulateRequest {
                ciphertext: encapsulation.ciphertext,
            })
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let decapsulation: DecapsulateResponse = response.json();
        assert_eq!(decapsulation.shared_secret, encapsulation.shared_secret);
    }
    assert_ne!(ciphertexts[0], ciphertexts[1]);
}

#[tokio::test]
async fn empty_encapsulation_body_uses_session_key() {
    let server = test_server();
    server.post(&quantum_route(KEYS)).await;

    let response = server.post(&quantum_route(ENCAPSULATE)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let encapsulation: EncapsulateResponse = response.json();

    let decapsulation: DecapsulateResponse = server
        .post(&quantum_route(DECAPSULATE))
        .json(&DecapsulateRequest {
            ciphertext: encapsulation.ciphertext,
        })
        .await
        .json();
    assert_eq!(decapsulation.shared_secret, encapsulation.shared_secret);
}

#[tokio::test]
async fn decapsulation_before_keygen_fails() {
    let server = test_server();

    let response = server
        .post(&quantum_route(DECAPSULATE))
        .json(&DecapsulateRequest {
            ciphertext: STANDARD.encode(vec![0u8; CIPHERTEXT_LENGTH]),
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let error: ErrorResponse = response.json();
    assert!(!error.message.is_empty());

    // nor can the session encapsulate against its own key
    let response = server.post(&quantum_route(ENCAPSULATE)).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn sequential_encapsulations_differ() {
    let server = test_server();
    let keys: GenerateKeysResponse = server.post(&quantum_route(KEYS)).await.json();

    let first: EncapsulateResponse = server
        .post(&quantum_route(ENCAPSULATE))
        .json(&keys.public_key)
        .await
        .json();
    let second: EncapsulateResponse = server
        .post(&quantum_route(ENCAPSULATE))
        .json(&keys.public_key)
        .await
        .json();
    assert_ne!(first.ciphertext, second.ciphertext);
    assert_ne!(first.shared_secret, second.shared_secret);
}

#[tokio::test]
async fn responses_never_contain_secret_key() {
    let kem = Arc::new(RecordingKem::default());
    let server = test_server_with(Config::default(), kem.clone());

    let keys_response = server.post(&quantum_route(KEYS)).await;
    let keys_body = keys_response.text();
    let keys: GenerateKeysResponse = keys_response.json();

    let encapsulation_body = server
        .post(&quantum_route(ENCAPSULATE))
        .json(&keys.public_key)
        .await
        .text();
    let encapsulation: EncapsulateResponse = serde_json::from_str(&encapsulation_body).unwrap();
    let decapsulation_body = server
        .post(&quantum_route(DECAPSULATE))
        .json(&DecapsulateRequest {
            ciphertext: encapsulation.ciphertext.clone(),
        })
        .await
        .text();
    let session_body = server.get(&quantum_route(SESSION)).await.text();

    let secret_keys = kem.secret_keys.lock().unwrap().clone();
    assert_eq!(secret_keys.len(), 1);
    let secret_key = &secret_keys[0];
    let encoded_secret_key = STANDARD.encode(secret_key);

    let decapsulation: DecapsulateResponse = serde_json::from_str(&decapsulation_body).unwrap();
    let binary_fields = [
        decode(&keys.public_key),
        decode(&encapsulation.ciphertext),
        decode(&encapsulation.shared_secret),
        decode(&decapsulation.shared_secret),
    ];

    for body in [
        &keys_body,
        &encapsulation_body,
        &decapsulation_body,
        &session_body,
    ] {
        assert!(!body.contains(&encoded_secret_key));
    }
    // the decapsulation key embeds the public key, so only its secret parts are looked for
    let secret_parts = [
        &secret_key[..EMBEDDED_PUBLIC_KEY_START],
        &secret_key[EMBEDDED_PUBLIC_KEY_END..],
    ];
    for field in &binary_fields {
        // any 32 byte window of the secret material would be a leak
        for part in secret_parts {
            for chunk in part.chunks_exact(32) {
                assert!(!contains_subslice(field, chunk));
            }
        }
    }
}

#[tokio::test]
async fn foreign_ciphertext_is_implicitly_rejected() {
    let server = test_server();
    server.post(&quantum_route(KEYS)).await;

    let foreign = STANDARD.encode(vec![0x17u8; CIPHERTEXT_LENGTH]);
    let response = server
        .post(&quantum_route(DECAPSULATE))
        .json(&DecapsulateRequest {
            ciphertext: foreign,
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let decapsulation: DecapsulateResponse = response.json();
    assert_eq!(
        decode(&decapsulation.shared_secret).len(),
        SHARED_SECRET_LENGTH
    );
}

#[tokio::test]
async fn replayed_ciphertext_is_rejected() {
    let server = test_server();
    let keys: GenerateKeysResponse = server.post(&quantum_route(KEYS)).await.json();
    let encapsulation: EncapsulateResponse =
        server
            .post(&quantum_route(ENCAPSULATE))
            .json(&keys.public_key)
            .await
            .json();

    let request = DecapsulateRequest {
        ciphertext: encapsulation.ciphertext,
    };
    let response = server.post(&quantum_route(DECAPSULATE)).json(&request).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // fresh keypair, same ciphertext
    server.post(&quantum_route(KEYS)).await;
    let response = server.post(&quantum_route(DECAPSULATE)).json(&request).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_inputs_are_rejected() {
    let server = test_server();
    server.post(&quantum_route(KEYS)).await;

    let response = server
        .post(&quantum_route(ENCAPSULATE))
        .text("definitely not base64!")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post(&quantum_route(ENCAPSULATE))
        .text(STANDARD.encode([1u8, 2, 3]))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post(&quantum_route(DECAPSULATE))
        .json(&DecapsulateRequest {
            ciphertext: STANDARD.encode([1u8, 2, 3]),
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post(&quantum_route(DECAPSULATE))
        .text("{\"foo\": 1}")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post(&quantum_route(KEYS))
        .add_header(session_header_name(), session_header_value("not-a-session"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_sessions_are_not_found() {
    let server = explicit_sessions_server();
    let unknown = qs_server::SessionId::random().to_string();

    let response = server
        .post(&quantum_route(KEYS))
        .add_header(session_header_name(), session_header_value(&unknown))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .get(&quantum_route(SESSION))
        .add_header(session_header_name(), session_header_value(&unknown))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // without the implicit session, there's nothing to inspect
    let response = server.get(&quantum_route(SESSION)).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_session_destroys_keys() {
    let server = explicit_sessions_server();
    let keys: GenerateKeysResponse = server.post(&quantum_route(KEYS)).await.json();

    let response = server
        .delete(&quantum_route(SESSION))
        .add_header(session_header_name(), session_header_value(&keys.session_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server
        .post(&quantum_route(DECAPSULATE))
        .add_header(session_header_name(), session_header_value(&keys.session_id))
        .json(&DecapsulateRequest {
            ciphertext: STANDARD.encode(vec![0u8; CIPHERTEXT_LENGTH]),
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn implicit_session_survives_reset() {
    let server = test_server();
    let keys: GenerateKeysResponse = server.post(&quantum_route(KEYS)).await.json();

    let response = server.delete(&quantum_route(SESSION)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let session: SessionResponse = server.get(&quantum_route(SESSION)).await.json();
    assert_eq!(session.session_id, keys.session_id);
    assert_eq!(session.state, HandshakeState::Empty);
    assert!(session.public_key.is_none());
}

#[tokio::test]
async fn status_endpoint() {
    let server = test_server();

    let response = server.get(STATUS).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let status: StatusResponse = response.json();
    assert_eq!(status.status, "online");
    assert_eq!(status.algorithms, vec!["ML-KEM-1024".to_string()]);
    assert_eq!(status.security_level, "NIST Level 5 (AES-256 equivalent)");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let server = test_server();

    let response = server.get("/api/v1/api-docs/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let document: serde_json::Value = response.json();
    assert!(document["paths"]["/api/quantum/keys"].is_object());
    assert!(document["paths"]["/api/quantum/decapsulate"].is_object());
}
