#![allow(dead_code)]

use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenLifetimes;
use identity_service::domain::auth::service::AuthService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryRefreshTokenRepository;
use identity_service::outbound::repositories::InMemoryUserRepository;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

pub const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ACCESS_TTL_MS: i64 = 15 * 60 * 1000;
pub const REFRESH_TTL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Test application that spawns a real server over in-memory stores
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub tokens: Arc<TokenCodec>,
    pub refresh_tokens: Arc<InMemoryRefreshTokenRepository>,
}

/// Access and refresh tokens returned by a successful login
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_lifetimes(TokenLifetimes::from_millis(ACCESS_TTL_MS, REFRESH_TTL_MS))
            .await
    }

    pub async fn spawn_with_lifetimes(lifetimes: TokenLifetimes) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let tokens = Arc::new(TokenCodec::new(SECRET, lifetimes));
        let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::new());

        // Cheap hashing parameters keep the suite fast
        let password_hasher =
            PasswordHasher::with_cost(1024, 1, 1).expect("Failed to create password hasher");

        let auth_service = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::clone(&refresh_tokens),
            password_hasher,
            Arc::clone(&tokens),
        ));

        let router = create_router(auth_service, tokens.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            tokens,
            refresh_tokens,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register `subject` with derived email and phone number
    pub async fn register(&self, subject: &str, phone_number: &str, password: &str) {
        let response = self
            .post("/api/auth/register")
            .json(&json!({
                "subject": subject,
                "email": format!("{}@example.com", subject),
                "displayName": subject,
                "phoneNumber": phone_number,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    /// Log in and return the issued tokens
    pub async fn login(&self, identifier: &str, password: &str) -> Session {
        let response = self
            .post("/api/auth/login")
            .json(&json!({
                "identifier": identifier,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        Session {
            access_token: body["data"]["accessToken"].as_str().unwrap().to_string(),
            refresh_token: body["data"]["refreshToken"].as_str().unwrap().to_string(),
        }
    }

    pub async fn refresh(&self, refresh_token: &str) -> reqwest::Response {
        self.post("/api/auth/refresh")
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
