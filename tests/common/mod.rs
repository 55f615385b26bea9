//! Shared helpers for the integration tests

#![allow(dead_code)]

use chrono::Utc;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;

use chirpy::clock::ManualClock;
use chirpy::configuration::{JwtSettings, PolkaSettings};
use chirpy::startup::run;
use chirpy::store::Db;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub address: String,
    pub db: Arc<Db>,
    pub clock: Arc<ManualClock>,
    pub client: reqwest::Client,
    _dir: tempfile::TempDir,
}

pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = Arc::new(
        Db::open(dir.path().join("database.json"))
            .await
            .expect("Failed to open document store"),
    );
    let clock = Arc::new(ManualClock::new(Utc::now()));

    let server = run(
        listener,
        db.clone(),
        JwtSettings {
            secret: JWT_SECRET.to_string(),
        },
        PolkaSettings {
            api_key: POLKA_KEY.to_string(),
        },
        clock.clone(),
    )
    .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db,
        clock,
        client: reqwest::Client::new(),
        _dir: dir,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn signup(&self, email: &str, password: &str) -> Value {
        let response = self
            .client
            .post(self.url("/api/users"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(201, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    pub async fn login(&self, email: &str, password: &str) -> Value {
        let response = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    pub async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
