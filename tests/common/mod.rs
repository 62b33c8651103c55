#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};

use jobsy_api::app::{router, AppState};
use jobsy_api::config::AppConfig;

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    /// Start the real router on a free port, backed by a fresh in-memory store.
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.port = port;
        config.api.enable_request_logging = false;
        // Cheap hashing keeps the suite fast
        config.security.password_memory_kib = 1024;
        config.security.password_iterations = 1;

        let state = AppState::in_memory(config)?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind test port {}", port))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router(state)).await;
        });

        Ok(Self { port, base_url, client: Client::new() })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.client.patch(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    pub async fn register(&self, email: &str, password: &str, role: &str) -> Result<Value> {
        let res = self
            .post("/auth/register")
            .json(&json!({ "email": email, "password": password, "role": role }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        Ok(res.json().await?)
    }

    /// Returns the session token
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response carried no token")
    }

    /// Register and log in, returning the token
    pub async fn session(&self, email: &str, role: &str) -> Result<String> {
        self.register(email, "secret1", role).await?;
        self.login(email, "secret1").await
    }

    /// Returns the created job's id
    pub async fn create_job(&self, token: &str, body: Value) -> Result<String> {
        let res = self.post("/api/jobs").bearer_auth(token).json(&body).send().await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create job failed: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["id"]
            .as_str()
            .map(str::to_string)
            .context("create job response carried no id")
    }
}
