mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.get("/health").send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_describes_api() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let body: Value = server.get("/").send().await?.json().await?;
    assert_eq!(body["data"]["name"], "Jobsy API");
    Ok(())
}

#[tokio::test]
async fn error_envelope_has_status_message_and_code() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.get("/api/auth/whoami").send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = res.json().await?;
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["message"], "authorization header is required");
    Ok(())
}
