mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn application() -> Value {
    json!({
        "firstname": "Ada",
        "lastname": "Lovelace",
        "email": "ada@x.com",
        "phone": "+441234567890",
        "linkedinProfile": "https://linkedin.com/in/ada",
        "experience": "5 years",
        "currentJobTitle": "Engineer",
        "currentEmployerName": "Analytical Engines",
        "desiredSalary": "100k",
        "availabilityDate": "2025-01-01",
        "summary": "Writes programs",
        "resume": "https://example.com/cv.pdf"
    })
}

#[tokio::test]
async fn apply_list_and_change_status() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let company = server.session("hr@x.com", "company").await?;
    let candidate = server.session("ada@x.com", "applicant").await?;
    let job_id = server.create_job(&company, json!({ "title": "Engineer" })).await?;

    let res = server
        .post(&format!("/api/jobs/{}/applicants", job_id))
        .bearer_auth(&candidate)
        .json(&application())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["data"]["status"], "Pending");
    let applicant_id = created["data"]["id"].as_str().unwrap_or_default().to_string();

    let job: Value = server.get(&format!("/api/jobs/{}", job_id)).send().await?.json().await?;
    assert_eq!(job["data"]["applicants"], 1);

    let listed: Value = server
        .get(&format!("/api/applicants/job/{}", job_id))
        .bearer_auth(&company)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));

    let res = server
        .put(&format!("/api/applicants/{}", applicant_id))
        .bearer_auth(&company)
        .json(&json!({ "status": "Under Review" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["data"]["status"], "Under Review");
    assert_eq!(updated["data"]["email"], "ada@x.com");

    let res = server
        .patch(&format!("/api/applicants/{}", applicant_id))
        .bearer_auth(&company)
        .json(&json!({ "status": "Hired" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn application_is_validated() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let company = server.session("hr@x.com", "company").await?;
    let candidate = server.session("ada@x.com", "applicant").await?;
    let job_id = server.create_job(&company, json!({ "title": "Engineer" })).await?;

    let mut form = application();
    form["phone"] = json!("123");
    let res = server
        .post(&format!("/api/jobs/{}/applicants", job_id))
        .bearer_auth(&candidate)
        .json(&form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "invalid phone number");

    let res = server
        .post("/api/jobs/8d4bb5b2-2a43-4a4e-9d61-0c9e0e3b8a11/applicants")
        .bearer_auth(&candidate)
        .json(&application())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn company_profiles() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let token = server.session("hr@x.com", "company").await?;

    let res = server
        .post("/api/companies")
        .bearer_auth(&token)
        .json(&json!({ "name": "Acme", "city": "Berlin", "pincode": 10115 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    let id = created["data"]["id"].as_str().unwrap_or_default().to_string();

    let fetched: Value = server
        .get(&format!("/api/companies/{}", id))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fetched["data"]["name"], "Acme");
    assert_eq!(fetched["data"]["pincode"], 10115);

    let res = server.post("/api/companies").json(&json!({ "name": "Anon" })).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
