use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::auth::{OwnedResource, OwnershipGate};
use crate::error::ApiError;

/// Resource already loaded and checked by [`require_owner`]
#[derive(Clone, Debug)]
pub struct Owned<T>(pub T);

/// Ownership middleware for `/:id` routes. Must run after `require_auth`.
pub async fn require_owner<T>(
    State(gate): State<OwnershipGate<T>>,
    Path(id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    T: OwnedResource + Clone + Send + Sync + 'static,
{
    let identity_id = request
        .extensions()
        .get::<AuthUser>()
        .map(|user| user.identity_id)
        .ok_or_else(|| ApiError::unauthorized("authentication is required before ownership checks"))?;

    let resource = gate.authorize(&id, identity_id).await?;
    tracing::debug!("Identity {} owns {} {}", identity_id, T::KIND, id);

    request.extensions_mut().insert(Owned(resource));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Job, JobStatus, Role, Salary};
    use crate::database::{MemoryDocumentStore, Repository};
    use axum::{
        body::Body,
        http::StatusCode,
        middleware::{from_fn, from_fn_with_state},
        routing::delete,
        Extension, Router,
    };
    use chrono::Utc;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use uuid::Uuid;

    /// Stands in for the authentication stage: trusts an `x-identity` header
    async fn fake_auth(mut request: Request, next: Next) -> Response {
        let identity = request
            .headers()
            .get("x-identity")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok());
        if let Some(identity_id) = identity {
            request.extensions_mut().insert(AuthUser {
                identity_id,
                email: "owner@x.com".to_string(),
                role: Role::Company,
            });
        }
        next.run(request).await
    }

    async fn app_with_job(owner: Uuid) -> (Router, Job) {
        let jobs: Repository<Job> = Repository::new(Arc::new(MemoryDocumentStore::new()), Duration::from_secs(1));
        let job = Job {
            id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            company: owner,
            location: String::new(),
            job_type: None,
            work_type: None,
            salary: Salary::default(),
            summary: String::new(),
            description: String::new(),
            applicants: 0,
            status: JobStatus::Open,
            tags: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        jobs.insert(&job).await.unwrap();

        let app = Router::new()
            .route(
                "/jobs/:id",
                delete(|Extension(Owned(job)): Extension<Owned<Job>>| async move { job.title }),
            )
            .route_layer(from_fn_with_state(OwnershipGate::new(jobs), require_owner::<Job>))
            .route_layer(from_fn(fake_auth));
        (app, job)
    }

    async fn call(app: &Router, id: &str, identity: Option<Uuid>) -> StatusCode {
        let mut builder = axum::http::Request::builder().method("DELETE").uri(format!("/jobs/{}", id));
        if let Some(identity) = identity {
            builder = builder.header("x-identity", identity.to_string());
        }
        app.clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn owner_passes_with_loaded_job() {
        let owner = Uuid::new_v4();
        let (app, job) = app_with_job(owner).await;
        assert_eq!(call(&app, &job.id.to_string(), Some(owner)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let (app, job) = app_with_job(Uuid::new_v4()).await;
        assert_eq!(call(&app, &job.id.to_string(), Some(Uuid::new_v4())).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let owner = Uuid::new_v4();
        let (app, _) = app_with_job(owner).await;
        assert_eq!(call(&app, &Uuid::new_v4().to_string(), Some(owner)).await, StatusCode::NOT_FOUND);
        assert_eq!(call(&app, "not-a-uuid", Some(owner)).await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unauthenticated_request_never_reaches_lookup() {
        let (app, job) = app_with_job(Uuid::new_v4()).await;
        assert_eq!(call(&app, &job.id.to_string(), None).await, StatusCode::UNAUTHORIZED);
    }
}
