// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here runs behind `require_auth`, which places an `AuthUser` in
// the request extensions. Job update/delete also run behind `require_owner`
// and receive the already-loaded job as `Owned<Job>`.
pub mod applicants;
pub mod auth;
pub mod companies;
pub mod jobs;
