// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and read-only job browsing. Handlers here receive no
// identity, so every input is validated by the service layer.
pub mod auth;
pub mod jobs;
