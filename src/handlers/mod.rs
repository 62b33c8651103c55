// handlers/mod.rs - handlers grouped by security tier
//
// Public (no auth) -> Protected (bearer token). Owner-only job mutations live
// under `protected` and are additionally wrapped by the ownership stage in
// `app::router`.
pub mod protected; // Tier 2: bearer token required (/api/*)
pub mod public; // Tier 1: no authentication (/auth/*, job browsing)
