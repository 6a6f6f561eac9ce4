// Per-user sessions: profile, current skill set and the latest ranking.
// Held in memory only and dropped on delete or after the idle TTL.

pub mod handlers;
pub mod models;
pub mod store;
