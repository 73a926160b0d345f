/// Record store
///
/// Users, chirps and refresh token state kept in a single JSON document.
/// One `Database` value owns the file; all access goes through its lock.

mod chirps;
mod document;
mod models;
mod users;

pub use document::Database;
pub use models::{Chirp, ChirpId, RefreshTokenRecord, SortOrder, User, UserId};
