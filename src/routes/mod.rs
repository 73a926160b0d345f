mod auth;
mod chirps;
mod health_check;
mod users;
mod webhooks;

pub use auth::{login, refresh, revoke, LoginRequest, LoginResponse, RefreshResponse};
pub use chirps::{create_chirp, delete_chirp, get_chirp, list_chirps};
pub use health_check::health_check;
pub use users::{create_user, get_user, list_users, update_user, UserResponse};
pub use webhooks::polka_webhook;
