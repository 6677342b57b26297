pub mod auth;
pub mod client;
pub mod types;

pub use auth::{AuthToken, Clock, SystemClock, TokenManager};
pub use client::HelloClient;
