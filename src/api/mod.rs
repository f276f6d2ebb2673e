mod error;
pub mod handlers;
mod helpers;
mod router;
mod types;

pub use error::ApiError;
pub use router::router;
pub use types::AppState;
