//! HTTP API over the `Adult` table statistics.

pub mod error;
pub mod routes;
pub mod server;

pub use error::{ApiError, ApiResult, MISSING_COLUMN_MESSAGE};
pub use routes::{router, ServerState, GREETING};
pub use server::{ApiServer, ServerConfig};
