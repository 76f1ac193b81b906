// Client side of the ScoutAI backend: HTTP client, error type and the
// player-source abstraction the CLI loads pools through.

pub mod client;
pub mod error;
pub mod source;

pub use client::ApiClient;
pub use error::ApiError;
pub use source::{PlayerSource, StaticSource};
