mod client;
mod error;
mod retry;

pub use client::{HttpClient, HttpClientBuilder};
pub use error::HttpError;
pub use retry::{RetryConfig, RetryError};
