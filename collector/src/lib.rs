mod cache;
mod client;
mod collector;
mod error;
mod progress;
mod retry;
mod tally;

pub use cache::ActivityCache;
pub use client::GithubClient;
pub use collector::{ActivitySource, CollectOptions, Collection, Collector};
pub use error::CollectError;
pub use retry::RetryPolicy;
pub use tally::Tally;
