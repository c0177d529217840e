pub mod api;
pub mod client;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::ApiClient;
pub use client::StreamClient;
