//! HTTP fetch adapter: REST client, envelope handling, typed resources

pub mod envelope;
pub mod http;
pub mod resource;

pub use http::RestClient;
pub use resource::RestResource;
