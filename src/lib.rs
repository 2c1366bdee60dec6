pub mod config;
pub mod endpoints;
pub mod exception;
pub mod param;
pub mod request;
pub mod response;

pub use config::Config;
pub use endpoints::dispatch;
pub use exception::Exception;
pub use param::{HttpEncoding, HttpVersion};
pub use request::Request;
pub use response::Response;
