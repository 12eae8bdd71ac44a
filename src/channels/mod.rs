//! Front ends that carry student messages to a `CareerAgent`.

pub mod cli;
pub mod http;

pub use cli::CliChannel;
pub use http::{api_routes, cors_layer};
