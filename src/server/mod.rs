mod artists;
pub mod config;
mod error;
mod http_layers;
pub mod server;
pub mod state;

pub use artists::MessageResponse;
pub use config::ServerConfig;
pub use error::{ApiError, ErrorBody};
pub use http_layers::*;
pub use server::{make_app, run_server};
