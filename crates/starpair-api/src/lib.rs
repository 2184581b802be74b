pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod sheets;
pub mod state;

pub use error::*;
pub use routes::*;
pub use server::*;
pub use sheets::{AnalysisLogSink, GoogleSheetsSink, LogRow};
pub use state::*;
