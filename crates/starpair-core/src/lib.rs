pub mod classifier;
pub mod compatibility;
pub mod config;
pub mod error;
pub mod horoscope;
pub mod narrative;
pub mod person;
pub mod profiles;
pub mod sign;

pub use classifier::*;
pub use compatibility::*;
pub use config::{LlmConfig, LoggingConfig, ServerConfig, Settings, SheetsConfig};
pub use error::*;
pub use horoscope::*;
pub use narrative::*;
pub use person::*;
pub use profiles::*;
pub use sign::*;
