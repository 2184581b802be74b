pub mod analyzer;
pub mod gemini_provider;
pub mod llm_factory;
pub mod llm_provider;
pub mod openai_compatible_provider;
pub mod prompt;
pub mod response;

pub use analyzer::*;
pub use llm_factory::LLMProviderFactory;
pub use llm_provider::*;
pub use response::{parse_narrative_response, ResponseError};
