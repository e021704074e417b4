pub mod client;
pub mod gemini;
pub mod http;
pub mod openai;

pub use gemini::{GeminiClient, ModelCatalog};
pub use http::create_client;
pub use openai::OpenAiClient;
