pub mod glm_client;

pub use glm_client::GlmVisionClient;
