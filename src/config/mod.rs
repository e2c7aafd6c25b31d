mod settings;

pub use settings::{AgentConfig, ModelConfig, Settings};
