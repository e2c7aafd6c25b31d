mod agent;

pub use agent::{AgentOutcome, AgentRun, AgentRunner};
