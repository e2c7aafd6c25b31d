use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::registry::{Skill, SkillDefinition};

/// Placeholder search: echoes the query with canned results.
pub struct WebSearchSkill;

#[async_trait]
impl Skill for WebSearchSkill {
    fn definition(&self) -> SkillDefinition {
        SkillDefinition {
            name: "search_web".to_string(),
            description: "Search the web for information".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let query = args["query"].as_str().context("Missing 'query' argument")?;

        Ok(format!("Search results for '{}': [mock results]", query))
    }
}
