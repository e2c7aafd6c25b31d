use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::file_ops::{ReadFileSkill, WriteFileSkill};
use super::web_search::WebSearchSkill;
use crate::llm::ToolDefinition;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl SkillDefinition {
    pub fn to_tool_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.clone(),
        }
    }
}

#[async_trait]
pub trait Skill: Send + Sync {
    fn definition(&self) -> SkillDefinition;
    async fn execute(&self, args: &Value) -> Result<String>;
}

/// Named actions the agent may invoke, keyed by tool name
pub struct SkillRegistry {
    skills: BTreeMap<String, Box<dyn Skill>>,
}

impl SkillRegistry {
    /// Registry with no skills
    pub fn empty() -> Self {
        Self {
            skills: BTreeMap::new(),
        }
    }

    /// Registry with the built-in `search_web`, `read_file` and `write_file`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(WebSearchSkill));
        registry.register(Box::new(ReadFileSkill::new()));
        registry.register(Box::new(WriteFileSkill));
        registry
    }

    pub fn register(&mut self, skill: Box<dyn Skill>) {
        let def = skill.definition();
        self.skills.insert(def.name, skill);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Skill> {
        self.skills.get(name).map(|s| s.as_ref())
    }

    pub fn list(&self) -> Vec<SkillDefinition> {
        self.skills.values().map(|s| s.definition()).collect()
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.list()
            .iter()
            .map(SkillDefinition::to_tool_definition)
            .collect()
    }

    pub async fn execute(&self, name: &str, args: &Value) -> Result<String> {
        let skill = self
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;

        tracing::debug!(skill = name, "Executing skill");
        skill.execute(args).await
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}
