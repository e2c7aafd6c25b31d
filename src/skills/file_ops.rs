// ============================================
// File Operations Skills
// ============================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::fs;

use super::registry::{Skill, SkillDefinition};
use crate::redact::Redactor;

/// Reads a file for the agent. Contents are redacted before they are handed
/// back, since they are forwarded to the remote model.
pub struct ReadFileSkill {
    redactor: Redactor,
}

impl ReadFileSkill {
    pub fn new() -> Self {
        Self {
            redactor: Redactor::new(),
        }
    }
}

impl Default for ReadFileSkill {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Skill for ReadFileSkill {
    fn definition(&self) -> SkillDefinition {
        SkillDefinition {
            name: "read_file".to_string(),
            description: "Read contents of a file".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "File path to read"
                    }
                },
                "required": ["path"]
            }),
        }
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let path = args["path"].as_str().context("Missing 'path' argument")?;

        let content = fs::read_to_string(path).context(format!("Failed to read file: {}", path))?;

        let redaction = self.redactor.redact(&content);
        if redaction.report.redaction_count > 0 {
            tracing::warn!(
                path,
                redactions = redaction.report.redaction_count,
                "Redacted secrets from file before sending to model"
            );
        }

        Ok(redaction.text)
    }
}

pub struct WriteFileSkill;

#[async_trait]
impl Skill for WriteFileSkill {
    fn definition(&self) -> SkillDefinition {
        SkillDefinition {
            name: "write_file".to_string(),
            description: "Write content to a file".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "File path"
                    },
                    "content": {
                        "type": "string",
                        "description": "Content to write"
                    }
                },
                "required": ["path", "content"]
            }),
        }
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let path = args["path"].as_str().context("Missing 'path' argument")?;
        let content = args["content"]
            .as_str()
            .context("Missing 'content' argument")?;

        fs::write(path, content).context(format!("Failed to write file: {}", path))?;

        tracing::info!("File written: {} ({} bytes)", path, content.len());
        Ok(format!("Successfully wrote to {}", path))
    }
}
