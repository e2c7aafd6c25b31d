// ============================================
// PLANGUARD - Review Request Builder
// ============================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::llm::Message;

pub const REVIEW_TEMPERATURE: f64 = 0.3;
pub const REVIEW_MAX_TOKENS: u32 = 2000;

pub const REVIEW_SYSTEM_PROMPT: &str = "You are a technical reviewer analyzing implementation plans. \
Provide structured, constructive feedback.";

const REVIEW_INSTRUCTIONS: &str = "Review this implementation plan and provide:

1. OVERALL ASSESSMENT
   - Is the plan comprehensive and actionable?
   - Does it address the core requirements?
   - Rate: Strong / Adequate / Needs Work

2. POTENTIAL ISSUES
   - What gaps, risks, or problems do you see?
   - What assumptions might be incorrect?
   - What edge cases are missing?

3. SUGGESTIONS FOR IMPROVEMENT
   - What would strengthen this plan?
   - What should be clarified or expanded?
   - What alternatives should be considered?

4. IMPLEMENTATION RISKS
   - What areas need careful monitoring?
   - What could go wrong during execution?
   - What dependencies are fragile?";

const REVIEW_CLOSING: &str =
    "Provide specific, actionable feedback with concrete examples where possible.";

/// Chat-completion request asking a model to review a plan
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ReviewRequest {
    pub fn new(model: impl Into<String>, plan: &str) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                Message::system(REVIEW_SYSTEM_PROMPT),
                Message::user(review_prompt(plan)),
            ],
            temperature: REVIEW_TEMPERATURE,
            max_tokens: REVIEW_MAX_TOKENS,
        }
    }

    /// Build a request from a plan on disk
    pub fn from_plan_file(model: impl Into<String>, plan_file: &Path) -> Result<Self> {
        let plan = fs::read_to_string(plan_file).with_context(|| {
            format!("Could not read plan file: {}", plan_file.display())
        })?;

        tracing::debug!(plan = %plan_file.display(), bytes = plan.len(), "Loaded plan");
        Ok(Self::new(model, &plan))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The user turn: fixed instructions, then the plan verbatim.
pub fn review_prompt(plan: &str) -> String {
    format!("{}\n\nPLAN:\n{}\n\n{}", REVIEW_INSTRUCTIONS, plan, REVIEW_CLOSING)
}
