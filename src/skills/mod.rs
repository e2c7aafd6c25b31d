mod file_ops;
mod registry;
mod web_search;

pub use file_ops::{ReadFileSkill, WriteFileSkill};
pub use registry::{Skill, SkillDefinition, SkillRegistry};
pub use web_search::WebSearchSkill;
