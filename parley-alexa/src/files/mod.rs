//! Project files of an ASK CLI skill project.

mod ask_resources;
mod ask_states;
mod skill_json;

pub use ask_resources::AskResources;
pub use ask_states::AskStates;
pub use skill_json::{SKILL_JSON, SkillJson};
