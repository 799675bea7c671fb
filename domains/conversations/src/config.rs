//! Chat prompts configuration

use converse_common::config::string_or;
use converse_common::Result;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an assistant that only responds to messages related to King Abdulaziz University (KAU)";
pub const DEFAULT_TITLE_PROMPT: &str =
    "Generate a suitable name for this chat based on the context.";

#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Leading system message of every conversation
    pub system_prompt: String,
    /// Instruction for the side request that names a new chat
    pub title_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            title_prompt: DEFAULT_TITLE_PROMPT.to_string(),
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            system_prompt: string_or(&lookup, "CHAT_SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT),
            title_prompt: string_or(&lookup, "CHAT_TITLE_PROMPT", DEFAULT_TITLE_PROMPT),
        })
    }
}
