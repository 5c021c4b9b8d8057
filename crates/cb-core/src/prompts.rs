//! Persona and knowledge-base prompt text

use std::path::Path;

use tracing::{info, warn};

const BUNDLED_CHAT_PERSONA: &str = include_str!("../../../assets/prompts/chat_persona.md");
const BUNDLED_KNOWLEDGE_BASE: &str = include_str!("../../../assets/prompts/knowledge_base.md");
const BUNDLED_VOICE_PERSONA: &str = include_str!("../../../assets/prompts/voice_persona.md");

const KNOWLEDGE_BASE_PLACEHOLDER: &str = "{knowledge_base}";

/// Prompt text used by the completion responders
#[derive(Debug, Clone)]
pub struct PromptAssets {
    /// Chat system prompt with the knowledge base already substituted
    pub chat_system: String,
    pub knowledge_base: String,
    pub voice_persona: String,
}

impl PromptAssets {
    /// Load prompts from `dir`, falling back to the bundled copy per file
    pub fn load<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let chat_persona = read_or_bundled(dir, "chat_persona.md", BUNDLED_CHAT_PERSONA);
        let knowledge_base = read_or_bundled(dir, "knowledge_base.md", BUNDLED_KNOWLEDGE_BASE);
        let voice_persona = read_or_bundled(dir, "voice_persona.md", BUNDLED_VOICE_PERSONA);

        Self::compose(&chat_persona, knowledge_base, voice_persona)
    }

    /// Prompts shipped with the binary
    pub fn bundled() -> Self {
        Self::compose(
            BUNDLED_CHAT_PERSONA,
            BUNDLED_KNOWLEDGE_BASE.to_string(),
            BUNDLED_VOICE_PERSONA.to_string(),
        )
    }

    fn compose(chat_persona: &str, knowledge_base: String, voice_persona: String) -> Self {
        let chat_system = chat_persona
            .replace(KNOWLEDGE_BASE_PLACEHOLDER, knowledge_base.trim())
            .trim()
            .to_string();

        Self {
            chat_system,
            knowledge_base,
            voice_persona: voice_persona.trim().to_string(),
        }
    }
}

impl Default for PromptAssets {
    fn default() -> Self {
        Self::bundled()
    }
}

fn read_or_bundled(dir: &Path, name: &str, bundled: &str) -> String {
    let path = dir.join(name);
    match std::fs::read_to_string(&path) {
        Ok(content) if !content.trim().is_empty() => {
            info!("Loaded prompt from {}", path.display());
            content
        }
        Ok(_) => {
            warn!("Prompt file {} is empty, using bundled copy", path.display());
            bundled.to_string()
        }
        Err(e) => {
            warn!("Prompt file {} unavailable ({}), using bundled copy", path.display(), e);
            bundled.to_string()
        }
    }
}
