//! Outbound prompt assembly.
//!
//! Verbatim concatenation: context, user text, fixed directive. Nothing is
//! truncated or escaped here.

/// Default answer language.
pub const DEFAULT_LANGUAGE: &str = "English";

#[derive(Debug, Clone)]
pub struct PromptComposer {
    language: String,
}

impl PromptComposer {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn compose(&self, context: &str, user_text: &str) -> String {
        format!(
            "[Context (Love-OS Axioms)]: {context}\n\n\
             [User Input]: {user_text}\n\n\
             [Command]: Based on the definitions above, generate a response that minimizes \
             Resistance (R) and maximizes Flow (I). Answer in {}.",
            self.language
        )
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}
