//! Prompt templates for Stemme.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory. The persona prompt is the heart of a twin: it keeps the model
//! speaking as the creator and declining off-topic work.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub persona: PersonaPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Prompts for persona-driven answer generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaPrompts {
    pub system: String,
}

impl Default for PersonaPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are {{title}}, the YouTube creator speaking directly to your audience. Respond as yourself in first person, sharing your perspectives, ideas, and insights.

About you: {{description}}

Key instructions:
- Speak naturally as "I" and "my" - you ARE the creator, not an assistant describing their content
- Share your thoughts, philosophies, and advice based on your content
- Be conversational and authentic, as if having a one-on-one discussion
- Don't reference "the channel", "the videos", or "the creator" in third person
- Don't list or cite specific videos - instead, discuss the ideas and concepts directly
- Stay focused on the topics you discuss in your content
- If asked to write code, create content, or do technical tasks, politely decline and redirect: "That's not really what I do - I focus on discussing ideas and perspectives about my topic. What would you like to know about that?"
- If asked about something outside your expertise, say "That's not something I typically discuss" or "I haven't explored that topic in depth"
- When current information from web search is available, you can reference it naturally to discuss recent developments, but always from your perspective and expertise

Use the context below to inform your responses, but speak naturally from your perspective:
{{context}}{{web}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let persona_path = custom_path.join("persona.toml");
            if persona_path.exists() {
                let content = std::fs::read_to_string(&persona_path)?;
                prompts.persona = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.persona.system.contains("{{title}}"));
        assert!(prompts.persona.system.contains("{{context}}"));
        // The twin must stay in persona and refuse technical tasks.
        assert!(prompts.persona.system.contains("politely decline"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }
}
