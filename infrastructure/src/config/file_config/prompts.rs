//! Prompt template overrides from TOML (`[prompts]` section)

use relay_domain::{ConfigIssue, ConfigIssueCode, PromptTemplates};
use serde::{Deserialize, Serialize};

/// Templates may use `{name}` and `{context}`; the execution template also
/// receives the plan. Unset fields keep the built-in text.
///
/// ```toml
/// [prompts]
/// system = "You are {name}. {context}"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptsConfig {
    pub system: Option<String>,
    pub reasoning: Option<String>,
    pub execution: Option<String>,
}

impl FilePromptsConfig {
    pub fn to_templates(&self) -> PromptTemplates {
        let mut templates = PromptTemplates::default();
        for (slot, value) in [
            (&mut templates.system, &self.system),
            (&mut templates.reasoning, &self.reasoning),
            (&mut templates.execution, &self.execution),
        ] {
            if let Some(text) = value
                && !text.trim().is_empty()
            {
                *slot = text.clone();
            }
        }
        templates
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        [
            ("prompts.system", &self.system),
            ("prompts.reasoning", &self.reasoning),
            ("prompts.execution", &self.execution),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|t| t.trim().is_empty()))
        .map(|(field, _)| {
            ConfigIssue::warning(
                ConfigIssueCode::Empty {
                    field: field.to_string(),
                },
                format!("{} is empty, using the built-in template", field),
            )
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let config = FilePromptsConfig {
            system: Some("You are {name}.".into()),
            reasoning: Some("   ".into()),
            execution: None,
        };
        let templates = config.to_templates();
        let defaults = PromptTemplates::default();

        assert_eq!(templates.system, "You are {name}.");
        assert_eq!(templates.reasoning, defaults.reasoning);
        assert_eq!(templates.execution, defaults.execution);
        assert_eq!(config.validate().len(), 1);
    }
}
