//! Schema generation settings from TOML (`[schema]` section)

use crate::tools::SchemaProfile;
use relay_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// ```toml
/// [schema]
/// profile = "strict"   # "standard" or "strict"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSchemaConfig {
    pub profile: String,
}

impl Default for FileSchemaConfig {
    fn default() -> Self {
        Self {
            profile: SchemaProfile::default().as_str().to_string(),
        }
    }
}

impl FileSchemaConfig {
    pub fn parse_profile(&self) -> (SchemaProfile, Vec<ConfigIssue>) {
        match self.profile.to_lowercase().parse::<SchemaProfile>() {
            Ok(profile) => (profile, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "schema.profile".to_string(),
                        value: self.profile.clone(),
                        valid_values: vec!["standard".to_string(), "strict".to_string()],
                    },
                    format!(
                        "schema.profile: unknown value '{}', falling back to 'standard'",
                        self.profile
                    ),
                );
                (SchemaProfile::default(), vec![issue])
            }
        }
    }
}
