//! Server settings.
//!
//! Settings are split into one file per category. [`ServerSettings`]
//! aggregates all categories and handles JSON deserialization from LSP
//! initialization options and `didChangeConfiguration` payloads. A
//! `sourcepawn.toml` found above a source file overrides the include and
//! project sections for that file.

pub(crate) mod completion;
pub(crate) mod includes;
pub(crate) mod logging;
pub(crate) mod project;
pub(crate) mod project_file;

use std::{collections::HashMap, path::Path};

pub use completion::CompletionSettings;
use completion::CompletionSettingsPatch;
pub use includes::IncludesSettings;
use includes::IncludesSettingsPatch;
use logging::LoggingSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
pub use project::ProjectSettings;
use project::ProjectSettingsPatch;
pub use project_file::ProjectFile;
use project_file::project_file_for;
use serde::Deserialize;
use serde_json::Value;

use crate::repository::RepositoryConfig;

pub const SETTINGS_SECTION_KEY: &str = "sourcepawn-analyzer";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerSettings {
    pub includes: IncludesSettings,
    pub project: ProjectSettings,
    pub completion: CompletionSettings,
    pub logging: LoggingSettings,
}

impl ServerSettings {
    pub fn from_lsp_payload(payload: Option<&Value>) -> Self {
        let mut settings = Self::default();
        if let Some(payload) = payload {
            settings = settings.merged_with_payload(payload);
        }
        settings
    }

    pub fn merged_with_payload(
        &self,
        payload: &Value,
    ) -> Self {
        let mut merged = self.clone();

        for candidate in payload_candidates(payload) {
            if let Ok(patch) = serde_json::from_value::<ServerSettingsPatch>(candidate.clone()) {
                merged.apply_patch(patch);
            }
        }

        merged.normalize();
        merged
    }

    /// Repository configuration for queries made from `source`.
    pub fn repository_config(
        &self,
        source: Option<&Path>,
    ) -> RepositoryConfig {
        let mut config = RepositoryConfig {
            sdk_root: self.includes.sdk_root.clone(),
            include_dirs: self.includes.include_dirs.clone(),
            main_path: self.project.main_path.clone(),
        };
        let Some(project) = source.and_then(project_file_for) else {
            return config;
        };
        if project.main_path.is_some() {
            config.main_path = project.main_path;
        }
        if project.sdk_root.is_some() {
            config.sdk_root = project.sdk_root;
        }
        if !project.include_dirs.is_empty() {
            config.include_dirs = project.include_dirs;
        }
        config
    }

    fn apply_patch(
        &mut self,
        patch: ServerSettingsPatch,
    ) {
        if let Some(p) = patch.includes {
            self.includes.apply_patch(p);
        }
        if let Some(p) = patch.project {
            self.project.apply_patch(p);
        }
        if let Some(p) = patch.completion {
            self.completion.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    fn normalize(&mut self) {
        self.includes.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ServerSettingsPatch {
    includes: Option<IncludesSettingsPatch>,
    project: Option<ProjectSettingsPatch>,
    completion: Option<CompletionSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

fn payload_candidates(payload: &Value) -> Vec<Value> {
    let mut candidates = Vec::new();
    candidates.push(payload.clone());
    if let Some(scoped) = payload.get(SETTINGS_SECTION_KEY) {
        candidates.push(scoped.clone());
    }
    candidates
}

#[cfg(test)]
#[path = "../../tests/src/config/mod_tests.rs"]
mod tests;
