use std::{collections::HashMap, path::PathBuf};

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectSettings {
    /// Plugin whose include closure answers queries in every file.
    pub main_path: Option<PathBuf>,
}

impl ProjectSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: ProjectSettingsPatch,
    ) {
        if let Some(v) = patch.main_path {
            let trimmed = v.trim();
            self.main_path = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ProjectSettingsPatch {
    pub(crate) main_path: Option<String>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
