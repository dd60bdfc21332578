use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
};

use serde::Deserialize;
use serde_json::Value;

/// Where `#include` targets are searched for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncludesSettings {
    /// SourceMod `scripting` directory. Files under its `include/` folder are
    /// treated as built-in.
    pub sdk_root: Option<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
}

impl IncludesSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: IncludesSettingsPatch,
    ) {
        if let Some(v) = patch.sdk_root {
            self.sdk_root = Some(PathBuf::from(v));
        }
        if let Some(v) = patch.include_dirs {
            self.include_dirs = v.into_iter().map(PathBuf::from).collect();
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.sdk_root = self
            .sdk_root
            .take()
            .map(|root| root.to_string_lossy().trim().to_string())
            .filter(|root| !root.is_empty())
            .map(PathBuf::from);

        let mut seen = HashSet::new();
        self.include_dirs = self
            .include_dirs
            .iter()
            .map(|dir| dir.to_string_lossy().trim().to_string())
            .filter(|dir| !dir.is_empty())
            .filter(|dir| seen.insert(dir.clone()))
            .map(PathBuf::from)
            .collect();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct IncludesSettingsPatch {
    pub(crate) sdk_root: Option<String>,
    pub(crate) include_dirs: Option<Vec<String>>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
