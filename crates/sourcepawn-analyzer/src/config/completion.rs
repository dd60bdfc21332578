use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    /// Offer `public` callback skeletons for forwards after a `$`.
    pub snippets: bool,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            snippets: true,
        }
    }
}

impl CompletionSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: CompletionSettingsPatch,
    ) {
        if let Some(v) = patch.snippets {
            self.snippets = v;
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CompletionSettingsPatch {
    pub(crate) snippets: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
