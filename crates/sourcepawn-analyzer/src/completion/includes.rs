use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};

use crate::{
    analysis::is_word_char,
    parser::IncludeKind,
    repository::{ItemsRepository, RepositoryConfig, include_folders},
    vfs::{FileId, normalized_path},
};

/// Known includes and sub-folders under the include folders of `file`,
/// relative to the directory part of `typed`.
pub(crate) fn include_completions(
    repository: &ItemsRepository,
    file: &FileId,
    config: &RepositoryConfig,
    typed: &str,
    kind: IncludeKind,
) -> Vec<CompletionItem> {
    let typed_dir = typed.rfind('/').map_or("", |at| &typed[..=at]);
    let folders: Vec<PathBuf> = include_folders(config, file)
        .iter()
        .map(|folder| normalized_path(&folder.join(typed_dir)))
        .collect();
    let closing = match kind {
        IncludeKind::Angle => ">",
        IncludeKind::Quoted => "\"",
    };

    let mut items = Vec::new();
    let mut subfolders: BTreeMap<PathBuf, String> = BTreeMap::new();
    for document in repository.known_documents() {
        let Some(path) = document.to_path() else {
            continue;
        };
        let mut listed = false;
        for folder in &folders {
            let Ok(relative) = path.strip_prefix(folder) else {
                continue;
            };
            let mut components = relative.components();
            let Some(first) = components.next() else {
                continue;
            };
            let first = first.as_os_str().to_string_lossy().into_owned();
            if components.next().is_some() {
                if first.starts_with(is_word_char) {
                    subfolders.entry(folder.join(&first)).or_insert(first);
                }
            } else if !listed && is_source_file(&path) {
                items.push(file_item(&path, &first, closing));
                listed = true;
            }
        }
    }

    items.extend(subfolders.into_iter().map(|(path, name)| CompletionItem {
        label: name,
        kind: Some(CompletionItemKind::FOLDER),
        detail: Some(path.display().to_string()),
        ..Default::default()
    }));
    items
}

fn is_source_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|ext| ext.to_str()), Some("inc" | "sp"))
}

fn file_item(
    path: &Path,
    file_name: &str,
    closing: &str,
) -> CompletionItem {
    let label = file_name.strip_suffix(".inc").unwrap_or(file_name).to_string();
    CompletionItem {
        insert_text: Some(format!("{label}{closing}")),
        label,
        kind: Some(CompletionItemKind::FILE),
        detail: Some(path.display().to_string()),
        ..Default::default()
    }
}
