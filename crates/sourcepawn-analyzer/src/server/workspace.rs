use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use tower_lsp::Client;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{
    config::ServerSettings,
    document::DocumentStore,
    progress::{ScanProgress, SourceCounts},
    repository::{ItemsRepository, RepositoryConfig},
    vfs::{FileId, normalized_path},
};

use super::state::SourcePawnLanguageServer;

const SOURCE_EXTENSIONS: &[&str] = &["sp", "inc"];

impl SourcePawnLanguageServer {
    /// Create a lightweight handle suitable for passing into `tokio::spawn`.
    pub(crate) async fn clone_for_background(&self) -> BackgroundHandle {
        let folders: Vec<PathBuf> =
            self.workspace_roots.read().await.iter().filter_map(|folder| folder.uri.to_file_path().ok()).collect();

        BackgroundHandle {
            client: self.client.clone(),
            repository: Arc::clone(&self.repository),
            document_store: Arc::clone(&self.document_store),
            folders,
            settings: self.settings_snapshot().await,
        }
    }
}

/// Minimal handle used by the workspace scan without holding references to
/// the full server state.
pub(crate) struct BackgroundHandle {
    client: Client,
    repository: Arc<ItemsRepository>,
    document_store: Arc<DocumentStore>,
    folders: Vec<PathBuf>,
    /// Settings at the time the scan was started.
    settings: ServerSettings,
}

impl BackgroundHandle {
    /// Registers every source file under the workspace folders and include
    /// directories, then parses each project's main plugin and its include
    /// closure.
    pub async fn index_workspace(self) {
        let projects = self.project_configs();
        let roots = scan_roots(&self.folders, &projects);
        let files = match tokio::task::spawn_blocking(move || discover_source_files(&roots)).await {
            Ok(files) => files,
            Err(error) => {
                warn!("workspace scan failed: {error}");
                return;
            },
        };
        let counts = SourceCounts::of(&files);
        if counts.total() == 0 {
            info!("No .sp or .inc files found in workspace");
            return;
        }

        info!("Registering {}…", counts.summary());
        let mut progress = ScanProgress::begin(&self.client, counts).await;
        for path in &files {
            self.repository.add_document(FileId::from_path(path));
            progress.file_registered().await;
        }

        for config in &projects {
            let Some(main) = config.main_path.clone() else {
                continue;
            };
            progress.parsing_main(&main).await;
            let repository = Arc::clone(&self.repository);
            let config = config.clone();
            match tokio::task::spawn_blocking(move || repository.parse_file(&main, &config)).await {
                Ok(Ok(count)) => debug!("main file parsed ({count} symbols)"),
                Ok(Err(error)) => warn!("{error}"),
                Err(error) => warn!("main file parse task failed: {error}"),
            }
        }

        self.reparse_open_documents().await;

        let parsed = self.repository.all_tables().len();
        info!("Workspace scan complete: {} file(s) found, {parsed} parsed", counts.total());
        progress.finish(parsed).await;
    }

    /// One configuration per workspace folder, each honouring the folder's
    /// `sourcepawn.toml`. Falls back to the editor settings alone.
    fn project_configs(&self) -> Vec<RepositoryConfig> {
        let mut configs: Vec<RepositoryConfig> = Vec::new();
        let folders = self.folders.iter().map(|folder| Some(folder.as_path()));
        for folder in folders.chain(self.folders.is_empty().then_some(None)) {
            let config = self.settings.repository_config(folder);
            if !configs.contains(&config) {
                configs.push(config);
            }
        }
        configs
    }

    /// Includes that resolved to placeholders before the scan can now be
    /// found on disk.
    async fn reparse_open_documents(&self) {
        let documents: Vec<(FileId, String, RepositoryConfig)> = self
            .document_store
            .all_uris()
            .into_iter()
            .filter_map(|uri| {
                let text = self.document_store.get_content(&uri)?;
                let path = uri.to_file_path().ok();
                Some((FileId::from_url(&uri), text, self.settings.repository_config(path.as_deref())))
            })
            .collect();
        if documents.is_empty() {
            return;
        }

        let repository = Arc::clone(&self.repository);
        let reparsed = tokio::task::spawn_blocking(move || {
            for (file, text, config) in documents {
                if let Err(error) = repository.parse_text(&file, &text, &config) {
                    warn!("{error}");
                }
            }
        })
        .await;
        if let Err(error) = reparsed {
            warn!("reparse of open documents did not complete: {error}");
        }
    }
}

/// Workspace folders followed by the SDK and include directories of every
/// project.
fn scan_roots(
    folders: &[PathBuf],
    projects: &[RepositoryConfig],
) -> Vec<PathBuf> {
    let mut roots = folders.to_vec();
    for config in projects {
        roots.extend(config.sdk_include_dir());
        roots.extend(config.include_dirs.iter().cloned());
    }
    roots
}

/// `.sp` and `.inc` files below `roots`, normalized and without duplicates.
pub(crate) fn discover_source_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for root in roots {
        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(should_descend_into_workspace_entry)
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() || !is_source_file(entry.path()) {
                continue;
            }
            let normalized = normalized_path(entry.path());
            if seen.insert(normalized.clone()) {
                files.push(normalized);
            }
        }
    }
    files
}

fn is_source_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn should_descend_into_workspace_entry(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() || entry.depth() == 0 {
        return true;
    }
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    !name.starts_with('.') && !matches!(name, "node_modules" | "target" | "compiled" | "plugins")
}

#[cfg(test)]
#[path = "../../tests/src/server/workspace_tests.rs"]
mod tests;
