use std::{panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use tokio::sync::RwLock;
use tower_lsp::{
    Client,
    lsp_types::{MessageType, Url, WorkspaceFolder},
};
use tracing::{debug, warn};

use crate::{
    call_hierarchy::CallHierarchyProvider,
    completion::CompletionProvider,
    config::ServerSettings,
    definition::{DefinitionProvider, ReferenceProvider},
    document::DocumentStore,
    hover::HoverProvider,
    repository::{ItemsRepository, RepositoryConfig},
    semantic_tokens::SemanticTokenProvider,
    signature::SignatureHelpProvider,
    symbols::SymbolProvider,
    vfs::FileId,
};

const CLIENT_NOTIFICATION_PREFIX: &str = "sourcepawn-analyzer:";

/// The sourcepawn-analyzer backend that implements the Language Server Protocol.
pub struct SourcePawnLanguageServer {
    /// The LSP client handle, used to send notifications back.
    pub(crate) client: Client,

    /// Thread-safe store of all open documents.
    pub(crate) document_store: Arc<DocumentStore>,

    /// Symbol tables of every parsed file.
    pub(crate) repository: Arc<ItemsRepository>,

    pub(crate) completion_provider: Arc<CompletionProvider>,
    pub(crate) hover_provider: Arc<HoverProvider>,
    pub(crate) signature_provider: Arc<SignatureHelpProvider>,
    pub(crate) definition_provider: Arc<DefinitionProvider>,
    pub(crate) reference_provider: Arc<ReferenceProvider>,
    pub(crate) semantic_token_provider: Arc<SemanticTokenProvider>,
    pub(crate) call_hierarchy_provider: Arc<CallHierarchyProvider>,

    /// Outline and workspace symbol search.
    pub(crate) symbol_provider: Arc<SymbolProvider>,

    /// Workspace root folders, populated during `initialize`.
    pub(crate) workspace_roots: RwLock<Vec<WorkspaceFolder>>,

    /// Runtime server settings updated from LSP configuration.
    pub(crate) settings: Arc<RwLock<ServerSettings>>,

    /// Mirror client-facing log messages at debug level as well.
    log_messages: bool,
}

impl SourcePawnLanguageServer {
    pub fn new(
        client: Client,
        log_messages: bool,
    ) -> Self {
        let repository = Arc::new(ItemsRepository::new());

        Self {
            client,
            document_store: Arc::new(DocumentStore::new()),
            completion_provider: Arc::new(CompletionProvider::new(Arc::clone(&repository))),
            hover_provider: Arc::new(HoverProvider::new(Arc::clone(&repository))),
            signature_provider: Arc::new(SignatureHelpProvider::new(Arc::clone(&repository))),
            definition_provider: Arc::new(DefinitionProvider::new(Arc::clone(&repository))),
            reference_provider: Arc::new(ReferenceProvider::new(Arc::clone(&repository))),
            semantic_token_provider: Arc::new(SemanticTokenProvider::new(Arc::clone(&repository))),
            call_hierarchy_provider: Arc::new(CallHierarchyProvider::new(Arc::clone(&repository))),
            symbol_provider: Arc::new(SymbolProvider::new(Arc::clone(&repository))),
            repository,
            workspace_roots: RwLock::new(Vec::new()),
            settings: Arc::new(RwLock::new(ServerSettings::default())),
            log_messages,
        }
    }

    pub(crate) async fn settings_snapshot(&self) -> ServerSettings {
        self.settings.read().await.clone()
    }

    pub(crate) async fn apply_settings(
        &self,
        settings: ServerSettings,
    ) {
        *self.settings.write().await = settings;
    }

    /// Configuration of the project `uri` belongs to. A `sourcepawn.toml`
    /// above the file takes precedence over editor settings.
    pub(crate) async fn config_for(
        &self,
        uri: &Url,
    ) -> RepositoryConfig {
        let path = uri.to_file_path().ok();
        self.settings.read().await.repository_config(path.as_deref())
    }

    /// Parses editor text for `uri` on the blocking pool, replacing the
    /// file's symbols.
    pub(crate) async fn reparse(
        &self,
        uri: &Url,
        text: &str,
    ) {
        let config = self.config_for(uri).await;
        let file = FileId::from_url(uri);
        let repository = Arc::clone(&self.repository);
        let text = text.to_string();
        let name = file.file_name().to_string();
        match tokio::task::spawn_blocking(move || repository.parse_text(&file, &text, &config)).await {
            Ok(Ok(count)) => debug!("parsed {name} ({count} symbols)"),
            Ok(Err(error)) => warn!("{error}"),
            Err(error) => warn!("reparse of {name} did not complete: {error}"),
        }
    }

    /// Sends `window/logMessage` when the configured level allows `level`.
    pub(crate) async fn log_to_client(
        &self,
        level: MessageType,
        message: impl AsRef<str>,
    ) {
        let configured = self.settings.read().await.logging.level;
        let allowed = if level == MessageType::LOG {
            configured.allows_debug()
        } else {
            configured.allows_info() || level == MessageType::ERROR || level == MessageType::WARNING
        };
        if !allowed {
            return;
        }
        if self.log_messages {
            debug!("client log: {}", message.as_ref());
        }
        let result =
            AssertUnwindSafe(self.client.log_message(level, prefixed_client_message(message))).catch_unwind().await;
        if result.is_err() {
            warn!("log_message panicked (client may have disconnected)");
        }
    }
}

fn prefixed_client_message(message: impl AsRef<str>) -> String {
    format!("{CLIENT_NOTIFICATION_PREFIX} {}", message.as_ref())
}
