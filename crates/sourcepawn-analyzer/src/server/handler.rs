use tower_lsp::{LanguageServer, jsonrpc::Result, lsp_types::*};
use tracing::{debug, info};

use crate::{
    completion::CompletionRequest,
    config::ServerSettings,
    ide::lsp::{ide_location_to_lsp, ide_range_to_lsp, lsp_position_to_ide, navigation_target_to_lsp},
    repository::RepositoryConfig,
    semantic_tokens::get_legend,
    server::state::SourcePawnLanguageServer,
    vfs::FileId,
};

const COMPLETION_TRIGGERS: &[&str] = &[".", ":", "<", "\"", "/", " ", "$", "*"];
const SIGNATURE_TRIGGERS: &[&str] = &["(", ","];

#[tower_lsp::async_trait]
impl LanguageServer for SourcePawnLanguageServer {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> Result<InitializeResult> {
        info!("Initializing sourcepawn-analyzer...");

        let initial_settings = ServerSettings::from_lsp_payload(params.initialization_options.as_ref());
        self.apply_settings(initial_settings).await;

        if let Some(folders) = params.workspace_folders {
            *self.workspace_roots.write().await = folders;
        } else if let Some(root) = params.root_uri {
            *self.workspace_roots.write().await = vec![WorkspaceFolder {
                uri: root,
                name: "root".to_string(),
            }];
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(COMPLETION_TRIGGERS.iter().map(|c| c.to_string()).collect()),
                    ..Default::default()
                }),
                signature_help_provider: Some(SignatureHelpOptions {
                    trigger_characters: Some(SIGNATURE_TRIGGERS.iter().map(|c| c.to_string()).collect()),
                    ..Default::default()
                }),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                declaration_provider: Some(DeclarationCapability::Simple(true)),
                references_provider: Some(OneOf::Left(true)),
                document_highlight_provider: Some(OneOf::Left(true)),
                document_symbol_provider: Some(OneOf::Left(true)),
                workspace_symbol_provider: Some(OneOf::Left(true)),
                semantic_tokens_provider: Some(SemanticTokensServerCapabilities::SemanticTokensOptions(
                    SemanticTokensOptions {
                        legend: get_legend(),
                        full: Some(SemanticTokensFullOptions::Bool(true)),
                        range: Some(false),
                        work_done_progress_options: Default::default(),
                    },
                )),
                call_hierarchy_provider: Some(CallHierarchyServerCapability::Simple(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "sourcepawn-analyzer".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(
        &self,
        _: InitializedParams,
    ) {
        info!("sourcepawn-analyzer initialized");

        let handle = self.clone_for_background().await;
        tokio::spawn(async move {
            handle.index_workspace().await;
        });
    }

    async fn did_change_configuration(
        &self,
        params: DidChangeConfigurationParams,
    ) {
        let current = self.settings_snapshot().await;
        let merged = current.merged_with_payload(&params.settings);
        if merged == current {
            return;
        }

        let rescan = merged.includes != current.includes || merged.project != current.project;
        self.apply_settings(merged).await;
        info!("Applied updated sourcepawn-analyzer settings");

        if rescan {
            let handle = self.clone_for_background().await;
            tokio::spawn(async move {
                handle.index_workspace().await;
            });
        }
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down sourcepawn-analyzer");
        Ok(())
    }

    async fn did_open(
        &self,
        params: DidOpenTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        let text = params.text_document.text;
        let version = params.text_document.version;
        let filename = short_name(&uri);

        info!("Opened {filename} (v{version}, {} bytes)", text.len());
        self.document_store.open(uri.clone(), text.clone(), version);
        self.reparse(&uri, &text).await;
        self.log_to_client(MessageType::INFO, format!("Opened {filename}")).await;
    }

    async fn did_change(
        &self,
        params: DidChangeTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        let Some(text) = self.document_store.apply_changes(&uri, params.content_changes, version) else {
            debug!("change for unopened document {}", short_name(&uri));
            return;
        };
        self.reparse(&uri, &text).await;
    }

    async fn did_close(
        &self,
        params: DidCloseTextDocumentParams,
    ) {
        // The table stays: other files may still include this one.
        self.document_store.close(&params.text_document.uri);
    }

    async fn completion(
        &self,
        params: CompletionParams,
    ) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some((file, config)) = self.prepare_query(&uri).await else {
            return Ok(None);
        };
        let Some(line) = self.document_store.line(&uri, position.line) else {
            return Ok(None);
        };
        let next_line = self.document_store.line(&uri, position.line + 1);
        let trigger = params.context.and_then(|context| context.trigger_character);
        let snippets = self.settings.read().await.completion.snippets;

        let items = self.completion_provider.provide(CompletionRequest {
            file: &file,
            config: &config,
            line: &line,
            next_line: next_line.as_deref(),
            position,
            trigger: trigger.as_deref(),
            snippets,
        });
        debug!("completion {}:{} -> {} item(s)", short_name(&uri), position.line + 1, items.len());
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn hover(
        &self,
        params: HoverParams,
    ) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some((file, config)) = self.prepare_query(&uri).await else {
            return Ok(None);
        };
        let Some(line) = self.document_store.line(&uri, position.line) else {
            return Ok(None);
        };
        Ok(self.hover_provider.provide(&file, &config, &line, position))
    }

    async fn signature_help(
        &self,
        params: SignatureHelpParams,
    ) -> Result<Option<SignatureHelp>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some((file, config)) = self.prepare_query(&uri).await else {
            return Ok(None);
        };
        let Some(text) = self.document_store.get_content(&uri) else {
            return Ok(None);
        };
        Ok(self.signature_provider.provide(&file, &config, &text, position))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        Ok(self.definition_at(&uri, position).await)
    }

    async fn goto_declaration(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        Ok(self.definition_at(&uri, position).await)
    }

    async fn references(
        &self,
        params: ReferenceParams,
    ) -> Result<Option<Vec<Location>>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some((file, config)) = self.prepare_query(&uri).await else {
            return Ok(None);
        };
        let Some(line) = self.document_store.line(&uri, position.line) else {
            return Ok(None);
        };

        let locations = self.reference_provider.references(
            &file,
            &config,
            &line,
            lsp_position_to_ide(position),
            params.context.include_declaration,
        );
        debug!("references {}:{} -> {} location(s)", short_name(&uri), position.line + 1, locations.len());
        Ok(Some(locations.into_iter().filter_map(ide_location_to_lsp).collect()))
    }

    async fn document_highlight(
        &self,
        params: DocumentHighlightParams,
    ) -> Result<Option<Vec<DocumentHighlight>>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some((file, config)) = self.prepare_query(&uri).await else {
            return Ok(None);
        };
        let Some(line) = self.document_store.line(&uri, position.line) else {
            return Ok(None);
        };

        let highlights = self
            .reference_provider
            .highlights(&file, &config, &line, lsp_position_to_ide(position))
            .into_iter()
            .map(|range| DocumentHighlight {
                range: ide_range_to_lsp(range),
                kind: Some(DocumentHighlightKind::TEXT),
            })
            .collect();
        Ok(Some(highlights))
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;
        let Some((file, _)) = self.prepare_query(&uri).await else {
            return Ok(None);
        };
        Ok(Some(DocumentSymbolResponse::Nested(self.symbol_provider.document_symbols(&file))))
    }

    async fn symbol(
        &self,
        params: WorkspaceSymbolParams,
    ) -> Result<Option<Vec<SymbolInformation>>> {
        Ok(Some(self.symbol_provider.workspace_symbols(&params.query)))
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        let uri = params.text_document.uri;
        let Some((file, config)) = self.prepare_query(&uri).await else {
            return Ok(None);
        };
        let tokens = self.semantic_token_provider.provide(&file, &config);
        debug!("semantic tokens {} -> {} token(s)", short_name(&uri), tokens.len());
        Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
            result_id: None,
            data: tokens,
        })))
    }

    async fn prepare_call_hierarchy(
        &self,
        params: CallHierarchyPrepareParams,
    ) -> Result<Option<Vec<CallHierarchyItem>>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some((file, config)) = self.prepare_query(&uri).await else {
            return Ok(None);
        };
        let Some(line) = self.document_store.line(&uri, position.line) else {
            return Ok(None);
        };
        let items = self.call_hierarchy_provider.prepare(&file, &config, &line, lsp_position_to_ide(position));
        Ok(Some(items).filter(|items| !items.is_empty()))
    }

    async fn incoming_calls(
        &self,
        params: CallHierarchyIncomingCallsParams,
    ) -> Result<Option<Vec<CallHierarchyIncomingCall>>> {
        let config = self.config_for(&params.item.uri).await;
        Ok(Some(self.call_hierarchy_provider.incoming(&params.item, &config)))
    }

    async fn outgoing_calls(
        &self,
        params: CallHierarchyOutgoingCallsParams,
    ) -> Result<Option<Vec<CallHierarchyOutgoingCall>>> {
        let config = self.config_for(&params.item.uri).await;
        Ok(Some(self.call_hierarchy_provider.outgoing(&params.item, &config)))
    }
}

impl SourcePawnLanguageServer {
    /// File id and project configuration for a query on an open document,
    /// parsing it first when the repository has no table for it yet. `None`
    /// for unknown documents.
    async fn prepare_query(
        &self,
        uri: &Url,
    ) -> Option<(FileId, RepositoryConfig)> {
        let file = FileId::from_url(uri);
        if self.repository.table(&file).is_none() {
            let text = self.document_store.get_content(uri)?;
            self.reparse(uri, &text).await;
        }
        Some((file, self.config_for(uri).await))
    }

    async fn definition_at(
        &self,
        uri: &Url,
        position: Position,
    ) -> Option<GotoDefinitionResponse> {
        let (file, config) = self.prepare_query(uri).await?;
        let line = self.document_store.line(uri, position.line)?;
        let target = self.definition_provider.definition(&file, &config, &line, lsp_position_to_ide(position));
        let response = target.and_then(navigation_target_to_lsp);
        if response.is_none() {
            self.log_to_client(
                MessageType::LOG,
                format!("No definition at {}:{}", short_name(uri), position.line + 1),
            )
            .await;
        }
        response
    }
}

fn short_name(uri: &Url) -> String {
    uri.path().rsplit('/').next().unwrap_or(uri.path()).to_owned()
}
