#![allow(dead_code)]

use std::{
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use sourcepawn_analyzer::SourcePawnLanguageServer;
use tower::{Service, ServiceExt};
use tower_lsp::{
    ClientSocket, LspService,
    jsonrpc::{Request, Response},
    lsp_types::{InitializedParams, Position, Url},
};

pub fn position_of(
    source: &str,
    needle: &str,
) -> Position {
    position_of_nth(source, needle, 0)
}

pub fn position_of_nth(
    source: &str,
    needle: &str,
    nth: usize,
) -> Position {
    assert!(!needle.is_empty(), "needle must not be empty");
    let mut from = 0usize;
    let mut current = 0usize;

    loop {
        let Some(idx) = source[from..].find(needle) else {
            panic!("needle not found: {needle}");
        };
        let absolute = from + idx;
        if current == nth {
            let before = &source[..absolute];
            let line = before.as_bytes().iter().filter(|&&b| b == b'\n').count() as u32;
            let col = before
                .rsplit_once('\n')
                .map(|(_, tail)| tail.encode_utf16().count() as u32)
                .unwrap_or_else(|| before.encode_utf16().count() as u32);
            return Position::new(line, col);
        }
        current += 1;
        from = absolute + needle.len();
    }
}

/// A scratch directory of source files, removed on drop.
pub struct TempWorkspace {
    pub root: PathBuf,
}

impl TempWorkspace {
    pub fn new(test_name: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after UNIX_EPOCH")
            .as_nanos();
        let root =
            std::env::temp_dir().join(format!("sourcepawn-analyzer-{test_name}-{}-{unique}", std::process::id()));
        std::fs::create_dir_all(&root).expect("create temp workspace");
        Self {
            root,
        }
    }

    pub fn write(
        &self,
        relative_path: &str,
        text: &str,
    ) -> PathBuf {
        let path = self.root.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, text).expect("write fixture file");
        path
    }

    pub fn path(
        &self,
        relative_path: &str,
    ) -> PathBuf {
        self.root.join(relative_path)
    }

    pub fn uri(
        &self,
        relative_path: &str,
    ) -> Url {
        Url::from_file_path(self.path(relative_path)).expect("fixture path is valid file:// URI")
    }

    pub fn root_uri(&self) -> Url {
        Url::from_file_path(&self.root).expect("workspace root is valid file:// URI")
    }
}

impl Drop for TempWorkspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub async fn initialize_service(
    initialize_params: Value
) -> (LspService<SourcePawnLanguageServer>, ClientSocket, Response) {
    let (mut service, socket) = LspService::new(|client| SourcePawnLanguageServer::new(client, false));

    let initialize = Request::build("initialize").params(initialize_params).id(1).finish();
    let init_response = service
        .ready()
        .await
        .expect("service ready")
        .call(initialize)
        .await
        .expect("initialize call")
        .expect("initialize should return a response");

    let initialized = Request::build("initialized")
        .params(serde_json::to_value(InitializedParams {}).expect("serialize initialized params"))
        .finish();
    let initialized_response =
        service.ready().await.expect("service ready").call(initialized).await.expect("initialized call");
    assert!(initialized_response.is_none(), "initialized notification should not return a response");

    (service, socket, init_response)
}

pub async fn send_notification<P: serde::Serialize>(
    service: &mut LspService<SourcePawnLanguageServer>,
    socket: &mut ClientSocket,
    pending_notifications: &mut Vec<Request>,
    method: &'static str,
    params: P,
) {
    let request =
        Request::build(method).params(serde_json::to_value(params).expect("serialize notification params")).finish();
    let mut call_fut = Box::pin(async {
        service.ready().await.expect("service ready").call(request).await.expect("notification call")
    });

    loop {
        tokio::select! {
            response = &mut call_fut => {
                assert!(response.is_none(), "{method} should be handled as notification");
                break;
            }
            maybe_req = socket.next() => {
                let req = maybe_req.expect("client socket unexpectedly closed while handling notification");
                if let Some(id) = req.id().cloned() {
                    let response = Response::from_ok(id, json!(null));
                    socket
                        .send(response)
                        .await
                        .expect("failed to send synthetic client response");
                } else {
                    pending_notifications.push(req);
                }
            }
        }
    }
}

/// Sends a request while answering any server-to-client requests, and
/// returns the result payload.
pub async fn send_request<P: serde::Serialize>(
    service: &mut LspService<SourcePawnLanguageServer>,
    socket: &mut ClientSocket,
    pending_notifications: &mut Vec<Request>,
    method: &'static str,
    params: P,
    id: i64,
) -> Value {
    let request =
        Request::build(method).params(serde_json::to_value(params).expect("serialize request params")).id(id).finish();
    let mut call_fut =
        Box::pin(async { service.ready().await.expect("service ready").call(request).await.expect("request call") });

    loop {
        tokio::select! {
            maybe_response = &mut call_fut => {
                let response = maybe_response.expect("request should return response");
                assert!(response.is_ok(), "{method} failed: {:?}", response.error());
                return response.result().cloned().unwrap_or(Value::Null);
            }
            maybe_req = tokio::time::timeout(Duration::from_secs(20), socket.next()) => {
                let maybe_req = maybe_req
                    .expect("timed out waiting for server message while request is in flight");
                let req = maybe_req.expect("client socket unexpectedly closed while request in flight");
                if let Some(id) = req.id().cloned() {
                    let response = Response::from_ok(id, json!(null));
                    socket
                        .send(response)
                        .await
                        .expect("failed to send synthetic client response");
                } else {
                    pending_notifications.push(req);
                }
            }
        }
    }
}
