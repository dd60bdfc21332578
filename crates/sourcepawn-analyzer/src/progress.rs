//! `$/progress` reporting for the workspace scan.
//!
//! The scan announces how many plugins and includes it found, reports every
//! [`REPORT_EVERY`] registered files, and ends with the number of files that
//! were parsed.

use std::{
    panic::AssertUnwindSafe,
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
};

use futures::FutureExt;
use tower_lsp::{Client, lsp_types::*};
use tracing::{debug, warn};

static NEXT_SCAN_ID: AtomicU64 = AtomicU64::new(1);
const SCAN_TITLE: &str = "sourcepawn-analyzer: Indexing";
pub(crate) const REPORT_EVERY: usize = 50;

/// Plugins (`.sp`) and includes (`.inc`) among discovered files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceCounts {
    pub(crate) plugins: usize,
    pub(crate) includes: usize,
}

impl SourceCounts {
    pub(crate) fn of<P: AsRef<Path>>(paths: &[P]) -> Self {
        paths.iter().fold(Self::default(), |mut counts, path| {
            match path.as_ref().extension().and_then(|ext| ext.to_str()) {
                Some("sp") => counts.plugins += 1,
                Some("inc") => counts.includes += 1,
                _ => {},
            }
            counts
        })
    }

    pub(crate) fn total(&self) -> usize {
        self.plugins + self.includes
    }

    pub(crate) fn summary(&self) -> String {
        format!("{} plugin(s), {} include(s)", self.plugins, self.includes)
    }
}

/// Whether the `done`-th registered file of `total` gets its own report.
pub(crate) fn should_report(
    done: usize,
    total: usize,
) -> bool {
    done == total || done % REPORT_EVERY == 0
}

pub(crate) fn percentage(
    done: usize,
    total: usize,
) -> u32 {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100 / total) as u32
}

/// Progress of one workspace scan. Ends as cancelled when dropped before
/// [`finish`](Self::finish).
pub(crate) struct ScanProgress {
    client: Client,
    token: Option<NumberOrString>,
    counts: SourceCounts,
    registered: usize,
}

impl ScanProgress {
    pub(crate) async fn begin(
        client: &Client,
        counts: SourceCounts,
    ) -> Self {
        let id = NEXT_SCAN_ID.fetch_add(1, Ordering::Relaxed);
        let token = NumberOrString::String(format!("sourcepawnAnalyzer/scan/{id}"));

        // The create response is awaited off this task so a slow editor does
        // not hold up the scan.
        let create_client = client.clone();
        let create_token = token.clone();
        tokio::spawn(async move {
            let params = WorkDoneProgressCreateParams {
                token: create_token,
            };
            match AssertUnwindSafe(create_client.send_request::<request::WorkDoneProgressCreate>(params))
                .catch_unwind()
                .await
            {
                Ok(Ok(())) => {},
                Ok(Err(error)) => debug!("workDoneProgress/create rejected: {error}"),
                Err(_) => warn!("workDoneProgress/create panicked"),
            }
        });

        let progress = Self {
            client: client.clone(),
            token: Some(token),
            counts,
            registered: 0,
        };
        progress
            .send(WorkDoneProgress::Begin(WorkDoneProgressBegin {
                title: SCAN_TITLE.to_string(),
                cancellable: Some(false),
                message: Some(counts.summary()),
                percentage: Some(0),
            }))
            .await;
        debug!("scan started: {}", counts.summary());
        progress
    }

    /// Counts one more registered file and reports on every batch boundary.
    pub(crate) async fn file_registered(&mut self) {
        self.registered += 1;
        let total = self.counts.total();
        if !should_report(self.registered, total) {
            return;
        }
        self.report(format!("{} / {total} files", self.registered), Some(percentage(self.registered, total)))
            .await;
    }

    pub(crate) async fn parsing_main(
        &self,
        main: &Path,
    ) {
        let name = main.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
        self.report(format!("parsing {name}"), None).await;
    }

    pub(crate) async fn finish(
        mut self,
        parsed: usize,
    ) {
        let message = format!("{} file(s) found, {parsed} parsed", self.counts.total());
        self.send(WorkDoneProgress::End(WorkDoneProgressEnd {
            message: Some(message),
        }))
        .await;
        self.token = None;
    }

    async fn report(
        &self,
        message: String,
        percentage: Option<u32>,
    ) {
        self.send(WorkDoneProgress::Report(WorkDoneProgressReport {
            cancellable: Some(false),
            message: Some(message),
            percentage,
        }))
        .await;
    }

    async fn send(
        &self,
        value: WorkDoneProgress,
    ) {
        let Some(token) = self.token.clone() else {
            return;
        };
        let params = ProgressParams {
            token,
            value: ProgressParamsValue::WorkDone(value),
        };
        if AssertUnwindSafe(self.client.send_notification::<notification::Progress>(params))
            .catch_unwind()
            .await
            .is_err()
        {
            warn!("progress notification panicked (client may have disconnected)");
        }
    }
}

impl Drop for ScanProgress {
    fn drop(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            let params = ProgressParams {
                token,
                value: ProgressParamsValue::WorkDone(WorkDoneProgress::End(WorkDoneProgressEnd {
                    message: Some("Cancelled".to_string()),
                })),
            };
            let _ = AssertUnwindSafe(client.send_notification::<notification::Progress>(params)).catch_unwind().await;
        });
    }
}

#[cfg(test)]
#[path = "../tests/src/progress_tests.rs"]
mod tests;
