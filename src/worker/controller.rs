//! Request lifecycle and dispatch.
//!
//! `RequestController` owns the loader, the index, and the pre-ready pending
//! table. The WASM boundary feeds it dataset bytes and decoded requests and
//! posts whatever responses come back; the controller itself never touches
//! the console or the JS runtime, so the whole lifecycle runs under native
//! tests.

use crate::config::WorkerConfig;
use crate::dataset::{DatasetError, DatasetLoader, LoadSummary};
use crate::search::SearchIndex;
use crate::worker::protocol::{RequestKind, WorkerRequest, WorkerResponse};

/// Lifecycle of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No dataset loaded; requests are queued.
    Uninitialized,
    /// A load is in flight; requests are queued.
    Loading,
    /// Index built; requests are answered synchronously.
    Ready,
}

impl ControllerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerState::Uninitialized => "uninitialized",
            ControllerState::Loading => "loading",
            ControllerState::Ready => "ready",
        }
    }
}

/// One slot per request kind. A newer request overwrites the older one of
/// the same kind, which is how pre-ready cancellation works: only the last
/// block, glyph, script, and query request ever get answered.
#[derive(Debug, Default)]
struct PendingRequests {
    block: Option<WorkerRequest>,
    glyph: Option<WorkerRequest>,
    script: Option<WorkerRequest>,
    query: Option<WorkerRequest>,
}

impl PendingRequests {
    fn set(&mut self, request: WorkerRequest) {
        let slot = match request.kind() {
            RequestKind::Block => &mut self.block,
            RequestKind::Glyph => &mut self.glyph,
            RequestKind::Script => &mut self.script,
            RequestKind::Query => &mut self.query,
        };
        *slot = Some(request);
    }

    /// Empties the table in fixed kind order.
    fn drain(&mut self) -> Vec<WorkerRequest> {
        [
            self.block.take(),
            self.glyph.take(),
            self.script.take(),
            self.query.take(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

pub struct RequestController {
    config: WorkerConfig,
    state: ControllerState,
    loader: DatasetLoader,
    index: Option<SearchIndex>,
    pending: PendingRequests,
    last_summary: Option<LoadSummary>,
}

impl RequestController {
    pub fn new(config: WorkerConfig) -> Self {
        RequestController {
            config,
            state: ControllerState::Uninitialized,
            loader: DatasetLoader::new(),
            index: None,
            pending: PendingRequests::default(),
            last_summary: None,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ControllerState::Ready
    }

    pub fn is_loading(&self) -> bool {
        self.state == ControllerState::Loading
    }

    pub fn glyph_count(&self) -> usize {
        self.index.as_ref().map(|index| index.len()).unwrap_or(0)
    }

    pub fn block_count(&self) -> usize {
        self.index
            .as_ref()
            .map(|index| index.store().block_count())
            .unwrap_or(0)
    }

    pub fn script_count(&self) -> usize {
        self.index
            .as_ref()
            .map(|index| index.store().script_count())
            .unwrap_or(0)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.loader.last_error()
    }

    pub fn last_summary(&self) -> Option<&LoadSummary> {
        self.last_summary.as_ref()
    }

    /// Marks the start of an async load. Requests arriving from here on are
    /// queued until the dataset settles.
    pub fn begin_load(&mut self) {
        self.state = ControllerState::Loading;
        self.loader.begin();
    }

    /// Feeds fetched dataset bytes in. On success the readiness notification
    /// comes first, followed by answers to everything queued while loading.
    /// A reload replaces the previous index wholesale.
    pub fn ingest_dataset(&mut self, bytes: &[u8]) -> Vec<WorkerResponse> {
        match self.loader.ingest(bytes) {
            Ok((store, summary)) => {
                let mut index = SearchIndex::build(store, &self.config);
                self.last_summary = Some(summary);
                self.state = ControllerState::Ready;
                let mut responses = vec![ready_notification(&index)];
                for request in self.pending.drain() {
                    responses.push(answer(&mut index, request));
                }
                self.index = Some(index);
                responses
            }
            Err(error) => self.settle_failure(&error),
        }
    }

    /// Records a load failure and surfaces it to the UI.
    pub fn fail_load(&mut self, error: &DatasetError) -> Vec<WorkerResponse> {
        self.loader.fail(error);
        self.settle_failure(error)
    }

    /// Handles one decoded request. Before readiness it lands in the pending
    /// table and produces nothing yet.
    pub fn handle(&mut self, request: WorkerRequest) -> Vec<WorkerResponse> {
        match (self.state, self.index.as_mut()) {
            (ControllerState::Ready, Some(index)) => vec![answer(index, request)],
            _ => {
                self.pending.set(request);
                Vec::new()
            }
        }
    }

    /// A failed load never touches an already-built index: with one in place
    /// the worker stays ready and anything parked during the attempt is
    /// answered from that index, right after the error notification. With no
    /// index it drops back to uninitialized and parked requests wait for the
    /// retried load.
    fn settle_failure(&mut self, error: &DatasetError) -> Vec<WorkerResponse> {
        let mut responses = vec![WorkerResponse::WorkerError {
            message: error.to_string(),
        }];
        match self.index.as_mut() {
            Some(index) => {
                self.state = ControllerState::Ready;
                for request in self.pending.drain() {
                    responses.push(answer(index, request));
                }
            }
            None => self.state = ControllerState::Uninitialized,
        }
        responses
    }
}

fn ready_notification(index: &SearchIndex) -> WorkerResponse {
    WorkerResponse::WorkerReady {
        count: index.len(),
        blocks: index.store().block_listing(),
        scripts: index.store().script_listing(),
    }
}

fn answer(index: &mut SearchIndex, request: WorkerRequest) -> WorkerResponse {
    match request {
        WorkerRequest::BlockRequest { slug } => WorkerResponse::BlockResponse {
            block: index.lookup_block(&slug),
        },
        WorkerRequest::GlyphRequest { character } => {
            let glyph = index.lookup_glyph(&character);
            let block = glyph
                .as_ref()
                .and_then(|g| g.block.as_deref())
                .and_then(|slug| index.lookup_block(slug));
            let ligature = glyph
                .as_ref()
                .map(|g| index.constituents(g))
                .unwrap_or_default();
            WorkerResponse::GlyphResponse {
                glyph,
                block,
                ligature,
            }
        }
        WorkerRequest::ScriptRequest { slug } => WorkerResponse::ScriptResponse {
            script: index.lookup_script(&slug),
        },
        WorkerRequest::QueryRequest { query } => WorkerResponse::QueryResponse {
            results: index.search(&query),
        },
    }
}
