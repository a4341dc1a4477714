//! `GlyphWorker`: the WASM boundary.
//!
//! The worker shim constructs one `GlyphWorker` with its `postMessage`
//! function, calls `loadDataset` once at startup, and forwards every inbound
//! message to `handleMessage`. All console output funnels through this file;
//! the controller and everything below it stay JS-free so they run under
//! native tests.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, WorkerGlobalScope};

use crate::config::WorkerConfig;
use crate::dataset::DatasetError;
use crate::worker::controller::RequestController;
use crate::worker::protocol::{WorkerRequest, WorkerResponse};

#[wasm_bindgen]
pub struct GlyphWorker {
    controller: Rc<RefCell<RequestController>>,
    post_message: js_sys::Function,
}

#[wasm_bindgen]
impl GlyphWorker {
    /// `post_message` receives every response the worker produces; inside a
    /// worker that is `self.postMessage.bind(self)`. `base_url` overrides
    /// where dataset versions are fetched from.
    #[wasm_bindgen(constructor)]
    pub fn new(post_message: js_sys::Function, base_url: Option<String>) -> GlyphWorker {
        let config = match base_url {
            Some(base) => WorkerConfig::with_base_url(base),
            None => WorkerConfig::default(),
        };
        GlyphWorker {
            controller: Rc::new(RefCell::new(RequestController::new(config))),
            post_message,
        }
    }

    /// Fetches and indexes a dataset version. Posts WORKER_READY plus any
    /// queued answers when the load settles, or WORKER_ERROR if it fails.
    #[wasm_bindgen(js_name = loadDataset)]
    pub fn load_dataset(&self, version: String) {
        let controller = Rc::clone(&self.controller);
        let post_message = self.post_message.clone();
        let url = {
            let mut guard = controller.borrow_mut();
            guard.begin_load();
            guard.config().dataset_url(&version)
        };

        wasm_bindgen_futures::spawn_local(async move {
            let responses = match fetch_text(&url).await {
                Ok(body) => {
                    let responses = controller.borrow_mut().ingest_dataset(body.as_bytes());
                    log_load_outcome(&controller.borrow(), &responses, &version);
                    responses
                }
                Err(error) => {
                    web_sys::console::error_1(&format!("[GlyphWorker] {}", error).into());
                    controller.borrow_mut().fail_load(&error)
                }
            };
            post_all(&post_message, &responses);
        });
    }

    /// Decodes and dispatches one inbound `{ type, payload }` message.
    /// Unknown or malformed messages are logged and dropped.
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&self, message: JsValue) {
        let request: WorkerRequest = match serde_wasm_bindgen::from_value(message) {
            Ok(request) => request,
            Err(err) => {
                web_sys::console::warn_1(
                    &format!("[GlyphWorker] ignoring message: {}", err).into(),
                );
                return;
            }
        };
        let responses = self.controller.borrow_mut().handle(request);
        post_all(&self.post_message, &responses);
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.controller.borrow().is_ready()
    }

    #[wasm_bindgen(js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.controller.borrow().is_loading()
    }

    #[wasm_bindgen(js_name = glyphCount)]
    pub fn glyph_count(&self) -> usize {
        self.controller.borrow().glyph_count()
    }

    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.controller.borrow().last_error().map(String::from)
    }

    /// JSON snapshot of worker state for diagnostics panels.
    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> JsValue {
        let controller = self.controller.borrow();
        let stats = serde_json::json!({
            "state": controller.state().as_str(),
            "glyph_count": controller.glyph_count(),
            "block_count": controller.block_count(),
            "script_count": controller.script_count(),
            "last_error": controller.last_error(),
            "load_ms": controller.last_summary().map(|summary| summary.elapsed_ms),
        });
        serde_wasm_bindgen::to_value(&stats).unwrap_or(JsValue::NULL)
    }
}

fn post_all(post_message: &js_sys::Function, responses: &[WorkerResponse]) {
    for response in responses {
        match serde_wasm_bindgen::to_value(response) {
            Ok(value) => {
                if let Err(err) = post_message.call1(&JsValue::NULL, &value) {
                    web_sys::console::error_1(
                        &format!("[GlyphWorker] postMessage failed: {:?}", err).into(),
                    );
                }
            }
            Err(err) => {
                web_sys::console::error_1(
                    &format!("[GlyphWorker] response serialization failed: {}", err).into(),
                );
            }
        }
    }
}

fn log_load_outcome(controller: &RequestController, responses: &[WorkerResponse], version: &str) {
    if !matches!(responses.first(), Some(WorkerResponse::WorkerReady { .. })) {
        if let Some(error) = controller.last_error() {
            web_sys::console::error_1(&format!("[GlyphWorker] {}", error).into());
        }
        return;
    }
    if let Some(summary) = controller.last_summary() {
        web_sys::console::log_1(
            &format!(
                "[GlyphWorker] dataset {} ready: {} glyphs, {} blocks, {} scripts ({} merged, {} dropped) in {}ms",
                version,
                summary.glyph_count,
                summary.block_count,
                summary.script_count,
                summary.merged_rows,
                summary.dropped_rows,
                summary.elapsed_ms
            )
            .into(),
        );
    }
}

async fn fetch_text(url: &str) -> Result<String, DatasetError> {
    let scope: WorkerGlobalScope = js_sys::global()
        .dyn_into()
        .map_err(|_| DatasetError::Fetch("no worker global scope".to_string()))?;

    let response_value = JsFuture::from(scope.fetch_with_str(url))
        .await
        .map_err(|err| DatasetError::Fetch(js_error_message(&err)))?;
    let response: Response = response_value
        .dyn_into()
        .map_err(|_| DatasetError::Fetch("fetch returned a non-Response value".to_string()))?;

    if !response.ok() {
        return Err(DatasetError::Fetch(format!(
            "{} responded with status {}",
            url,
            response.status()
        )));
    }

    let body = JsFuture::from(
        response
            .text()
            .map_err(|err| DatasetError::Fetch(js_error_message(&err)))?,
    )
    .await
    .map_err(|err| DatasetError::Fetch(js_error_message(&err)))?;

    body.as_string()
        .ok_or_else(|| DatasetError::Fetch("response body was not text".to_string()))
}

fn js_error_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
