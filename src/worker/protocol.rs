//! Tagged messages crossing the worker boundary.
//!
//! Everything on the wire is `{ type, payload }` with a SCREAMING_SNAKE_CASE
//! discriminant. Inbound messages with an unknown type fail to deserialize;
//! the boundary logs and drops them, it never aborts. Response payloads carry
//! the shared records by value once serialized.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::dataset::{BlockRecord, GlyphRecord, ScriptRecord};

/// Requests accepted from the UI thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerRequest {
    BlockRequest {
        slug: String,
    },
    GlyphRequest {
        #[serde(rename = "char")]
        character: String,
    },
    ScriptRequest {
        slug: String,
    },
    QueryRequest {
        query: String,
    },
}

/// Responses posted back to the UI thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerResponse {
    BlockResponse {
        block: Option<Rc<BlockRecord>>,
    },
    GlyphResponse {
        glyph: Option<Rc<GlyphRecord>>,
        block: Option<Rc<BlockRecord>>,
        ligature: Vec<Rc<GlyphRecord>>,
    },
    ScriptResponse {
        script: Option<Rc<ScriptRecord>>,
    },
    QueryResponse {
        results: Vec<Rc<GlyphRecord>>,
    },
    /// Posted once per successful load, before any queued answers.
    WorkerReady {
        count: usize,
        blocks: Vec<(String, String)>,
        scripts: Vec<(String, String)>,
    },
    WorkerError {
        message: String,
    },
}

/// The four request families; each holds one pending slot before readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Block,
    Glyph,
    Script,
    Query,
}

impl WorkerRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            WorkerRequest::BlockRequest { .. } => RequestKind::Block,
            WorkerRequest::GlyphRequest { .. } => RequestKind::Glyph,
            WorkerRequest::ScriptRequest { .. } => RequestKind::Script,
            WorkerRequest::QueryRequest { .. } => RequestKind::Query,
        }
    }
}
