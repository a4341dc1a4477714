use crate::config::WorkerConfig;
use crate::dataset::DatasetError;
use crate::worker::controller::{ControllerState, RequestController};
use crate::worker::protocol::{WorkerRequest, WorkerResponse};

fn dataset() -> Vec<u8> {
    serde_json::json!({
        "glyphs": [
            { "c": "A", "n": "Latin Capital Letter A", "d": [65], "s": 0, "v": 0 },
            { "c": "B", "n": "Latin Capital Letter B", "d": [66], "s": 0 },
            { "c": "♥", "n": "Black Heart Suit", "k": ["love"], "e": ["hearts"], "d": [9829] },
            { "c": "e", "n": "Latin Small Letter E", "d": [101], "s": 0 },
            { "c": "\u{301}", "n": "Combining Acute Accent", "d": [769] },
            { "c": "é", "n": "Latin Small Letter E with Acute", "d": [101, 769] }
        ],
        "blocks": [
            { "n": "Basic Latin", "r": [0, 127] },
            { "n": "Combining Diacritical Marks", "r": [768, 879] },
            { "n": "Miscellaneous Symbols", "r": [9728, 9983] }
        ],
        "scripts": ["Latin"],
        "versions": ["1.1"]
    })
    .to_string()
    .into_bytes()
}

fn replacement_dataset() -> Vec<u8> {
    serde_json::json!({
        "glyphs": [
            { "c": "♠", "n": "Black Spade Suit", "d": [9824] }
        ],
        "blocks": [
            { "n": "Miscellaneous Symbols", "r": [9728, 9983] }
        ],
        "scripts": [],
        "versions": []
    })
    .to_string()
    .into_bytes()
}

fn ready_controller() -> RequestController {
    let mut controller = RequestController::new(WorkerConfig::default());
    controller.begin_load();
    controller.ingest_dataset(&dataset());
    controller
}

fn glyph_request(character: &str) -> WorkerRequest {
    WorkerRequest::GlyphRequest {
        character: character.to_string(),
    }
}

#[test]
fn test_starts_uninitialized() {
    let controller = RequestController::new(WorkerConfig::default());
    assert_eq!(controller.state(), ControllerState::Uninitialized);
    assert!(!controller.is_ready());
    assert!(!controller.is_loading());
    assert_eq!(controller.glyph_count(), 0);
    assert!(controller.last_error().is_none());
}

#[test]
fn test_begin_load_enters_loading() {
    let mut controller = RequestController::new(WorkerConfig::default());
    controller.begin_load();
    assert_eq!(controller.state(), ControllerState::Loading);
    assert!(controller.is_loading());
}

#[test]
fn test_successful_load_emits_ready_first() {
    let mut controller = RequestController::new(WorkerConfig::default());
    controller.begin_load();
    let responses = controller.ingest_dataset(&dataset());

    assert_eq!(controller.state(), ControllerState::Ready);
    assert_eq!(responses.len(), 1);
    match &responses[0] {
        WorkerResponse::WorkerReady {
            count,
            blocks,
            scripts,
        } => {
            assert_eq!(*count, 6);
            assert_eq!(
                blocks.first(),
                Some(&("basic-latin".to_string(), "Basic Latin".to_string()))
            );
            assert_eq!(blocks.len(), 3);
            assert_eq!(
                scripts.first(),
                Some(&("latin".to_string(), "Latin".to_string()))
            );
        }
        other => panic!("expected WORKER_READY, got {:?}", other),
    }
}

#[test]
fn test_requests_queue_until_ready_then_flush() {
    let mut controller = RequestController::new(WorkerConfig::default());
    assert!(controller.handle(glyph_request("A")).is_empty());
    controller.begin_load();
    assert!(controller
        .handle(WorkerRequest::QueryRequest {
            query: "heart".to_string(),
        })
        .is_empty());

    let responses = controller.ingest_dataset(&dataset());
    assert_eq!(responses.len(), 3);
    assert!(matches!(responses[0], WorkerResponse::WorkerReady { .. }));
    match &responses[1] {
        WorkerResponse::GlyphResponse { glyph, .. } => {
            assert_eq!(glyph.as_ref().map(|g| g.character.as_str()), Some("A"));
        }
        other => panic!("expected GLYPH_RESPONSE, got {:?}", other),
    }
    match &responses[2] {
        WorkerResponse::QueryResponse { results } => {
            assert!(results.iter().any(|r| r.character == "♥"));
        }
        other => panic!("expected QUERY_RESPONSE, got {:?}", other),
    }
}

#[test]
fn test_newest_request_of_a_kind_wins() {
    let mut controller = RequestController::new(WorkerConfig::default());
    controller.begin_load();
    controller.handle(glyph_request("A"));
    controller.handle(glyph_request("B"));

    let responses = controller.ingest_dataset(&dataset());
    let glyph_responses: Vec<_> = responses
        .iter()
        .filter_map(|response| match response {
            WorkerResponse::GlyphResponse { glyph, .. } => Some(glyph),
            _ => None,
        })
        .collect();
    assert_eq!(glyph_responses.len(), 1);
    assert_eq!(
        glyph_responses[0].as_ref().map(|g| g.character.as_str()),
        Some("B")
    );
}

#[test]
fn test_ready_requests_answered_inline() {
    let mut controller = ready_controller();
    let responses = controller.handle(WorkerRequest::BlockRequest {
        slug: "basic-latin".to_string(),
    });
    assert_eq!(responses.len(), 1);
    match &responses[0] {
        WorkerResponse::BlockResponse { block } => {
            let block = block.as_ref().expect("block should resolve");
            assert_eq!(block.name, "Basic Latin");
            assert_eq!(block.glyphs.len(), 3);
        }
        other => panic!("expected BLOCK_RESPONSE, got {:?}", other),
    }
}

#[test]
fn test_missing_lookups_answer_null() {
    let mut controller = ready_controller();

    match &controller.handle(WorkerRequest::BlockRequest {
        slug: "no-such-block".to_string(),
    })[0]
    {
        WorkerResponse::BlockResponse { block } => assert!(block.is_none()),
        other => panic!("expected BLOCK_RESPONSE, got {:?}", other),
    }

    match &controller.handle(glyph_request("Z"))[0] {
        WorkerResponse::GlyphResponse {
            glyph,
            block,
            ligature,
        } => {
            assert!(glyph.is_none());
            assert!(block.is_none());
            assert!(ligature.is_empty());
        }
        other => panic!("expected GLYPH_RESPONSE, got {:?}", other),
    }

    match &controller.handle(WorkerRequest::ScriptRequest {
        slug: "no-such-script".to_string(),
    })[0]
    {
        WorkerResponse::ScriptResponse { script } => assert!(script.is_none()),
        other => panic!("expected SCRIPT_RESPONSE, got {:?}", other),
    }
}

#[test]
fn test_glyph_answer_includes_block_and_decomposition() {
    let mut controller = ready_controller();

    match &controller.handle(glyph_request("A"))[0] {
        WorkerResponse::GlyphResponse {
            glyph,
            block,
            ligature,
        } => {
            assert_eq!(glyph.as_ref().map(|g| g.character.as_str()), Some("A"));
            assert_eq!(block.as_ref().map(|b| b.slug.as_str()), Some("basic-latin"));
            assert!(ligature.is_empty());
        }
        other => panic!("expected GLYPH_RESPONSE, got {:?}", other),
    }

    match &controller.handle(glyph_request("é"))[0] {
        WorkerResponse::GlyphResponse {
            glyph,
            block,
            ligature,
        } => {
            assert_eq!(glyph.as_ref().map(|g| g.character.as_str()), Some("é"));
            // Multi-codepoint records belong to no block.
            assert!(block.is_none());
            let parts: Vec<_> = ligature.iter().map(|r| r.character.as_str()).collect();
            assert_eq!(parts, vec!["e", "\u{301}"]);
        }
        other => panic!("expected GLYPH_RESPONSE, got {:?}", other),
    }
}

#[test]
fn test_query_answer_contains_matches() {
    let mut controller = ready_controller();
    match &controller.handle(WorkerRequest::QueryRequest {
        query: "heart".to_string(),
    })[0]
    {
        WorkerResponse::QueryResponse { results } => {
            assert!(results.iter().any(|r| r.character == "♥"));
        }
        other => panic!("expected QUERY_RESPONSE, got {:?}", other),
    }
}

#[test]
fn test_parse_failure_reports_error_and_allows_retry() {
    let mut controller = RequestController::new(WorkerConfig::default());
    controller.begin_load();
    let responses = controller.ingest_dataset(b"not json at all");

    assert_eq!(controller.state(), ControllerState::Uninitialized);
    assert_eq!(responses.len(), 1);
    match &responses[0] {
        WorkerResponse::WorkerError { message } => {
            assert!(message.contains("parse failed"));
        }
        other => panic!("expected WORKER_ERROR, got {:?}", other),
    }
    assert!(controller.last_error().is_some());

    controller.begin_load();
    let responses = controller.ingest_dataset(&dataset());
    assert!(matches!(responses[0], WorkerResponse::WorkerReady { .. }));
    assert_eq!(controller.state(), ControllerState::Ready);
}

#[test]
fn test_fetch_failure_reports_error() {
    let mut controller = RequestController::new(WorkerConfig::default());
    controller.begin_load();
    let error = DatasetError::Fetch("status 404".to_string());
    let responses = controller.fail_load(&error);

    assert_eq!(controller.state(), ControllerState::Uninitialized);
    match &responses[0] {
        WorkerResponse::WorkerError { message } => {
            assert!(message.contains("fetch failed"));
            assert!(message.contains("404"));
        }
        other => panic!("expected WORKER_ERROR, got {:?}", other),
    }
}

#[test]
fn test_failed_reload_keeps_previous_index() {
    let mut controller = ready_controller();
    controller.begin_load();
    let responses = controller.ingest_dataset(b"{broken");

    assert!(matches!(responses[0], WorkerResponse::WorkerError { .. }));
    assert_eq!(controller.state(), ControllerState::Ready);
    match &controller.handle(glyph_request("A"))[0] {
        WorkerResponse::GlyphResponse { glyph, .. } => {
            assert!(glyph.is_some());
        }
        other => panic!("expected GLYPH_RESPONSE, got {:?}", other),
    }
}

#[test]
fn test_failed_reload_answers_queued_requests() {
    let mut controller = ready_controller();
    controller.begin_load();
    assert!(controller.handle(glyph_request("A")).is_empty());
    assert!(controller
        .handle(WorkerRequest::QueryRequest {
            query: "heart".to_string(),
        })
        .is_empty());

    // The reload fails, so the previous index answers what was parked.
    let responses = controller.ingest_dataset(b"{broken");
    assert_eq!(controller.state(), ControllerState::Ready);
    assert_eq!(responses.len(), 3);
    assert!(matches!(responses[0], WorkerResponse::WorkerError { .. }));
    match &responses[1] {
        WorkerResponse::GlyphResponse { glyph, .. } => {
            assert_eq!(glyph.as_ref().map(|g| g.character.as_str()), Some("A"));
        }
        other => panic!("expected GLYPH_RESPONSE, got {:?}", other),
    }
    match &responses[2] {
        WorkerResponse::QueryResponse { results } => {
            assert!(results.iter().any(|r| r.character == "♥"));
        }
        other => panic!("expected QUERY_RESPONSE, got {:?}", other),
    }
}

#[test]
fn test_failed_reload_leaves_no_stale_pending() {
    let mut controller = ready_controller();
    controller.begin_load();
    controller.handle(glyph_request("A"));
    controller.ingest_dataset(b"{broken");

    // A newer request of the same kind is answered inline once ready again.
    match &controller.handle(glyph_request("B"))[0] {
        WorkerResponse::GlyphResponse { glyph, .. } => {
            assert_eq!(glyph.as_ref().map(|g| g.character.as_str()), Some("B"));
        }
        other => panic!("expected GLYPH_RESPONSE, got {:?}", other),
    }

    // The old glyph request must not replay under the next successful load.
    controller.begin_load();
    let responses = controller.ingest_dataset(&replacement_dataset());
    assert_eq!(responses.len(), 1);
    assert!(matches!(responses[0], WorkerResponse::WorkerReady { .. }));
}

#[test]
fn test_reload_replaces_dataset() {
    let mut controller = ready_controller();
    assert_eq!(controller.glyph_count(), 6);

    controller.begin_load();
    let responses = controller.ingest_dataset(&replacement_dataset());
    assert!(matches!(
        responses[0],
        WorkerResponse::WorkerReady { count: 1, .. }
    ));
    assert_eq!(controller.glyph_count(), 1);

    match &controller.handle(glyph_request("A"))[0] {
        WorkerResponse::GlyphResponse { glyph, .. } => assert!(glyph.is_none()),
        other => panic!("expected GLYPH_RESPONSE, got {:?}", other),
    }
    match &controller.handle(glyph_request("♠"))[0] {
        WorkerResponse::GlyphResponse { glyph, .. } => assert!(glyph.is_some()),
        other => panic!("expected GLYPH_RESPONSE, got {:?}", other),
    }
}

#[test]
fn test_counts_track_index() {
    let mut controller = RequestController::new(WorkerConfig::default());
    assert_eq!(controller.block_count(), 0);
    assert_eq!(controller.script_count(), 0);

    controller.begin_load();
    controller.ingest_dataset(&dataset());
    assert_eq!(controller.glyph_count(), 6);
    assert_eq!(controller.block_count(), 3);
    assert_eq!(controller.script_count(), 1);
    assert!(controller.last_summary().is_some());
}
