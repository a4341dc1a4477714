use std::rc::Rc;

use crate::dataset::GlyphRecord;
use crate::worker::protocol::{RequestKind, WorkerRequest, WorkerResponse};

fn record(character: &str, name: &str) -> Rc<GlyphRecord> {
    Rc::new(GlyphRecord {
        character: character.to_string(),
        name: name.to_string(),
        keywords: None,
        entities: None,
        decimals: vec![65],
        utf32: vec!["00000041".to_string()],
        utf16: vec!["0041".to_string()],
        utf8: vec!["41".to_string()],
        block: Some("basic-latin".to_string()),
        script: None,
        version: None,
        ligatures: None,
    })
}

#[test]
fn test_parse_block_request() {
    let message = r#"{"type":"BLOCK_REQUEST","payload":{"slug":"basic-latin"}}"#;
    let request: WorkerRequest = serde_json::from_str(message).expect("should parse");
    assert_eq!(
        request,
        WorkerRequest::BlockRequest {
            slug: "basic-latin".to_string()
        }
    );
}

#[test]
fn test_parse_glyph_request_uses_char_key() {
    let message = r#"{"type":"GLYPH_REQUEST","payload":{"char":"♥"}}"#;
    let request: WorkerRequest = serde_json::from_str(message).expect("should parse");
    assert_eq!(
        request,
        WorkerRequest::GlyphRequest {
            character: "♥".to_string()
        }
    );
}

#[test]
fn test_parse_script_and_query_requests() {
    let script: WorkerRequest =
        serde_json::from_str(r#"{"type":"SCRIPT_REQUEST","payload":{"slug":"latin"}}"#)
            .expect("should parse");
    assert_eq!(script.kind(), RequestKind::Script);

    let query: WorkerRequest =
        serde_json::from_str(r#"{"type":"QUERY_REQUEST","payload":{"query":"heart"}}"#)
            .expect("should parse");
    assert_eq!(
        query,
        WorkerRequest::QueryRequest {
            query: "heart".to_string()
        }
    );
}

#[test]
fn test_unknown_type_is_rejected_not_fatal() {
    let message = r#"{"type":"SELF_DESTRUCT","payload":{}}"#;
    assert!(serde_json::from_str::<WorkerRequest>(message).is_err());
}

#[test]
fn test_missing_payload_is_rejected() {
    let message = r#"{"type":"BLOCK_REQUEST"}"#;
    assert!(serde_json::from_str::<WorkerRequest>(message).is_err());
}

#[test]
fn test_requests_round_trip() {
    let requests = vec![
        WorkerRequest::BlockRequest {
            slug: "basic-latin".to_string(),
        },
        WorkerRequest::GlyphRequest {
            character: "A".to_string(),
        },
        WorkerRequest::ScriptRequest {
            slug: "latin".to_string(),
        },
        WorkerRequest::QueryRequest {
            query: "heart".to_string(),
        },
    ];
    for request in requests {
        let encoded = serde_json::to_string(&request).expect("should serialize");
        let decoded: WorkerRequest = serde_json::from_str(&encoded).expect("should parse back");
        assert_eq!(decoded, request);
    }
}

#[test]
fn test_request_kind_mapping() {
    let request = WorkerRequest::GlyphRequest {
        character: "A".to_string(),
    };
    assert_eq!(request.kind(), RequestKind::Glyph);
    let request = WorkerRequest::BlockRequest {
        slug: "basic-latin".to_string(),
    };
    assert_eq!(request.kind(), RequestKind::Block);
}

#[test]
fn test_block_response_misses_serialize_as_null() {
    let response = WorkerResponse::BlockResponse { block: None };
    let value = serde_json::to_value(&response).expect("should serialize");
    assert_eq!(value["type"], "BLOCK_RESPONSE");
    assert!(value["payload"]["block"].is_null());
}

#[test]
fn test_glyph_response_wire_shape() {
    let response = WorkerResponse::GlyphResponse {
        glyph: Some(record("A", "Latin Capital Letter A")),
        block: None,
        ligature: Vec::new(),
    };
    let value = serde_json::to_value(&response).expect("should serialize");
    assert_eq!(value["type"], "GLYPH_RESPONSE");
    assert_eq!(value["payload"]["glyph"]["char"], "A");
    assert_eq!(value["payload"]["glyph"]["name"], "Latin Capital Letter A");
    // Absent optionals are skipped on records, null on payload slots.
    assert!(value["payload"]["glyph"].get("keywords").is_none());
    assert!(value["payload"]["block"].is_null());
    assert_eq!(value["payload"]["ligature"], serde_json::json!([]));
}

#[test]
fn test_query_response_carries_records_by_value() {
    let shared = record("A", "Latin Capital Letter A");
    let response = WorkerResponse::QueryResponse {
        results: vec![Rc::clone(&shared), shared],
    };
    let value = serde_json::to_value(&response).expect("should serialize");
    assert_eq!(value["type"], "QUERY_RESPONSE");
    assert_eq!(value["payload"]["results"][0]["char"], "A");
    assert_eq!(value["payload"]["results"][1]["char"], "A");
}

#[test]
fn test_ready_notification_wire_shape() {
    let response = WorkerResponse::WorkerReady {
        count: 2,
        blocks: vec![("basic-latin".to_string(), "Basic Latin".to_string())],
        scripts: vec![("latin".to_string(), "Latin".to_string())],
    };
    let value = serde_json::to_value(&response).expect("should serialize");
    assert_eq!(value["type"], "WORKER_READY");
    assert_eq!(value["payload"]["count"], 2);
    assert_eq!(
        value["payload"]["blocks"],
        serde_json::json!([["basic-latin", "Basic Latin"]])
    );
    assert_eq!(
        value["payload"]["scripts"],
        serde_json::json!([["latin", "Latin"]])
    );
}

#[test]
fn test_error_notification_wire_shape() {
    let response = WorkerResponse::WorkerError {
        message: "dataset fetch failed: status 404".to_string(),
    };
    let value = serde_json::to_value(&response).expect("should serialize");
    assert_eq!(value["type"], "WORKER_ERROR");
    assert_eq!(value["payload"]["message"], "dataset fetch failed: status 404");
}
