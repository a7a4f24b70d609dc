//! Tests for the message reducer.

use super::*;
use crate::model::{Frame, StreamErrorInfo, UsageInfo};
use crate::parser::decode_frame;
use serde_json::{json, Value};

/// Decode payload values into events with ids 0..n.
fn events(payloads: &[Value]) -> Vec<SseEvent> {
    payloads
        .iter()
        .zip(0u64..)
        .map(|(payload, ordinal)| {
            decode_frame(Frame::new("", payload.to_string()), EventId::new(ordinal))
        })
        .collect()
}

fn raw_event(payload: &str, ordinal: u64) -> SseEvent {
    decode_frame(Frame::new("", payload), EventId::new(ordinal))
}

fn block_start(index: usize, block_type: &str) -> Value {
    json!({"type": "content_block_start", "index": index, "content_block": {"type": block_type}})
}

fn text_delta(index: usize, text: &str) -> Value {
    json!({"type": "content_block_delta", "index": index, "delta": {"type": "text_delta", "text": text}})
}

fn thinking_delta(index: usize, thinking: &str) -> Value {
    json!({"type": "content_block_delta", "index": index, "delta": {"type": "thinking_delta", "thinking": thinking}})
}

fn block_stop(index: usize) -> Value {
    json!({"type": "content_block_stop", "index": index})
}

fn diagnostic_kinds(reconstruction: &Reconstruction) -> Vec<&DiagnosticKind> {
    reconstruction.diagnostics.iter().map(|d| &d.kind).collect()
}

// ===== Core fold =====

#[test]
fn empty_sequence_yields_empty_state() {
    let state = reconstruct_message(&[]);
    assert!(state.is_empty());
    assert_eq!(state.model(), None);
    assert_eq!(state.usage(), None);
    assert_eq!(state.stop_reason(), None);
    assert_eq!(state.block_count(), 0);
}

#[test]
fn thinking_accumulates_across_deltas() {
    let state = reconstruct_message(&events(&[
        json!({"type": "message_start", "message": {"model": "claude-haiku-4-5-20251001", "usage": {"input_tokens": 9, "output_tokens": 1}}}),
        json!({"type": "content_block_start", "index": 0, "content_block": {"type": "thinking", "thinking": "", "signature": ""}}),
        thinking_delta(0, "用"),
        thinking_delta(0, "户"),
        thinking_delta(0, "请求"),
        block_stop(0),
        json!({"type": "message_stop"}),
    ]));

    assert_eq!(state.model(), Some("claude-haiku-4-5-20251001"));
    assert_eq!(state.block_count(), 1);
    let block = state.block(0).expect("thinking block");
    assert_eq!(block.type_name(), "thinking");
    assert_eq!(block.content(), Some("用户请求"));
    assert!(block.is_closed());
}

#[test]
fn message_start_sets_metadata_without_blocks() {
    let state = reconstruct_message(&events(&[json!({
        "type": "message_start",
        "message": {
            "id": "msg_1",
            "role": "assistant",
            "model": "claude-haiku-4-5-20251001",
            "content": [{"type": "text", "text": "ignored"}],
            "stop_reason": "end_turn"
        }
    })]));

    assert_eq!(state.id(), Some("msg_1"));
    assert_eq!(state.role(), Some("assistant"));
    assert_eq!(state.model(), Some("claude-haiku-4-5-20251001"));
    assert_eq!(state.block_count(), 0);
    assert_eq!(state.stop_reason(), None);
    assert_eq!(state.usage(), None);
}

#[test]
fn tool_use_input_accumulates_raw_json() {
    let state = reconstruct_message(&events(&[
        json!({"type": "content_block_start", "index": 1, "content_block": {"type": "tool_use", "id": "toolu_1", "name": "Read", "input": {}}}),
        json!({"type": "content_block_delta", "index": 1, "delta": {"type": "input_json_delta", "partial_json": "{\"file_path\": "}}),
        json!({"type": "content_block_delta", "index": 1, "delta": {"type": "input_json_delta", "partial_json": "\"/src/Hello.java\"}"}}),
        block_stop(1),
    ]));

    let block = state.block(1).expect("tool block");
    assert_eq!(block.tool_name(), Some("Read"));
    assert_eq!(block.input_json(), Some("{\"file_path\": \"/src/Hello.java\"}"));
    assert_eq!(
        block.parsed_input().map(Result::ok),
        Some(Some(json!({"file_path": "/src/Hello.java"})))
    );
}

#[test]
fn signature_delta_appends_to_thinking_signature() {
    let state = reconstruct_message(&events(&[
        block_start(0, "thinking"),
        json!({"type": "content_block_delta", "index": 0, "delta": {"type": "signature_delta", "signature": "EtQC"}}),
        json!({"type": "content_block_delta", "index": 0, "delta": {"type": "signature_delta", "signature": "CkYI"}}),
    ]));

    assert_eq!(state.block(0).and_then(|b| b.signature()), Some("EtQCCkYI"));
    assert_eq!(state.block(0).and_then(|b| b.content()), Some(""));
}

#[test]
fn blocks_are_addressed_by_index_not_arrival() {
    let state = reconstruct_message(&events(&[
        block_start(2, "text"),
        block_start(0, "thinking"),
        text_delta(2, "visible"),
        thinking_delta(0, "hidden"),
    ]));

    let indices: Vec<usize> = state.block_indices().collect();
    assert_eq!(indices, vec![0, 2]);
    assert_eq!(state.block(2).and_then(|b| b.content()), Some("visible"));
    assert_eq!(state.block(0).and_then(|b| b.content()), Some("hidden"));
}

#[test]
fn delta_for_absent_index_creates_nothing() {
    let state = reconstruct_message(&events(&[text_delta(5, "orphan")]));
    assert_eq!(state.block_count(), 0);
}

#[test]
fn stop_for_absent_index_creates_nothing() {
    let state = reconstruct_message(&events(&[block_stop(3)]));
    assert_eq!(state.block_count(), 0);
}

#[test]
fn mismatched_delta_is_ignored() {
    let state = reconstruct_message(&events(&[
        block_start(0, "thinking"),
        text_delta(0, "wrong"),
        thinking_delta(0, "right"),
    ]));

    assert_eq!(state.block(0).and_then(|b| b.content()), Some("right"));
}

#[test]
fn delta_after_block_stop_is_still_appended() {
    let state = reconstruct_message(&events(&[
        block_start(0, "text"),
        text_delta(0, "a"),
        block_stop(0),
        text_delta(0, "b"),
    ]));

    let block = state.block(0).expect("text block");
    assert_eq!(block.content(), Some("ab"));
    assert!(block.is_closed());
}

#[test]
fn repeated_start_replaces_block() {
    let state = reconstruct_message(&events(&[
        block_start(0, "text"),
        text_delta(0, "first"),
        block_start(0, "thinking"),
        thinking_delta(0, "second"),
    ]));

    let block = state.block(0).expect("replaced block");
    assert_eq!(block.type_name(), "thinking");
    assert_eq!(block.content(), Some("second"));
    assert_eq!(state.block_count(), 1);
}

#[test]
fn unknown_block_type_is_kept_without_accumulators() {
    let state = reconstruct_message(&events(&[
        block_start(0, "redacted_thinking"),
        thinking_delta(0, "x"),
        block_stop(0),
    ]));

    let block = state.block(0).expect("other block");
    assert_eq!(block.type_name(), "redacted_thinking");
    assert_eq!(block.content(), None);
    assert!(block.is_closed());
}

#[test]
fn message_delta_overwrites_present_fields_only() {
    let state = reconstruct_message(&events(&[
        json!({"type": "message_start", "message": {"model": "m", "usage": {"input_tokens": 9, "cache_read_input_tokens": 13370, "output_tokens": 1}}}),
        json!({"type": "message_delta", "delta": {"stop_reason": "tool_use", "stop_sequence": null}, "usage": {"output_tokens": 42}}),
        json!({"type": "message_delta", "delta": {"stop_reason": null}, "usage": {"output_tokens": null}}),
    ]));

    assert_eq!(state.stop_reason(), Some("tool_use"));
    assert_eq!(state.stop_sequence(), None);
    assert_eq!(
        state.usage(),
        Some(&UsageInfo {
            input_tokens: Some(9),
            output_tokens: Some(42),
            cache_creation_input_tokens: None,
            cache_read_input_tokens: Some(13370),
        })
    );
}

#[test]
fn message_start_with_mistyped_usage_counter_keeps_model() {
    let reconstruction = reconstruct_with(
        &events(&[json!({"type": "message_start", "message": {"model": "m", "usage": {"input_tokens": 9.0, "output_tokens": 1}}})]),
        Strictness::Strict,
    );

    assert!(reconstruction.is_clean());
    assert_eq!(reconstruction.state.model(), Some("m"));
    assert_eq!(
        reconstruction.state.usage(),
        Some(&UsageInfo {
            output_tokens: Some(1),
            ..UsageInfo::default()
        })
    );
}

#[test]
fn message_delta_with_null_delta_still_merges_usage() {
    let state = reconstruct_message(&events(&[
        json!({"type": "message_start", "message": {"model": "m", "usage": {"input_tokens": 9}}}),
        json!({"type": "message_delta", "delta": null, "usage": {"output_tokens": 5}}),
    ]));

    assert_eq!(state.stop_reason(), None);
    assert_eq!(
        state.usage(),
        Some(&UsageInfo {
            input_tokens: Some(9),
            output_tokens: Some(5),
            ..UsageInfo::default()
        })
    );
}

#[test]
fn events_after_message_stop_still_fold() {
    let state = reconstruct_message(&events(&[
        json!({"type": "message_stop"}),
        block_start(0, "text"),
        text_delta(0, "late"),
        json!({"type": "message_delta", "delta": {"stop_reason": "end_turn"}}),
    ]));

    assert_eq!(state.block(0).and_then(|b| b.content()), Some("late"));
    assert_eq!(state.stop_reason(), Some("end_turn"));
}

#[test]
fn error_event_is_recorded() {
    let state = reconstruct_message(&events(&[
        json!({"type": "ping"}),
        json!({"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}}),
    ]));

    assert_eq!(
        state.error(),
        Some(&StreamErrorInfo {
            error_type: "overloaded_error".to_string(),
            message: "Overloaded".to_string(),
        })
    );
    assert_eq!(state.block_count(), 0);
}

#[test]
fn dispatch_uses_payload_type_not_frame_name() {
    let event = decode_frame(
        Frame::new("message_stop", block_start(0, "text").to_string()),
        EventId::new(0),
    );
    let state = reconstruct_message(&[event]);
    assert_eq!(state.block_count(), 1);
}

#[test]
fn malformed_and_unrecognized_events_are_no_ops() {
    let sequence = vec![
        raw_event("{not json", 0),
        raw_event("{\"type\":\"future_kind\",\"index\":0}", 1),
        raw_event("{\"type\":\"content_block_start\"}", 2),
        raw_event("[]", 3),
    ];
    let state = reconstruct_message(&sequence);
    assert_eq!(state, MessageState::new());
}

#[test]
fn fold_is_order_sensitive() {
    let start = block_start(0, "text");
    let delta = text_delta(0, "x");

    let forward = reconstruct_message(&events(&[start.clone(), delta.clone()]));
    let reversed = reconstruct_message(&events(&[delta, start]));

    assert_eq!(forward.block(0).and_then(|b| b.content()), Some("x"));
    assert_eq!(reversed.block(0).and_then(|b| b.content()), Some(""));
}

#[test]
fn incremental_apply_matches_batch() {
    let sequence = events(&[
        block_start(0, "text"),
        text_delta(0, "he"),
        text_delta(0, "llo"),
        json!({"type": "message_stop"}),
    ]);

    let mut reducer = MessageReducer::new(Strictness::Lenient);
    for (seen, event) in sequence.iter().enumerate() {
        reducer.apply(event);
        if seen == 1 {
            assert_eq!(reducer.state().block(0).and_then(|b| b.content()), Some("he"));
            assert!(!reducer.is_stopped());
        }
    }
    assert!(reducer.is_stopped());

    assert_eq!(reducer.finish().state, reconstruct_message(&sequence));
}

// ===== Strictness =====

#[test]
fn lenient_collects_no_diagnostics() {
    let reconstruction = reconstruct_with(
        &events(&[text_delta(0, "orphan"), json!({"type": "mystery"})]),
        Strictness::Lenient,
    );
    assert!(reconstruction.is_clean());
}

#[test]
fn strict_reports_each_tolerated_event() {
    let mut sequence = events(&[
        block_start(0, "thinking"),
        text_delta(0, "mismatch"),
        text_delta(4, "orphan"),
        block_stop(0),
        thinking_delta(0, "late"),
        block_start(0, "thinking"),
        block_stop(9),
        json!({"type": "message_stop"}),
        json!({"type": "ping"}),
        json!({"type": "message_delta", "delta": {"stop_reason": "end_turn"}}),
        json!({"type": "mystery"}),
    ]);
    sequence.push(raw_event("{broken", 11));

    let reconstruction = reconstruct_with(&sequence, Strictness::Strict);
    let kinds = diagnostic_kinds(&reconstruction);

    assert_eq!(kinds.len(), 8, "diagnostics: {:?}", reconstruction.diagnostics);
    assert_eq!(
        kinds[0],
        &DiagnosticKind::DeltaTypeMismatch {
            index: 0,
            block_type: "thinking".to_string(),
            delta_type: "text_delta",
        }
    );
    assert_eq!(
        kinds[1],
        &DiagnosticKind::MissingBlock {
            index: 4,
            event: "content_block_delta",
        }
    );
    assert_eq!(kinds[2], &DiagnosticKind::DeltaAfterStop { index: 0 });
    assert_eq!(kinds[3], &DiagnosticKind::DuplicateBlockStart { index: 0 });
    assert_eq!(
        kinds[4],
        &DiagnosticKind::MissingBlock {
            index: 9,
            event: "content_block_stop",
        }
    );
    assert_eq!(
        kinds[5],
        &DiagnosticKind::EventAfterStop {
            event: "message_delta",
        }
    );
    assert_eq!(
        kinds[6],
        &DiagnosticKind::UnrecognizedKind {
            kind: Some("mystery".to_string()),
        }
    );
    assert!(matches!(kinds[7], DiagnosticKind::MalformedPayload { .. }));

    let ids: Vec<u64> = reconstruction
        .diagnostics
        .iter()
        .map(|d| d.event_id.get())
        .collect();
    assert_eq!(ids, vec![1, 2, 4, 5, 6, 9, 10, 11]);
}

#[test]
fn strict_reports_invalid_shape_with_tag() {
    let reconstruction = reconstruct_with(
        &[raw_event("{\"type\":\"content_block_delta\",\"delta\":{}}", 0)],
        Strictness::Strict,
    );

    match diagnostic_kinds(&reconstruction).as_slice() {
        [DiagnosticKind::InvalidEvent { kind, reason }] => {
            assert_eq!(kind.as_deref(), Some("content_block_delta"));
            assert!(!reason.is_empty());
        }
        other => panic!("Expected one InvalidEvent, got {:?}", other),
    }
}

#[test]
fn strictness_does_not_change_state() {
    let sequence = events(&[
        json!({"type": "message_start", "message": {"model": "m"}}),
        block_start(0, "text"),
        text_delta(0, "a"),
        text_delta(3, "orphan"),
        block_stop(0),
        text_delta(0, "b"),
        json!({"type": "message_stop"}),
        json!({"type": "message_delta", "usage": {"output_tokens": 3}}),
    ]);

    let lenient = reconstruct_with(&sequence, Strictness::Lenient);
    let strict = reconstruct_with(&sequence, Strictness::Strict);

    assert_eq!(lenient.state, strict.state);
    assert!(lenient.is_clean());
    assert!(!strict.is_clean());
}

#[test]
fn strictness_parses_from_str() {
    assert_eq!("strict".parse::<Strictness>(), Ok(Strictness::Strict));
    assert_eq!(" Lenient ".parse::<Strictness>(), Ok(Strictness::Lenient));
    assert_eq!("true".parse::<Strictness>(), Ok(Strictness::Strict));
    assert_eq!("0".parse::<Strictness>(), Ok(Strictness::Lenient));
    assert!("sometimes".parse::<Strictness>().is_err());
}

#[test]
fn strictness_from_flag_and_display() {
    assert_eq!(Strictness::from_flag(true), Strictness::Strict);
    assert_eq!(Strictness::from_flag(false), Strictness::Lenient);
    assert_eq!(Strictness::default(), Strictness::Lenient);
    assert_eq!(Strictness::Strict.to_string(), "strict");
}
