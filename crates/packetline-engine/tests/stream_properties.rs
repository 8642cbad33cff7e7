use packetline_engine::{ProcessingContext, build_snapshot, process_packet, process_packets};
use packetline_testing::packets::{self, at};
use packetline_types::{Citation, GroupKey, Packet};
use serde_json::json;

fn fold_batch(packets: &[Packet]) -> ProcessingContext {
    let mut ctx = ProcessingContext::new();
    process_packets(&mut ctx, packets);
    ctx
}

#[test]
fn test_incremental_equals_batch() {
    for session in [
        packets::scenario_packets(),
        packets::chat_session(),
        packets::agent_session(),
    ] {
        let batch = fold_batch(&session);

        let mut growing = ProcessingContext::new();
        for end in 1..=session.len() {
            process_packets(&mut growing, &session[..end]);
        }
        assert_eq!(growing, batch);

        let mut single = ProcessingContext::new();
        for packet in &session {
            process_packet(&mut single, packet);
        }
        assert_eq!(build_snapshot(&single), build_snapshot(&batch));
    }
}

#[test]
fn test_repeated_batch_calls_are_noops() {
    let session = packets::chat_session();
    let mut ctx = fold_batch(&session);
    let before = ctx.clone();

    process_packets(&mut ctx, &session);
    assert_eq!(ctx, before);
}

#[test]
fn test_second_stop_is_noop() {
    let mut once = ProcessingContext::new();
    let mut twice = ProcessingContext::new();
    let head = [packets::message_start(0), packets::message_delta(0, "Done.")];

    for packet in head.iter().chain([&packets::stop(0, "finished")]) {
        process_packet(&mut once, packet);
    }
    for packet in head
        .iter()
        .chain([&packets::stop(0, "finished"), &packets::stop(0, "cancelled")])
    {
        process_packet(&mut twice, packet);
    }

    assert_eq!(once, twice);
    assert!(twice.stream_ended);
    assert_eq!(twice.stop_reason.as_deref(), Some("finished"));
}

#[test]
fn test_citations_dedup_by_document() {
    let ctx = fold_batch(&[
        packets::message_start(0),
        packets::citation(0, 1, "A"),
        packets::citation(0, 2, "A"),
        packets::citation(0, 3, "B"),
    ]);

    assert_eq!(
        ctx.citations,
        vec![
            Citation {
                citation_number: 1,
                document_id: "A".to_string()
            },
            Citation {
                citation_number: 3,
                document_id: "B".to_string()
            },
        ]
    );
    assert_eq!(ctx.citation_map.len(), 3);
    assert_eq!(ctx.citation_map[&2], "A");
}

#[test]
fn test_turn_transition_closes_previous_groups() {
    let mut ctx = fold_batch(&[
        packets::message_start(0),
        packets::message_delta(0, "partial"),
        packets::search_start(0, 1, false),
    ]);
    assert!(ctx.closed_groups.is_empty());

    process_packet(&mut ctx, &packets::message_start(1));

    for key in [GroupKey::new(0, 0), GroupKey::new(0, 1)] {
        assert!(ctx.closed_groups.contains(&key));
        let last = ctx.grouped_packets[&key].last().unwrap();
        assert!(last.is_synthetic());
        assert_eq!(last.type_str(), "section_end");
    }
    assert!(!ctx.closed_groups.contains(&GroupKey::new(1, 0)));
}

#[test]
fn test_explicit_end_marker_is_not_duplicated() {
    let ctx = fold_batch(&[
        packets::message_start(0),
        packets::section_end(0, 0),
        packets::message_start(1),
    ]);

    let group = &ctx.grouped_packets[&GroupKey::new(0, 0)];
    assert_eq!(group.len(), 2);
    assert!(!group[1].is_synthetic());
}

#[test]
fn test_shrinking_sequence_resets() {
    let long = packets::chat_session();
    let short = packets::scenario_packets();

    let mut ctx = ProcessingContext::new();
    process_packets(&mut ctx, &long[..5]);
    assert_eq!(ctx.last_processed_index, 5);

    process_packets(&mut ctx, &short);
    assert_eq!(ctx, fold_batch(&short));
    assert!(ctx.documents.is_empty());
}

#[test]
fn test_scenario_tool_then_message() {
    let ctx = fold_batch(&packets::scenario_packets());
    let snapshot = build_snapshot(&ctx);

    assert_eq!(snapshot.tool_groups.len(), 1);
    let tool_group = &snapshot.tool_groups[0];
    assert_eq!(tool_group.key(), GroupKey::new(0, 0));
    assert_eq!(tool_group.tool_calls()[0].title, "Running command");
    assert_eq!(tool_group.tool_calls()[0].output, "ok");

    assert_eq!(snapshot.display_groups.len(), 1);
    assert_eq!(snapshot.display_groups[0].key(), GroupKey::new(1, 0));

    assert!(ctx.closed_groups.contains(&GroupKey::new(0, 0)));
    assert_eq!(snapshot.unique_tool_names, vec!["Bash".to_string()]);
}

#[test]
fn test_branching_declaration_is_metadata() {
    let ctx = fold_batch(&packets::chat_session());

    assert_eq!(ctx.expected_branches.get(&0), Some(&2));
    assert!(
        ctx.grouped_packets
            .values()
            .flatten()
            .all(|packet| packet.type_str() != "top_level_branching")
    );
}

#[test]
fn test_chat_session_snapshot() {
    let snapshot = build_snapshot(&fold_batch(&packets::chat_session()));

    let tool_keys: Vec<GroupKey> = snapshot.tool_groups.iter().map(|g| g.key()).collect();
    assert_eq!(tool_keys, vec![GroupKey::new(0, 0), GroupKey::new(0, 1)]);

    let display_keys: Vec<GroupKey> = snapshot.display_groups.iter().map(|g| g.key()).collect();
    assert_eq!(
        display_keys,
        vec![
            GroupKey::new(0, 0),
            GroupKey::new(0, 1),
            GroupKey::new(1, 0),
            GroupKey::new(2, 0)
        ]
    );

    assert_eq!(
        snapshot.unique_tool_names,
        vec!["Internal Search".to_string(), "Web Search".to_string()]
    );
    assert_eq!(snapshot.documents.len(), 3);
    assert_eq!(snapshot.citations.len(), 2);
    assert!(snapshot.stream_ended);
    assert!(snapshot.final_answer_coming);
    assert_eq!(snapshot.stop_reason.as_deref(), Some("finished"));
    assert!(snapshot.display_groups.iter().all(|g| g.is_complete()));
}

#[test]
fn test_tool_after_message_clears_final_answer() {
    let mut ctx = fold_batch(&[packets::message_start(0), packets::message_delta(0, "Let me")]);
    assert!(ctx.final_answer_coming);

    process_packet(&mut ctx, &at(1, 0, json!({"type": "reasoning_start"})));
    assert!(ctx.final_answer_coming);

    process_packet(&mut ctx, &packets::tool_call_start(2, 0, "c1", "read"));
    assert!(!ctx.final_answer_coming);
}

#[test]
fn test_tool_after_stop_keeps_final_answer() {
    let mut ctx = fold_batch(&[packets::message_start(0), packets::stop(0, "finished")]);
    process_packet(&mut ctx, &packets::tool_call_start(1, 0, "c1", "read"));

    assert!(ctx.final_answer_coming);
    assert!(ctx.stream_ended);
}

#[test]
fn test_agent_session_snapshot() {
    let snapshot = build_snapshot(&fold_batch(&packets::agent_session()));

    assert_eq!(snapshot.tool_groups.len(), 1);
    assert!(snapshot.display_groups.is_empty());
    assert_eq!(snapshot.unique_tool_names, vec!["Write".to_string()]);
    assert_eq!(snapshot.artifacts.len(), 1);
    assert_eq!(snapshot.stop_reason.as_deref(), Some("end_turn"));

    let calls = snapshot.tool_groups[0].tool_calls();
    insta::assert_json_snapshot!(calls[0], @r#"
    {
      "tool_call_id": "t1",
      "tool_name": "write",
      "kind": "edit",
      "status": "completed",
      "title": "Writing file",
      "description": "outputs/web/page.tsx",
      "command": "",
      "output": "",
      "file_path": "outputs/web/page.tsx",
      "diff": {
        "path": "outputs/web/page.tsx",
        "old_text": "",
        "new_text": "export default function Page() {}",
        "is_new_file": true
      }
    }
    "#);
}

#[test]
fn test_error_packet_is_surfaced() {
    let snapshot = build_snapshot(&fold_batch(&[
        packets::message_start(0),
        packets::error(0, "context window exceeded"),
    ]));

    assert_eq!(snapshot.errors.len(), 1);
    assert_eq!(snapshot.errors[0].message, "context window exceeded");
    assert!(!snapshot.stream_ended);
}
