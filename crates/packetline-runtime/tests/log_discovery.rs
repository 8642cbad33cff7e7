use anyhow::Result;
use packetline_runtime::{Config, LogFormat, PacketLog, ReplayMode, discover_logs, replay};
use packetline_testing::fixtures::{self, write_log_values, write_packet_log};
use packetline_testing::packets;
use tempfile::TempDir;

#[test]
fn test_every_format_replays_the_same() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let session = packets::chat_session();
    let expected = replay(&session, ReplayMode::Batch);

    for format in [
        fixtures::LogFormat::JsonArray,
        fixtures::LogFormat::JsonLines,
        fixtures::LogFormat::Sse,
    ] {
        let path = write_packet_log(temp_dir.path(), "chat", &session, format)?;
        let log = PacketLog::load(&path)?;

        assert_eq!(log.packets, session, "{format:?}");
        assert_eq!(log.skipped, 0);
        assert_eq!(replay(&log.packets, ReplayMode::Incremental), expected);
    }
    Ok(())
}

#[test]
fn test_flat_agent_events_load() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_log_values(
        temp_dir.path(),
        "build",
        &packets::agent_session_values(),
        fixtures::LogFormat::JsonLines,
    )?;

    let log = PacketLog::load(&path)?;
    assert_eq!(log.format, LogFormat::JsonLines);
    assert_eq!(log.packets, packets::agent_session());
    Ok(())
}

#[test]
fn test_discover_logs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    write_packet_log(
        root,
        "a-chat",
        &packets::chat_session(),
        fixtures::LogFormat::JsonArray,
    )?;
    write_packet_log(
        &root.join("nested"),
        "b-scenario",
        &packets::scenario_packets(),
        fixtures::LogFormat::Sse,
    )?;
    std::fs::write(root.join("c-broken.json"), "[{\"type\": ")?;
    std::fs::write(root.join("d-empty.jsonl"), "\n\n")?;
    std::fs::write(root.join("notes.md"), "# not a log")?;

    let summaries = discover_logs(root, &Config::default())?;
    assert_eq!(summaries.len(), 2);

    let chat = &summaries[0];
    assert!(chat.path.ends_with("a-chat.json"));
    assert_eq!(chat.packet_count, 14);
    assert!(chat.stream_ended);
    assert_eq!(chat.stop_reason.as_deref(), Some("finished"));

    let scenario = &summaries[1];
    assert!(scenario.path.ends_with("nested/b-scenario.log"));
    assert_eq!(scenario.format, LogFormat::Sse);
    assert!(!scenario.stream_ended);
    assert_eq!(scenario.tool_names, vec!["Bash".to_string()]);
    Ok(())
}

#[test]
fn test_discover_respects_configured_extensions() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_packet_log(
        temp_dir.path(),
        "session",
        &packets::scenario_packets(),
        fixtures::LogFormat::JsonLines,
    )?;

    let mut config = Config::default();
    config.scan.extensions = vec!["ndjson".to_string()];
    assert!(discover_logs(temp_dir.path(), &config)?.is_empty());
    Ok(())
}
