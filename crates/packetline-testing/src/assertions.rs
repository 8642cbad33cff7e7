//! Assertions over snapshot JSON as printed by `packetline replay`.

use anyhow::{Context, Result};
use serde_json::Value;

fn group_keys(json: &Value, field: &str) -> Result<Vec<(u64, u64)>> {
    let groups = json[field]
        .as_array()
        .with_context(|| format!("Expected '{field}' array in snapshot JSON"))?;

    groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let turn = group["turn_index"]
                .as_u64()
                .with_context(|| format!("{field}[{i}] missing turn_index"))?;
            let tab = group["tab_index"]
                .as_u64()
                .with_context(|| format!("{field}[{i}] missing tab_index"))?;
            Ok((turn, tab))
        })
        .collect()
}

/// Assert the (turn, tab) keys of the tool groups, in order.
pub fn assert_tool_groups(json: &Value, expected: &[(u64, u64)]) -> Result<()> {
    let actual = group_keys(json, "tool_groups")?;
    if actual != expected {
        anyhow::bail!("Expected tool groups {:?}, got {:?}", expected, actual);
    }
    Ok(())
}

/// Assert the (turn, tab) keys of the display groups, in order.
pub fn assert_display_groups(json: &Value, expected: &[(u64, u64)]) -> Result<()> {
    let actual = group_keys(json, "display_groups")?;
    if actual != expected {
        anyhow::bail!("Expected display groups {:?}, got {:?}", expected, actual);
    }
    Ok(())
}

/// Assert that the snapshot reports the stream as ended.
pub fn assert_stream_ended(json: &Value) -> Result<()> {
    let ended = json["stream_ended"]
        .as_bool()
        .context("Expected 'stream_ended' flag in snapshot JSON")?;
    if !ended {
        anyhow::bail!("Expected stream to be ended");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assert_tool_groups() {
        let json = json!({
            "tool_groups": [
                {"turn_index": 0, "tab_index": 0},
                {"turn_index": 0, "tab_index": 1}
            ]
        });

        assert!(assert_tool_groups(&json, &[(0, 0), (0, 1)]).is_ok());
        assert!(assert_tool_groups(&json, &[(0, 0)]).is_err());
        assert!(assert_display_groups(&json, &[]).is_err());
    }

    #[test]
    fn test_assert_stream_ended() {
        assert!(assert_stream_ended(&json!({"stream_ended": true})).is_ok());
        assert!(assert_stream_ended(&json!({"stream_ended": false})).is_err());
        assert!(assert_stream_ended(&json!({})).is_err());
    }
}
