use std::fmt;

/// Packet discriminator carried in the payload's `type` field.
///
/// Covers both the chat streaming protocol (`message_start`, `search_tool_start`, ...)
/// and the agent client protocol events forwarded by the build backend
/// (`agent_message_chunk`, `tool_call_progress`, ...). Anything else lands in
/// `Unknown` so new upstream packet types never break dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PacketType {
    // Control
    SectionEnd,
    Stop,
    TopLevelBranching,
    Error,

    // Final answer
    MessageStart,
    MessageDelta,

    // Chat tools
    SearchToolStart,
    SearchToolQueriesDelta,
    SearchToolDocumentsDelta,
    OpenUrlStart,
    OpenUrlUrls,
    OpenUrlDocuments,
    ImageGenerationStart,
    ImageGenerationHeartbeat,
    ImageGenerationFinal,
    PythonToolStart,
    PythonToolDelta,
    CustomToolStart,
    CustomToolDelta,

    // Reasoning
    ReasoningStart,
    ReasoningDelta,
    ReasoningDone,

    CitationInfo,

    // Deep research
    DeepResearchPlanStart,
    DeepResearchPlanDelta,
    ResearchAgentStart,
    IntermediateReportStart,
    IntermediateReportDelta,
    IntermediateReportCitedDocs,

    // Agent client protocol (build mode)
    AgentMessageChunk,
    AgentThoughtChunk,
    /// Persisted form of accumulated message chunks
    AgentMessage,
    /// Persisted form of accumulated thought chunks
    AgentThought,
    ToolCallStart,
    ToolCallProgress,
    AgentPlanUpdate,
    CurrentModeUpdate,
    PromptResponse,
    ArtifactCreated,

    Unknown(String),
}

impl PacketType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "section_end" => Self::SectionEnd,
            "stop" => Self::Stop,
            "top_level_branching" => Self::TopLevelBranching,
            "error" => Self::Error,
            "message_start" => Self::MessageStart,
            "message_delta" => Self::MessageDelta,
            "search_tool_start" => Self::SearchToolStart,
            "search_tool_queries_delta" => Self::SearchToolQueriesDelta,
            "search_tool_documents_delta" => Self::SearchToolDocumentsDelta,
            "open_url_start" => Self::OpenUrlStart,
            "open_url_urls" => Self::OpenUrlUrls,
            "open_url_documents" => Self::OpenUrlDocuments,
            "image_generation_start" => Self::ImageGenerationStart,
            "image_generation_heartbeat" => Self::ImageGenerationHeartbeat,
            "image_generation_final" => Self::ImageGenerationFinal,
            "python_tool_start" => Self::PythonToolStart,
            "python_tool_delta" => Self::PythonToolDelta,
            "custom_tool_start" => Self::CustomToolStart,
            "custom_tool_delta" => Self::CustomToolDelta,
            "reasoning_start" => Self::ReasoningStart,
            "reasoning_delta" => Self::ReasoningDelta,
            "reasoning_done" => Self::ReasoningDone,
            "citation_info" => Self::CitationInfo,
            "deep_research_plan_start" => Self::DeepResearchPlanStart,
            "deep_research_plan_delta" => Self::DeepResearchPlanDelta,
            "research_agent_start" => Self::ResearchAgentStart,
            "intermediate_report_start" => Self::IntermediateReportStart,
            "intermediate_report_delta" => Self::IntermediateReportDelta,
            "intermediate_report_cited_docs" => Self::IntermediateReportCitedDocs,
            "agent_message_chunk" => Self::AgentMessageChunk,
            "agent_thought_chunk" => Self::AgentThoughtChunk,
            "agent_message" => Self::AgentMessage,
            "agent_thought" => Self::AgentThought,
            "tool_call_start" => Self::ToolCallStart,
            "tool_call_progress" => Self::ToolCallProgress,
            "agent_plan_update" => Self::AgentPlanUpdate,
            "current_mode_update" => Self::CurrentModeUpdate,
            "prompt_response" => Self::PromptResponse,
            "artifact_created" => Self::ArtifactCreated,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SectionEnd => "section_end",
            Self::Stop => "stop",
            Self::TopLevelBranching => "top_level_branching",
            Self::Error => "error",
            Self::MessageStart => "message_start",
            Self::MessageDelta => "message_delta",
            Self::SearchToolStart => "search_tool_start",
            Self::SearchToolQueriesDelta => "search_tool_queries_delta",
            Self::SearchToolDocumentsDelta => "search_tool_documents_delta",
            Self::OpenUrlStart => "open_url_start",
            Self::OpenUrlUrls => "open_url_urls",
            Self::OpenUrlDocuments => "open_url_documents",
            Self::ImageGenerationStart => "image_generation_start",
            Self::ImageGenerationHeartbeat => "image_generation_heartbeat",
            Self::ImageGenerationFinal => "image_generation_final",
            Self::PythonToolStart => "python_tool_start",
            Self::PythonToolDelta => "python_tool_delta",
            Self::CustomToolStart => "custom_tool_start",
            Self::CustomToolDelta => "custom_tool_delta",
            Self::ReasoningStart => "reasoning_start",
            Self::ReasoningDelta => "reasoning_delta",
            Self::ReasoningDone => "reasoning_done",
            Self::CitationInfo => "citation_info",
            Self::DeepResearchPlanStart => "deep_research_plan_start",
            Self::DeepResearchPlanDelta => "deep_research_plan_delta",
            Self::ResearchAgentStart => "research_agent_start",
            Self::IntermediateReportStart => "intermediate_report_start",
            Self::IntermediateReportDelta => "intermediate_report_delta",
            Self::IntermediateReportCitedDocs => "intermediate_report_cited_docs",
            Self::AgentMessageChunk => "agent_message_chunk",
            Self::AgentThoughtChunk => "agent_thought_chunk",
            Self::AgentMessage => "agent_message",
            Self::AgentThought => "agent_thought",
            Self::ToolCallStart => "tool_call_start",
            Self::ToolCallProgress => "tool_call_progress",
            Self::AgentPlanUpdate => "agent_plan_update",
            Self::CurrentModeUpdate => "current_mode_update",
            Self::PromptResponse => "prompt_response",
            Self::ArtifactCreated => "artifact_created",
            Self::Unknown(raw) => raw,
        }
    }

    /// Explicit end-of-group marker
    pub fn is_terminal_marker(&self) -> bool {
        matches!(self, Self::SectionEnd)
    }

    /// Whole-stream terminal packet
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop | Self::PromptResponse)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn is_branching(&self) -> bool {
        matches!(self, Self::TopLevelBranching)
    }

    /// Start markers that make a group renderable to the end user.
    pub fn is_content_start(&self) -> bool {
        matches!(
            self,
            Self::MessageStart
                | Self::SearchToolStart
                | Self::OpenUrlStart
                | Self::ImageGenerationStart
                | Self::PythonToolStart
                | Self::CustomToolStart
                | Self::ReasoningStart
                | Self::DeepResearchPlanStart
                | Self::ResearchAgentStart
        )
    }

    /// Packet types whose presence keeps a group in the built output.
    pub fn is_content_bearing(&self) -> bool {
        self.is_content_start() || matches!(self, Self::ToolCallStart)
    }

    /// Start markers of a tool invocation. Todo-write filtering happens in the engine,
    /// since it needs the resolved tool name.
    pub fn is_tool_start(&self) -> bool {
        matches!(
            self,
            Self::ToolCallStart
                | Self::SearchToolStart
                | Self::OpenUrlStart
                | Self::ImageGenerationStart
                | Self::PythonToolStart
                | Self::CustomToolStart
                | Self::ResearchAgentStart
        )
    }

    /// Packets meaning the final answer is being streamed.
    pub fn signals_final_answer(&self) -> bool {
        matches!(
            self,
            Self::MessageStart
                | Self::MessageDelta
                | Self::AgentMessageChunk
                | Self::AgentMessage
                | Self::ImageGenerationStart
                | Self::ImageGenerationHeartbeat
                | Self::ImageGenerationFinal
                | Self::PythonToolStart
                | Self::PythonToolDelta
        )
    }

    /// Genuine tool activity. Reasoning and thought packets are excluded: they do not
    /// interrupt an answer.
    pub fn is_tool_activity(&self) -> bool {
        matches!(
            self,
            Self::ToolCallStart
                | Self::ToolCallProgress
                | Self::SearchToolStart
                | Self::SearchToolQueriesDelta
                | Self::SearchToolDocumentsDelta
                | Self::OpenUrlStart
                | Self::OpenUrlUrls
                | Self::OpenUrlDocuments
                | Self::CustomToolStart
                | Self::CustomToolDelta
                | Self::DeepResearchPlanStart
                | Self::DeepResearchPlanDelta
                | Self::ResearchAgentStart
                | Self::IntermediateReportStart
                | Self::IntermediateReportDelta
                | Self::IntermediateReportCitedDocs
        )
    }

    pub fn is_thinking(&self) -> bool {
        matches!(
            self,
            Self::ReasoningStart
                | Self::ReasoningDelta
                | Self::ReasoningDone
                | Self::AgentThoughtChunk
                | Self::AgentThought
        )
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_known_names() {
        for name in [
            "section_end",
            "stop",
            "message_start",
            "search_tool_documents_delta",
            "tool_call_progress",
            "artifact_created",
            "agent_thought",
        ] {
            assert_eq!(PacketType::parse(name).as_str(), name);
        }
    }

    #[test]
    fn test_unknown_keeps_raw_name() {
        let ty = PacketType::parse("brand_new_packet");
        assert_eq!(ty, PacketType::Unknown("brand_new_packet".to_string()));
        assert_eq!(ty.to_string(), "brand_new_packet");
        assert!(!ty.is_content_bearing());
    }

    #[test]
    fn test_tool_call_start_is_content_bearing_but_not_display_start() {
        let ty = PacketType::ToolCallStart;
        assert!(ty.is_content_bearing());
        assert!(!ty.is_content_start());
        assert!(ty.is_tool_start());
    }

    #[test]
    fn test_thinking_is_not_tool_activity() {
        assert!(PacketType::AgentThoughtChunk.is_thinking());
        assert!(!PacketType::AgentThoughtChunk.is_tool_activity());
        assert!(!PacketType::ReasoningDelta.is_tool_activity());
        assert!(PacketType::ToolCallProgress.is_tool_activity());
    }

    #[test]
    fn test_prompt_response_counts_as_stop() {
        assert!(PacketType::Stop.is_stop());
        assert!(PacketType::PromptResponse.is_stop());
        assert!(!PacketType::SectionEnd.is_stop());
    }
}
