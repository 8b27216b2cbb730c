//! AI backend payloads.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::UserId;
use crate::validation::AttachmentKind;

/// One row of the order forecast. The AI backend speaks snake_case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSuggestion {
    pub product_name: String,
    pub product_code: String,
    pub predicted_quantity: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatKind {
    Faq,
    Qna,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Ai,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self { Self { role: ChatRole::User, content: content.into() } }
    pub fn ai(content: impl Into<String>) -> Self { Self { role: ChatRole::Ai, content: content.into() } }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    pub question: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Answer plus the full conversation including the new exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Notice categories the AI backend can summarize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SummaryKind {
    Law,
    Epidemic,
    NewProduct,
}

impl SummaryKind {
    pub fn attachment(self) -> AttachmentKind {
        match self {
            Self::Law => AttachmentKind::Law,
            Self::Epidemic => AttachmentKind::Epidemic,
            Self::NewProduct => AttachmentKind::NewProduct,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Law => "text/plain",
            Self::Epidemic | Self::NewProduct => "application/pdf",
        }
    }
}

/// Summary of an uploaded document. Epidemic and new-product summaries also
/// carry a drafted notice body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub summary: String,
    #[serde(default)]
    pub notice: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            user_id: None,
            kind: ChatKind::Faq,
            question: "반품 기한은?".into(),
            history: vec![ChatMessage::user("안녕하세요"), ChatMessage::ai("무엇을 도와드릴까요?")],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "FAQ");
        assert_eq!(json["history"][1]["type"], "ai");
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn test_summary_without_notice() {
        let law: DocumentSummary = serde_json::from_str(r#"{"summary": "요약"}"#).unwrap();
        assert_eq!(law.notice, None);
        assert_eq!(SummaryKind::Epidemic.attachment(), AttachmentKind::Epidemic);
    }
}
