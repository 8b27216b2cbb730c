//! Notice board and HQ announcement payloads.
//!
//! Both boards take a multipart form: the JSON body as a text part plus an
//! optional `file` part whose extension depends on the notice type.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::value_objects::{AnnouncementId, NoticeId};
use crate::validation::{validate_attachment, AttachmentKind};

/// A file picked for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> Self { Self { file_name: file_name.into(), contents } }

    pub fn check(&self, kind: AttachmentKind) -> Result<(), &'static str> {
        validate_attachment(&self.file_name, self.contents.len() as u64, kind)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeType {
    #[default]
    General,
    Law,
    Epidemic,
    NewProduct,
}

impl NoticeType {
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "안내",
            Self::Law => "법령",
            Self::Epidemic => "감염병",
            Self::NewProduct => "신제품",
        }
    }

    pub fn attachment(self) -> AttachmentKind {
        match self {
            Self::General => AttachmentKind::Notice,
            Self::Law => AttachmentKind::Law,
            Self::Epidemic => AttachmentKind::Epidemic,
            Self::NewProduct => AttachmentKind::NewProduct,
        }
    }
}

/// JSON part of a notice create form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NoticeDraft {
    #[serde(rename = "type")]
    pub kind: NoticeType,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeCreated {
    pub notice_id: NoticeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeDetail {
    pub notice_id: NoticeId,
    #[serde(rename = "type")]
    pub kind: NoticeType,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub attachment_url: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeSummary {
    pub notice_id: NoticeId,
    #[serde(rename = "type")]
    pub kind: NoticeType,
    pub title: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchScope {
    Title,
    Content,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeListParams {
    #[serde(rename = "type")]
    pub kind: NoticeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<SearchScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NoticeUpdateRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnouncementType {
    #[default]
    Notice,
    Law,
    Epidemic,
    NewProduct,
}

impl AnnouncementType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Notice => "안내",
            Self::Law => "법령",
            Self::Epidemic => "감염병",
            Self::NewProduct => "신제품",
        }
    }

    pub fn attachment(self) -> AttachmentKind {
        match self {
            Self::Notice => AttachmentKind::Notice,
            Self::Law => AttachmentKind::Law,
            Self::Epidemic => AttachmentKind::Epidemic,
            Self::NewProduct => AttachmentKind::NewProduct,
        }
    }
}

/// JSON part of an announcement create or update form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AnnouncementDraft {
    #[serde(rename = "type")]
    pub kind: AnnouncementType,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub announcement_id: AnnouncementId,
    #[serde(rename = "type")]
    pub kind: AnnouncementType,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub attachment_url: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AnnouncementType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}
