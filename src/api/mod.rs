//! Typed REST collaborators.
//!
//! Every backend response is wrapped in `{success, data}`; list endpoints add
//! pagination counters. Envelopes are checked here, so callers only ever see a
//! decoded payload or an [`ApiError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod ai;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod endpoints;
pub mod management;
pub mod notices;
pub mod pharmacies;

use crate::domain::aggregates::order::{OrderCreateRequest, OrderCreated, OrderDetail, OrderListParams, OrderStatus, OrderSummary};
use crate::domain::aggregates::profile::{Admin, LoginData, Pharmacy};
use crate::domain::aggregates::returns::{ReturnCreateRequest, ReturnCreated, ReturnListParams, ReturnStatus, ReturnSummary};
use crate::domain::value_objects::{
    AnnouncementId, NoticeId, OrderId, PharmacyId, PharmacyRequestId, ProductId, ReturnId, UserId,
};
use crate::validation::{
    AdminProfileUpdateRequest, AdminSignupRequest, BranchProfileUpdateRequest, BranchSignupRequest, LoginRequest,
    PasswordChangeRequest,
};

pub use ai::{ChatKind, ChatMessage, ChatReply, ChatRequest, ChatRole, DocumentSummary, ForecastSuggestion, SummaryKind};
pub use catalog::{
    MainCategory, ProductCreateRequest, ProductCreated, ProductDetail, ProductFields, ProductListParams, ProductSummary,
    StockInRequest, StockInResult, StockTx, StockTxParams, StockTxType,
};
pub use client::{AiClient, HttpPortalClient};
pub use management::{BranchRequest, PageParams, PendingCredit, SettlementResult};
pub use notices::{
    Announcement, AnnouncementDraft, AnnouncementListParams, AnnouncementType, Attachment, NoticeCreated, NoticeDetail,
    NoticeDraft, NoticeListParams, NoticeSummary, NoticeType, NoticeUpdateRequest, SearchScope,
};
pub use pharmacies::{
    BalanceSettlement, BalanceTx, BalanceTxParams, BalanceTxType, PharmacyAccount, PharmacyListParams,
    PharmacyRequestDetail, PharmacyRequestParams, PharmacyRequestStatus, PharmacyRequestSummary,
};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request could not be sent: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("request rejected by server")]
    Rejected { message: Option<String> },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("session expired; sign in again")]
    Unauthorized,

    #[error("invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("invalid URL {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Attachment(&'static str),

    #[error("could not encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    /// Human-readable text supplied by the backend, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Rejected { message } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// `{success, data}` wrapper shared by every endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, alias = "error", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self { Self { success: true, data: Some(data), message: None } }

    pub fn into_result(self) -> ApiResult<T> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(ApiError::Malformed("successful envelope without data".into())),
            (false, _) => Err(ApiError::Rejected { message: self.message }),
        }
    }

    /// For endpoints whose payload is informational only.
    pub fn into_ack(self) -> ApiResult<()> {
        if self.success { Ok(()) } else { Err(ApiError::Rejected { message: self.message }) }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_elements: u64,
    pub total_pages: u32,
    pub current_page: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    pub fn empty() -> Self { Self { items: vec![], info: PageInfo::default() } }
}

/// List envelope. Pagination counters arrive either nested under `page` or
/// flat next to `data`, depending on the backend version.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<Vec<T>>,
    #[serde(default, alias = "error")]
    pub message: Option<String>,
    #[serde(default)]
    pub page: Option<PageInfo>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
}

impl<T> PageEnvelope<T> {
    pub fn into_page(self) -> ApiResult<Page<T>> {
        if !self.success {
            return Err(ApiError::Rejected { message: self.message });
        }
        let items = self.data.ok_or_else(|| ApiError::Malformed("list envelope without data".into()))?;
        let info = match (self.page, self.total_elements, self.total_pages, self.current_page) {
            (Some(info), ..) => info,
            (None, Some(total_elements), Some(total_pages), Some(current_page)) => PageInfo { total_elements, total_pages, current_page },
            _ => return Err(ApiError::Malformed("list envelope without pagination".into())),
        };
        Ok(Page { items, info })
    }
}

/// Order endpoints available to a branch.
#[async_trait]
pub trait BranchOrderApi: Send + Sync {
    async fn create_order(&self, request: &OrderCreateRequest) -> ApiResult<OrderCreated>;
    async fn list_branch_orders(&self, params: &OrderListParams) -> ApiResult<Page<OrderSummary>>;
    async fn get_order(&self, order_id: OrderId) -> ApiResult<OrderDetail>;
}

/// Order endpoints available to HQ.
#[async_trait]
pub trait OrderManagementApi: Send + Sync {
    async fn list_admin_orders(&self, params: &OrderListParams) -> ApiResult<Page<OrderSummary>>;
    async fn approve_order(&self, order_id: OrderId) -> ApiResult<()>;
    async fn reject_order(&self, order_id: OrderId) -> ApiResult<()>;
    async fn update_order_status(&self, order_id: OrderId, status: OrderStatus) -> ApiResult<()>;
    async fn delete_order(&self, order_id: OrderId) -> ApiResult<()>;
}

/// Return endpoints available to a branch.
#[async_trait]
pub trait BranchReturnApi: Send + Sync {
    async fn create_return(&self, request: &ReturnCreateRequest) -> ApiResult<ReturnCreated>;
    async fn list_branch_returns(&self, params: &ReturnListParams) -> ApiResult<Page<ReturnSummary>>;
    async fn get_branch_return(&self, return_id: ReturnId) -> ApiResult<ReturnSummary>;
}

/// Return endpoints available to HQ.
#[async_trait]
pub trait ReturnManagementApi: Send + Sync {
    async fn list_admin_returns(&self, params: &ReturnListParams) -> ApiResult<Page<ReturnSummary>>;
    async fn get_admin_return(&self, return_id: ReturnId) -> ApiResult<ReturnSummary>;
    async fn approve_return(&self, return_id: ReturnId) -> ApiResult<()>;
    async fn reject_return(&self, return_id: ReturnId) -> ApiResult<()>;
    async fn update_return_status(&self, return_id: ReturnId, status: ReturnStatus) -> ApiResult<()>;
    async fn delete_return(&self, return_id: ReturnId) -> ApiResult<()>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn branch_signup(&self, request: &BranchSignupRequest) -> ApiResult<()>;
    async fn admin_signup(&self, request: &AdminSignupRequest) -> ApiResult<()>;
    async fn branch_login(&self, request: &LoginRequest) -> ApiResult<LoginData>;
    async fn admin_login(&self, request: &LoginRequest) -> ApiResult<LoginData>;
    async fn logout(&self) -> ApiResult<()>;
    async fn change_password(&self, request: &PasswordChangeRequest) -> ApiResult<()>;
}

#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn update_branch_profile(&self, request: &BranchProfileUpdateRequest) -> ApiResult<Pharmacy>;
    async fn update_admin_profile(&self, request: &AdminProfileUpdateRequest) -> ApiResult<Admin>;
}

/// HQ branch approval and credit settlement.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    async fn list_branch_requests(&self, params: &PageParams) -> ApiResult<Page<BranchRequest>>;
    async fn approve_branch(&self, pharmacy_id: PharmacyId) -> ApiResult<()>;
    async fn reject_branch(&self, pharmacy_id: PharmacyId) -> ApiResult<()>;
    async fn list_pending_credits(&self, params: &PageParams) -> ApiResult<Page<PendingCredit>>;
    async fn process_settlement(&self, user_id: UserId) -> ApiResult<SettlementResult>;
}

/// HQ product catalogue.
#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn create_product(&self, request: &ProductCreateRequest) -> ApiResult<ProductCreated>;
    async fn list_products(&self, params: &ProductListParams) -> ApiResult<Page<ProductSummary>>;
    async fn get_product(&self, product_id: ProductId) -> ApiResult<ProductDetail>;
    async fn update_product(&self, product_id: ProductId, product: &ProductFields) -> ApiResult<()>;
    async fn delete_product(&self, product_id: ProductId) -> ApiResult<()>;
}

/// Stock-in and the per-transaction stock ledger.
#[async_trait]
pub trait StockApi: Send + Sync {
    async fn stock_in(&self, request: &StockInRequest) -> ApiResult<StockInResult>;
    async fn list_stock_txs(&self, params: &StockTxParams) -> ApiResult<Page<StockTx>>;
}

/// Notice board. Branches read; HQ writes.
#[async_trait]
pub trait NoticeApi: Send + Sync {
    async fn create_notice(&self, draft: &NoticeDraft, attachment: Option<&Attachment>) -> ApiResult<NoticeCreated>;
    async fn list_notices(&self, params: &NoticeListParams) -> ApiResult<Page<NoticeSummary>>;
    async fn latest_notices(&self) -> ApiResult<Page<NoticeSummary>>;
    async fn get_notice(&self, notice_id: NoticeId) -> ApiResult<NoticeDetail>;
    async fn update_notice(&self, notice_id: NoticeId, request: &NoticeUpdateRequest) -> ApiResult<()>;
    async fn replace_notice_attachment(&self, notice_id: NoticeId, kind: NoticeType, attachment: &Attachment) -> ApiResult<()>;
    async fn delete_notice(&self, notice_id: NoticeId) -> ApiResult<()>;
    async fn delete_notice_attachment(&self, notice_id: NoticeId) -> ApiResult<()>;
}

/// HQ announcements.
#[async_trait]
pub trait AnnouncementApi: Send + Sync {
    async fn create_announcement(&self, draft: &AnnouncementDraft, attachment: Option<&Attachment>) -> ApiResult<Announcement>;
    async fn list_announcements(&self, params: &AnnouncementListParams) -> ApiResult<Page<Announcement>>;
    async fn get_announcement(&self, announcement_id: AnnouncementId) -> ApiResult<Announcement>;
    async fn update_announcement(
        &self,
        announcement_id: AnnouncementId,
        draft: &AnnouncementDraft,
        attachment: Option<&Attachment>,
    ) -> ApiResult<Announcement>;
    async fn delete_announcement(&self, announcement_id: AnnouncementId) -> ApiResult<()>;
}

/// HQ branch accounts and their balance ledger.
#[async_trait]
pub trait PharmacyApi: Send + Sync {
    async fn list_pharmacies(&self, params: &PharmacyListParams) -> ApiResult<Page<PharmacyAccount>>;
    async fn settle_pharmacy(&self, pharmacy_id: PharmacyId) -> ApiResult<BalanceSettlement>;
    async fn list_balance_txs(&self, params: &BalanceTxParams) -> ApiResult<Page<BalanceTx>>;
}

/// HQ review of branch registration requests.
#[async_trait]
pub trait PharmacyRequestApi: Send + Sync {
    async fn list_pharmacy_requests(&self, params: &PharmacyRequestParams) -> ApiResult<Page<PharmacyRequestSummary>>;
    async fn get_pharmacy_request(&self, request_id: PharmacyRequestId) -> ApiResult<PharmacyRequestDetail>;
    async fn approve_pharmacy_request(&self, request_id: PharmacyRequestId) -> ApiResult<()>;
    async fn reject_pharmacy_request(&self, request_id: PharmacyRequestId) -> ApiResult<()>;
}

/// Order forecasting and chatbots, proxied through the core backend.
#[async_trait]
pub trait AiApi: Send + Sync {
    async fn forecast_order(&self, file_name: &str, csv: Vec<u8>) -> ApiResult<Vec<ForecastSuggestion>>;
    async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatReply>;
}

/// Document summarization served by the AI backend.
#[async_trait]
pub trait SummaryApi: Send + Sync {
    async fn summarize(&self, kind: SummaryKind, file_name: &str, contents: Vec<u8>) -> ApiResult<DocumentSummary>;
}
