//! Reqwest-backed adapters for the core and AI backends.
//!
//! The core client owns the bearer token and the refresh cookie. A request
//! answered with 401 triggers exactly one `/auth/refresh` followed by a single
//! replay; anything after that surfaces as [`ApiError::Unauthorized`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use validator::Validate;

use super::auth::RefreshResponse;
use super::endpoints;
use super::{
    AiApi, Announcement, AnnouncementApi, AnnouncementDraft, AnnouncementListParams, ApiEnvelope, ApiError, ApiResult,
    Attachment, AuthApi, BalanceSettlement, BalanceTx, BalanceTxParams, BranchOrderApi, BranchRequest, BranchReturnApi,
    ChatKind, ChatReply, ChatRequest, DocumentSummary, ForecastSuggestion, ManagementApi, NoticeApi, NoticeCreated,
    NoticeDetail, NoticeDraft, NoticeListParams, NoticeSummary, NoticeType, NoticeUpdateRequest, OrderManagementApi,
    Page, PageEnvelope, PageParams, PendingCredit, PharmacyAccount, PharmacyApi, PharmacyListParams,
    PharmacyRequestApi, PharmacyRequestDetail, PharmacyRequestParams, PharmacyRequestSummary, ProductApi,
    ProductCreateRequest, ProductCreated, ProductDetail, ProductFields, ProductListParams, ProductSummary, ProfileApi,
    ReturnManagementApi, SettlementResult, StockApi, StockInRequest, StockInResult, StockTx, StockTxParams, SummaryApi,
    SummaryKind,
};
use crate::domain::aggregates::order::{
    OrderCreateRequest, OrderCreated, OrderDetail, OrderListParams, OrderStatus, OrderStatusUpdate, OrderSummary,
};
use crate::domain::aggregates::profile::{Admin, LoginData, Pharmacy};
use crate::domain::aggregates::returns::{
    ReturnCreateRequest, ReturnCreated, ReturnListParams, ReturnStatus, ReturnStatusUpdate, ReturnSummary,
};
use crate::domain::value_objects::{
    AnnouncementId, NoticeId, OrderId, PharmacyId, PharmacyRequestId, ProductId, ReturnId, UserId,
};
use crate::validation::{
    validate_attachment, AdminProfileUpdateRequest, AdminSignupRequest, AttachmentKind, BranchProfileUpdateRequest,
    BranchSignupRequest, LoginRequest, PasswordChangeRequest,
};

/// Bearer token shared between the core and AI clients.
pub type SharedToken = Arc<RwLock<Option<String>>>;

fn parse_base(base_url: &str) -> ApiResult<String> {
    let trimmed = base_url.trim_end_matches('/');
    Url::parse(trimmed).map_err(|_| ApiError::InvalidUrl(base_url.to_owned()))?;
    Ok(trimmed.to_owned())
}

fn status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<serde_json::Value>(body).ok().and_then(|value| {
        ["message", "error"].iter().find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_owned))
    });
    ApiError::Status { status: status.as_u16(), message }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(status_error(status, body.as_ref()));
    }
    serde_json::from_slice(body.as_ref()).map_err(|e| ApiError::Malformed(e.to_string()))
}

fn upload_form(file_name: &str, contents: &[u8]) -> Form {
    Form::new().part("file", Part::bytes(contents.to_vec()).file_name(file_name.to_owned()))
}

/// JSON body under `field` plus an optional `file` part.
fn draft_form(field: &'static str, json: &str, attachment: Option<&Attachment>) -> Form {
    let form = Form::new().text(field, json.to_owned());
    match attachment {
        Some(file) => form.part("file", Part::bytes(file.contents.clone()).file_name(file.file_name.clone())),
        None => form,
    }
}

/// Client for the core REST backend.
#[derive(Clone)]
pub struct HttpPortalClient {
    client: Client,
    base_url: String,
    token: SharedToken,
}

impl HttpPortalClient {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).cookie_store(true).build()?;
        Ok(Self { client, base_url: parse_base(base_url)?, token: Arc::new(RwLock::new(None)) })
    }

    pub fn shared_token(&self) -> SharedToken { Arc::clone(&self.token) }

    pub async fn set_access_token(&self, token: Option<String>) { *self.token.write().await = token; }
    pub async fn access_token(&self) -> Option<String> { self.token.read().await.clone() }
    pub async fn clear_token(&self) { self.token.write().await.take(); }

    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    async fn dispatch<F>(&self, method: &Method, path: &str, shape: &F) -> ApiResult<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder + Send + Sync,
    {
        let mut request = self.client.request(method.clone(), self.url(path));
        if path != endpoints::auth::REFRESH {
            if let Some(token) = self.access_token().await {
                request = request.bearer_auth(token);
            }
        }
        debug!(%method, path, "sending request");
        Ok(shape(request).send().await?)
    }

    /// Sends a request, refreshing the token and replaying once on 401.
    async fn execute<F>(&self, method: Method, path: &str, shape: F) -> ApiResult<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder + Send + Sync,
    {
        let response = self.dispatch(&method, path, &shape).await?;
        if response.status() != StatusCode::UNAUTHORIZED || !refreshes_on_401(path) {
            return Ok(response);
        }

        self.refresh_access_token().await?;
        let replayed = self.dispatch(&method, path, &shape).await?;
        if replayed.status() == StatusCode::UNAUTHORIZED {
            warn!(path, "request still unauthorized after token refresh");
            self.clear_token().await;
            return Err(ApiError::Unauthorized);
        }
        Ok(replayed)
    }

    /// Exchanges the refresh cookie for a new access token.
    pub async fn refresh_access_token(&self) -> ApiResult<String> {
        let token = match self.request_refresh().await {
            Ok(Some(token)) => token,
            outcome => {
                if let Err(e) = outcome {
                    warn!(error = %e, "token refresh failed");
                } else {
                    warn!("token refresh refused");
                }
                self.clear_token().await;
                return Err(ApiError::Unauthorized);
            }
        };
        self.set_access_token(Some(token.clone())).await;
        debug!("access token refreshed");
        Ok(token)
    }

    async fn request_refresh(&self) -> ApiResult<Option<String>> {
        let response = self.dispatch(&Method::POST, endpoints::auth::REFRESH, &|r: RequestBuilder| r).await?;
        let refreshed: RefreshResponse = read_json(response).await?;
        Ok(refreshed.into_token())
    }

    async fn get_data<T, Q>(&self, path: &str, query: Option<&Q>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + Sync + ?Sized,
    {
        let response = self
            .execute(Method::GET, path, |r| match query {
                Some(q) => r.query(q),
                None => r,
            })
            .await?;
        read_json::<ApiEnvelope<T>>(response).await?.into_result()
    }

    async fn get_page<T, Q>(&self, path: &str, query: &Q) -> ApiResult<Page<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + Sync + ?Sized,
    {
        let response = self.execute(Method::GET, path, |r| r.query(query)).await?;
        read_json::<PageEnvelope<T>>(response).await?.into_page()
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let response = self.execute(method, path, |r| r.json(body)).await?;
        read_json::<ApiEnvelope<T>>(response).await?.into_result()
    }

    async fn send_ack<B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<()>
    where
        B: Serialize + Sync + ?Sized,
    {
        let response = self
            .execute(method, path, |r| match body {
                Some(b) => r.json(b),
                None => r,
            })
            .await?;
        read_json::<ApiEnvelope<serde_json::Value>>(response).await?.into_ack()
    }

    async fn post_empty(&self, path: &str) -> ApiResult<()> { self.send_ack::<()>(Method::POST, path, None).await }

    async fn delete(&self, path: &str) -> ApiResult<()> { self.send_ack::<()>(Method::DELETE, path, None).await }

    /// The form is rebuilt for the replay after a refresh.
    async fn send_form<T, F>(&self, method: Method, path: &str, form: F) -> ApiResult<T>
    where
        T: DeserializeOwned,
        F: Fn() -> Form + Send + Sync,
    {
        let response = self.execute(method, path, |r| r.multipart(form())).await?;
        read_json::<ApiEnvelope<T>>(response).await?.into_result()
    }

    async fn login(&self, path: &str, request: &LoginRequest) -> ApiResult<LoginData> {
        request.validate()?;
        let login: LoginData = self.send_json(Method::POST, path, request).await?;
        self.set_access_token(Some(login.access_token.clone())).await;
        Ok(login)
    }
}

/// Login failures are credential errors, not expired sessions.
fn refreshes_on_401(path: &str) -> bool {
    !matches!(path, endpoints::auth::REFRESH | endpoints::auth::BRANCH_LOGIN | endpoints::auth::ADMIN_LOGIN)
}

#[async_trait]
impl BranchOrderApi for HttpPortalClient {
    async fn create_order(&self, request: &OrderCreateRequest) -> ApiResult<OrderCreated> {
        self.send_json(Method::POST, endpoints::orders::CREATE, request).await
    }

    async fn list_branch_orders(&self, params: &OrderListParams) -> ApiResult<Page<OrderSummary>> {
        self.get_page(endpoints::orders::LIST_BRANCH, params).await
    }

    async fn get_order(&self, order_id: OrderId) -> ApiResult<OrderDetail> {
        self.get_data::<_, ()>(&endpoints::orders::detail(order_id), None).await
    }
}

#[async_trait]
impl OrderManagementApi for HttpPortalClient {
    async fn list_admin_orders(&self, params: &OrderListParams) -> ApiResult<Page<OrderSummary>> {
        self.get_page(endpoints::orders::LIST_ADMIN, params).await
    }

    async fn approve_order(&self, order_id: OrderId) -> ApiResult<()> {
        self.post_empty(&endpoints::orders::approve(order_id)).await
    }

    async fn reject_order(&self, order_id: OrderId) -> ApiResult<()> {
        self.post_empty(&endpoints::orders::reject(order_id)).await
    }

    async fn update_order_status(&self, order_id: OrderId, status: OrderStatus) -> ApiResult<()> {
        let body = OrderStatusUpdate { status };
        self.send_ack(Method::PATCH, &endpoints::orders::detail(order_id), Some(&body)).await
    }

    async fn delete_order(&self, order_id: OrderId) -> ApiResult<()> {
        self.delete(&endpoints::orders::detail(order_id)).await
    }
}

#[async_trait]
impl BranchReturnApi for HttpPortalClient {
    async fn create_return(&self, request: &ReturnCreateRequest) -> ApiResult<ReturnCreated> {
        self.send_json(Method::POST, endpoints::returns::CREATE, request).await
    }

    async fn list_branch_returns(&self, params: &ReturnListParams) -> ApiResult<Page<ReturnSummary>> {
        self.get_page(endpoints::returns::LIST_BRANCH, params).await
    }

    async fn get_branch_return(&self, return_id: ReturnId) -> ApiResult<ReturnSummary> {
        self.get_data::<_, ()>(&endpoints::returns::detail_branch(return_id), None).await
    }
}

#[async_trait]
impl ReturnManagementApi for HttpPortalClient {
    async fn list_admin_returns(&self, params: &ReturnListParams) -> ApiResult<Page<ReturnSummary>> {
        self.get_page(endpoints::returns::LIST_ADMIN, params).await
    }

    async fn get_admin_return(&self, return_id: ReturnId) -> ApiResult<ReturnSummary> {
        self.get_data::<_, ()>(&endpoints::returns::detail_admin(return_id), None).await
    }

    async fn approve_return(&self, return_id: ReturnId) -> ApiResult<()> {
        self.post_empty(&endpoints::returns::approve(return_id)).await
    }

    async fn reject_return(&self, return_id: ReturnId) -> ApiResult<()> {
        self.post_empty(&endpoints::returns::reject(return_id)).await
    }

    async fn update_return_status(&self, return_id: ReturnId, status: ReturnStatus) -> ApiResult<()> {
        let body = ReturnStatusUpdate { status };
        self.send_ack(Method::PATCH, &endpoints::returns::detail_admin(return_id), Some(&body)).await
    }

    async fn delete_return(&self, return_id: ReturnId) -> ApiResult<()> {
        self.delete(&endpoints::returns::detail_admin(return_id)).await
    }
}

#[async_trait]
impl AuthApi for HttpPortalClient {
    async fn branch_signup(&self, request: &BranchSignupRequest) -> ApiResult<()> {
        request.validate()?;
        self.send_ack(Method::POST, endpoints::auth::BRANCH_SIGNUP, Some(request)).await
    }

    async fn admin_signup(&self, request: &AdminSignupRequest) -> ApiResult<()> {
        request.validate()?;
        self.send_ack(Method::POST, endpoints::auth::ADMIN_SIGNUP, Some(request)).await
    }

    async fn branch_login(&self, request: &LoginRequest) -> ApiResult<LoginData> {
        self.login(endpoints::auth::BRANCH_LOGIN, request).await
    }

    async fn admin_login(&self, request: &LoginRequest) -> ApiResult<LoginData> {
        self.login(endpoints::auth::ADMIN_LOGIN, request).await
    }

    async fn logout(&self) -> ApiResult<()> {
        let outcome = self.post_empty(endpoints::auth::LOGOUT).await;
        self.clear_token().await;
        outcome
    }

    async fn change_password(&self, request: &PasswordChangeRequest) -> ApiResult<()> {
        request.validate()?;
        self.send_ack(Method::PUT, endpoints::auth::PASSWORD_CHANGE, Some(request)).await
    }
}

#[async_trait]
impl ProfileApi for HttpPortalClient {
    async fn update_branch_profile(&self, request: &BranchProfileUpdateRequest) -> ApiResult<Pharmacy> {
        request.validate()?;
        self.send_json(Method::PUT, &endpoints::profile::branch_update(request.pharmacy_id), request).await
    }

    async fn update_admin_profile(&self, request: &AdminProfileUpdateRequest) -> ApiResult<Admin> {
        request.validate()?;
        self.send_json(Method::PUT, &endpoints::profile::admin_update(request.admin_id), request).await
    }
}

#[async_trait]
impl ManagementApi for HttpPortalClient {
    async fn list_branch_requests(&self, params: &PageParams) -> ApiResult<Page<BranchRequest>> {
        self.get_page(endpoints::management::BRANCH_REQUESTS, params).await
    }

    async fn approve_branch(&self, pharmacy_id: PharmacyId) -> ApiResult<()> {
        self.post_empty(&endpoints::management::approve_branch(pharmacy_id)).await
    }

    async fn reject_branch(&self, pharmacy_id: PharmacyId) -> ApiResult<()> {
        self.post_empty(&endpoints::management::reject_branch(pharmacy_id)).await
    }

    async fn list_pending_credits(&self, params: &PageParams) -> ApiResult<Page<PendingCredit>> {
        self.get_page(endpoints::management::PENDING_CREDITS, params).await
    }

    async fn process_settlement(&self, user_id: UserId) -> ApiResult<SettlementResult> {
        let response = self.execute(Method::POST, &endpoints::management::settlement(user_id), |r| r).await?;
        read_json::<ApiEnvelope<SettlementResult>>(response).await?.into_result()
    }
}

#[async_trait]
impl AiApi for HttpPortalClient {
    async fn forecast_order(&self, file_name: &str, csv: Vec<u8>) -> ApiResult<Vec<ForecastSuggestion>> {
        validate_attachment(file_name, csv.len() as u64, AttachmentKind::OrderForecast).map_err(ApiError::Attachment)?;
        let response = self
            .execute(Method::POST, endpoints::ai::FORECAST_ORDER, |r| r.multipart(upload_form(file_name, &csv)))
            .await?;
        read_json::<ApiEnvelope<Vec<ForecastSuggestion>>>(response).await?.into_result()
    }

    async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatReply> {
        let path = match request.kind {
            ChatKind::Faq => endpoints::ai::CHAT_FAQ,
            ChatKind::Qna => endpoints::ai::CHAT_QNA,
        };
        self.send_json(Method::POST, path, request).await
    }
}

#[async_trait]
impl ProductApi for HttpPortalClient {
    async fn create_product(&self, request: &ProductCreateRequest) -> ApiResult<ProductCreated> {
        request.validate()?;
        self.send_json(Method::POST, endpoints::products::COLLECTION, request).await
    }

    async fn list_products(&self, params: &ProductListParams) -> ApiResult<Page<ProductSummary>> {
        self.get_page(endpoints::products::COLLECTION, params).await
    }

    async fn get_product(&self, product_id: ProductId) -> ApiResult<ProductDetail> {
        self.get_data::<_, ()>(&endpoints::products::detail(product_id), None).await
    }

    async fn update_product(&self, product_id: ProductId, product: &ProductFields) -> ApiResult<()> {
        product.validate()?;
        self.send_ack(Method::PATCH, &endpoints::products::detail(product_id), Some(product)).await
    }

    async fn delete_product(&self, product_id: ProductId) -> ApiResult<()> {
        self.delete(&endpoints::products::detail(product_id)).await
    }
}

#[async_trait]
impl StockApi for HttpPortalClient {
    async fn stock_in(&self, request: &StockInRequest) -> ApiResult<StockInResult> {
        request.validate()?;
        self.send_json(Method::POST, endpoints::stock::IN, request).await
    }

    async fn list_stock_txs(&self, params: &StockTxParams) -> ApiResult<Page<StockTx>> {
        self.get_page(endpoints::stock::LEDGER, params).await
    }
}

#[async_trait]
impl NoticeApi for HttpPortalClient {
    async fn create_notice(&self, draft: &NoticeDraft, attachment: Option<&Attachment>) -> ApiResult<NoticeCreated> {
        draft.validate()?;
        if let Some(file) = attachment {
            file.check(draft.kind.attachment()).map_err(ApiError::Attachment)?;
        }
        let json = serde_json::to_string(draft)?;
        self.send_form(Method::POST, endpoints::notices::COLLECTION, || draft_form("notice", &json, attachment)).await
    }

    async fn list_notices(&self, params: &NoticeListParams) -> ApiResult<Page<NoticeSummary>> {
        self.get_page(endpoints::notices::COLLECTION, params).await
    }

    async fn latest_notices(&self) -> ApiResult<Page<NoticeSummary>> {
        self.get_page(endpoints::notices::LATEST, &PageParams::default()).await
    }

    async fn get_notice(&self, notice_id: NoticeId) -> ApiResult<NoticeDetail> {
        self.get_data::<_, ()>(&endpoints::notices::detail(notice_id), None).await
    }

    async fn update_notice(&self, notice_id: NoticeId, request: &NoticeUpdateRequest) -> ApiResult<()> {
        request.validate()?;
        self.send_ack(Method::PATCH, &endpoints::notices::detail(notice_id), Some(request)).await
    }

    async fn replace_notice_attachment(&self, notice_id: NoticeId, kind: NoticeType, attachment: &Attachment) -> ApiResult<()> {
        attachment.check(kind.attachment()).map_err(ApiError::Attachment)?;
        let response = self
            .execute(Method::POST, &endpoints::notices::attachment(notice_id), |r| {
                r.multipart(upload_form(&attachment.file_name, &attachment.contents))
            })
            .await?;
        read_json::<ApiEnvelope<serde_json::Value>>(response).await?.into_ack()
    }

    async fn delete_notice(&self, notice_id: NoticeId) -> ApiResult<()> {
        self.delete(&endpoints::notices::detail(notice_id)).await
    }

    async fn delete_notice_attachment(&self, notice_id: NoticeId) -> ApiResult<()> {
        self.delete(&endpoints::notices::attachment(notice_id)).await
    }
}

#[async_trait]
impl AnnouncementApi for HttpPortalClient {
    async fn create_announcement(&self, draft: &AnnouncementDraft, attachment: Option<&Attachment>) -> ApiResult<Announcement> {
        draft.validate()?;
        if let Some(file) = attachment {
            file.check(draft.kind.attachment()).map_err(ApiError::Attachment)?;
        }
        let json = serde_json::to_string(draft)?;
        self.send_form(Method::POST, endpoints::announcements::COLLECTION, || draft_form("announcement", &json, attachment))
            .await
    }

    async fn list_announcements(&self, params: &AnnouncementListParams) -> ApiResult<Page<Announcement>> {
        self.get_page(endpoints::announcements::COLLECTION, params).await
    }

    async fn get_announcement(&self, announcement_id: AnnouncementId) -> ApiResult<Announcement> {
        self.get_data::<_, ()>(&endpoints::announcements::detail(announcement_id), None).await
    }

    async fn update_announcement(
        &self,
        announcement_id: AnnouncementId,
        draft: &AnnouncementDraft,
        attachment: Option<&Attachment>,
    ) -> ApiResult<Announcement> {
        draft.validate()?;
        if let Some(file) = attachment {
            file.check(draft.kind.attachment()).map_err(ApiError::Attachment)?;
        }
        let json = serde_json::to_string(draft)?;
        let path = endpoints::announcements::detail(announcement_id);
        self.send_form(Method::PUT, &path, || draft_form("announcement", &json, attachment)).await
    }

    async fn delete_announcement(&self, announcement_id: AnnouncementId) -> ApiResult<()> {
        self.delete(&endpoints::announcements::detail(announcement_id)).await
    }
}

#[async_trait]
impl PharmacyApi for HttpPortalClient {
    async fn list_pharmacies(&self, params: &PharmacyListParams) -> ApiResult<Page<PharmacyAccount>> {
        self.get_page(endpoints::pharmacies::LIST, params).await
    }

    async fn settle_pharmacy(&self, pharmacy_id: PharmacyId) -> ApiResult<BalanceSettlement> {
        let response = self.execute(Method::POST, &endpoints::pharmacies::settlement(pharmacy_id), |r| r).await?;
        read_json::<ApiEnvelope<BalanceSettlement>>(response).await?.into_result()
    }

    async fn list_balance_txs(&self, params: &BalanceTxParams) -> ApiResult<Page<BalanceTx>> {
        self.get_page(&endpoints::pharmacies::balance_txs(params.pharmacy_id), params).await
    }
}

#[async_trait]
impl PharmacyRequestApi for HttpPortalClient {
    async fn list_pharmacy_requests(&self, params: &PharmacyRequestParams) -> ApiResult<Page<PharmacyRequestSummary>> {
        self.get_page(endpoints::pharmacies::REQUESTS, params).await
    }

    async fn get_pharmacy_request(&self, request_id: PharmacyRequestId) -> ApiResult<PharmacyRequestDetail> {
        self.get_data::<_, ()>(&endpoints::pharmacies::request(request_id), None).await
    }

    async fn approve_pharmacy_request(&self, request_id: PharmacyRequestId) -> ApiResult<()> {
        self.post_empty(&endpoints::pharmacies::approve_request(request_id)).await
    }

    async fn reject_pharmacy_request(&self, request_id: PharmacyRequestId) -> ApiResult<()> {
        self.post_empty(&endpoints::pharmacies::reject_request(request_id)).await
    }
}

/// Client for the AI summarization backend. Shares the core client's token
/// but never refreshes it.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    base_url: String,
    token: SharedToken,
}

impl AiClient {
    pub fn new(base_url: &str, timeout: Duration, token: SharedToken) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).cookie_store(true).build()?;
        Ok(Self { client, base_url: parse_base(base_url)?, token })
    }
}

#[async_trait]
impl SummaryApi for AiClient {
    async fn summarize(&self, kind: SummaryKind, file_name: &str, contents: Vec<u8>) -> ApiResult<DocumentSummary> {
        validate_attachment(file_name, contents.len() as u64, kind.attachment()).map_err(ApiError::Attachment)?;
        let path = endpoints::ai::summarize(kind);
        let part = Part::bytes(contents).file_name(file_name.to_owned()).mime_str(kind.mime_type())?;
        let mut request = self.client.post(format!("{}{}", self.base_url, path)).multipart(Form::new().part("file", part));
        if let Some(token) = self.token.read().await.clone() {
            request = request.bearer_auth(token);
        }
        debug!(path, file_name, "uploading document for summary");
        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        read_json::<ApiEnvelope<DocumentSummary>>(response).await?.into_result()
    }
}
