//! Order and return submission.
//!
//! Ties the credit guard, the carts and the backend together. Each attempt moves
//! `Idle -> Validating -> Submitting -> Idle`; the current state is published on
//! a watch channel so a front end can disable its submit control.

use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, BranchOrderApi, BranchReturnApi};
use crate::domain::aggregates::order::OrderCreateRequest;
use crate::domain::aggregates::returns::ReturnCreateRequest;
use crate::domain::aggregates::session::Session;
use crate::domain::events::{DomainEvent, OrderEvent, RejectionReason, ReturnEvent};
use crate::domain::value_objects::{OrderId, ReturnId, Won};

pub const ORDER_SUCCESS_MESSAGE: &str = "발주 요청이 완료되었습니다.";
pub const ORDER_FAILURE_MESSAGE: &str = "발주 요청 중 오류가 발생했습니다.";
pub const RETURN_SUCCESS_MESSAGE: &str = "반품 요청이 완료되었습니다.";
pub const RETURN_FAILURE_MESSAGE: &str = "반품 요청 중 오류가 발생했습니다.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionKind {
    Order,
    Return,
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("signed-in user is not a branch")]
    NotBranch,

    #[error("credit limit exceeded: balance {balance} + cart {cart_total} > limit {limit}")]
    CreditLimitExceeded { balance: Won, cart_total: Won, limit: Won },

    #[error("return reason is required")]
    MissingReason,

    #[error("a submission is already in flight")]
    InFlight,

    #[error("{kind:?} request failed: {source}")]
    Api { kind: SubmissionKind, #[source] source: ApiError },
}

impl SubmissionError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "장바구니가 비어 있습니다.".into(),
            Self::NotBranch => "가맹점 계정으로 로그인해주세요.".into(),
            Self::CreditLimitExceeded { .. } => "잔액이 부족합니다.".into(),
            Self::MissingReason => "반품 사유를 입력해주세요.".into(),
            Self::InFlight => "이미 요청을 처리 중입니다.".into(),
            Self::Api { kind, source } => {
                let fallback = match kind {
                    SubmissionKind::Order => ORDER_FAILURE_MESSAGE,
                    SubmissionKind::Return => RETURN_FAILURE_MESSAGE,
                };
                source.server_message().unwrap_or(fallback).to_owned()
            }
        }
    }

    /// Local rejections never reached the backend.
    pub fn is_local(&self) -> bool { !matches!(self, Self::Api { .. }) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub total_price: Won,
    pub outstanding_balance: Won,
}

impl OrderReceipt {
    pub fn message(&self) -> &'static str { ORDER_SUCCESS_MESSAGE }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReturnReceipt {
    pub return_id: ReturnId,
    pub item_count: usize,
}

impl ReturnReceipt {
    pub fn message(&self) -> &'static str { RETURN_SUCCESS_MESSAGE }
}

/// Puts the state back to `Idle` however the attempt ends, including when the
/// caller drops the future mid-request.
struct AttemptGuard<'a> {
    state: &'a watch::Sender<SubmissionState>,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) { self.state.send_replace(SubmissionState::Idle); }
}

pub struct SubmissionFlow<A> {
    api: A,
    state: watch::Sender<SubmissionState>,
    events: Mutex<Vec<DomainEvent>>,
}

impl<A> SubmissionFlow<A> {
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self { api, state, events: Mutex::new(vec![]) }
    }

    pub fn api(&self) -> &A { &self.api }
    pub fn state(&self) -> SubmissionState { *self.state.borrow() }
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> { self.state.subscribe() }

    pub fn take_events(&self) -> Vec<DomainEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(std::sync::PoisonError::into_inner))
    }

    fn raise_event(&self, e: DomainEvent) {
        self.events.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(e);
    }

    fn begin(&self) -> Result<AttemptGuard<'_>, SubmissionError> {
        let claimed = self.state.send_if_modified(|state| {
            if *state != SubmissionState::Idle {
                return false;
            }
            *state = SubmissionState::Validating;
            true
        });
        if claimed { Ok(AttemptGuard { state: &self.state }) } else { Err(SubmissionError::InFlight) }
    }
}

impl<A: BranchOrderApi> SubmissionFlow<A> {
    /// Sends the order cart. The cart is cleared only once the backend accepts it.
    #[instrument(skip_all)]
    pub async fn submit_order(&self, session: &mut Session) -> Result<OrderReceipt, SubmissionError> {
        let _attempt = self.begin()?;
        let pharmacy_id = session.auth.pharmacy_id().ok_or(SubmissionError::NotBranch)?;
        let position = session.credit_position().ok_or(SubmissionError::NotBranch)?;

        if session.order_cart.is_empty() {
            self.raise_event(DomainEvent::Order(OrderEvent::Rejected { pharmacy_id, reason: RejectionReason::EmptyCart }));
            return Err(SubmissionError::EmptyCart);
        }

        let cart_total = session.order_cart.total_price();
        if !position.can_submit(cart_total) {
            warn!(%pharmacy_id, balance = %position.outstanding_balance, %cart_total, "order blocked by credit limit");
            self.raise_event(DomainEvent::Order(OrderEvent::Rejected { pharmacy_id, reason: RejectionReason::CreditLimitExceeded }));
            return Err(SubmissionError::CreditLimitExceeded {
                balance: position.outstanding_balance,
                cart_total,
                limit: position.credit_limit,
            });
        }

        let request = OrderCreateRequest::from_lines(pharmacy_id, session.order_cart.items());
        self.state.send_replace(SubmissionState::Submitting);
        self.raise_event(DomainEvent::Order(OrderEvent::Submitted { pharmacy_id, cart_total }));

        match self.api.create_order(&request).await {
            Ok(created) => {
                let charged = created.total_price.unwrap_or_else(|| request.total_price());
                session.order_cart.clear();
                session.auth.record_charge(charged);
                let outstanding_balance = session.credit_position().map_or(Won::ZERO, |p| p.outstanding_balance);
                info!(%pharmacy_id, order_id = %created.order_id, total = %charged, "order submitted");
                self.raise_event(DomainEvent::Order(OrderEvent::Created { order_id: created.order_id, total: charged }));
                Ok(OrderReceipt { order_id: created.order_id, total_price: charged, outstanding_balance })
            }
            Err(source) => {
                warn!(%pharmacy_id, error = %source, "order submission failed");
                let message = source.server_message().map(str::to_owned);
                self.raise_event(DomainEvent::Order(OrderEvent::Failed { pharmacy_id, message }));
                Err(SubmissionError::Api { kind: SubmissionKind::Order, source })
            }
        }
    }
}

impl<A: BranchReturnApi> SubmissionFlow<A> {
    /// Sends the return cart against `order_id`. Returns never add debt, so the
    /// credit guard does not apply.
    #[instrument(skip(self, session, reason))]
    pub async fn submit_return(&self, session: &mut Session, order_id: OrderId, reason: &str) -> Result<ReturnReceipt, SubmissionError> {
        let _attempt = self.begin()?;
        let pharmacy_id = session.auth.pharmacy_id().ok_or(SubmissionError::NotBranch)?;

        let rejection = if session.return_cart.is_empty() {
            Some((RejectionReason::EmptyCart, SubmissionError::EmptyCart))
        } else if reason.trim().is_empty() {
            Some((RejectionReason::MissingReason, SubmissionError::MissingReason))
        } else {
            None
        };
        if let Some((reason, error)) = rejection {
            self.raise_event(DomainEvent::Return(ReturnEvent::Rejected { pharmacy_id, reason }));
            return Err(error);
        }

        let request = ReturnCreateRequest::from_lines(pharmacy_id, order_id, reason.trim(), session.return_cart.items());
        let item_count = request.items.len();
        self.state.send_replace(SubmissionState::Submitting);
        self.raise_event(DomainEvent::Return(ReturnEvent::Submitted { pharmacy_id, item_count }));

        match self.api.create_return(&request).await {
            Ok(created) => {
                session.return_cart.clear();
                info!(%pharmacy_id, return_id = %created.return_id, item_count, "return submitted");
                self.raise_event(DomainEvent::Return(ReturnEvent::Created { return_id: created.return_id }));
                Ok(ReturnReceipt { return_id: created.return_id, item_count })
            }
            Err(source) => {
                warn!(%pharmacy_id, error = %source, "return submission failed");
                let message = source.server_message().map(str::to_owned);
                self.raise_event(DomainEvent::Return(ReturnEvent::Failed { pharmacy_id, message }));
                Err(SubmissionError::Api { kind: SubmissionKind::Return, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::api::{ApiResult, Page};
    use crate::domain::aggregates::cart::{CartLineItem, ReturnLineItem};
    use crate::domain::aggregates::order::{OrderCreated, OrderDetail, OrderListParams, OrderSummary};
    use crate::domain::aggregates::profile::fixtures;
    use crate::domain::aggregates::returns::{ReturnCreated, ReturnListParams, ReturnSummary};
    use crate::domain::value_objects::ProductId;

    #[derive(Default)]
    struct MockApi {
        fail_with: Option<String>,
        created_total: Option<Won>,
        requests: Mutex<Vec<OrderCreateRequest>>,
        returns: Mutex<Vec<ReturnCreateRequest>>,
        observer: OnceLock<watch::Receiver<SubmissionState>>,
        seen_state: Mutex<Option<SubmissionState>>,
        gate: Option<Notify>,
    }

    impl MockApi {
        fn outcome(&self) -> ApiResult<()> {
            if let Some(rx) = self.observer.get() {
                *self.seen_state.lock().unwrap() = Some(*rx.borrow());
            }
            match &self.fail_with {
                Some(message) => Err(ApiError::Rejected { message: Some(message.clone()) }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl BranchOrderApi for MockApi {
        async fn create_order(&self, request: &OrderCreateRequest) -> ApiResult<OrderCreated> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.requests.lock().unwrap().push(request.clone());
            self.outcome()?;
            Ok(OrderCreated { order_id: OrderId(42), total_price: self.created_total })
        }
        async fn list_branch_orders(&self, _: &OrderListParams) -> ApiResult<Page<OrderSummary>> { Ok(Page::empty()) }
        async fn get_order(&self, _: OrderId) -> ApiResult<OrderDetail> { Err(ApiError::Malformed("unused".into())) }
    }

    #[async_trait]
    impl BranchReturnApi for MockApi {
        async fn create_return(&self, request: &ReturnCreateRequest) -> ApiResult<ReturnCreated> {
            self.returns.lock().unwrap().push(request.clone());
            self.outcome()?;
            Ok(ReturnCreated { return_id: ReturnId(9) })
        }
        async fn list_branch_returns(&self, _: &ReturnListParams) -> ApiResult<Page<ReturnSummary>> { Ok(Page::empty()) }
        async fn get_branch_return(&self, _: ReturnId) -> ApiResult<ReturnSummary> { Err(ApiError::Malformed("unused".into())) }
    }

    fn branch_session(point: i64) -> Session {
        let mut session = Session::new();
        session.login(fixtures::branch_login(7, point));
        session
    }

    fn line(id: i64, price: i64, qty: u32) -> CartLineItem { CartLineItem::new(ProductId(id), "Tylenol", "Janssen", Won(price), qty) }

    #[tokio::test]
    async fn test_guard_denial_keeps_cart() {
        let flow = SubmissionFlow::new(MockApi::default());
        let mut session = branch_session(-9_999_900);
        session.order_cart.add_item(line(1, 100, 2));

        let err = flow.submit_order(&mut session).await.unwrap_err();
        assert!(matches!(err, SubmissionError::CreditLimitExceeded { cart_total: Won(200), .. }));
        assert_eq!(err.user_message(), "잔액이 부족합니다.");
        assert!(err.is_local());
        assert_eq!(session.order_cart.items().len(), 1);
        assert!(flow.api().requests.lock().unwrap().is_empty());
        assert_eq!(flow.state(), SubmissionState::Idle);
        assert_eq!(
            flow.take_events(),
            vec![DomainEvent::Order(OrderEvent::Rejected { pharmacy_id: crate::domain::value_objects::PharmacyId(7), reason: RejectionReason::CreditLimitExceeded })]
        );
    }

    #[tokio::test]
    async fn test_success_clears_cart_and_raises_balance() {
        let flow = SubmissionFlow::new(MockApi { created_total: Some(Won(500)), ..Default::default() });
        let mut session = branch_session(-1_000);
        session.order_cart.add_item(line(1, 100, 2));
        session.order_cart.add_item(line(1, 100, 3));

        let receipt = flow.submit_order(&mut session).await.unwrap();
        assert_eq!(receipt.order_id, OrderId(42));
        assert_eq!(receipt.outstanding_balance, Won(1_500));
        assert_eq!(receipt.message(), ORDER_SUCCESS_MESSAGE);
        assert!(session.order_cart.is_empty());
        assert_eq!(session.auth.user().unwrap().point, -1_500);

        let sent = flow.api().requests.lock().unwrap();
        assert_eq!(sent[0].items.len(), 1);
        assert_eq!(sent[0].items[0].quantity, 5);
        assert_eq!(sent[0].items[0].subtotal_price, Won(500));
    }

    #[tokio::test]
    async fn test_failure_preserves_cart() {
        let flow = SubmissionFlow::new(MockApi { fail_with: Some("재고가 부족합니다.".into()), ..Default::default() });
        let mut session = branch_session(0);
        session.order_cart.add_item(line(1, 100, 5));

        let err = flow.submit_order(&mut session).await.unwrap_err();
        assert_eq!(err.user_message(), "재고가 부족합니다.");
        assert_eq!(session.order_cart.total_price(), Won(500));
        assert_eq!(session.auth.user().unwrap().point, 0);
        assert_eq!(flow.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_fallback() {
        let flow = SubmissionFlow::new(MockApi { fail_with: Some(String::new()), ..Default::default() });
        let mut session = branch_session(0);
        session.order_cart.add_item(line(1, 100, 1));

        let err = flow.submit_order(&mut session).await.unwrap_err();
        assert_eq!(err.user_message(), ORDER_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_state_is_submitting_during_request() {
        let flow = SubmissionFlow::new(MockApi::default());
        flow.api().observer.set(flow.subscribe()).unwrap();
        let mut session = branch_session(0);
        session.order_cart.add_item(line(1, 100, 1));

        let receipt = flow.submit_order(&mut session).await.unwrap();
        assert_eq!(receipt.total_price, Won(100));
        assert_eq!(*flow.api().seen_state.lock().unwrap(), Some(SubmissionState::Submitting));
        assert_eq!(flow.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_refused() {
        let flow = SubmissionFlow::new(MockApi { gate: Some(Notify::new()), ..Default::default() });
        let mut first = branch_session(0);
        first.order_cart.add_item(line(1, 100, 1));
        let mut second = branch_session(0);
        second.order_cart.add_item(line(2, 100, 1));

        let (a, b) = tokio::join!(flow.submit_order(&mut first), async {
            let outcome = flow.submit_order(&mut second).await;
            if let Some(gate) = &flow.api().gate {
                gate.notify_one();
            }
            outcome
        });
        assert!(a.is_ok());
        assert!(matches!(b, Err(SubmissionError::InFlight)));
        assert!(!second.order_cart.is_empty());
    }

    #[tokio::test]
    async fn test_abandoned_submit_resets_state_and_keeps_cart() {
        // The gate is never opened, so the request never completes.
        let flow = SubmissionFlow::new(MockApi { gate: Some(Notify::new()), ..Default::default() });
        let mut session = branch_session(0);
        session.order_cart.add_item(line(1, 100, 1));

        let outcome = tokio::time::timeout(std::time::Duration::from_millis(50), flow.submit_order(&mut session)).await;
        assert!(outcome.is_err());
        assert_eq!(flow.state(), SubmissionState::Idle);
        assert_eq!(session.order_cart.items().len(), 1);
        assert_eq!(session.auth.user().unwrap().point, 0);

        let mut retry = branch_session(0);
        retry.order_cart.add_item(line(2, 100, 1));
        flow.api().gate.as_ref().unwrap().notify_one();
        assert!(flow.submit_order(&mut retry).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_cart_and_non_branch_are_rejected() {
        let flow = SubmissionFlow::new(MockApi::default());
        let mut session = branch_session(0);
        assert!(matches!(flow.submit_order(&mut session).await, Err(SubmissionError::EmptyCart)));

        let mut anonymous = Session::new();
        anonymous.order_cart.add_item(line(1, 100, 1));
        let err = flow.submit_order(&mut anonymous).await.unwrap_err();
        assert!(matches!(err, SubmissionError::NotBranch));
    }

    #[tokio::test]
    async fn test_return_submission() {
        let flow = SubmissionFlow::new(MockApi::default());
        let mut session = branch_session(-9_999_999);
        session.return_cart.add_item(ReturnLineItem::new(ProductId(3), "Bandage", "3M", Won(40), 2));

        let err = flow.submit_return(&mut session, OrderId(5), "  ").await.unwrap_err();
        assert!(matches!(err, SubmissionError::MissingReason));

        let receipt = flow.submit_return(&mut session, OrderId(5), "제품 불량").await.unwrap();
        assert_eq!(receipt.return_id, ReturnId(9));
        assert_eq!(receipt.item_count, 1);
        assert!(session.return_cart.is_empty());

        let sent = flow.api().returns.lock().unwrap();
        assert_eq!(sent[0].order_id, OrderId(5));
        assert_eq!(sent[0].reason, "제품 불량");
    }
}
