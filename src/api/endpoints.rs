//! Backend paths, relative to the configured base URL.

pub mod auth {
    pub const BRANCH_SIGNUP: &str = "/auth/signup";
    pub const ADMIN_SIGNUP: &str = "/auth/admin/signup";
    pub const BRANCH_LOGIN: &str = "/auth/login";
    pub const ADMIN_LOGIN: &str = "/auth/admin/login";
    pub const PASSWORD_CHANGE: &str = "/auth/password";
    pub const LOGOUT: &str = "/auth/logout";
    pub const REFRESH: &str = "/auth/refresh";
}

pub mod profile {
    use crate::domain::value_objects::{AdminId, PharmacyId};

    pub fn branch_update(pharmacy_id: PharmacyId) -> String { format!("/auth/update/{pharmacy_id}") }
    pub fn admin_update(admin_id: AdminId) -> String { format!("/auth/update/admin/{admin_id}") }
}

pub mod orders {
    use crate::domain::value_objects::OrderId;

    pub const CREATE: &str = "/orders";
    pub const LIST_BRANCH: &str = "/orders/branch/orders";
    pub const LIST_ADMIN: &str = "/orders/admin/orders";

    pub fn detail(order_id: OrderId) -> String { format!("/orders/{order_id}") }
    pub fn approve(order_id: OrderId) -> String { format!("/orders/{order_id}/approve") }
    pub fn reject(order_id: OrderId) -> String { format!("/orders/{order_id}/reject") }
}

pub mod returns {
    use crate::domain::value_objects::ReturnId;

    pub const CREATE: &str = "/returns";
    pub const LIST_BRANCH: &str = "/branch/returns";
    pub const LIST_ADMIN: &str = "/admin/returns";

    pub fn detail_branch(return_id: ReturnId) -> String { format!("/branch/returns/{return_id}") }
    pub fn detail_admin(return_id: ReturnId) -> String { format!("/admin/returns/{return_id}") }
    pub fn approve(return_id: ReturnId) -> String { format!("/admin/returns/{return_id}/approve") }
    pub fn reject(return_id: ReturnId) -> String { format!("/admin/returns/{return_id}/reject") }
}

pub mod management {
    use crate::domain::value_objects::{PharmacyId, UserId};

    pub const BRANCH_REQUESTS: &str = "/admin/pharmacies/requests";
    pub const PENDING_CREDITS: &str = "/credit/pending";

    pub fn approve_branch(pharmacy_id: PharmacyId) -> String { format!("/admin/pharmacies/{pharmacy_id}/approve") }
    pub fn reject_branch(pharmacy_id: PharmacyId) -> String { format!("/admin/pharmacies/{pharmacy_id}/reject") }
    pub fn settlement(user_id: UserId) -> String { format!("/credit/approve/{user_id}") }
}

pub mod products {
    use crate::domain::value_objects::ProductId;

    pub const COLLECTION: &str = "/products";

    pub fn detail(product_id: ProductId) -> String { format!("/products/{product_id}") }
}

pub mod stock {
    pub const IN: &str = "/stock-txs/in";
    pub const LEDGER: &str = "/stock-txs";
}

pub mod notices {
    use crate::domain::value_objects::NoticeId;

    pub const COLLECTION: &str = "/notices";
    pub const LATEST: &str = "/notices/latest";

    pub fn detail(notice_id: NoticeId) -> String { format!("/notices/{notice_id}") }
    pub fn attachment(notice_id: NoticeId) -> String { format!("/notices/{notice_id}/attachment") }
}

pub mod announcements {
    use crate::domain::value_objects::AnnouncementId;

    pub const COLLECTION: &str = "/announcements";

    pub fn detail(announcement_id: AnnouncementId) -> String { format!("/announcements/{announcement_id}") }
}

pub mod pharmacies {
    use crate::domain::value_objects::{PharmacyId, PharmacyRequestId};

    pub const LIST: &str = "/pharmacies";
    pub const REQUESTS: &str = "/pharmacy-requests";

    pub fn settlement(pharmacy_id: PharmacyId) -> String { format!("/pharmacies/{pharmacy_id}/settlement") }
    pub fn balance_txs(pharmacy_id: PharmacyId) -> String { format!("/pharmacies/{pharmacy_id}/balance-txs") }
    pub fn request(request_id: PharmacyRequestId) -> String { format!("/pharmacy-requests/{request_id}") }
    pub fn approve_request(request_id: PharmacyRequestId) -> String { format!("/pharmacy-requests/{request_id}/approve") }
    pub fn reject_request(request_id: PharmacyRequestId) -> String { format!("/pharmacy-requests/{request_id}/reject") }
}

/// Forecast and chat are proxied by the core backend; summaries go to the AI backend directly.
pub mod ai {
    use crate::api::ai::SummaryKind;

    pub const FORECAST_ORDER: &str = "/forecast/order";
    pub const CHAT_FAQ: &str = "/chat/faq";
    pub const CHAT_QNA: &str = "/chat/qna";

    pub fn summarize(kind: SummaryKind) -> &'static str {
        match kind {
            SummaryKind::Law => "/summarize/law",
            SummaryKind::Epidemic => "/summarize/epidemic",
            SummaryKind::NewProduct => "/summarize/new-product",
        }
    }
}
