//! Aggregates module
pub mod cart;
pub mod credit;
pub mod order;
pub mod profile;
pub mod returns;
pub mod session;

pub use cart::{Cart, CartLine, CartLineItem, CartStore, OrderCart, ReturnCart, ReturnLineItem};
pub use credit::{can_submit, credit_tier, CreditInfo, CreditPosition, CreditTier, CREDIT_LIMIT};
pub use order::{OrderCreateRequest, OrderCreated, OrderDetail, OrderListParams, OrderStatus, OrderStatusUpdate, OrderSummary};
pub use profile::{Admin, AuthState, CreditStatus, LoginData, Pharmacy, PharmacyStatus, Profile, User, UserRole};
pub use returns::{ReturnCreateRequest, ReturnCreated, ReturnListParams, ReturnStatus, ReturnStatusUpdate, ReturnSummary};
pub use session::Session;
