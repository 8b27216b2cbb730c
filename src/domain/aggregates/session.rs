//! Per-user client state: authentication plus the order and return carts.

use std::sync::Arc;

use tracing::info;

use crate::api::ProfileApi;
use crate::domain::aggregates::cart::{CartLineItem, CartStore, OrderCart, ReturnCart};
use crate::domain::aggregates::credit::{CreditPosition, CREDIT_LIMIT};
use crate::domain::aggregates::profile::{Admin, AuthState, LoginData, Pharmacy, Profile};
use crate::domain::value_objects::Won;
use crate::persistence::CartPersistence;
use crate::validation::{AdminProfileUpdateRequest, BranchProfileUpdateRequest};
use crate::{PortalError, Result};

#[derive(Debug)]
pub struct Session {
    pub auth: AuthState,
    pub order_cart: OrderCart,
    pub return_cart: ReturnCart,
    credit_limit: Won,
}

impl Default for Session {
    fn default() -> Self { Self::new() }
}

impl Session {
    /// Fresh session with in-memory carts.
    pub fn new() -> Self {
        Self { auth: AuthState::new(), order_cart: CartStore::in_memory(), return_cart: CartStore::in_memory(), credit_limit: CREDIT_LIMIT }
    }

    /// Restores the order cart from `persistence`. The return cart is never persisted.
    pub fn with_order_persistence(persistence: Arc<dyn CartPersistence<CartLineItem>>) -> Self {
        Self { order_cart: CartStore::load(persistence), ..Self::new() }
    }

    pub fn with_credit_limit(mut self, credit_limit: Won) -> Self { self.credit_limit = credit_limit; self }

    pub fn credit_limit(&self) -> Won { self.credit_limit }

    pub fn login(&mut self, login: LoginData) { self.auth.set_auth(login); }

    /// Clears authentication together with both carts and the persisted order cart.
    pub fn logout(&mut self) {
        self.auth.clear();
        self.order_cart.discard();
        self.return_cart.discard();
    }

    pub fn credit_position(&self) -> Option<CreditPosition> { self.auth.credit_position(self.credit_limit) }

    pub fn require_pharmacy(&self) -> Result<&Pharmacy> { self.auth.pharmacy().ok_or(PortalError::NotSignedIn) }

    pub fn require_admin(&self) -> Result<&Admin> {
        match self.auth.profile() {
            Some(Profile::Admin(admin)) => Ok(admin),
            _ => Err(PortalError::NotSignedIn),
        }
    }

    /// Edit form pre-filled from the signed-in branch.
    pub fn branch_profile_form(&self) -> Result<BranchProfileUpdateRequest> {
        let p = self.require_pharmacy()?;
        Ok(BranchProfileUpdateRequest {
            pharmacy_id: p.pharmacy_id,
            user_id: p.user_id,
            pharmacy_name: p.pharmacy_name.clone(),
            biz_reg_no: p.biz_reg_no.clone(),
            representative_name: p.representative_name.clone(),
            postcode: p.postcode.clone(),
            address: p.address.clone(),
            detail_address: p.detail_address.clone().unwrap_or_default(),
            contact: p.contact.clone(),
            status: p.status,
        })
    }

    pub fn admin_profile_form(&self) -> Result<AdminProfileUpdateRequest> {
        let a = self.require_admin()?;
        Ok(AdminProfileUpdateRequest {
            admin_id: a.admin_id,
            user_id: a.user_id,
            admin_name: a.admin_name.clone(),
            department: a.department.clone(),
        })
    }

    /// Saves the edit and adopts the profile the backend returns.
    pub async fn save_branch_profile<A>(&mut self, api: &A, request: &BranchProfileUpdateRequest) -> Result<&Pharmacy>
    where
        A: ProfileApi + ?Sized,
    {
        if self.auth.pharmacy_id() != Some(request.pharmacy_id) {
            return Err(PortalError::NotSignedIn);
        }
        let saved = api.update_branch_profile(request).await?;
        info!(pharmacy_id = %saved.pharmacy_id, "branch profile updated");
        self.auth.update_profile(Profile::Branch(saved));
        self.require_pharmacy()
    }

    pub async fn save_admin_profile<A>(&mut self, api: &A, request: &AdminProfileUpdateRequest) -> Result<&Admin>
    where
        A: ProfileApi + ?Sized,
    {
        if self.require_admin()?.admin_id != request.admin_id {
            return Err(PortalError::NotSignedIn);
        }
        let saved = api.update_admin_profile(request).await?;
        info!(admin_id = %saved.admin_id, "admin profile updated");
        self.auth.update_profile(Profile::Admin(saved));
        self.require_admin()
    }
}
