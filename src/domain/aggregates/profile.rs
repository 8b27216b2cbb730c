//! Authenticated users and their branch / HQ profiles.

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::credit::CreditPosition;
use crate::domain::value_objects::{AdminId, PharmacyId, UserId, Won};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Branch,
    Admin,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditStatus {
    #[default]
    Full,
    SettlementRequired,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    pub role: UserRole,
    /// Non-positive running balance; `-point` is what the branch owes HQ.
    #[serde(default)]
    pub point: i64,
    #[serde(default)]
    pub credit_status: CreditStatus,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PharmacyStatus {
    #[default]
    Pending,
    Active,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pharmacy {
    pub pharmacy_id: PharmacyId,
    pub user_id: UserId,
    pub pharmacy_name: String,
    pub biz_reg_no: String,
    pub representative_name: String,
    pub postcode: String,
    pub address: String,
    #[serde(default)]
    pub detail_address: Option<String>,
    pub contact: String,
    #[serde(default)]
    pub status: PharmacyStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub admin_id: AdminId,
    pub user_id: UserId,
    pub admin_name: String,
    pub department: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Profile {
    Branch(Pharmacy),
    Admin(Admin),
}

/// Payload returned by the login endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub access_token: String,
    pub user: User,
    pub profile: Profile,
}

/// Process-wide authentication state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    access_token: Option<String>,
    user: Option<User>,
    profile: Option<Profile>,
}

impl AuthState {
    pub fn new() -> Self { Self::default() }

    pub fn set_auth(&mut self, login: LoginData) {
        self.access_token = Some(login.access_token);
        self.user = Some(login.user);
        self.profile = Some(login.profile);
    }

    pub fn clear(&mut self) { *self = Self::default(); }

    pub fn is_authenticated(&self) -> bool { self.access_token.is_some() && self.user.is_some() }
    pub fn access_token(&self) -> Option<&str> { self.access_token.as_deref() }
    pub fn user(&self) -> Option<&User> { self.user.as_ref() }
    pub fn profile(&self) -> Option<&Profile> { self.profile.as_ref() }

    pub fn set_access_token(&mut self, token: impl Into<String>) { self.access_token = Some(token.into()); }

    pub fn pharmacy(&self) -> Option<&Pharmacy> {
        match self.profile.as_ref()? {
            Profile::Branch(p) => Some(p),
            Profile::Admin(_) => None,
        }
    }

    pub fn pharmacy_id(&self) -> Option<PharmacyId> { self.pharmacy().map(|p| p.pharmacy_id) }

    pub fn credit_position(&self, credit_limit: Won) -> Option<CreditPosition> {
        self.user.as_ref().map(|u| CreditPosition::from_point(u.point, credit_limit))
    }

    /// Records a newly confirmed charge: the point falls, the debt rises.
    pub fn record_charge(&mut self, amount: Won) {
        if let Some(user) = self.user.as_mut() {
            user.point = user.point.saturating_sub(amount.amount());
        }
    }

    /// Replaces the stored profile; a signed-out state stays signed out.
    pub fn update_profile(&mut self, profile: Profile) {
        if self.profile.is_some() { self.profile = Some(profile); }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::credit::CREDIT_LIMIT;

    #[test]
    fn test_auth_lifecycle() {
        let mut auth = AuthState::new();
        assert!(!auth.is_authenticated());
        auth.set_auth(fixtures::branch_login(7, -1_000));
        assert!(auth.is_authenticated());
        assert_eq!(auth.pharmacy_id(), Some(PharmacyId(7)));
        assert_eq!(auth.credit_position(CREDIT_LIMIT).unwrap().outstanding_balance, Won(1_000));

        auth.record_charge(Won(500));
        assert_eq!(auth.user().unwrap().point, -1_500);

        auth.clear();
        assert!(auth.user().is_none());
        assert!(auth.pharmacy_id().is_none());
    }

    #[test]
    fn test_profile_decodes_both_roles() {
        let admin: Profile = serde_json::from_value(serde_json::json!({
            "adminId": 1, "userId": 2, "adminName": "Lee", "department": "운영팀"
        })).unwrap();
        assert!(matches!(admin, Profile::Admin(_)));

        let branch: Profile = serde_json::to_value(fixtures::pharmacy(3)).and_then(serde_json::from_value).unwrap();
        assert!(matches!(branch, Profile::Branch(p) if p.pharmacy_id == PharmacyId(3)));
    }
}
