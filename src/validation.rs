//! Form validation for signup, login, password and profile requests.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::aggregates::profile::PharmacyStatus;
use crate::domain::value_objects::{AdminId, PharmacyId, UserId};

const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Upload size ceiling for notice attachments and forecast files.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// At least eight characters mixing three of: upper, lower, digit, special.
pub fn validate_password(value: &str) -> bool {
    let classes = [
        value.chars().any(|c| c.is_ascii_uppercase()),
        value.chars().any(|c| c.is_ascii_lowercase()),
        value.chars().any(|c| c.is_ascii_digit()),
        value.chars().any(|c| PASSWORD_SPECIALS.contains(c)),
    ];
    value.chars().count() >= 8 && classes.iter().filter(|&&present| present).count() >= 3
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut e = ValidationError::new(code);
    e.message = Some(Cow::Borrowed(message));
    e
}

fn password_rule(value: &str) -> Result<(), ValidationError> {
    if validate_password(value) {
        Ok(())
    } else {
        Err(error("password_strength", "영문, 숫자, 특수문자를 조합하여 8자리 이상으로 입력해주세요."))
    }
}

fn digits_with_dashes(value: &str, groups: &[usize]) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    parts.len() == groups.len()
        && parts.iter().zip(groups).all(|(part, &len)| part.len() == len && part.chars().all(|c| c.is_ascii_digit()))
}

fn biz_reg_no_rule(value: &str) -> Result<(), ValidationError> {
    if digits_with_dashes(value, &[3, 2, 5]) {
        Ok(())
    } else {
        Err(error("biz_reg_no", "사업자등록번호는 000-00-00000 형식이어야 합니다."))
    }
}

fn contact_rule(value: &str) -> Result<(), ValidationError> {
    let ok = if value.starts_with("02-") {
        digits_with_dashes(value, &[2, 3, 4]) || digits_with_dashes(value, &[2, 4, 4])
    } else {
        digits_with_dashes(value, &[3, 3, 4]) || digits_with_dashes(value, &[3, 4, 4])
    };
    if ok { Ok(()) } else { Err(error("contact", "연락처 형식이 올바르지 않습니다.")) }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "branch_password_differs_from_id", skip_on_field_errors = false))]
pub struct BranchSignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(custom = "password_rule")]
    pub password: String,
    #[validate(length(min = 1))]
    pub pharmacy_name: String,
    #[validate(custom = "biz_reg_no_rule")]
    pub biz_reg_no: String,
    #[validate(length(min = 1))]
    pub representative_name: String,
    #[validate(length(equal = 5))]
    pub postcode: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_address: Option<String>,
    #[validate(custom = "contact_rule")]
    pub contact: String,
}

fn branch_password_differs_from_id(request: &BranchSignupRequest) -> Result<(), ValidationError> {
    password_differs(&request.email, &request.password)
}

fn password_differs(email: &str, password: &str) -> Result<(), ValidationError> {
    if !email.is_empty() && email == password {
        Err(error("password_equals_id", "비밀번호는 아이디와 같을 수 없습니다."))
    } else {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "admin_password_differs_from_id", skip_on_field_errors = false))]
pub struct AdminSignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(custom = "password_rule")]
    pub password: String,
    #[validate(length(min = 1))]
    pub admin_name: String,
    #[validate(length(min = 1))]
    pub department: String,
}

fn admin_password_differs_from_id(request: &AdminSignupRequest) -> Result<(), ValidationError> {
    password_differs(&request.email, &request.password)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "new_password_differs", skip_on_field_errors = false))]
pub struct PasswordChangeRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(custom = "password_rule")]
    pub new_password: String,
    /// Re-typed new password; never sent.
    #[serde(skip_serializing, default)]
    #[validate(must_match(other = "new_password", message = "비밀번호가 일치하지 않습니다."))]
    pub confirm_password: String,
}

fn new_password_differs(request: &PasswordChangeRequest) -> Result<(), ValidationError> {
    if !request.current_password.is_empty() && request.current_password == request.new_password {
        Err(error("password_unchanged", "새 비밀번호는 기존 비밀번호와 같을 수 없습니다."))
    } else {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BranchProfileUpdateRequest {
    pub pharmacy_id: PharmacyId,
    pub user_id: UserId,
    #[validate(length(min = 1))]
    pub pharmacy_name: String,
    #[validate(custom = "biz_reg_no_rule")]
    pub biz_reg_no: String,
    #[validate(length(min = 1))]
    pub representative_name: String,
    #[validate(length(equal = 5))]
    pub postcode: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[serde(default)]
    pub detail_address: String,
    #[validate(custom = "contact_rule")]
    pub contact: String,
    pub status: PharmacyStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfileUpdateRequest {
    pub admin_id: AdminId,
    pub user_id: UserId,
    #[validate(length(min = 1))]
    pub admin_name: String,
    #[validate(length(min = 1))]
    pub department: String,
}

/// What an uploaded file is for; decides the accepted extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachmentKind {
    Law,
    Epidemic,
    NewProduct,
    /// General notice or announcement body attachment.
    Notice,
    OrderForecast,
}

impl AttachmentKind {
    fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Law => &[".txt"],
            Self::Epidemic | Self::NewProduct => &[".pdf"],
            Self::Notice => &[".pdf", ".txt"],
            Self::OrderForecast => &[".csv"],
        }
    }

    fn rejection(self) -> &'static str {
        match self {
            Self::Law => "법령 카테고리는 .txt 파일만 지원합니다.",
            Self::Epidemic => "감염병 카테고리는 .pdf 파일만 지원합니다.",
            Self::NewProduct => "신제품 카테고리는 .pdf 파일만 지원합니다.",
            Self::Notice => ".pdf 또는 .txt 파일만 첨부할 수 있습니다.",
            Self::OrderForecast => "CSV 파일을 업로드 해주세요.",
        }
    }
}

/// Returns the message to show when `file_name` cannot be uploaded as `kind`.
pub fn validate_attachment(file_name: &str, size_bytes: u64, kind: AttachmentKind) -> Result<(), &'static str> {
    if size_bytes > MAX_ATTACHMENT_BYTES {
        return Err("파일 크기는 10MB 이하여야 합니다.");
    }
    let lower = file_name.to_lowercase();
    if kind.extensions().iter().any(|ext| lower.ends_with(ext)) { Ok(()) } else { Err(kind.rejection()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> BranchSignupRequest {
        BranchSignupRequest {
            email: "branch@example.com".into(),
            password: "Pharm123!".into(),
            pharmacy_name: "Central".into(),
            biz_reg_no: "123-45-67890".into(),
            representative_name: "Kim".into(),
            postcode: "04524".into(),
            address: "Seoul".into(),
            detail_address: None,
            contact: "02-1234-5678".into(),
        }
    }

    #[test]
    fn test_password_rule() {
        assert!(validate_password("abcDEF12"));
        assert!(validate_password("abcdef1!"));
        assert!(!validate_password("abcdefgh1"));
        assert!(!validate_password("aB1!"));
        assert!(!validate_password(""));
    }

    #[test]
    fn test_signup_validation() {
        assert!(signup().validate().is_ok());

        let mut bad = signup();
        bad.biz_reg_no = "1234567890".into();
        bad.contact = "010-12-34".into();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("biz_reg_no"));
        assert!(fields.contains_key("contact"));
    }

    #[test]
    fn test_password_may_not_equal_email() {
        let mut req = signup();
        req.email = "Abcdef1!@x.co".into();
        req.password = req.email.clone();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_password_change_rules() {
        let ok = PasswordChangeRequest { current_password: "Old12345!".into(), new_password: "New12345!".into(), confirm_password: "New12345!".into() };
        assert!(ok.validate().is_ok());
        assert!(serde_json::to_value(&ok).unwrap().get("confirmPassword").is_none());

        let unchanged = PasswordChangeRequest { new_password: "Old12345!".into(), confirm_password: "Old12345!".into(), ..ok.clone() };
        assert!(unchanged.validate().is_err());

        let mismatch = PasswordChangeRequest { confirm_password: "Other123!".into(), ..ok };
        assert!(mismatch.validate().is_err());
    }

    #[test]
    fn test_attachment_rules() {
        assert!(validate_attachment("law.TXT", 10, AttachmentKind::Law).is_ok());
        assert_eq!(validate_attachment("law.pdf", 10, AttachmentKind::Law), Err("법령 카테고리는 .txt 파일만 지원합니다."));
        assert!(validate_attachment("sales.csv", MAX_ATTACHMENT_BYTES + 1, AttachmentKind::OrderForecast).is_err());
        assert!(validate_attachment("sales.csv", 1024, AttachmentKind::OrderForecast).is_ok());
        assert!(validate_attachment("guide.txt", 10, AttachmentKind::Notice).is_ok());
        assert!(validate_attachment("guide.PDF", 10, AttachmentKind::Notice).is_ok());
        assert!(validate_attachment("guide.hwp", 10, AttachmentKind::Notice).is_err());
    }
}
