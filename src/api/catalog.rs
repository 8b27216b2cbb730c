//! HQ product catalogue and stock ledger payloads.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::value_objects::{ProductId, StockTxId, Won};

/// Top-level product classification. Sub-categories stay free text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MainCategory {
    #[serde(rename = "전문의약품")]
    Prescription,
    #[serde(rename = "일반의약품")]
    OverTheCounter,
    #[serde(rename = "의약외품")]
    QuasiDrug,
}

impl MainCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Prescription => "전문의약품",
            Self::OverTheCounter => "일반의약품",
            Self::QuasiDrug => "의약외품",
        }
    }

    /// Sub-categories the backend accepts under this category.
    pub fn sub_categories(self) -> &'static [&'static str] {
        match self {
            Self::Prescription => &["항생제", "고혈압_치료제", "당뇨병_치료제", "진통소염제", "정신신경용제", "항암제", "기타_전문의약품"],
            Self::OverTheCounter => &["감기약", "소화제", "해열진통제", "지사제", "외용제", "멀미약", "기타_일반의약품"],
            Self::QuasiDrug => &["마스크", "손소독제", "밴드_반창고", "체온계", "구강청결제", "방역용품", "기타_의약외품"],
        }
    }

    pub fn accepts(self, sub_category: &str) -> bool { self.sub_categories().contains(&sub_category) }
}

/// Display text for a sub-category key.
pub fn sub_category_label(sub_category: &str) -> String {
    match sub_category {
        "밴드_반창고" => "밴드/반창고".to_owned(),
        other => other.replace('_', " "),
    }
}

fn sub_category_matches(product: &ProductFields) -> Result<(), validator::ValidationError> {
    if product.main_category.accepts(&product.sub_category) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("sub_category"))
    }
}

/// Fields shared by product registration and update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "sub_category_matches", skip_on_field_errors = false))]
pub struct ProductFields {
    #[validate(length(min = 1))]
    pub product_name: String,
    #[validate(length(min = 1))]
    pub insurance_code: String,
    pub main_category: MainCategory,
    pub sub_category: String,
    #[validate(length(min = 1))]
    pub manufacturer: String,
    #[validate(length(min = 1))]
    pub unit: String,
    pub unit_price: Won,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_img_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreateRequest {
    #[serde(flatten)]
    #[validate]
    pub product: ProductFields,
    /// Opening stock, booked as the first stock-in.
    pub stock_qty: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreated {
    pub product_id: ProductId,
    pub stock_tx_id: StockTxId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product_id: ProductId,
    #[serde(flatten)]
    pub product: ProductFields,
    pub created_at: NaiveDateTime,
    pub stock_qty: i64,
}

/// Catalogue row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product_id: ProductId,
    pub product_name: String,
    pub manufacturer: String,
    pub unit: String,
    pub unit_price: Won,
    #[serde(default)]
    pub product_img_url: Option<String>,
    pub stock_qty: i64,
    #[serde(default)]
    pub latest_stock_in_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_category: Option<MainCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockTxType {
    Order,
    In,
    OrderCancel,
    Return,
}

impl StockTxType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Order => "발주",
            Self::In => "입고",
            Self::OrderCancel => "발주 취소",
            Self::Return => "반품",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StockInRequest {
    pub product_id: ProductId,
    #[validate(range(min = 1))]
    pub amount: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockInResult {
    pub stock_tx_id: StockTxId,
    pub product_id: ProductId,
    pub amount: i64,
    pub quantity_before: i64,
    pub quantity_after: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTx {
    pub stock_tx_id: StockTxId,
    pub product_id: ProductId,
    #[serde(rename = "type")]
    pub kind: StockTxType,
    pub amount: i64,
    pub quantity_after: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTxParams {
    pub stock_tx_id: StockTxId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> ProductFields {
        ProductFields {
            product_name: "타이레놀".into(),
            insurance_code: "A123".into(),
            main_category: MainCategory::OverTheCounter,
            sub_category: "해열진통제".into(),
            manufacturer: "Janssen".into(),
            unit: "box".into(),
            unit_price: Won(3_000),
            details: None,
            product_img_url: None,
        }
    }

    #[test]
    fn test_create_request_is_flat_on_the_wire() {
        let request = ProductCreateRequest { product: fields(), stock_qty: 10 };
        assert!(request.validate().is_ok());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["mainCategory"], "일반의약품");
        assert_eq!(value["stockQty"], 10);
        assert_eq!(value["unitPrice"], 3_000);
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_sub_category_must_belong_to_main_category() {
        let mismatched = ProductFields { sub_category: "마스크".into(), ..fields() };
        assert!(mismatched.validate().is_err());
        assert!(MainCategory::QuasiDrug.accepts("마스크"));
        assert_eq!(MainCategory::QuasiDrug.label(), "의약외품");
        assert_eq!(sub_category_label("밴드_반창고"), "밴드/반창고");
        assert_eq!(sub_category_label("고혈압_치료제"), "고혈압 치료제");
    }

    #[test]
    fn test_stock_tx_decodes() {
        let tx: StockTx = serde_json::from_value(json!({
            "stockTxId": 3, "productId": 1, "type": "ORDER_CANCEL", "amount": 2, "quantityAfter": 12,
            "createdAt": "2025-09-01T10:00:00"
        })).unwrap();
        assert_eq!(tx.kind, StockTxType::OrderCancel);
        assert_eq!(tx.kind.label(), "발주 취소");
    }
}
