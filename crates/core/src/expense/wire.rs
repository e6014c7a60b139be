//! Stored document shapes accepted by the import path.
//!
//! Two generations of documents exist: *account* documents carry a nested
//! `start` period, *legacy finance* documents carry top-level `year` and
//! `month`. Both normalize into [`ExpenseRecord`]. Descriptions and values are
//! checked like on create; malformed periods and installment totals are kept
//! as-is, the visibility rules already hide them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tally_shared::types::{CollaboratorId, ExpenseId, UserId};

use crate::calendar::Period;

use super::error::ExpenseError;
use super::service::ExpenseService;
use super::types::{ExpenseRecord, ExpenseStatus};

/// Either stored document shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredExpense {
    /// Document with a nested start period.
    Account(AccountDocument),
    /// Document with top-level year and month.
    Legacy(LegacyFinanceDocument),
}

/// Period as found in stored documents; either part may be missing.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StoredPeriod {
    /// Year, if present.
    #[serde(default)]
    pub year: Option<i32>,
    /// Month, if present.
    #[serde(default)]
    pub month: Option<u32>,
}

impl StoredPeriod {
    /// Missing parts become zero, which never validates.
    fn normalize(self) -> Period {
        Period {
            year: self.year.unwrap_or(0),
            month: self.month.unwrap_or(0),
        }
    }
}

/// Account-generation document.
#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDocument {
    #[serde(alias = "collaborator_id")]
    pub collaborator_id: CollaboratorId,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(alias = "valor")]
    pub value: Decimal,
    #[serde(alias = "startPeriod", alias = "start_period")]
    pub start: StoredPeriod,
    #[serde(default, alias = "parcelasTotal", alias = "installment_total")]
    pub installment_total: Option<i32>,
    #[serde(default)]
    pub status: Option<ExpenseStatus>,
    #[serde(default, alias = "cancelled_at", alias = "dtCancelamento")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "pago")]
    pub paid: bool,
    #[serde(default, alias = "dtPaid", alias = "paid_at")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "paid_by_month")]
    pub paid_by_month: Option<BTreeMap<String, bool>>,
}

/// Legacy finance document.
#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyFinanceDocument {
    #[serde(alias = "collaborator_id")]
    pub collaborator_id: CollaboratorId,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(alias = "valor")]
    pub value: Decimal,
    #[serde(default, alias = "ano")]
    pub year: Option<i32>,
    #[serde(default, alias = "mes")]
    pub month: Option<u32>,
    #[serde(default, alias = "parcelas", alias = "installment_total")]
    pub installment_total: Option<i32>,
    #[serde(default)]
    pub status: Option<ExpenseStatus>,
    #[serde(default, alias = "cancelled_at", alias = "dtCancelamento")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "pago")]
    pub paid: bool,
    #[serde(default, alias = "dtPaid", alias = "paid_at")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl StoredExpense {
    /// Collaborator referenced by the document.
    #[must_use]
    pub const fn collaborator_id(&self) -> CollaboratorId {
        match self {
            Self::Account(doc) => doc.collaborator_id,
            Self::Legacy(doc) => doc.collaborator_id,
        }
    }

    /// Canonical record owned by `owner_id`, with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::EmptyDescription` for a blank description and
    /// `ExpenseError::NegativeValue` for a negative value.
    pub fn into_record(
        self,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<ExpenseRecord, ExpenseError> {
        let record = match self {
            Self::Account(doc) => ExpenseRecord {
                id: ExpenseId::new(),
                owner_id,
                collaborator_id: doc.collaborator_id,
                description: ExpenseService::validate_description(&doc.description)?,
                value: doc.value,
                start: doc.start.normalize(),
                installment_total: doc.installment_total,
                status: doc.status.unwrap_or_default(),
                cancelled_at: doc.cancelled_at,
                paid: doc.paid,
                paid_at: doc.paid_at,
                paid_by_month: doc.paid_by_month,
                created_at: now,
                updated_at: now,
            },
            Self::Legacy(doc) => ExpenseRecord {
                id: ExpenseId::new(),
                owner_id,
                collaborator_id: doc.collaborator_id,
                description: ExpenseService::validate_description(&doc.description)?,
                value: doc.value,
                start: StoredPeriod {
                    year: doc.year,
                    month: doc.month,
                }
                .normalize(),
                installment_total: doc.installment_total,
                status: doc.status.unwrap_or_default(),
                cancelled_at: doc.cancelled_at,
                paid: doc.paid,
                paid_at: doc.paid_at,
                paid_by_month: None,
                created_at: now,
                updated_at: now,
            },
        };
        ExpenseService::validate_value(record.value)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::{is_paid_in_period, is_visible};
    use crate::test_support::{at, p};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> StoredExpense {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_account_document() {
        let collaborator = CollaboratorId::new();
        let doc = parse(json!({
            "collaboratorId": collaborator,
            "description": "Streaming",
            "value": "39.90",
            "start": {"year": 2025, "month": 2},
            "paidByMonth": {"2025-02": true},
        }));
        assert!(matches!(doc, StoredExpense::Account(_)));
        assert_eq!(doc.collaborator_id(), collaborator);

        let owner = UserId::new();
        let record = doc.into_record(owner, at(2025, 6, 1)).unwrap();
        assert_eq!(record.owner_id, owner);
        assert_eq!(record.start, p(2025, 2));
        assert_eq!(record.value, dec!(39.90));
        assert!(record.is_recurring());
        assert_eq!(record.status, ExpenseStatus::Pending);
        assert!(is_paid_in_period(&record, p(2025, 2)));
        assert!(!is_paid_in_period(&record, p(2025, 3)));
    }

    #[test]
    fn test_account_document_with_older_field_names() {
        let doc = parse(json!({
            "collaborator_id": CollaboratorId::new(),
            "descricao": "Notebook",
            "valor": 350,
            "startPeriod": {"year": 2024, "month": 11},
            "parcelasTotal": 10,
            "status": "Cancelado",
            "dtCancelamento": "2025-01-01T00:00:00Z",
            "dtPaid": "2024-11-20T10:00:00Z",
        }));

        let record = doc.into_record(UserId::new(), at(2025, 6, 1)).unwrap();
        assert_eq!(record.installment_total, Some(10));
        assert_eq!(record.status, ExpenseStatus::Cancelled);
        assert_eq!(record.cancellation_period(), Some(p(2025, 1)));
        assert!(is_visible(&record, p(2025, 1)));
        assert!(!is_visible(&record, p(2025, 2)));
        assert!(is_paid_in_period(&record, p(2024, 12)));
    }

    #[test]
    fn test_legacy_document() {
        let doc = parse(json!({
            "collaboratorId": CollaboratorId::new(),
            "description": "Dentist",
            "value": 180,
            "ano": 2025,
            "mes": 4,
            "parcelas": 0,
            "pago": true,
        }));
        assert!(matches!(doc, StoredExpense::Legacy(_)));

        let record = doc.into_record(UserId::new(), at(2025, 6, 1)).unwrap();
        assert_eq!(record.start, p(2025, 4));
        assert_eq!(record.installment_total, Some(0));
        assert!(record.paid);
        assert!(is_visible(&record, p(2025, 4)));
        assert!(!is_visible(&record, p(2025, 5)));
    }

    #[test]
    fn test_missing_period_is_kept_and_hidden() {
        let doc = parse(json!({
            "collaboratorId": CollaboratorId::new(),
            "description": "Orphan",
            "value": 10,
            "year": 2025,
        }));

        let record = doc.into_record(UserId::new(), at(2025, 6, 1)).unwrap();
        assert!(!record.start.is_valid());
        for period in Period::months_of_year(2025) {
            assert!(!is_visible(&record, period));
        }
    }

    #[test]
    fn test_blank_description_and_negative_value_are_rejected() {
        let blank = parse(json!({
            "collaboratorId": CollaboratorId::new(),
            "description": "   ",
            "value": 10,
            "ano": 2025,
            "mes": 1,
        }));
        assert_eq!(
            blank.into_record(UserId::new(), at(2025, 6, 1)).unwrap_err(),
            ExpenseError::EmptyDescription
        );

        let negative = parse(json!({
            "collaboratorId": CollaboratorId::new(),
            "description": "Refund",
            "value": "-50",
            "start": {"year": 2025, "month": 1},
        }));
        assert_eq!(
            negative.into_record(UserId::new(), at(2025, 6, 1)).unwrap_err(),
            ExpenseError::NegativeValue
        );
    }

    #[test]
    fn test_description_is_trimmed() {
        let doc = parse(json!({
            "collaboratorId": CollaboratorId::new(),
            "description": "  Gym ",
            "value": 10,
            "start": {"year": 2025, "month": 1},
        }));
        let record = doc.into_record(UserId::new(), at(2025, 6, 1)).unwrap();
        assert_eq!(record.description, "Gym");
    }
}
