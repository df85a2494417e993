//! Opportunity fields and their nested payload shapes.

use super::company::money;
use super::payload::{put_str, validate_date};
use crate::domain::ValidationError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Flat opportunity fields as supplied by callers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpportunityFields {
    pub name: Option<String>,

    /// Amount in micros
    pub amount: Option<i64>,
    pub currency_code: Option<String>,
    pub close_date: Option<String>,
    pub stage: Option<String>,
    pub company_id: Option<String>,

    /// Resolved to `companyId` through a company name lookup
    pub company_name: Option<String>,

    pub point_of_contact_id: Option<String>,

    /// Resolved to `pointOfContactId` through a person email lookup
    pub point_of_contact_email: Option<String>,
}

impl OpportunityFields {
    /// Full creation payload. `name` is required.
    pub fn to_create_payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let name = self
            .name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ValidationError::MissingRequiredParameter("name".into()))?;

        let mut payload = Map::new();
        payload.insert("name".into(), Value::String(name.to_string()));

        if self.amount.is_some() || self.currency_code.is_some() {
            payload.insert(
                "amount".into(),
                money(
                    Some(self.amount.unwrap_or(0)),
                    Some(self.currency_code.clone().unwrap_or_else(|| "USD".into())),
                ),
            );
        }

        self.put_common(&mut payload)?;
        Ok(payload)
    }

    /// Patch containing only the supplied fields, nested shapes partial.
    pub fn to_patch(&self) -> Result<Map<String, Value>, ValidationError> {
        let mut patch = Map::new();
        put_str(&mut patch, "name", &self.name);
        if self.amount.is_some() || self.currency_code.is_some() {
            patch.insert("amount".into(), money(self.amount, self.currency_code.clone()));
        }
        self.put_common(&mut patch)?;
        Ok(patch)
    }

    fn put_common(&self, payload: &mut Map<String, Value>) -> Result<(), ValidationError> {
        if let Some(close_date) = &self.close_date {
            validate_date("closeDate", close_date)?;
            payload.insert("closeDate".into(), Value::String(close_date.clone()));
        }
        put_str(payload, "stage", &self.stage);
        put_str(payload, "companyId", &self.company_id);
        put_str(payload, "pointOfContactId", &self.point_of_contact_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_payload_defaults_currency() {
        let fields = OpportunityFields {
            name: Some("Big deal".into()),
            amount: Some(1_000_000),
            stage: Some("MEETING".into()),
            ..Default::default()
        };
        let payload = Value::Object(fields.to_create_payload().unwrap());
        assert_eq!(
            payload,
            json!({
                "name": "Big deal",
                "amount": {"amountMicros": 1_000_000, "currencyCode": "USD"},
                "stage": "MEETING"
            })
        );
    }

    #[test]
    fn test_close_date_is_validated() {
        let fields = OpportunityFields {
            name: Some("Deal".into()),
            close_date: Some("soon".into()),
            ..Default::default()
        };
        assert!(matches!(
            fields.to_create_payload(),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_patch_keeps_amount_partial() {
        let fields = OpportunityFields {
            currency_code: Some("EUR".into()),
            ..Default::default()
        };
        let patch = Value::Object(fields.to_patch().unwrap());
        assert_eq!(patch, json!({"amount": {"currencyCode": "EUR"}}));
    }
}
