//! Company fields and their nested payload shapes.

use super::payload::{link, put_object, put_str, CustomFieldValue};
use crate::domain::domain_name::to_link_url;
use crate::domain::ValidationError;
use serde::Deserialize;
use serde_json::{Map, Value};

const ADDRESS_KEYS: [&str; 6] = [
    "addressStreet1",
    "addressStreet2",
    "addressCity",
    "addressPostcode",
    "addressState",
    "addressCountry",
];

/// Flat company fields as supplied by callers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyFields {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub employees: Option<i64>,
    pub address_street1: Option<String>,
    pub address_street2: Option<String>,
    pub address_city: Option<String>,
    pub address_postcode: Option<String>,
    pub address_state: Option<String>,
    pub address_country: Option<String>,
    pub annual_recurring_revenue_micros: Option<i64>,
    pub currency_code: Option<String>,
    pub linkedin_url: Option<String>,
    pub x_url: Option<String>,
    pub account_owner_id: Option<String>,

    /// Resolved to `accountOwnerId` through a workspace member lookup
    pub account_owner_email: Option<String>,

    pub custom_fields: Vec<CustomFieldValue>,
}

impl CompanyFields {
    fn address_values(&self) -> [&Option<String>; 6] {
        [
            &self.address_street1,
            &self.address_street2,
            &self.address_city,
            &self.address_postcode,
            &self.address_state,
            &self.address_country,
        ]
    }

    /// Full creation payload. `name` is required.
    pub fn to_create_payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let name = self
            .name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ValidationError::MissingRequiredParameter("name".into()))?;

        let mut payload = Map::new();
        payload.insert("name".into(), Value::String(name.to_string()));

        // Street 2 alone does not create an address
        let values = self.address_values();
        if values.iter().enumerate().any(|(i, v)| i != 1 && v.is_some()) {
            let mut address = Map::new();
            for (key, value) in ADDRESS_KEYS.iter().zip(values) {
                address.insert((*key).into(), Value::String(value.clone().unwrap_or_default()));
            }
            payload.insert("address".into(), Value::Object(address));
        }

        if self.annual_recurring_revenue_micros.is_some() || self.currency_code.is_some() {
            payload.insert(
                "annualRecurringRevenue".into(),
                money(
                    Some(self.annual_recurring_revenue_micros.unwrap_or(0)),
                    Some(self.currency_code.clone().unwrap_or_else(|| "USD".into())),
                ),
            );
        }

        self.put_common(&mut payload);
        Ok(payload)
    }

    /// Patch containing only the supplied fields, nested shapes partial.
    pub fn to_patch(&self) -> Map<String, Value> {
        let mut patch = Map::new();
        put_str(&mut patch, "name", &self.name);

        let mut address = Map::new();
        for (key, value) in ADDRESS_KEYS.iter().zip(self.address_values()) {
            put_str(&mut address, key, value);
        }
        put_object(&mut patch, "address", address);

        if self.annual_recurring_revenue_micros.is_some() || self.currency_code.is_some() {
            patch.insert(
                "annualRecurringRevenue".into(),
                money(self.annual_recurring_revenue_micros, self.currency_code.clone()),
            );
        }

        self.put_common(&mut patch);
        patch
    }

    fn put_common(&self, payload: &mut Map<String, Value>) {
        if let Some(domain) = &self.domain {
            payload.insert("domainName".into(), link(&to_link_url(domain)));
        }
        if let Some(employees) = self.employees {
            payload.insert("employees".into(), Value::from(employees));
        }
        if let Some(url) = &self.linkedin_url {
            payload.insert("linkedinLink".into(), link(url));
        }
        if let Some(url) = &self.x_url {
            payload.insert("xLink".into(), link(url));
        }
        put_str(payload, "accountOwnerId", &self.account_owner_id);
    }
}

/// `{ amountMicros, currencyCode }` with only the supplied keys.
pub(crate) fn money(amount_micros: Option<i64>, currency_code: Option<String>) -> Value {
    let mut nested = Map::new();
    if let Some(amount) = amount_micros {
        nested.insert("amountMicros".into(), Value::from(amount));
    }
    put_str(&mut nested, "currencyCode", &currency_code);
    Value::Object(nested)
}
