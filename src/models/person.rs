//! Person fields and their nested payload shapes.

use super::payload::{link, put_object, put_str, CustomFieldValue};
use crate::domain::{EmailAddress, ValidationError};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Flat person fields as supplied by callers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub phone_country_code: Option<String>,
    pub phone_calling_code: Option<String>,
    pub job_title: Option<String>,
    pub city: Option<String>,
    pub avatar_url: Option<String>,
    pub position: Option<f64>,
    pub company_id: Option<String>,

    /// Resolved to `companyId` through a company name lookup
    pub company_name: Option<String>,

    pub linkedin_url: Option<String>,
    pub x_url: Option<String>,

    /// Fields addressed by caller-typed names
    pub custom_fields: Vec<CustomFieldValue>,
}

impl PersonFields {
    /// The normalized email, if one was supplied.
    pub fn email_address(&self) -> Result<Option<EmailAddress>, ValidationError> {
        match self.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => EmailAddress::new(email).map(Some),
            _ => Ok(None),
        }
    }

    fn has_phone(&self) -> bool {
        self.phone.is_some() || self.phone_country_code.is_some() || self.phone_calling_code.is_some()
    }

    /// Full creation payload. `firstName` is required.
    pub fn to_create_payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let first_name = self
            .first_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ValidationError::MissingRequiredParameter("firstName".into()))?;

        let mut payload = Map::new();

        let mut name = Map::new();
        name.insert("firstName".into(), Value::String(first_name.to_string()));
        name.insert(
            "lastName".into(),
            Value::String(self.last_name.clone().unwrap_or_default()),
        );
        payload.insert("name".into(), Value::Object(name));

        if let Some(email) = self.email_address()? {
            let mut emails = Map::new();
            emails.insert("primaryEmail".into(), Value::String(email.into_inner()));
            payload.insert("emails".into(), Value::Object(emails));
        }

        if self.has_phone() {
            let mut phones = Map::new();
            for (key, value) in [
                ("primaryPhoneNumber", &self.phone),
                ("primaryPhoneCountryCode", &self.phone_country_code),
                ("primaryPhoneCallingCode", &self.phone_calling_code),
            ] {
                phones.insert(key.into(), Value::String(value.clone().unwrap_or_default()));
            }
            phones.insert("additionalPhones".into(), Value::Array(Vec::new()));
            payload.insert("phones".into(), Value::Object(phones));
        }

        self.put_scalars(&mut payload);
        Ok(payload)
    }

    /// Patch containing only the supplied fields, nested shapes partial.
    pub fn to_patch(&self) -> Result<Map<String, Value>, ValidationError> {
        let mut patch = Map::new();

        let mut name = Map::new();
        put_str(&mut name, "firstName", &self.first_name);
        put_str(&mut name, "lastName", &self.last_name);
        put_object(&mut patch, "name", name);

        if let Some(email) = self.email_address()? {
            let mut emails = Map::new();
            emails.insert("primaryEmail".into(), Value::String(email.into_inner()));
            patch.insert("emails".into(), Value::Object(emails));
        }

        let mut phones = Map::new();
        put_str(&mut phones, "primaryPhoneNumber", &self.phone);
        put_str(&mut phones, "primaryPhoneCountryCode", &self.phone_country_code);
        put_str(&mut phones, "primaryPhoneCallingCode", &self.phone_calling_code);
        put_object(&mut patch, "phones", phones);

        self.put_scalars(&mut patch);
        Ok(patch)
    }

    fn put_scalars(&self, payload: &mut Map<String, Value>) {
        put_str(payload, "jobTitle", &self.job_title);
        put_str(payload, "city", &self.city);
        put_str(payload, "avatarUrl", &self.avatar_url);
        if let Some(position) = self.position {
            payload.insert("position".into(), Value::from(position));
        }
        put_str(payload, "companyId", &self.company_id);
        if let Some(url) = &self.linkedin_url {
            payload.insert("linkedinLink".into(), link(url));
        }
        if let Some(url) = &self.x_url {
            payload.insert("xLink".into(), link(url));
        }
    }
}
