//! Shipping address capture and validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A validated shipping address, persisted under `shippingAddress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    /// Digits only.
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// One-line rendering for summaries.
    #[must_use]
    pub fn one_line(&self) -> String {
        format!(
            "{}, {} {}, {}",
            self.address, self.city, self.postal_code, self.country
        )
    }
}

/// Raw shipping form input, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingForm {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl From<&ShippingAddress> for ShippingForm {
    fn from(address: &ShippingAddress) -> Self {
        Self {
            address: address.address.clone(),
            city: address.city.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
        }
    }
}

/// Per-field validation messages keyed by field name.
///
/// Reported inline next to each field; never fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Record a message for `field`, keeping the first one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_insert_with(|| message.into());
    }

    /// Message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl ShippingForm {
    /// Validate and normalize (trim) every field.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once so the form can mark them all.
    pub fn validate(&self) -> Result<ShippingAddress, FieldErrors> {
        let mut errors = FieldErrors::default();

        let address = self.address.trim();
        let city = self.city.trim();
        let postal_code = self.postal_code.trim();
        let country = self.country.trim();

        if address.is_empty() {
            errors.add("address", "Address is required");
        }
        if city.is_empty() {
            errors.add("city", "City is required");
        }
        if postal_code.is_empty() {
            errors.add("postalCode", "Postal code is required");
        } else if !postal_code.chars().all(|c| c.is_ascii_digit()) {
            errors.add("postalCode", "Postal code should contain only numbers");
        }
        if country.is_empty() {
            errors.add("country", "Country is required");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ShippingAddress {
            address: address.to_owned(),
            city: city.to_owned(),
            postal_code: postal_code.to_owned(),
            country: country.to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(address: &str, city: &str, postal_code: &str, country: &str) -> ShippingForm {
        ShippingForm {
            address: address.to_owned(),
            city: city.to_owned(),
            postal_code: postal_code.to_owned(),
            country: country.to_owned(),
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let address = form("  12 MG Road ", "Pune", " 411001 ", "India")
            .validate()
            .unwrap();
        assert_eq!(address.address, "12 MG Road");
        assert_eq!(address.postal_code, "411001");
    }

    #[test]
    fn test_all_missing_fields_reported() {
        let errors = ShippingForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("city"), Some("City is required"));
    }

    #[test]
    fn test_postal_code_must_be_numeric() {
        let errors = form("1 Main St", "Boston", "02A08", "USA")
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.get("postalCode"),
            Some("Postal code should contain only numbers")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let errors = form("   ", "Boston", "02108", "USA").validate().unwrap_err();
        assert_eq!(errors.get("address"), Some("Address is required"));
    }

    #[test]
    fn test_display_lists_fields() {
        let errors = form("", "", "1", "x").validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "address: Address is required; city: City is required"
        );
    }
}
