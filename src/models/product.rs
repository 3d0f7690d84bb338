use serde::{Deserialize, Serialize};

/// Catalog entry in the shape the downstream product service stores.
///
/// Field names on the wire are the downstream's (`sl_no`, `product_name`,
/// `affiate_link`, ...). Prices are integer minor units (e.g. 999 = $9.99).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "sl_no")]
    pub serial_number: i64,
    #[serde(rename = "product_name")]
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    pub price: i64,
    pub offer_price: i64,
    #[serde(rename = "affiate_link", default)]
    pub affiliate_link: String,
    pub agent_name: String,
    pub category: String,
}

/// One violated field constraint, keyed by the wire field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Render a list as `field: message; field: message`.
    pub fn join(errors: &[FieldError]) -> String {
        errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ── Request payload ──────────────────────────────────────────────────────────

/// Unchecked product body. Every field is optional so that a missing field is
/// reported alongside the other violations instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPayload {
    #[serde(rename = "sl_no")]
    pub serial_number: Option<i64>,
    #[serde(rename = "product_name")]
    pub name: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub price: Option<i64>,
    pub offer_price: Option<i64>,
    #[serde(rename = "affiate_link")]
    pub affiliate_link: Option<String>,
    pub agent_name: Option<String>,
    pub category: Option<String>,
}

impl ProductPayload {
    /// Check every field constraint and build the record, or return all
    /// violations at once.
    pub fn validate(self) -> Result<ProductRecord, Vec<FieldError>> {
        let mut errors = Vec::new();

        let serial_number = required(self.serial_number, "sl_no", &mut errors);
        let name = non_empty(self.name, "product_name", &mut errors);
        let description = non_empty(self.description, "description", &mut errors);
        let price = positive(self.price, "price", &mut errors);
        let offer_price = positive(self.offer_price, "offer_price", &mut errors);
        let agent_name = non_empty(self.agent_name, "agent_name", &mut errors);
        let category = non_empty(self.category, "category", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        // All required fields are Some once `errors` is empty.
        match (
            serial_number,
            name,
            description,
            price,
            offer_price,
            agent_name,
            category,
        ) {
            (
                Some(serial_number),
                Some(name),
                Some(description),
                Some(price),
                Some(offer_price),
                Some(agent_name),
                Some(category),
            ) => Ok(ProductRecord {
                serial_number,
                name,
                description,
                images: self.images.unwrap_or_default(),
                sizes: self.sizes.unwrap_or_default(),
                colors: self.colors.unwrap_or_default(),
                price,
                offer_price,
                affiliate_link: self.affiliate_link.unwrap_or_default(),
                agent_name,
                category,
            }),
            _ => Err(errors),
        }
    }
}

fn required<T>(value: Option<T>, field: &str, errors: &mut Vec<FieldError>) -> Option<T> {
    if value.is_none() {
        errors.push(FieldError::new(field, "field required"));
    }
    value
}

fn non_empty(value: Option<String>, field: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    match value {
        None => {
            errors.push(FieldError::new(field, "field required"));
            None
        }
        Some(s) if s.is_empty() => {
            errors.push(FieldError::new(field, "must not be empty"));
            None
        }
        Some(s) => Some(s),
    }
}

fn positive(value: Option<i64>, field: &str, errors: &mut Vec<FieldError>) -> Option<i64> {
    match value {
        None => {
            errors.push(FieldError::new(field, "field required"));
            None
        }
        Some(v) if v <= 0 => {
            errors.push(FieldError::new(field, "must be greater than 0"));
            None
        }
        Some(v) => Some(v),
    }
}
