use crate::error::{Result, StockError};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Product type used when none is given.
pub const DEFAULT_KIND: &str = "Other";

/// Wire format for expiry dates, both in the persisted JSON and in CSV files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Opaque product identifier. Unique within a store, never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a fresh id: `med_<unix millis>_<9 random chars>`.
    ///
    /// The random part covers ids minted within the same millisecond. Callers that
    /// need a hard guarantee (the store) still check against existing ids.
    pub fn mint() -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self(format!(
            "med_{}_{}",
            Utc::now().timestamp_millis(),
            &random[..9]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Who a medication is meant for. Closed set; also the filter axis of the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[serde(alias = "Criança")]
    Child,
    #[serde(alias = "Adulto")]
    Adult,
    #[default]
    #[serde(alias = "Ambos")]
    Both,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Child, Category::Adult, Category::Both];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Child => "Child",
            Category::Adult => "Adult",
            Category::Both => "Both",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = StockError;

    /// Accepts the tag names and the Portuguese labels of older exports, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "child" | "criança" | "crianca" => Ok(Category::Child),
            "adult" | "adulto" => Ok(Category::Adult),
            "both" | "ambos" => Ok(Category::Both),
            other => Err(StockError::InvalidInput(format!(
                "Unknown category: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "stock_quantity::deserialize", default)]
    pub quantity: u32,
    #[serde(with = "expiry_date", default)]
    pub expiry_date: Option<NaiveDate>,
}

/// Everything needed to create a product, minus the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub category: Category,
    pub kind: String,
    pub quantity: u32,
    pub expiry_date: Option<NaiveDate>,
}

impl ProductDraft {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        kind: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            kind: kind.into(),
            quantity,
            expiry_date: None,
        }
    }

    pub fn with_expiry(mut self, date: NaiveDate) -> Self {
        self.expiry_date = Some(date);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            kind: self.kind,
            quantity: self.quantity,
            expiry_date: self.expiry_date,
        }
    }
}

/// Partial replacement of a product's fields. `None` leaves a field untouched;
/// `expiry_date: Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub kind: Option<String>,
    pub quantity: Option<u32>,
    pub expiry_date: Option<Option<NaiveDate>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.kind.is_none()
            && self.quantity.is_none()
            && self.expiry_date.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }

    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(kind) = &self.kind {
            product.kind = kind.clone();
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(expiry) = self.expiry_date {
            product.expiry_date = expiry;
        }
    }
}

/// Raw form values as typed by a user, before any parsing.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub kind: String,
    pub quantity: String,
    pub expiry_date: String,
}

impl ProductForm {
    pub fn into_draft(self) -> Result<ProductDraft> {
        let name = self.name.trim().to_string();
        validate_name(&name)?;

        let category = parse_category_or_default(&self.category)?;

        let kind = match self.kind.trim() {
            "" => DEFAULT_KIND.to_string(),
            k => k.to_string(),
        };

        Ok(ProductDraft {
            name,
            category,
            kind,
            quantity: parse_quantity(&self.quantity)?,
            expiry_date: parse_expiry(&self.expiry_date)?,
        })
    }
}

/// Raw edit values. Only the fields that were filled in end up in the patch.
#[derive(Debug, Clone, Default)]
pub struct PatchForm {
    pub name: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub quantity: Option<String>,
    pub expiry_date: Option<String>,
}

impl PatchForm {
    pub fn into_patch(self) -> Result<ProductPatch> {
        let patch = ProductPatch {
            name: self.name.map(|n| n.trim().to_string()),
            category: self
                .category
                .map(|c| parse_category_or_default(&c))
                .transpose()?,
            kind: self.kind.map(|k| match k.trim() {
                "" => DEFAULT_KIND.to_string(),
                k => k.to_string(),
            }),
            quantity: self.quantity.map(|q| parse_quantity(&q)).transpose()?,
            expiry_date: self.expiry_date.map(|e| parse_expiry(&e)).transpose()?,
        };
        patch.validate()?;
        Ok(patch)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StockError::InvalidInput("Name cannot be empty".into()));
    }
    if name.chars().any(char::is_control) {
        return Err(StockError::InvalidInput(
            "Name cannot contain line breaks or control characters".into(),
        ));
    }
    Ok(())
}

fn parse_category_or_default(raw: &str) -> Result<Category> {
    if raw.trim().is_empty() {
        Ok(Category::default())
    } else {
        raw.parse()
    }
}

/// Parses a stock count. Decimals are truncated, blanks count as zero.
pub fn parse_quantity(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| StockError::InvalidInput(format!("Invalid quantity: {}", raw)))?;
    if !value.is_finite() || value < 0.0 {
        return Err(StockError::InvalidInput(format!(
            "Quantity must be a non-negative number: {}",
            raw
        )));
    }
    Ok(value.trunc().min(u32::MAX as f64) as u32)
}

/// Parses a `YYYY-MM-DD` date; a blank value means "no expiry date".
pub fn parse_expiry(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| StockError::InvalidInput(format!("Invalid date (expected YYYY-MM-DD): {}", raw)))
}

/// Lenient reader for stored quantities. Older records may hold decimals, numeric
/// strings or `null`; decimals are truncated and anything unreadable or negative is 0.
pub(crate) mod stock_quantity {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Number(n)) => n,
            Some(Raw::Text(s)) => s.trim().parse().unwrap_or(0.0),
            None => 0.0,
        };
        if value.is_finite() && value >= 0.0 {
            Ok(value.trunc().min(u32::MAX as f64) as u32)
        } else {
            Ok(0)
        }
    }
}

/// Serde adapter storing `Option<NaiveDate>` as `"YYYY-MM-DD"` or `""`.
pub(crate) mod expiry_date {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map(Some)
                .map_err(de::Error::custom),
        }
    }
}
