//! Phone value object.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Already canonical: `NNN-NNN-NNNN` with a 2-9 leading digit.
static DASHED_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[2-9][0-9]{2}-[0-9]{3}-[0-9]{4}$").expect("Failed to compile dashed phone regex")
});

/// Ten unbroken digits with a 2-9 leading digit.
static UNBROKEN_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[2-9][0-9]{9}$").expect("Failed to compile unbroken phone regex")
});

/// Kind of phone contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PhoneCategory {
    Mobile,
    Home,
    Other,
}

impl PhoneCategory {
    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "MOBILE",
            Self::Home => "HOME",
            Self::Other => "OTHER",
        }
    }
}

impl FromStr for PhoneCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MOBILE" => Ok(Self::Mobile),
            "HOME" => Ok(Self::Home),
            "OTHER" => Ok(Self::Other),
            other => Err(ValidationError::InvalidPhoneType(other.to_string())),
        }
    }
}

impl fmt::Display for PhoneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural form of a phone as it appears on the wire, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhoneDocument {
    #[serde(default)]
    pub number: Option<String>,

    #[serde(default, rename = "type")]
    pub category: Option<String>,
}

/// A validated phone number with its category.
///
/// The number is always held in the canonical `NNN-NNN-NNNN` form. Construction
/// is the only place validation and normalization happen.
///
/// # Example
///
/// ```
/// use addressbook_server::domain::{Phone, PhoneCategory};
///
/// let phone = Phone::new("7778889999", PhoneCategory::Mobile).unwrap();
/// assert_eq!(phone.number(), "777-888-9999");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PhoneDocument")]
pub struct Phone {
    number: String,

    #[serde(rename = "type")]
    category: PhoneCategory,
}

impl Phone {
    /// Create a new Phone, normalizing the number into dashed form.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPhone` if the number is neither
    /// `NNN-NNN-NNNN` nor ten unbroken digits, or starts with 0 or 1.
    pub fn new(number: impl AsRef<str>, category: PhoneCategory) -> Result<Self, ValidationError> {
        Ok(Self {
            number: Self::normalize(number.as_ref())?,
            category,
        })
    }

    /// Create a Phone from possibly absent parts.
    ///
    /// The number is checked before the category, so a badly formatted number
    /// is reported even when the category is also absent.
    pub fn from_parts(
        number: Option<&str>,
        category: Option<PhoneCategory>,
    ) -> Result<Self, ValidationError> {
        let number = number.ok_or(ValidationError::Missing("phone number"))?;
        let number = Self::normalize(number)?;
        let category = category.ok_or(ValidationError::Missing("phone number type"))?;
        Ok(Self { number, category })
    }

    fn normalize(number: &str) -> Result<String, ValidationError> {
        if DASHED_NUMBER.is_match(number) {
            return Ok(number.to_string());
        }
        if UNBROKEN_NUMBER.is_match(number) {
            return Ok(format!("{}-{}-{}", &number[..3], &number[3..6], &number[6..]));
        }
        Err(ValidationError::InvalidPhone(number.to_string()))
    }

    /// Phone number in the form `NNN-NNN-NNNN`.
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn category(&self) -> PhoneCategory {
        self.category
    }
}

impl TryFrom<PhoneDocument> for Phone {
    type Error = ValidationError;

    fn try_from(doc: PhoneDocument) -> Result<Self, Self::Error> {
        let category = doc
            .category
            .as_deref()
            .map(PhoneCategory::from_str)
            .transpose()?;
        Phone::from_parts(doc.number.as_deref(), category)
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.number)
    }
}
