//! Contact model representing a single address book entry.

use crate::domain::{Phone, PhoneDocument, ValidationError};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Structural form of a contact as it appears on the wire, before validation.
///
/// Decoding into this type never fails on absent fields; [`Contact::try_from`]
/// decides which absences are errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactDocument {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub numbers: Option<Vec<PhoneDocument>>,
}

/// A contact in the address book.
///
/// Identity is the `name`: equality and hashing consider only the name, so two
/// records with the same name but different addresses or phones compare equal.
/// Compare [`Contact::address`] and [`Contact::phones`] explicitly when the
/// full record matters.
///
/// Serialized field order is fixed: `name`, `address`, `numbers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ContactDocument")]
pub struct Contact {
    name: String,

    address: String,

    #[serde(rename = "numbers")]
    phones: Vec<Phone>,
}

impl Contact {
    /// Create a contact.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Missing` if the name is empty and
    /// `ValidationError::InvalidName` if it is `.` or `..`.
    pub fn new(
        name: impl Into<String>,
        phones: Vec<Phone>,
        address: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        Self::check_name(&name)?;
        Ok(Self {
            name,
            address: address.into(),
            phones,
        })
    }

    /// Create a contact from possibly absent parts.
    ///
    /// An absent phone list is an error; an empty one is not.
    pub fn from_parts(
        name: Option<String>,
        phones: Option<Vec<Phone>>,
        address: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.ok_or(ValidationError::Missing("a contact name"))?;
        let phones = phones.ok_or(ValidationError::Missing("phone numbers list"))?;
        let address = address.ok_or(ValidationError::Missing("contact address"))?;
        Self::new(name, phones, address)
    }

    /// Decode a contact from a JSON request body.
    ///
    /// Decoding happens in two phases: the bytes are parsed into a
    /// [`ContactDocument`], which is then passed through the validating
    /// constructors.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let doc: ContactDocument = serde_json::from_slice(body)
            .map_err(|e| ValidationError::MalformedJson(e.to_string()))?;
        Self::try_from(doc)
    }

    /// Check that `name` can serve as a document id.
    ///
    /// Dot segments are collapsed by URL parsing, so `.` and `..` would address
    /// the index rather than a document.
    pub fn check_name(name: &str) -> Result<(), ValidationError> {
        match name {
            "" => Err(ValidationError::Missing("a contact name")),
            "." | ".." => Err(ValidationError::InvalidName(name.to_string())),
            _ => Ok(()),
        }
    }

    /// Unique identity of the contact.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Phone numbers in insertion order.
    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }
}

impl TryFrom<ContactDocument> for Contact {
    type Error = ValidationError;

    fn try_from(doc: ContactDocument) -> Result<Self, Self::Error> {
        // A document without a numbers list is read as having no phones
        let phones = doc
            .numbers
            .unwrap_or_default()
            .into_iter()
            .map(Phone::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Contact::from_parts(doc.name, Some(phones), doc.address)
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Contact {}

impl Hash for Contact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for Contact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
