//! Data models for the contacts API

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a record that has not been persisted yet
pub const UNSAVED_ID: i64 = 0;

/// Contacts API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactsConfig {
    /// Base URL of the REST API, e.g. `http://localhost:8000/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (transport default when unset)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl ContactsConfig {
    /// Create a new config for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: None,
        }
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

pub fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

/// Contact ("persona") record
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Contact {
    /// Server-assigned identifier, `0` until persisted
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    /// Profile picture URI
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub phones: Vec<Phone>,
    #[serde(default)]
    pub emails: Vec<Email>,
}

impl Contact {
    /// Create a new, unsaved contact with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether the record still lacks a server identifier
    pub fn is_new(&self) -> bool {
        self.id == UNSAVED_ID
    }

    /// Name and last name joined for display
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.last_name).trim().to_string()
    }

    /// Set the last name
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }

    /// Set the company
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    /// Append a phone entry
    pub fn with_phone(mut self, phone: Phone) -> Self {
        self.phones.push(phone);
        self
    }

    /// Append an email entry
    pub fn with_email(mut self, email: Email) -> Self {
        self.emails.push(email);
        self
    }
}

/// Phone number owned by a contact
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Phone {
    #[serde(default)]
    pub id: i64,
    /// Owning contact
    #[serde(default)]
    pub persona_id: i64,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub label: String,
}

impl Phone {
    /// Unsaved phone entry, not yet tied to a contact
    pub fn new(number: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            persona_id: UNSAVED_ID,
            number: number.into(),
            label: label.into(),
        }
    }
}

/// Email address owned by a contact
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Email {
    #[serde(default)]
    pub id: i64,
    /// Owning contact
    #[serde(default)]
    pub persona_id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub label: String,
}

impl Email {
    /// Unsaved email entry, not yet tied to a contact
    pub fn new(email: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            persona_id: UNSAVED_ID,
            email: email.into(),
            label: label.into(),
        }
    }
}

/// Error returned when a label is outside its fixed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label: {}", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

/// Labels a phone entry may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhoneLabel {
    #[default]
    Casa,
    Trabajo,
    Celular,
}

impl PhoneLabel {
    pub const ALL: [PhoneLabel; 3] = [Self::Casa, Self::Trabajo, Self::Celular];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Casa => "Casa",
            Self::Trabajo => "Trabajo",
            Self::Celular => "Celular",
        }
    }
}

impl fmt::Display for PhoneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhoneLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Labels an email entry may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailLabel {
    #[default]
    Persona,
    Trabajo,
    Universidad,
}

impl EmailLabel {
    pub const ALL: [EmailLabel; 3] = [Self::Persona, Self::Trabajo, Self::Universidad];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persona => "Persona",
            Self::Trabajo => "Trabajo",
            Self::Universidad => "Universidad",
        }
    }
}

impl fmt::Display for EmailLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}
