//! Member records: people and organizations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-specific part of a member.
///
/// Serialized with a `type` tag of `person` or `entity`; a member can never
/// exist without one of the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MemberProfile {
    /// An individual.
    Person {
        /// Given name.
        #[serde(rename = "firstName", default)]
        first_name: String,
        /// Family name.
        #[serde(rename = "lastName", default)]
        last_name: String,
    },
    /// An organization or vendor.
    Entity {
        /// Organization name.
        #[serde(default)]
        name: String,
        /// Whether the entity only operates offline.
        #[serde(default)]
        offline: bool,
    },
}

impl MemberProfile {
    /// Returns the type tag.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Person { .. } => "person",
            Self::Entity { .. } => "entity",
        }
    }

    /// Returns whether this is a person.
    #[must_use]
    pub const fn is_person(&self) -> bool {
        matches!(self, Self::Person { .. })
    }
}

/// A person or entity taking part in event execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Person or entity fields, tagged by `type`.
    #[serde(flatten)]
    pub profile: MemberProfile,
    /// Area of specialization.
    #[serde(default)]
    pub specialized_in: String,
    /// Experience, free text (e.g. `5-10`).
    #[serde(default)]
    pub experience: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Phone number.
    #[serde(default)]
    pub phone: String,
    /// `WhatsApp` number.
    #[serde(default)]
    pub whatsapp: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
}

impl Member {
    /// Creates a person with the given names.
    #[must_use]
    pub fn person(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self::with_profile(MemberProfile::Person {
            first_name: first_name.into(),
            last_name: last_name.into(),
        })
    }

    /// Creates an entity with the given name.
    #[must_use]
    pub fn entity(name: impl Into<String>, offline: bool) -> Self {
        Self::with_profile(MemberProfile::Entity {
            name: name.into(),
            offline,
        })
    }

    /// Creates a member with empty shared fields.
    #[must_use]
    pub const fn with_profile(profile: MemberProfile) -> Self {
        Self {
            profile,
            specialized_in: String::new(),
            experience: String::new(),
            address: String::new(),
            phone: String::new(),
            whatsapp: String::new(),
            email: String::new(),
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Returns a display name: full name for people, name for entities,
    /// falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = match &self.profile {
            MemberProfile::Person {
                first_name,
                last_name,
            } => format!("{first_name} {last_name}").trim().to_string(),
            MemberProfile::Entity { name, .. } => name.trim().to_string(),
        };
        if name.is_empty() {
            self.email.clone()
        } else {
            name
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.profile.type_name())
    }
}
