//! Servants: the people assigned responsibilities over units

use crate::identifiers::ServantId;
use crate::text;
use serde::{Deserialize, Serialize};

/// Gender of a servant, when recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Parse the spreadsheet vocabulary for gender, tolerating the common
    /// variants the source data contains. Unknown values parse to `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match text::fold(raw).as_str() {
            "m" | "masculino" | "hombre" => Some(Self::Male),
            "f" | "femenino" | "feminino" | "mujer" => Some(Self::Female),
            "otro" | "x" => Some(Self::Other),
            _ => None,
        }
    }
}

/// A person record, independent of whether the person has a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Servant {
    /// Stable unique identifier
    pub id: ServantId,

    /// First name (required)
    pub first_name: String,

    /// First surname (required)
    pub last_name1: String,

    /// Second surname, when present
    pub last_name2: Option<String>,

    /// Gender, when recorded
    pub gender: Option<Gender>,

    /// Email address; unique across servants when present
    pub email: Option<String>,

    /// Birth month (1-12), when recorded
    pub birth_month: Option<u8>,

    /// Birth day (1-31), when recorded
    pub birth_day: Option<u8>,

    /// Correlation key into the external staff registry; unique when present
    pub staff_key: Option<u32>,
}

impl Servant {
    /// Create a new servant with the required name parts
    pub fn new(
        id: ServantId,
        first_name: impl Into<String>,
        last_name1: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name1: last_name1.into(),
            last_name2: None,
            gender: None,
            email: None,
            birth_month: None,
            birth_day: None,
            staff_key: None,
        }
    }

    /// Set the second surname
    pub fn with_last_name2(mut self, last_name2: impl Into<String>) -> Self {
        self.last_name2 = Some(last_name2.into());
        self
    }

    /// Set the gender
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Set the email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the birth month and day
    pub fn with_birth_date(mut self, month: u8, day: u8) -> Self {
        self.birth_month = Some(month);
        self.birth_day = Some(day);
        self
    }

    /// Set the external staff registry key
    pub fn with_staff_key(mut self, key: u32) -> Self {
        self.staff_key = Some(key);
        self
    }

    /// Full display name: first name plus one or two surnames
    pub fn full_name(&self) -> String {
        match &self.last_name2 {
            Some(l2) => format!("{} {} {}", self.first_name, self.last_name1, l2),
            None => format!("{} {}", self.first_name, self.last_name1),
        }
    }
}
