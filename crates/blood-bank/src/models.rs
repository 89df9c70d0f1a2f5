use std::fmt;

use serde::{Deserialize, Serialize};

/// Donor sex as recorded on the donor row and encoded into the PESEL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Returns the single-letter representation used by the relational schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

/// ABO blood type. The schema spells type zero as the digit `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "0")]
    Zero,
    A,
    B,
    #[serde(rename = "AB")]
    Ab,
}

impl BloodType {
    pub const ALL: [BloodType; 4] = [BloodType::Zero, BloodType::A, BloodType::B, BloodType::Ab];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::Zero => "0",
            BloodType::A => "A",
            BloodType::B => "B",
            BloodType::Ab => "AB",
        }
    }
}

/// Rh factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rh {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Rh {
    pub const ALL: [Rh; 2] = [Rh::Plus, Rh::Minus];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rh::Plus => "+",
            Rh::Minus => "-",
        }
    }
}

/// Full blood group, stored relationally as the `blood_info` composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodGroup {
    pub blood_type: BloodType,
    pub rh: Rh,
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.blood_type.as_str(), self.rh.as_str())
    }
}

/// Order state matching the `order_state` database enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_state", rename_all = "UPPERCASE")]
pub enum OrderState {
    Completed,
    Awaiting,
    Canceled,
}

impl OrderState {
    pub const ALL: [OrderState; 3] = [
        OrderState::Completed,
        OrderState::Awaiting,
        OrderState::Canceled,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Completed => "COMPLETED",
            OrderState::Awaiting => "AWAITING",
            OrderState::Canceled => "CANCELED",
        }
    }

    /// Whether orders in this state still receive blood bags.
    pub fn accepts_blood_bags(&self) -> bool {
        matches!(self, OrderState::Completed | OrderState::Awaiting)
    }
}

/// Donor merit certificate level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificateLevel {
    I,
    II,
    III,
}

impl CertificateLevel {
    pub const ALL: [CertificateLevel; 3] = [
        CertificateLevel::I,
        CertificateLevel::II,
        CertificateLevel::III,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateLevel::I => "I",
            CertificateLevel::II => "II",
            CertificateLevel::III => "III",
        }
    }
}
