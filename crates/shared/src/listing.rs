use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{FeedbackId, RoomId, UserId},
    error::ServiceError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomListing {
    pub room_id: RoomId,
    pub owner_id: UserId,
    pub owner_name: String,
    pub location: String,
    pub price: f64,
    pub description: String,
    pub room_type: Option<String>,
    pub contact_number: Option<String>,
    pub map_link: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl RoomListing {
    pub fn formatted_price(&self) -> String {
        format!("৳{:.0}/month", self.price)
    }

    pub fn short_description(&self) -> String {
        const LIMIT: usize = 100;
        if self.description.chars().count() <= LIMIT {
            return self.description.clone();
        }
        let cut: String = self.description.chars().take(LIMIT).collect();
        format!("{cut}...")
    }
}

/// Fields an owner fills in when listing or editing a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoom {
    pub location: String,
    pub price: f64,
    pub description: String,
    pub room_type: Option<String>,
    pub contact_number: Option<String>,
    pub map_link: Option<String>,
}

impl NewRoom {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.location.trim().is_empty() {
            return Err(ServiceError::validation("Location is required."));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ServiceError::validation("Price must be a positive number."));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub feedback_id: FeedbackId,
    pub user_id: UserId,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBand {
    #[default]
    Any,
    UpTo5000,
    From5000To10000,
    From10000To15000,
    Above15000,
}

impl PriceBand {
    pub const ALL: [PriceBand; 5] = [
        PriceBand::Any,
        PriceBand::UpTo5000,
        PriceBand::From5000To10000,
        PriceBand::From10000To15000,
        PriceBand::Above15000,
    ];

    pub fn contains(self, price: f64) -> bool {
        match self {
            PriceBand::Any => true,
            PriceBand::UpTo5000 => price <= 5_000.0,
            PriceBand::From5000To10000 => price > 5_000.0 && price <= 10_000.0,
            PriceBand::From10000To15000 => price > 10_000.0 && price <= 15_000.0,
            PriceBand::Above15000 => price > 15_000.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceBand::Any => "All Prices",
            PriceBand::UpTo5000 => "0-5000",
            PriceBand::From5000To10000 => "5000-10000",
            PriceBand::From10000To15000 => "10000-15000",
            PriceBand::Above15000 => "15000+",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|band| band.label() == label.trim())
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomFilter {
    /// `None` means every location.
    pub location: Option<String>,
    pub price: PriceBand,
    pub available_only: bool,
}

impl RoomFilter {
    pub fn matches(&self, room: &RoomListing) -> bool {
        let location_match = self
            .location
            .as_deref()
            .is_none_or(|location| room.location.eq_ignore_ascii_case(location));
        location_match && self.price.contains(room.price) && (!self.available_only || room.available)
    }
}
