use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ImageUrl, ListingId, NonEmptyString, TypeConstraintError, UserId};

/// Maximum number of images attached to a single listing.
pub const MAX_LISTING_IMAGES: usize = 6;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    #[default]
    Rent,
    Sale,
}

impl ListingType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sale => "sale",
        }
    }
}

impl Display for ListingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rent" => Ok(ListingType::Rent),
            "sale" => Ok(ListingType::Sale),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown listing type `{other}`"
            ))),
        }
    }
}

/// A persisted real-estate record as exposed over the API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub user_ref: UserId,
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub kitchens: i32,
    pub regular_price: i64,
    pub discount_price: i64,
    pub offer: bool,
    pub parking: bool,
    pub furnished: bool,
    pub image_urls: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Owner-editable part of a listing, shared by creation and update.
///
/// Construct it through [`ListingDetails::try_new`], which re-checks the
/// price, count and image invariants.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingDetails {
    pub name: String,
    pub description: String,
    pub address: String,
    pub listing_type: ListingType,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub kitchens: i32,
    pub regular_price: i64,
    pub discount_price: i64,
    pub offer: bool,
    pub parking: bool,
    pub furnished: bool,
    pub image_urls: Vec<ImageUrl>,
}

/// Unchecked input for [`ListingDetails::try_new`].
#[derive(Clone, Debug, Default)]
pub struct ListingDraft {
    pub name: String,
    pub description: String,
    pub address: String,
    pub listing_type: ListingType,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub kitchens: i32,
    pub regular_price: i64,
    pub discount_price: i64,
    pub offer: bool,
    pub parking: bool,
    pub furnished: bool,
    pub image_urls: Vec<String>,
}

fn positive(value: i32, field: &'static str) -> Result<i32, TypeConstraintError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(TypeConstraintError::NonPositiveCount(field))
    }
}

fn non_negative(value: i64, field: &'static str) -> Result<i64, TypeConstraintError> {
    if value >= 0 {
        Ok(value)
    } else {
        Err(TypeConstraintError::NegativePrice(field))
    }
}

impl ListingDetails {
    pub fn try_new(draft: ListingDraft) -> Result<Self, TypeConstraintError> {
        let regular_price = non_negative(draft.regular_price, "regular price")?;
        let discount_price = non_negative(draft.discount_price, "discount price")?;
        if draft.offer && discount_price > regular_price {
            return Err(TypeConstraintError::DiscountExceedsRegularPrice);
        }

        let count = draft.image_urls.len();
        if count == 0 || count > MAX_LISTING_IMAGES {
            return Err(TypeConstraintError::ImageCount(count));
        }
        let image_urls = draft
            .image_urls
            .into_iter()
            .map(ImageUrl::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: NonEmptyString::new(draft.name)?.into_inner(),
            description: NonEmptyString::new(draft.description)?.into_inner(),
            address: NonEmptyString::new(draft.address)?.into_inner(),
            listing_type: draft.listing_type,
            bedrooms: positive(draft.bedrooms, "bedrooms")?,
            bathrooms: positive(draft.bathrooms, "bathrooms")?,
            kitchens: positive(draft.kitchens, "kitchens")?,
            regular_price,
            discount_price,
            offer: draft.offer,
            parking: draft.parking,
            furnished: draft.furnished,
            image_urls,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewListing {
    pub user_id: UserId,
    pub details: ListingDetails,
    pub created_at: NaiveDateTime,
}

impl NewListing {
    #[must_use]
    pub fn new(user_id: UserId, details: ListingDetails) -> Self {
        Self {
            user_id,
            details,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Overrides the creation timestamp, used when importing historical data.
    #[must_use]
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

pub type UpdateListing = ListingDetails;
