use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::listing::{
    Listing as DomainListing, ListingDetails, NewListing as DomainNewListing,
};
use crate::domain::types::{ListingId, TypeConstraintError, UserId};
use crate::models::user::User;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = crate::schema::listings)]
/// Diesel model for [`crate::domain::listing::Listing`].
pub struct Listing {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub name_search: String,
    pub description: String,
    pub address: String,
    pub listing_type: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub kitchens: i32,
    pub regular_price: i64,
    pub discount_price: i64,
    pub offer: bool,
    pub parking: bool,
    pub furnished: bool,
    pub image_urls: String, // JSON array of URLs
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::listings)]
/// Insertable form of [`Listing`].
pub struct NewListing<'a> {
    pub user_id: i32,
    pub name: &'a str,
    pub name_search: String,
    pub description: &'a str,
    pub address: &'a str,
    pub listing_type: &'static str,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub kitchens: i32,
    pub regular_price: i64,
    pub discount_price: i64,
    pub offer: bool,
    pub parking: bool,
    pub furnished: bool,
    pub image_urls: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::listings)]
/// Data used when updating a [`Listing`] record.
pub struct UpdateListing<'a> {
    pub name: &'a str,
    pub name_search: String,
    pub description: &'a str,
    pub address: &'a str,
    pub listing_type: &'static str,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub kitchens: i32,
    pub regular_price: i64,
    pub discount_price: i64,
    pub offer: bool,
    pub parking: bool,
    pub furnished: bool,
    pub image_urls: String,
    pub updated_at: NaiveDateTime,
}

/// Lower-cased copy of a listing name used for case-insensitive search.
pub fn search_key(name: &str) -> String {
    name.to_lowercase()
}

fn encode_image_urls(details: &ListingDetails) -> String {
    let urls: Vec<&str> = details.image_urls.iter().map(|url| url.as_str()).collect();
    serde_json::Value::from(urls).to_string()
}

impl TryFrom<Listing> for DomainListing {
    type Error = TypeConstraintError;

    fn try_from(listing: Listing) -> Result<Self, Self::Error> {
        let image_urls: Vec<String> = serde_json::from_str(&listing.image_urls)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("image urls: {e}")))?;

        Ok(Self {
            id: ListingId::new(listing.id)?,
            user_ref: UserId::new(listing.user_id)?,
            name: listing.name,
            description: listing.description,
            address: listing.address,
            listing_type: listing.listing_type.parse()?,
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            kitchens: listing.kitchens,
            regular_price: listing.regular_price,
            discount_price: listing.discount_price,
            offer: listing.offer,
            parking: listing.parking,
            furnished: listing.furnished,
            image_urls,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewListing> for NewListing<'a> {
    fn from(listing: &'a DomainNewListing) -> Self {
        let details = &listing.details;
        Self {
            user_id: listing.user_id.get(),
            name: details.name.as_str(),
            name_search: search_key(&details.name),
            description: details.description.as_str(),
            address: details.address.as_str(),
            listing_type: details.listing_type.as_str(),
            bedrooms: details.bedrooms,
            bathrooms: details.bathrooms,
            kitchens: details.kitchens,
            regular_price: details.regular_price,
            discount_price: details.discount_price,
            offer: details.offer,
            parking: details.parking,
            furnished: details.furnished,
            image_urls: encode_image_urls(details),
            created_at: listing.created_at,
            updated_at: listing.created_at,
        }
    }
}

impl<'a> UpdateListing<'a> {
    pub fn new(details: &'a ListingDetails, updated_at: NaiveDateTime) -> Self {
        Self {
            name: details.name.as_str(),
            name_search: search_key(&details.name),
            description: details.description.as_str(),
            address: details.address.as_str(),
            listing_type: details.listing_type.as_str(),
            bedrooms: details.bedrooms,
            bathrooms: details.bathrooms,
            kitchens: details.kitchens,
            regular_price: details.regular_price,
            discount_price: details.discount_price,
            offer: details.offer,
            parking: details.parking,
            furnished: details.furnished,
            image_urls: encode_image_urls(details),
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{ListingDraft, ListingType};
    use chrono::Utc;

    fn sample_details() -> ListingDetails {
        ListingDetails::try_new(ListingDraft {
            name: "Élégant Loft in Town".to_string(),
            description: "Bright".to_string(),
            address: "2 Main St".to_string(),
            listing_type: ListingType::Rent,
            bedrooms: 1,
            bathrooms: 1,
            kitchens: 1,
            regular_price: 700,
            discount_price: 0,
            image_urls: vec![
                "https://cdn.example.com/a.png".to_string(),
                "https://cdn.example.com/b.png".to_string(),
            ],
            ..ListingDraft::default()
        })
        .unwrap()
    }

    #[test]
    fn from_domain_new_creates_newlisting() {
        let domain = DomainNewListing::new(UserId::new(3).unwrap(), sample_details());
        let new: NewListing = (&domain).into();
        assert_eq!(new.user_id, 3);
        assert_eq!(new.name_search, "élégant loft in town");
        assert_eq!(new.listing_type, "rent");
        assert_eq!(
            new.image_urls,
            r#"["https://cdn.example.com/a.png","https://cdn.example.com/b.png"]"#
        );
        assert_eq!(new.created_at, new.updated_at);
    }

    #[test]
    fn listing_into_domain() {
        let now = Utc::now().naive_utc();
        let db_listing = Listing {
            id: 1,
            user_id: 2,
            name: "n".to_string(),
            name_search: "n".to_string(),
            description: "d".to_string(),
            address: "a".to_string(),
            listing_type: "sale".to_string(),
            bedrooms: 1,
            bathrooms: 2,
            kitchens: 1,
            regular_price: 10,
            discount_price: 5,
            offer: true,
            parking: true,
            furnished: false,
            image_urls: r#"["https://x.test/1.png"]"#.to_string(),
            created_at: now,
            updated_at: now,
        };
        let domain = DomainListing::try_from(db_listing).unwrap();
        assert_eq!(domain.id.get(), 1);
        assert_eq!(domain.user_ref.get(), 2);
        assert_eq!(domain.listing_type, ListingType::Sale);
        assert_eq!(domain.image_urls, vec!["https://x.test/1.png".to_string()]);
    }

    #[test]
    fn corrupt_image_urls_are_reported() {
        let now = Utc::now().naive_utc();
        let db_listing = Listing {
            id: 1,
            user_id: 2,
            name: "n".to_string(),
            name_search: "n".to_string(),
            description: "d".to_string(),
            address: "a".to_string(),
            listing_type: "rent".to_string(),
            bedrooms: 1,
            bathrooms: 1,
            kitchens: 1,
            regular_price: 10,
            discount_price: 0,
            offer: false,
            parking: false,
            furnished: false,
            image_urls: "not json".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            DomainListing::try_from(db_listing),
            Err(TypeConstraintError::InvalidValue(_))
        ));
    }
}
