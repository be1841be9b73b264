use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateUrl, ValidationError};

use crate::domain::listing::{ListingDetails, ListingDraft, ListingType};
use crate::domain::types::TypeConstraintError;
use crate::forms::plain_text;

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_discount", skip_on_field_errors = false))]
/// Form data for creating or updating a listing.
pub struct ListingForm {
    #[validate(length(
        min = 10,
        max = 62,
        message = "Name must be between 10 and 62 characters"
    ))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    #[validate(range(min = 1, max = 10, message = "Bedrooms must be between 1 and 10"))]
    pub bedrooms: i32,
    #[validate(range(min = 1, max = 10, message = "Bathrooms must be between 1 and 10"))]
    pub bathrooms: i32,
    #[serde(alias = "kitchen")]
    #[validate(range(min = 1, max = 10, message = "Kitchens must be between 1 and 10"))]
    pub kitchens: i32,
    #[validate(range(
        min = 50,
        max = 10_000_000,
        message = "Regular price must be between 50 and 10000000"
    ))]
    pub regular_price: i64,
    #[serde(default)]
    #[validate(range(
        min = 0,
        max = 10_000_000,
        message = "Discount price must be between 0 and 10000000"
    ))]
    pub discount_price: i64,
    #[serde(default)]
    pub offer: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub furnished: bool,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 6, message = "A listing must have between 1 and 6 images"),
        custom(function = "validate_image_urls")
    )]
    pub image_urls: Vec<String>,
}

fn validate_discount(form: &ListingForm) -> Result<(), ValidationError> {
    if form.offer && form.discount_price > form.regular_price {
        return Err(ValidationError::new("discount_price").with_message(Cow::Borrowed(
            "Discount price must be lower than regular price",
        )));
    }
    Ok(())
}

fn validate_image_urls(urls: &[String]) -> Result<(), ValidationError> {
    if urls.iter().all(|url| url.validate_url()) {
        Ok(())
    } else {
        Err(ValidationError::new("image_urls")
            .with_message(Cow::Borrowed("Image URLs must be absolute URLs")))
    }
}

impl ListingForm {
    /// Strips markup from the free-text fields. Validate the result, not the
    /// raw form, so length limits apply to what gets stored.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            name: plain_text(&self.name),
            description: plain_text(&self.description),
            address: plain_text(&self.address),
            ..self
        }
    }

    pub fn to_details(&self) -> Result<ListingDetails, TypeConstraintError> {
        ListingDetails::try_new(ListingDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            address: self.address.clone(),
            listing_type: self.listing_type,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            kitchens: self.kitchens,
            regular_price: self.regular_price,
            discount_price: self.discount_price,
            offer: self.offer,
            parking: self.parking,
            furnished: self.furnished,
            image_urls: self.image_urls.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::validation_message;

    fn form() -> ListingForm {
        ListingForm {
            name: "Cozy cottage near lake".to_string(),
            description: "Quiet and green".to_string(),
            address: "5 Lake Lane".to_string(),
            listing_type: ListingType::Rent,
            bedrooms: 2,
            bathrooms: 1,
            kitchens: 1,
            regular_price: 1200,
            discount_price: 1000,
            offer: true,
            parking: true,
            furnished: false,
            image_urls: vec!["https://cdn.example.com/cottage.png".to_string()],
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(form().validate().is_ok());
        assert!(form().to_details().is_ok());
    }

    #[test]
    fn discount_above_regular_price_is_described() {
        let mut f = form();
        f.discount_price = 1300;
        let errors = f.validate().unwrap_err();
        assert_eq!(
            validation_message(&errors),
            "Discount price must be lower than regular price"
        );
    }

    #[test]
    fn image_count_limits() {
        let mut f = form();
        f.image_urls.clear();
        let errors = f.validate().unwrap_err();
        assert!(validation_message(&errors).contains("between 1 and 6 images"));

        let mut f = form();
        f.image_urls = (0..7)
            .map(|i| format!("https://cdn.example.com/{i}.png"))
            .collect();
        let errors = f.validate().unwrap_err();
        assert!(validation_message(&errors).contains("between 1 and 6 images"));
    }

    #[test]
    fn short_name_is_rejected() {
        let mut f = form();
        f.name = "Hut".to_string();
        let errors = f.validate().unwrap_err();
        assert!(validation_message(&errors).contains("Name must be"));
    }

    #[test]
    fn accepts_browser_json_payload() {
        let json = r#"{
            "name": "Penthouse with a view",
            "description": "Top floor",
            "address": "9 High St",
            "type": "sale",
            "bedrooms": 3,
            "bathrooms": 2,
            "kitchen": 1,
            "regularPrice": 500000,
            "discountPrice": 0,
            "offer": false,
            "parking": true,
            "furnished": true,
            "imageUrls": ["https://cdn.example.com/p.png"],
            "userRef": "ignored"
        }"#;
        let f: ListingForm = serde_json::from_str(json).unwrap();
        assert_eq!(f.kitchens, 1);
        assert_eq!(f.listing_type, ListingType::Sale);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn markup_is_stripped_from_text() {
        let mut f = form();
        f.description = "Nice<script>alert(1)</script> place".to_string();
        let details = f.sanitized().to_details().unwrap();
        assert_eq!(details.description, "Nice place");
    }

    #[test]
    fn sanitized_text_is_stored_unescaped() {
        let mut f = form();
        f.name = "Tom & Jerry's <3 loft".to_string();
        f.description = "Bed &amp; breakfast".to_string();
        let details = f.sanitized().to_details().unwrap();
        assert_eq!(details.name, "Tom & Jerry's <3 loft");
        assert_eq!(details.description, "Bed & breakfast");
    }

    #[test]
    fn name_length_is_checked_after_stripping_markup() {
        let mut f = form();
        f.name = "<b><i>Hut</i></b>".to_string();
        assert!(f.validate().is_ok());

        let errors = f.sanitized().validate().unwrap_err();
        assert!(validation_message(&errors).contains("Name must be"));
    }
}
