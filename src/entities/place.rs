use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PolarClass)]
pub struct Place {
    #[polar(attribute)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Coordinates,
    pub image: String,
    #[polar(attribute)]
    pub creator_id: Uuid,
}

impl Place {
    pub fn new(draft: PlaceDraft, location: Coordinates, creator_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            address: draft.address,
            location,
            image: draft.image,
            creator_id,
        }
    }
}

// The location is always derived from the address by the geocoder, so drafts
// carry no coordinates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaceDraft {
    pub title: String,
    pub description: String,
    pub address: String,
    pub image: String,
}

impl PlaceDraft {
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty()
            || self.description.chars().count() < 5
            || self.address.trim().is_empty()
        {
            return Err(Error::validation_error(
                "Invalid inputs passed, please check your data.",
            ));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaceChanges {
    pub title: String,
    pub description: String,
}

impl PlaceChanges {
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() || self.description.chars().count() < 5 {
            return Err(Error::validation_error(
                "Invalid inputs passed, please check your data.",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
fn sample_draft() -> PlaceDraft {
    PlaceDraft {
        title: "Empire State Building".into(),
        description: "One of the most famous sky scrapers in the world!".into(),
        address: "20 W 34th St, New York, NY 10001".into(),
        image: "uploads/images/esb.jpeg".into(),
    }
}

#[test]
fn valid_draft_passes_validation() {
    assert!(sample_draft().validate().is_ok());
}

#[test]
fn draft_with_blank_title_fails_validation() {
    let mut draft = sample_draft();
    draft.title = "   ".into();

    assert!(draft.validate().unwrap_err().is_validation_error());
}

#[test]
fn draft_with_short_description_fails_validation() {
    let mut draft = sample_draft();
    draft.description = "tiny".into();

    assert!(draft.validate().unwrap_err().is_validation_error());
}

#[test]
fn draft_with_empty_address_fails_validation() {
    let mut draft = sample_draft();
    draft.address = "".into();

    assert!(draft.validate().unwrap_err().is_validation_error());
}

#[test]
fn new_place_derives_location_and_keeps_the_creator() {
    let creator_id = Uuid::new_v4();
    let location = Coordinates {
        lat: 40.7484405,
        lng: -73.9878584,
    };

    let place = Place::new(sample_draft(), location, creator_id);

    assert_eq!(place.location, location);
    assert_eq!(place.creator_id, creator_id);
    assert_eq!(place.image, "uploads/images/esb.jpeg");
}

#[test]
fn changes_validate_title_and_description_only() {
    let changes = PlaceChanges {
        title: "Empire State Building".into(),
        description: "Still standing.".into(),
    };
    assert!(changes.validate().is_ok());

    let blank = PlaceChanges {
        title: "".into(),
        description: "Still standing.".into(),
    };
    assert!(blank.validate().unwrap_err().is_validation_error());
}
