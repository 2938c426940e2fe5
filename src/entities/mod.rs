mod place;
mod user;

pub use place::{Coordinates, Place, PlaceChanges, PlaceDraft};
pub use user::{User, UserDraft};
