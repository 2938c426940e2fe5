use oso::{Oso, PolarClass};

use crate::auth::{Platform, Subject};
use crate::entities::Place;

pub fn new() -> Oso {
    let mut o = Oso::new();

    o.register_class(Platform::get_polar_class()).unwrap();
    o.register_class(Subject::get_polar_class()).unwrap();
    o.register_class(Place::get_polar_class()).unwrap();

    o.load_str(include_str!("rules.polar")).unwrap();

    o
}

#[cfg(test)]
fn sample_place(creator_id: uuid::Uuid) -> Place {
    use crate::entities::{Coordinates, PlaceDraft};

    let draft = PlaceDraft {
        title: "Empire State Building".into(),
        description: "One of the most famous sky scrapers in the world!".into(),
        address: "20 W 34th St, New York, NY 10001".into(),
        image: "uploads/images/esb.jpeg".into(),
    };

    Place::new(
        draft,
        Coordinates {
            lat: 40.7484405,
            lng: -73.9878584,
        },
        creator_id,
    )
}

#[test]
fn any_subject_may_create_places_on_the_platform() {
    use uuid::Uuid;

    let authorizor = new();

    let subject = Subject::new(Uuid::new_v4());

    let result = authorizor.is_allowed(subject.clone(), "create_place", Platform::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(subject, "delete", Platform::default());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn place_creator_role_test() {
    use uuid::Uuid;

    let authorizor = new();

    let creator = Subject::new(Uuid::new_v4());
    let place = sample_place(creator.id);

    let result = authorizor.query_rule("has_role", (creator.clone(), "creator", place.clone()));
    assert!(result.unwrap().next().unwrap().is_ok());

    let result = authorizor.is_allowed(creator.clone(), "update", place.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(creator, "delete", place);
    assert_eq!(result.unwrap(), true);
}

#[test]
fn strangers_may_not_modify_a_place() {
    use uuid::Uuid;

    let authorizor = new();

    let stranger = Subject::new(Uuid::new_v4());
    let place = sample_place(Uuid::new_v4());

    let result = authorizor.query_rule("has_role", (stranger.clone(), "creator", place.clone()));
    assert!(result.unwrap().next().is_none());

    let result = authorizor.is_allowed(stranger.clone(), "update", place.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(stranger, "delete", place);
    assert_eq!(result.unwrap(), false);
}

#[test]
fn place_system_role_test() {
    use uuid::Uuid;

    let authorizor = new();

    let system = Subject::new_system_subject();
    let place = sample_place(Uuid::new_v4());

    let result = authorizor.query_rule("has_role", (system.clone(), "system", place.clone()));
    assert!(result.unwrap().next().unwrap().is_ok());

    let result = authorizor.is_allowed(system.clone(), "update", place.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(system, "delete", place);
    assert_eq!(result.unwrap(), true);
}
