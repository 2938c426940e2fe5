use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// The authenticated caller as seen by the engine: the subject id from a
// verified token plus any roles. Distinct from `entities::User`, which is the
// stored account document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub roles: Vec<String>,
}

impl Subject {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            roles: Vec::new(),
        }
    }

    pub fn new_system_subject() -> Self {
        Self {
            id: Uuid::new_v4(),
            roles: vec!["system".into()],
        }
    }

    fn id_equals(&self, id: Uuid) -> bool {
        self.id == id
    }

    fn has_role(&self, role: String) -> bool {
        self.roles.iter().any(|x| x == &role)
    }
}

impl PolarClass for Subject {
    fn get_polar_class_builder() -> oso::ClassBuilder<Subject> {
        oso::Class::builder()
            .name("Subject")
            .add_attribute_getter("id", |recv: &Subject| recv.id.clone())
            .add_attribute_getter("roles", |recv: &Subject| recv.roles.clone())
            .add_method("id_equals", Subject::id_equals)
            .add_method("has_role", Subject::has_role)
    }

    fn get_polar_class() -> oso::Class {
        let builder = Subject::get_polar_class_builder();
        builder.build()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Platform {
    id: Uuid,
}

impl Platform {
    pub fn default() -> Self {
        Self { id: Uuid::nil() }
    }
}

impl PolarClass for Platform {
    fn get_polar_class_builder() -> oso::ClassBuilder<Platform> {
        oso::Class::builder()
            .name("Platform")
            .add_attribute_getter("id", |recv: &Platform| recv.id.clone())
            .add_class_method("default", Platform::default)
    }

    fn get_polar_class() -> oso::Class {
        let builder = Platform::get_polar_class_builder();
        builder.build()
    }
}
