use crate::shared::entity::{Entity, ID};

/// A `User` owning one or more `Vehicle`s and receiving reminder emails
#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            id: Default::default(),
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Entity<ID> for User {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
