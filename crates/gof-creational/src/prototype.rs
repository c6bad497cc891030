//! Prototype: new users are cloned from a configured template instead of
//! being built field by field.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// A user record. `Clone` is a deep copy; roles are never shared.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Hands out copies of a prototype user.
#[derive(Clone, Debug)]
pub struct UserFactory {
    prototype: UserInfo,
}

impl UserFactory {
    /// Use `prototype` as the template.
    pub fn new(prototype: UserInfo) -> Self {
        Self { prototype }
    }

    /// Parse the template from a JSON document.
    pub fn from_json(config: &str) -> Result<Self> {
        let prototype: UserInfo = serde_json::from_str(config)?;
        debug!(id = prototype.id, name = %prototype.name, "user prototype loaded");
        Ok(Self::new(prototype))
    }

    /// The template itself.
    pub fn prototype(&self) -> &UserInfo {
        &self.prototype
    }

    /// A fresh copy of the template.
    pub fn create(&self) -> UserInfo {
        self.prototype.clone()
    }
}

impl Default for UserFactory {
    /// A guest template: id 1, name "Shinichi", role `guest`.
    fn default() -> Self {
        Self::new(UserInfo {
            id: 1,
            name: "Shinichi".into(),
            roles: vec!["guest".into()],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CreationalError;

    #[test]
    fn copies_are_independent() {
        let factory = UserFactory::default();
        let mut first = factory.create();
        first.roles.push("admin".into());
        first.name = "Ran".into();

        let second = factory.create();
        assert_eq!(second.roles, vec!["guest"]);
        assert_eq!(second.name, "Shinichi");
        assert_eq!(factory.prototype().roles.len(), 1);
    }

    #[test]
    fn template_from_json() {
        let factory = UserFactory::from_json(r#"{"id":7,"name":"Conan","roles":["guest","reader"]}"#).unwrap();
        let user = factory.create();
        assert_eq!(user.id, 7);
        assert_eq!(user.roles, vec!["guest", "reader"]);
    }

    #[test]
    fn roles_default_to_empty() {
        let factory = UserFactory::from_json(r#"{"id":2,"name":"Ai"}"#).unwrap();
        assert!(factory.create().roles.is_empty());
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = UserFactory::from_json("{not json").unwrap_err();
        assert!(matches!(err, CreationalError::InvalidConfig(_)));
    }
}
