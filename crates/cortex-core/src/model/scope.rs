use serde::{Deserialize, Serialize};

/// Visibility scope attached to every entity in the store.
///
/// `Global` denotes the `NULL` scope from spec.md §3: readable from every
/// project, writable only through an explicit global call. Modeled as an
/// enum (rather than `Option<String>`) so "no scope supplied" and "write to
/// global" are distinguished at the type level, per the "config as tagged
/// variants" design note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Scope {
    Global,
    Project(String),
}

impl Scope {
    pub fn project(id: impl Into<String>) -> Self {
        Self::Project(id.into())
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }

    /// The project id, if this scope is project-bound.
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Scope::Global => None,
            Scope::Project(id) => Some(id.as_str()),
        }
    }

    /// Whether `self` is visible to a reader scoped to `reader`.
    ///
    /// Global entities are visible everywhere; project entities are visible
    /// only to readers in the same project. Global readers only see global
    /// entities (global is not "read everything").
    pub fn visible_to(&self, reader: &Scope) -> bool {
        match self {
            Scope::Global => true,
            Scope::Project(id) => matches!(reader, Scope::Project(r) if r == id),
        }
    }

    /// DB-friendly representation: `None` for global, `Some(id)` otherwise.
    pub fn as_db_value(&self) -> Option<&str> {
        self.project_id()
    }

    pub fn from_db_value(value: Option<String>) -> Self {
        match value {
            None => Scope::Global,
            Some(id) => Scope::Project(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_visible_everywhere() {
        let global = Scope::Global;
        assert!(global.visible_to(&Scope::project("a")));
        assert!(global.visible_to(&Scope::Global));
    }

    #[test]
    fn project_isolated() {
        let a = Scope::project("a");
        let b = Scope::project("b");
        assert!(a.visible_to(&a));
        assert!(!a.visible_to(&b));
        assert!(!a.visible_to(&Scope::Global));
    }

    #[test]
    fn db_value_roundtrip() {
        assert_eq!(Scope::Global.as_db_value(), None);
        assert_eq!(Scope::project("p").as_db_value(), Some("p"));
        assert_eq!(Scope::from_db_value(None), Scope::Global);
        assert_eq!(Scope::from_db_value(Some("p".into())), Scope::project("p"));
    }
}
