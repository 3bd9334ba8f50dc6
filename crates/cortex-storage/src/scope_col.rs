//! The `scope_id` column convention shared by every query module: the
//! empty string represents [`Scope::Global`], matching `Scope::as_db_value`
//! (`None` for global) without the NULL-is-never-equal-to-NULL pitfall a
//! nullable `UNIQUE`/`PRIMARY KEY` column would hit in SQLite.

use cortex_core::Scope;

pub fn scope_col(scope: &Scope) -> String {
    scope.as_db_value().unwrap_or("").to_string()
}

pub fn scope_from_col(value: &str) -> Scope {
    if value.is_empty() {
        Scope::Global
    } else {
        Scope::Project(value.to_string())
    }
}

/// The set of `scope_id` values visible to a reader in `scope`, per
/// `Scope::visible_to`: global rows are always visible; a project reader
/// additionally sees its own project's rows, and sees global rows only when
/// `include_global` is set.
pub fn visible_scope_ids(scope: &Scope, include_global: bool) -> Vec<String> {
    match scope {
        Scope::Global => vec![String::new()],
        Scope::Project(id) => {
            let mut ids = vec![id.clone()];
            if include_global {
                ids.push(String::new());
            }
            ids
        }
    }
}
