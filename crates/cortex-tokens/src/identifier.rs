//! Identifier splitting: camelCase, PascalCase, snake_case, and
//! SCREAMING_SNAKE_CASE all decompose into lowercase parts, while the full
//! identifier is retained as well (spec.md §4.2 — "so both `getUserById`
//! and `get`, `user`, `by`, `id` are indexed").

/// Split `ident` into its constituent lowercase parts. Does not include the
/// unsplit identifier itself; callers combine both.
pub fn split_parts(ident: &str) -> Vec<String> {
    if ident.is_empty() {
        return Vec::new();
    }

    // snake_case / SCREAMING_SNAKE_CASE / kebab-case: split on separators
    // first, then camel-split each piece.
    let mut parts = Vec::new();
    for piece in ident.split(|c: char| c == '_' || c == '-') {
        if piece.is_empty() {
            continue;
        }
        parts.extend(camel_split(piece));
    }
    parts
}

/// Split a single camelCase/PascalCase run into parts, e.g.
/// `getUserByID` -> ["get", "user", "by", "id"].
fn camel_split(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut current = String::new();

    for i in 0..chars.len() {
        let c = chars[i];
        let is_boundary = i > 0
            && ((c.is_uppercase() && chars[i - 1].is_lowercase())
                || (c.is_uppercase()
                    && i + 1 < chars.len()
                    && chars[i + 1].is_lowercase()
                    && chars[i - 1].is_uppercase())
                || (c.is_numeric() != chars[i - 1].is_numeric()));

        if is_boundary && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case() {
        assert_eq!(split_parts("getUserById"), vec!["get", "user", "by", "id"]);
    }

    #[test]
    fn pascal_case() {
        assert_eq!(split_parts("GetUserByID"), vec!["get", "user", "by", "id"]);
    }

    #[test]
    fn snake_case() {
        assert_eq!(split_parts("get_user_by_id"), vec!["get", "user", "by", "id"]);
    }

    #[test]
    fn screaming_snake() {
        assert_eq!(split_parts("MAX_RETRY_COUNT"), vec!["max", "retry", "count"]);
    }

    #[test]
    fn single_lowercase_word_unsplit() {
        assert_eq!(split_parts("getusername"), vec!["getusername"]);
    }

    #[test]
    fn empty_is_empty() {
        assert!(split_parts("").is_empty());
    }
}
