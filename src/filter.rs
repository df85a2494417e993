//! Backend-neutral record filters.
//!
//! A [`Filter`] is built once by the finder and rendered by whichever
//! transport runs the query: as a nested JSON object for GraphQL, or as the
//! bracket syntax the REST API takes in its `filter` query parameter.

use serde_json::{Map, Value};

/// A filter over dot-delimited record paths.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact equality.
    Eq { path: String, value: String },

    /// Case-insensitive SQL `LIKE` pattern.
    ILike { path: String, pattern: String },

    /// Case-sensitive SQL `LIKE` pattern.
    Like { path: String, pattern: String },

    /// Any child matches.
    Or(Vec<Filter>),

    /// Every child matches.
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Eq {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive substring match (`%value%`).
    pub fn icontains(path: impl Into<String>, value: &str) -> Self {
        Self::ILike {
            path: path.into(),
            pattern: format!("%{}%", value),
        }
    }

    /// Case-sensitive substring match (`%value%`).
    pub fn contains(path: impl Into<String>, value: &str) -> Self {
        Self::Like {
            path: path.into(),
            pattern: format!("%{}%", value),
        }
    }

    /// Case-insensitive equality, as an `ILIKE` pattern with no wildcards.
    pub fn iexact(path: impl Into<String>, value: &str) -> Self {
        Self::ILike {
            path: path.into(),
            pattern: escape_like(value),
        }
    }

    /// Combine filters with AND, collapsing the trivial cases.
    pub fn all(mut filters: Vec<Filter>) -> Option<Self> {
        match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(Self::And(filters)),
        }
    }

    /// GraphQL filter input (`{"emails": {"primaryEmail": {"eq": "..."}}}`).
    pub fn to_graphql(&self) -> Value {
        match self {
            Self::Eq { path, value } => nest(path, "eq", value),
            Self::ILike { path, pattern } => nest(path, "ilike", pattern),
            Self::Like { path, pattern } => nest(path, "like", pattern),
            Self::Or(children) => combine("or", children),
            Self::And(children) => combine("and", children),
        }
    }

    /// REST filter expression (`emails.primaryEmail[eq]:"..."`).
    pub fn to_rest(&self) -> String {
        match self {
            Self::Eq { path, value } => format!("{}[eq]:{}", path, quote(value)),
            Self::ILike { path, pattern } => format!("{}[ilike]:{}", path, quote(pattern)),
            Self::Like { path, pattern } => format!("{}[like]:{}", path, quote(pattern)),
            Self::Or(children) => format!("or({})", join_rest(children)),
            Self::And(children) => format!("and({})", join_rest(children)),
        }
    }
}

/// Escape `LIKE` metacharacters so `value` only matches itself.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn nest(path: &str, operator: &str, operand: &str) -> Value {
    let mut leaf = Map::new();
    leaf.insert(operator.to_string(), Value::String(operand.to_string()));
    let mut current = Value::Object(leaf);

    for segment in path.rsplit('.') {
        let mut wrapper = Map::new();
        wrapper.insert(segment.to_string(), current);
        current = Value::Object(wrapper);
    }
    current
}

fn combine(operator: &str, children: &[Filter]) -> Value {
    let mut map = Map::new();
    map.insert(
        operator.to_string(),
        Value::Array(children.iter().map(Filter::to_graphql).collect()),
    );
    Value::Object(map)
}

fn join_rest(children: &[Filter]) -> String {
    children
        .iter()
        .map(Filter::to_rest)
        .collect::<Vec<_>>()
        .join(",")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_graphql_nests_paths() {
        let filter = Filter::eq("emails.primaryEmail", "jane@example.com");
        assert_eq!(
            filter.to_graphql(),
            json!({"emails": {"primaryEmail": {"eq": "jane@example.com"}}})
        );
    }

    #[test]
    fn test_graphql_or() {
        let filter = Filter::Or(vec![
            Filter::icontains("name.firstName", "jan"),
            Filter::icontains("name.lastName", "jan"),
        ]);
        assert_eq!(
            filter.to_graphql(),
            json!({"or": [
                {"name": {"firstName": {"ilike": "%jan%"}}},
                {"name": {"lastName": {"ilike": "%jan%"}}}
            ]})
        );
    }

    #[test]
    fn test_rest_bracket_syntax() {
        assert_eq!(
            Filter::eq("emails.primaryEmail", "jane@example.com").to_rest(),
            r#"emails.primaryEmail[eq]:"jane@example.com""#
        );
        assert_eq!(
            Filter::icontains("name", "Acme").to_rest(),
            r#"name[ilike]:"%Acme%""#
        );
        let filter = Filter::Or(vec![Filter::eq("a", "1"), Filter::contains("b", "2")]);
        assert_eq!(filter.to_rest(), r#"or(a[eq]:"1",b[like]:"%2%")"#);
    }

    #[test]
    fn test_rest_escapes_quotes() {
        assert_eq!(
            Filter::eq("name", r#"The "Best" Co"#).to_rest(),
            r#"name[eq]:"The \"Best\" Co""#
        );
    }

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("50% Off"), r"50\% Off");
        assert_eq!(escape_like("a_b\\c"), r"a\_b\\c");
        assert_eq!(escape_like("Acme"), "Acme");
    }

    #[test]
    fn test_iexact_has_no_wildcards() {
        assert_eq!(
            Filter::iexact("name", "50% Off").to_graphql(),
            json!({"name": {"ilike": r"50\% Off"}})
        );
    }

    #[test]
    fn test_all_collapses() {
        assert_eq!(Filter::all(Vec::new()), None);
        assert_eq!(
            Filter::all(vec![Filter::eq("stage", "WON")]),
            Some(Filter::eq("stage", "WON"))
        );
        assert!(matches!(
            Filter::all(vec![Filter::eq("a", "1"), Filter::eq("b", "2")]),
            Some(Filter::And(_))
        ));
    }
}
