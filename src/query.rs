//! Request-scoped query parameters for property reads.

use std::collections::HashSet;

/// Requested response field names. Matching is case-insensitive and names are
/// trimmed on input; an empty selection means no projection is applied.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    names: HashSet<String>,
}

impl Fields {
    /// Build a selection from raw parameter values. Each value may carry a
    /// comma-separated list; blanks are dropped.
    pub fn new<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = raw
            .into_iter()
            .flat_map(|value| {
                value
                    .as_ref()
                    .split(',')
                    .map(|part| part.trim().to_ascii_lowercase())
                    .collect::<Vec<_>>()
            })
            .filter(|part| !part.is_empty())
            .collect();
        Self { names }
    }

    pub fn is_enabled(&self) -> bool {
        !self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }
}

/// Transient value object shaping one property read.
#[derive(Debug, Clone, Default)]
pub struct PropertyQuery {
    pub id: Option<String>,
    pub set: Option<String>,
    pub fields: Fields,
}

impl PropertyQuery {
    pub fn has_set(&self) -> bool {
        self.set.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// The named filter group, if one was requested.
    pub fn set(&self) -> Option<&str> {
        self.set.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_trim_and_ignore_case() {
        let fields = Fields::new([" a ", "B "]);

        assert!(fields.is_enabled());
        assert!(fields.contains("a"));
        assert!(fields.contains("A"));
        assert!(fields.contains("b"));
        assert!(fields.contains("B"));
        assert!(!fields.contains("3"));
    }

    #[test]
    fn fields_split_commas() {
        let fields = Fields::new(["name, value"]);

        assert!(fields.contains("name"));
        assert!(fields.contains("value"));
        assert!(!fields.contains("id"));
    }

    #[test]
    fn empty_fields_disable_projection() {
        let fields = Fields::new(Vec::<String>::new());
        assert!(!fields.is_enabled());

        let blank = Fields::new([" ", ","]);
        assert!(!blank.is_enabled());
    }

    #[test]
    fn has_set() {
        let mut query = PropertyQuery::default();
        assert!(!query.has_set());

        query.set = Some("set-test".into());
        assert!(query.has_set());
        assert_eq!(query.set(), Some("set-test"));

        query.set = Some(String::new());
        assert!(!query.has_set());
    }
}
