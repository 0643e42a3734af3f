//! Caller-supplied arguments and their resolved, ordered form.
//!
//! Callers hand the resolver an [`Arguments`] bag mixing positional and named
//! values. Argument resolution walks the declared parameter list and produces
//! a [`ResolvedArguments`] mapping, ordered by parameter declaration, with
//! every value already passed through parameter-attribute resolution. The
//! caller substitutes the returned mapping for its own storage; nothing is
//! mutated in place.

use std::collections::HashMap;

use crate::metadata::Value;

/// Caller-supplied argument bag: positional values plus name-keyed values.
///
/// During resolution a named value wins over a positional one for the same
/// parameter.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    positional: Vec<Value>,
    named: HashMap<String, Value>,
}

impl Arguments {
    /// No arguments at all.
    #[must_use]
    pub fn none() -> Arguments {
        Arguments::default()
    }

    /// Build from positional values only.
    #[must_use]
    pub fn positional(values: impl IntoIterator<Item = Value>) -> Arguments {
        Arguments {
            positional: values.into_iter().collect(),
            named: HashMap::new(),
        }
    }

    /// Build from named values only.
    #[must_use]
    pub fn named<N: Into<String>>(pairs: impl IntoIterator<Item = (N, Value)>) -> Arguments {
        Arguments {
            positional: Vec::new(),
            named: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    /// Append a positional value.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Arguments {
        self.positional.push(value.into());
        self
    }

    /// Insert a named value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Arguments {
        self.named.insert(name.into(), value.into());
        self
    }

    /// The value supplied for a parameter name, if any.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// The value supplied at a positional index, if any.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// True iff neither positional nor named values were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Arguments::positional(values)
    }
}

/// The ordered name-to-value mapping argument resolution produces.
///
/// Order equals parameter declaration order. Handlers receive this mapping on
/// invocation and forward it transparently down the chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedArguments {
    entries: Vec<(String, Value)>,
}

impl ResolvedArguments {
    /// The empty mapping, used when invoking no-argument handlers.
    #[must_use]
    pub fn empty() -> ResolvedArguments {
        ResolvedArguments::default()
    }

    /// Build directly from ordered pairs, bypassing resolution.
    #[must_use]
    pub fn from_pairs<N: Into<String>>(
        pairs: impl IntoIterator<Item = (N, Value)>,
    ) -> ResolvedArguments {
        ResolvedArguments {
            entries: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    pub(crate) fn push(&mut self, name: String, value: Value) {
        self.entries.push((name, value));
    }

    /// The resolved value for a parameter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// The resolved value at a declaration position.
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|(_, v)| v)
    }

    /// Resolved values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Ordered `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.entries.iter()
    }

    /// Number of resolved entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True iff the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ResolvedArguments {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_and_positional_coexist() {
        let args = Arguments::positional([Value::Int(1)]).with("b", Value::Int(2));
        assert_eq!(args.at(0), Some(&Value::Int(1)));
        assert_eq!(args.by_name("b"), Some(&Value::Int(2)));
        assert_eq!(args.by_name("a"), None);
        assert!(!args.is_empty());
    }

    #[test]
    fn test_resolved_order_and_lookup() {
        let mut resolved = ResolvedArguments::empty();
        resolved.push("a".to_string(), Value::Int(1));
        resolved.push("b".to_string(), Value::Int(2));

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.get("b"), Some(&Value::Int(2)));
        assert_eq!(resolved.value_at(0), Some(&Value::Int(1)));

        let names: Vec<String> = resolved.into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
