use crate::Value;
use indexmap::IndexMap;

/// Named parameters of a statement, in the order they were bound.
///
/// Names are stored without the dialect prefix, the SQL text references them as
/// `{prefix}{name}`.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Parameters(IndexMap<String, Value>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value under a fresh name derived from `base` and return the name.
    ///
    /// The name is `{base}_{i}` with the lowest `i` starting from 0 that is not yet taken, so
    /// the same property can be compared several times within one statement.
    pub fn bind(&mut self, base: &str, value: Value) -> String {
        let mut i = 0usize;
        let name = loop {
            let name = format!("{base}_{i}");
            if !self.0.contains_key(&name) {
                break name;
            }
            i += 1;
        };
        self.0.insert(name.clone(), value);
        name
    }

    /// Insert a value under an exact name, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn extend(&mut self, other: Parameters) {
        self.0.extend(other.0);
    }
}

impl IntoIterator for Parameters {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
