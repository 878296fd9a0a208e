use std::collections::BTreeMap;

/// Multi-valued query parameter container.
///
/// Adding a key that already exists appends another value instead of
/// replacing the old one. Nothing is ever removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Appends every pair.
    pub fn extend<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.add(key, value);
        }
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key)?.first().map(String::as_str)
    }

    /// Returns every value stored under `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates pairs sorted by key; values of one key keep insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().flat_map(|(key, values)| {
            values
                .iter()
                .map(move |value| (key.as_str(), value.as_str()))
        })
    }

    /// Encodes as `application/x-www-form-urlencoded` without a leading `?`.
    ///
    /// Keys are sorted, repeated keys appear once per value and spaces become `+`.
    pub fn encode(&self) -> String {
        let pairs: Vec<(&str, &str)> = self.iter().collect();
        // Serializing a sequence of string pairs cannot fail.
        serde_urlencoded::to_string(pairs).unwrap_or_default()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::QueryParams;

    #[test]
    fn repeated_keys_accumulate() {
        let mut params = QueryParams::new();
        params.add("properties", "email");
        params.add("properties", "firstname");

        assert_eq!(params.get("properties"), Some("email"));
        assert_eq!(params.get_all("properties"), ["email", "firstname"]);
        assert_eq!(params.encode(), "properties=email&properties=firstname");
    }

    #[test]
    fn encode_sorts_keys_and_escapes_values() {
        let params: QueryParams = [("q", "a b&c"), ("after", "10")].into_iter().collect();
        assert_eq!(params.encode(), "after=10&q=a+b%26c");
    }

    #[test]
    fn extend_from_map_keeps_every_pair() {
        let mut params = QueryParams::new();
        params.extend(HashMap::from([("limit", "10"), ("archived", "false")]));
        params.extend(HashMap::from([("limit", "20")]));

        assert_eq!(params.get_all("limit"), ["10", "20"]);
        assert_eq!(params.get_all("archived"), ["false"]);
        assert_eq!(params.iter().count(), 3);
    }

    #[test]
    fn empty_encodes_to_empty_string() {
        let params = QueryParams::new();
        assert!(params.is_empty());
        assert_eq!(params.encode(), "");
        assert!(params.get_all("missing").is_empty());
    }
}
