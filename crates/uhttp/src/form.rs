//! Form-encoded request bodies

use std::collections::btree_map::{self, BTreeMap};

/// Content type sent with `FormFields` bodies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Form fields for `HttpClient::post_form`.
///
/// Each key maps to one or more values. Values for the same key keep the order
/// they were added in; keys are encoded in sorted order.
///
/// ```
/// use uhttp::FormFields;
///
/// let mut form = FormFields::new();
/// form.add("park_code", "1234");
/// assert_eq!(form.encode(), "park_code=1234");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to the key's value list
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Replace all values of the key with a single value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.insert(key.into(), vec![value.into()]);
        self
    }

    /// Remove the key and all its values
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.fields.remove(key)
    }

    /// First value of the key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|values| values.first())
            .map(|v| v.as_str())
    }

    /// All values of the key, in insertion order
    pub fn get_all(&self, key: &str) -> &[String] {
        self.fields.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over keys and their value lists
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.fields.iter()
    }

    /// Encode as `application/x-www-form-urlencoded`
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.fields {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormFields::new();
        form.extend(iter);
        form
    }
}

impl<K, V> Extend<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<'a> IntoIterator for &'a FormFields {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field() {
        let mut form = FormFields::new();
        form.add("park_code", "1234");
        assert_eq!(form.encode(), "park_code=1234");
    }

    #[test]
    fn test_repeated_key_keeps_value_order() {
        let mut form = FormFields::new();
        form.add("plate", "B").add("plate", "A").add("plate", "C");
        assert_eq!(form.get("plate"), Some("B"));
        assert_eq!(form.get_all("plate"), ["B", "A", "C"]);
        assert_eq!(form.encode(), "plate=B&plate=A&plate=C");
        assert_eq!(form.len(), 1);
    }

    #[test]
    fn test_keys_sorted() {
        let form: FormFields = [("protocol", "1"), ("park_code", "1234")]
            .into_iter()
            .collect();
        assert_eq!(form.encode(), "park_code=1234&protocol=1");
    }

    #[test]
    fn test_values_percent_encoded() {
        let mut form = FormFields::new();
        form.add("q", "a b&c=d/é");
        assert_eq!(form.encode(), "q=a+b%26c%3Dd%2F%C3%A9");
    }

    #[test]
    fn test_set_replaces_values() {
        let mut form = FormFields::new();
        form.add("k", "1").add("k", "2");
        form.set("k", "3");
        assert_eq!(form.get_all("k"), ["3"]);
    }

    #[test]
    fn test_remove_and_missing_key() {
        let mut form = FormFields::new();
        form.add("k", "1");
        assert_eq!(form.remove("k"), Some(vec!["1".to_string()]));
        assert!(form.is_empty());
        assert_eq!(form.get("k"), None);
        assert!(form.get_all("k").is_empty());
        assert_eq!(form.encode(), "");
    }
}
