use std::collections::BTreeMap;

/// Reference the renderer resolves to its built-in placeholder image.
pub const PLACEHOLDER_IMAGE: &str = "builtin:placeholder";

/// A renderable value bound to one template field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// A reference the resource provider can resolve to image bytes.
    Image(String),
}

impl FieldValue {
    pub fn placeholder_image() -> Self {
        FieldValue::Image(PLACEHOLDER_IMAGE.to_string())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Image(_) => None,
        }
    }

    pub fn as_image_ref(&self) -> Option<&str> {
        match self {
            FieldValue::Image(r) => Some(r),
            FieldValue::Text(_) => None,
        }
    }
}

/// Field name to value, built fresh for every render. Keys are unique; a
/// later insert for the same name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueMapping {
    values: BTreeMap<String, FieldValue>,
}

impl ValueMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(name.into(), value)
    }

    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, FieldValue::Text(text.into()));
        self
    }

    pub fn with_image(mut self, name: impl Into<String>, reference: impl Into<String>) -> Self {
        self.insert(name, FieldValue::Image(reference.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for ValueMapping {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut mapping = ValueMapping::new().with_text("title", "Old");
        let previous = mapping.insert("title", FieldValue::Text("New".into()));
        assert_eq!(previous, Some(FieldValue::Text("Old".into())));
        assert_eq!(mapping.text("title"), Some("New"));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_typed_accessors() {
        let mapping = ValueMapping::new()
            .with_text("title", "Tart")
            .with_image("photo", PLACEHOLDER_IMAGE);
        assert_eq!(mapping.text("photo"), None);
        assert_eq!(
            mapping.get("photo").and_then(FieldValue::as_image_ref),
            Some(PLACEHOLDER_IMAGE)
        );
        assert!(!mapping.contains("steps"));
    }

    #[test]
    fn test_iteration_is_sorted() {
        let mapping = ValueMapping::new().with_text("b", "2").with_text("a", "1");
        let keys: Vec<_> = mapping.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
