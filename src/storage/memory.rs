use crate::storage::backend::{StoreError, TemplateStore};
use async_trait::async_trait;
use plated_template::{OwnerKey, Template};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store; templates are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<HashMap<OwnerKey, Template>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.templates.read().await.len()
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn get_template(&self, key: &OwnerKey) -> Result<Option<Template>, StoreError> {
        Ok(self.templates.read().await.get(key).cloned())
    }

    async fn save_template(&self, key: &OwnerKey, template: Template) -> Result<(), StoreError> {
        self.templates.write().await.insert(key.clone(), template);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plated_template::{builtin_template, Field};
    use plated_types::Rect;

    #[tokio::test]
    async fn test_save_replaces_whole_template() {
        let store = InMemoryTemplateStore::new();
        let key = OwnerKey::recipe("r1").unwrap();

        store.save_template(&key, builtin_template()).await.unwrap();
        let smaller = Template::single_page(vec![Field::text("title", Rect::new(0.0, 0.0, 10.0, 10.0))]);
        store.save_template(&key, smaller.clone()).await.unwrap();

        assert_eq!(store.get_template(&key).await.unwrap(), Some(smaller));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = InMemoryTemplateStore::new();
        store
            .save_template(&OwnerKey::Default, builtin_template())
            .await
            .unwrap();

        let other = OwnerKey::recipe("r2").unwrap();
        assert_eq!(store.get_template(&other).await.unwrap(), None);
        assert!(store.get_template(&OwnerKey::Default).await.unwrap().is_some());
    }
}
