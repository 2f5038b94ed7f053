//! Identity store over the in-process database.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::AuthError;
use super::store::IdentityStore;
use crate::memory::{MemoryDb, newest_first};
use crate::models::auth::{Identity, NewIdentity};
use crate::models::{ListQuery, Page};
use crate::uuid::uuidv7;

fn matches_search(identity: &Identity, needle: &str) -> bool {
    identity.name.to_lowercase().contains(needle) || identity.email.to_lowercase().contains(needle)
}

#[async_trait]
impl IdentityStore for MemoryDb {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables.identities.values().find(|i| i.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, AuthError> {
        Ok(self.tables.read().await.identities.get(&id).cloned())
    }

    async fn create(&self, new: NewIdentity) -> Result<Identity, AuthError> {
        let mut tables = self.tables.write().await;
        if tables.identities.values().any(|i| i.email == new.email) {
            return Err(AuthError::Conflict("User already exists".into()));
        }
        let now = Utc::now();
        let identity = Identity {
            id: uuidv7(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            bio: None,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        };
        tables.identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn replace_refresh_token(&self, id: Uuid, token_hash: &str) -> Result<bool, AuthError> {
        let mut tables = self.tables.write().await;
        let Some(identity) = tables.identities.get_mut(&id) else {
            return Ok(false);
        };
        identity.refresh_token_hash = Some(token_hash.to_string());
        identity.updated_at = Utc::now();
        Ok(true)
    }

    async fn compare_and_swap_refresh_token(
        &self,
        id: Uuid,
        expected_hash: &str,
        new_hash: &str,
    ) -> Result<bool, AuthError> {
        let mut tables = self.tables.write().await;
        let Some(identity) = tables.identities.get_mut(&id) else {
            return Ok(false);
        };
        if identity.refresh_token_hash.as_deref() != Some(expected_hash) {
            return Ok(false);
        }
        identity.refresh_token_hash = Some(new_hash.to_string());
        identity.updated_at = Utc::now();
        Ok(true)
    }

    async fn clear_refresh_token(&self, id: Uuid) -> Result<bool, AuthError> {
        let mut tables = self.tables.write().await;
        let Some(identity) = tables.identities.get_mut(&id) else {
            return Ok(false);
        };
        identity.refresh_token_hash = None;
        identity.updated_at = Utc::now();
        Ok(true)
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Identity>, AuthError> {
        let tables = self.tables.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);
        let matching: Vec<&Identity> = tables
            .identities
            .values()
            .filter(|i| needle.as_deref().is_none_or(|n| matches_search(i, n)))
            .collect();
        Ok(newest_first(matching, query, |i| (i.created_at, i.id)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthError> {
        Ok(self.tables.write().await.remove_identity(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    fn new_identity(name: &str, email: &str) -> NewIdentity {
        NewIdentity {
            name: name.into(),
            email: email.into(),
            password_hash: "hash".into(),
            role: Role::Learner,
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryDb::new();
        store.create(new_identity("Ada", "a@x.com")).await.unwrap();
        let err = store.create(new_identity("Bob", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[tokio::test]
    async fn compare_and_swap_requires_current_value() {
        let store = MemoryDb::new();
        let id = store.create(new_identity("Ada", "a@x.com")).await.unwrap().id;

        assert!(!store.compare_and_swap_refresh_token(id, "a", "b").await.unwrap());
        assert!(store.replace_refresh_token(id, "a").await.unwrap());
        assert!(store.compare_and_swap_refresh_token(id, "a", "b").await.unwrap());
        assert!(!store.compare_and_swap_refresh_token(id, "a", "c").await.unwrap());

        let stored = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token_hash.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn clear_and_delete_report_missing_rows() {
        let store = MemoryDb::new();
        let id = store.create(new_identity("Ada", "a@x.com")).await.unwrap().id;
        assert!(store.clear_refresh_token(id).await.unwrap());
        assert!(store.delete(id).await.unwrap());
        assert!(!store.clear_refresh_token(id).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
        assert!(store.find_by_email("a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let store = MemoryDb::new();
        for i in 0..5 {
            store
                .create(new_identity(&format!("Mentor {i}"), &format!("m{i}@x.com")))
                .await
                .unwrap();
        }
        store.create(new_identity("Ada", "ada@x.com")).await.unwrap();

        let page = store.list(&ListQuery::new(Some(1), Some(2), None)).await.unwrap();
        assert_eq!(page.total, 6);
        assert_eq!(page.pages, 3);
        assert_eq!(page.items.len(), 2);

        let page = store
            .list(&ListQuery::new(None, None, Some("MENTOR".into())))
            .await
            .unwrap();
        assert_eq!(page.total, 5);

        let page = store
            .list(&ListQuery::new(None, None, Some("ada@".into())))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Ada");
    }
}
