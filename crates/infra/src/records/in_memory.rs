use std::collections::HashSet;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{Record, RecordError, RecordResult, RecordStore};

/// In-memory record store for tests/dev.
///
/// Records are kept in insertion order. The store can be switched offline to
/// simulate a backend outage; every call then fails with
/// [`RecordError::Unavailable`] and nothing changes.
#[derive(Debug)]
pub struct InMemoryRecordStore<R> {
    inner: RwLock<Vec<R>>,
    offline: AtomicBool,
}

impl<R> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_online(&self) -> RecordResult<()> {
        if self.is_offline() {
            return Err(RecordError::Unavailable("backend is offline".to_string()));
        }
        Ok(())
    }
}

impl<R> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> RecordError {
    RecordError::Unavailable("lock poisoned".to_string())
}

#[async_trait]
impl<R: Record> RecordStore<R> for InMemoryRecordStore<R> {
    async fn list(&self, filter: &R::Filter) -> RecordResult<Vec<R>> {
        self.ensure_online()?;
        let records = self.inner.read().map_err(|_| poisoned())?;

        let mut matching: Vec<R> = records
            .iter()
            .filter(|r| r.matches(filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.listing_order(b));
        Ok(matching)
    }

    async fn get_by_id(&self, id: &R::Id) -> RecordResult<Option<R>> {
        self.ensure_online()?;
        let records = self.inner.read().map_err(|_| poisoned())?;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn create(&self, fields: Vec<R::Fields>) -> RecordResult<Vec<R>> {
        self.ensure_online()?;
        let created: Vec<R> = fields
            .into_iter()
            .map(|f| R::from_fields(R::new_id(), f))
            .collect();

        let mut records = self.inner.write().map_err(|_| poisoned())?;
        records.extend(created.iter().cloned());
        Ok(created)
    }

    async fn update(&self, id: &R::Id, fields: R::Fields) -> RecordResult<R> {
        self.ensure_online()?;
        let mut records = self.inner.write().map_err(|_| poisoned())?;

        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| RecordError::NotFound {
                kind: R::KIND,
                id: format!("{id:?}"),
            })?;
        *slot = R::from_fields(id.clone(), fields);
        Ok(slot.clone())
    }

    async fn delete(&self, ids: &[R::Id]) -> RecordResult<()> {
        self.ensure_online()?;
        let mut records = self.inner.write().map_err(|_| poisoned())?;

        let known: HashSet<&R::Id> = records.iter().map(|r| r.id()).collect();
        if let Some(missing) = ids.iter().find(|id| !known.contains(id)) {
            return Err(RecordError::NotFound {
                kind: R::KIND,
                id: format!("{missing:?}"),
            });
        }

        let doomed: HashSet<R::Id> = ids.iter().cloned().collect();
        records.retain(|r| !doomed.contains(r.id()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ClientFilter, ClientRecord};
    use prathabill_core::ClientId;
    use prathabill_parties::Client;

    fn client(name: &str) -> Client {
        Client::new(name, format!("{}@example.com", name.to_lowercase()), "").unwrap()
    }

    #[tokio::test]
    async fn create_assigns_ids_and_echoes_records() {
        let store = InMemoryRecordStore::<ClientRecord>::new();
        let created = store
            .create(vec![client("Acme"), client("Globex")])
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_ne!(created[0].id, created[1].id);
        assert_eq!(created[1].client.name(), "Globex");
        assert_eq!(store.len(), 2);

        let fetched = store.get_by_id(&created[0].id).await.unwrap();
        assert_eq!(fetched, Some(created[0].clone()));
    }

    #[tokio::test]
    async fn update_replaces_fields_in_place() {
        let store = InMemoryRecordStore::<ClientRecord>::new();
        let created = store.create(vec![client("Acme")]).await.unwrap();
        let id = created[0].id;

        let updated = store.update(&id, client("Acme Corp")).await.unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.client.name(), "Acme Corp");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = InMemoryRecordStore::<ClientRecord>::new();
        let err = store.update(&ClientId::new(), client("Ghost")).await.unwrap_err();
        assert!(matches!(err, RecordError::NotFound { kind: "client", .. }));
    }

    #[tokio::test]
    async fn delete_is_all_or_nothing() {
        let store = InMemoryRecordStore::<ClientRecord>::new();
        let created = store.create(vec![client("Acme")]).await.unwrap();
        let id = created[0].id;

        let err = store.delete(&[id, ClientId::new()]).await.unwrap_err();
        assert!(matches!(err, RecordError::NotFound { .. }));
        assert_eq!(store.len(), 1);

        store.delete(&[id]).await.unwrap();
        assert!(store.is_empty());

        // Deleting again reports failure without disturbing the store.
        assert!(store.delete(&[id]).await.is_err());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn offline_store_fails_every_call_without_changes() {
        let store = InMemoryRecordStore::<ClientRecord>::new();
        store.create(vec![client("Acme")]).await.unwrap();
        store.set_offline(true);

        assert!(matches!(
            store.list(&ClientFilter::default()).await,
            Err(RecordError::Unavailable(_))
        ));
        assert!(store.create(vec![client("Globex")]).await.is_err());
        store.set_offline(false);
        assert_eq!(store.list(&ClientFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_applies_filter() {
        let store = InMemoryRecordStore::<ClientRecord>::new();
        store
            .create(vec![client("Acme"), client("Globex"), client("Acme East")])
            .await
            .unwrap();

        let filter = ClientFilter {
            name_contains: Some("acme".to_string()),
        };
        let names: Vec<String> = store
            .list(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.client.name().to_string())
            .collect();
        assert_eq!(names, ["Acme", "Acme East"]);
    }
}
