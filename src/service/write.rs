//! Write service
//!
//! The create/update/delete pipelines. Every pipeline validates before it
//! touches storage; uniqueness checks run through the read service so they
//! share the compiler's search semantics. The created-item notification is
//! dispatched off the request path and can never fail a create.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::errors::{CreateError, UpdateError};
use super::read::ReadService;
use crate::catalog::{normalize_issn, CatalogItem};
use crate::mail::Notifier;
use crate::observability::Logger;
use crate::query::{compile_id, Criteria};
use crate::schema::{parse_item_id, parse_version_token, validate};
use crate::storage::{CatalogStore, StorageResult};

/// Mutation front for the item collection
pub struct WriteService {
    store: Arc<dyn CatalogStore>,
    reader: ReadService,
    notifier: Arc<dyn Notifier>,
}

impl WriteService {
    pub fn new(store: Arc<dyn CatalogStore>, notifier: Arc<dyn Notifier>) -> Self {
        let reader = ReadService::new(Arc::clone(&store));
        Self {
            store,
            reader,
            notifier,
        }
    }

    /// Validate and persist a new item, returning its assigned id.
    ///
    /// The title uniqueness check runs through the search path and thus
    /// uses substring semantics: a candidate whose title is contained in an
    /// existing one (or vice versa) is rejected as a conflict.
    pub async fn create(&self, candidate: &Value) -> Result<Uuid, CreateError> {
        let messages = validate(candidate);
        if !messages.is_empty() {
            return Err(CreateError::ConstraintViolations { messages });
        }

        let mut item = CatalogItem::from_payload(candidate);

        let title_hits = self
            .reader
            .find(Some(&Criteria::new().with("title", item.title.clone())))
            .await?;
        if !title_hits.is_empty() {
            return Err(CreateError::TitleExists { title: item.title });
        }

        let issn_hits = self
            .reader
            .find(Some(&Criteria::new().with("issn", item.issn.clone())))
            .await?;
        if !issn_hits.is_empty() {
            return Err(CreateError::IssnExists { issn: item.issn });
        }

        let id = Uuid::new_v4();
        item.id = Some(id);
        for tag in &mut item.tags {
            tag.id = Some(Uuid::new_v4());
        }
        item.issn = normalize_issn(&item.issn);

        let title = item.title.clone();
        self.store.insert(item).await?;

        let id_text = id.to_string();
        Logger::info("CATALOG_ITEM_CREATED", &[("id", id_text.as_str())]);
        self.dispatch_created_notification(id, title);

        Ok(id)
    }

    /// Fire-and-forget dispatch of the created-item mail.
    ///
    /// Runs on a blocking task since SMTP delivery is synchronous. The only
    /// failure channel is the log.
    fn dispatch_created_notification(&self, id: Uuid, title: String) {
        let notifier = Arc::clone(&self.notifier);
        tokio::task::spawn_blocking(move || {
            let subject = format!("New catalog item {id}");
            let body = format!("Catalog item {title:?} was created.");
            if let Err(err) = notifier.send(&subject, &body) {
                let id_text = id.to_string();
                let reason = err.to_string();
                Logger::warn(
                    "NOTIFICATION_FAILED",
                    &[("item_id", id_text.as_str()), ("reason", reason.as_str())],
                );
            }
        });
    }

    /// Validate and persist changes to an existing item.
    ///
    /// `version` is the client's optimistic-concurrency token, a quoted
    /// integer such as `"3"`. A token lagging the stored version is
    /// rejected; tokens at or above it are accepted. Returns the new
    /// authoritative version.
    pub async fn update(
        &self,
        id: &str,
        candidate: &Value,
        version: Option<&str>,
    ) -> Result<u64, UpdateError> {
        // Token shape is checked before anything else; a caller holding a
        // malformed precondition learns that first.
        let Some(token) = version else {
            return Err(UpdateError::VersionInvalid { token: None });
        };
        let Some(parsed) = parse_version_token(token) else {
            return Err(UpdateError::VersionInvalid {
                token: Some(token.to_string()),
            });
        };

        let Some(uuid) = parse_item_id(id) else {
            return Err(UpdateError::ItemNotExists { id: id.to_string() });
        };

        let messages = validate(candidate);
        if !messages.is_empty() {
            return Err(UpdateError::ConstraintViolations { messages });
        }

        let incoming = CatalogItem::from_payload(candidate);

        let title_hits = self
            .reader
            .find(Some(&Criteria::new().with("title", incoming.title.clone())))
            .await?;
        if let Some(conflict) = title_hits
            .iter()
            .find(|hit| hit.id.is_some() && hit.id != Some(uuid))
        {
            return Err(UpdateError::TitleExists {
                title: incoming.title,
                id: conflict.id.unwrap_or(uuid),
            });
        }

        let query = compile_id(uuid);
        let Some(mut stored) = self.store.fetch_one(&query).await? else {
            return Err(UpdateError::ItemNotExists { id: id.to_string() });
        };

        if parsed < stored.version as i64 {
            return Err(UpdateError::VersionOutdated {
                id: uuid,
                version: parsed,
            });
        }

        stored.merge_from(&incoming);
        for tag in &mut stored.tags {
            if tag.id.is_none() {
                tag.id = Some(Uuid::new_v4());
            }
        }

        let new_version = self.store.merge(stored).await?;
        let id_text = uuid.to_string();
        let version_text = new_version.to_string();
        Logger::info(
            "CATALOG_ITEM_UPDATED",
            &[("id", id_text.as_str()), ("version", version_text.as_str())],
        );
        Ok(new_version)
    }

    /// Delete an item and its tags in one transaction.
    ///
    /// Reports whether an item was removed. A malformed id or an absent
    /// item collapses to `Ok(false)`; only storage faults surface as
    /// errors.
    pub async fn delete(&self, id: &str) -> StorageResult<bool> {
        let Some(uuid) = parse_item_id(id) else {
            return Ok(false);
        };

        let query = compile_id(uuid);
        let Some(item) = self.store.fetch_one(&query).await? else {
            return Ok(false);
        };

        let tag_ids: Vec<Uuid> = item.tags.iter().filter_map(|tag| tag.id).collect();

        let mut tx = self.store.begin().await?;
        tx.delete_tags(tag_ids).await?;
        let affected = tx.delete_item(uuid).await?;
        tx.commit().await?;

        if affected > 0 {
            let id_text = uuid.to_string();
            Logger::info("CATALOG_ITEM_DELETED", &[("id", id_text.as_str())]);
        }
        Ok(affected > 0)
    }
}
