// src/services/catalog.rs
use tokio::sync::broadcast;

use crate::error::{CatalogError, ValidationErrors};
use crate::models::{
    validate_asset, validate_domain, Asset, AssetDraft, AssetInput, AssetWithDomain, Domain,
    DomainDraft, DomainInput,
};
use crate::repo::CatalogRepo;
use crate::services::events::{CatalogEvent, CatalogEvents, ChangeKind};

/// Façade over the repository: validates inputs, persists through
/// [`CatalogRepo`], and announces every committed write on the event bus.
/// Reads pass straight through. This is the only path by which records
/// change, so a subscriber that applies every event it receives stays
/// consistent with the store.
#[derive(Debug, Clone)]
pub struct CatalogService {
    repo: CatalogRepo,
    events: CatalogEvents,
}

impl CatalogService {
    pub fn new(repo: CatalogRepo) -> Self {
        Self {
            repo,
            events: CatalogEvents::default(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    // Domains

    pub async fn list_domains(&self) -> Result<Vec<Domain>, CatalogError> {
        self.repo.list_domains().await
    }

    pub async fn get_domain(&self, id: i64) -> Result<Domain, CatalogError> {
        self.repo.get_domain(id).await
    }

    /// Validate a candidate domain without persisting anything; the draft is
    /// what an insert or update would write.
    pub fn change_domain(&self, input: &DomainInput) -> Result<DomainDraft, ValidationErrors> {
        validate_domain(input)
    }

    pub async fn create_domain(&self, input: &DomainInput) -> Result<Domain, CatalogError> {
        let draft = validate_domain(input).map_err(CatalogError::Validation)?;
        let domain = self.repo.insert_domain(&draft).await?;
        tracing::info!("created domain {}", domain.id);
        self.events.publish(CatalogEvent::Domain {
            kind: ChangeKind::Created,
            record: domain.clone(),
        });
        Ok(domain)
    }

    pub async fn update_domain(
        &self,
        id: i64,
        input: &DomainInput,
    ) -> Result<Domain, CatalogError> {
        // Establish that the record exists before judging the input, so a
        // stale edit against a deleted row reads as "gone", not "invalid".
        self.repo.get_domain(id).await?;
        let draft = validate_domain(input).map_err(CatalogError::Validation)?;
        let domain = self.repo.update_domain(id, &draft).await?;
        tracing::info!("updated domain {}", domain.id);
        self.events.publish(CatalogEvent::Domain {
            kind: ChangeKind::Updated,
            record: domain.clone(),
        });
        Ok(domain)
    }

    pub async fn delete_domain(&self, id: i64) -> Result<Domain, CatalogError> {
        let domain = self.repo.delete_domain(id).await?;
        tracing::info!("deleted domain {}", domain.id);
        self.events.publish(CatalogEvent::Domain {
            kind: ChangeKind::Deleted,
            record: domain.clone(),
        });
        Ok(domain)
    }

    // Assets

    pub async fn list_assets(&self) -> Result<Vec<Asset>, CatalogError> {
        self.repo.list_assets().await
    }

    pub async fn list_assets_with_domains(&self) -> Result<Vec<AssetWithDomain>, CatalogError> {
        self.repo.list_assets_with_domains().await
    }

    pub async fn get_asset(&self, id: i64) -> Result<Asset, CatalogError> {
        self.repo.get_asset(id).await
    }

    /// Validate a candidate asset without persisting anything; the draft is
    /// what an insert or update would write.
    pub fn change_asset(&self, input: &AssetInput) -> Result<AssetDraft, ValidationErrors> {
        validate_asset(input)
    }

    pub async fn create_asset(&self, input: &AssetInput) -> Result<Asset, CatalogError> {
        let draft = validate_asset(input).map_err(CatalogError::Validation)?;
        let asset = self.repo.insert_asset(&draft).await?;
        tracing::info!("created asset {}", asset.id);
        self.events.publish(CatalogEvent::Asset {
            kind: ChangeKind::Created,
            record: asset.clone(),
        });
        Ok(asset)
    }

    pub async fn update_asset(&self, id: i64, input: &AssetInput) -> Result<Asset, CatalogError> {
        self.repo.get_asset(id).await?;
        let draft = validate_asset(input).map_err(CatalogError::Validation)?;
        let asset = self.repo.update_asset(id, &draft).await?;
        tracing::info!("updated asset {}", asset.id);
        self.events.publish(CatalogEvent::Asset {
            kind: ChangeKind::Updated,
            record: asset.clone(),
        });
        Ok(asset)
    }

    pub async fn delete_asset(&self, id: i64) -> Result<Asset, CatalogError> {
        let asset = self.repo.delete_asset(id).await?;
        tracing::info!("deleted asset {}", asset.id);
        self.events.publish(CatalogEvent::Asset {
            kind: ChangeKind::Deleted,
            record: asset.clone(),
        });
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use sqlx::sqlite::SqlitePoolOptions;
    use tokio::sync::broadcast::error::TryRecvError;

    async fn test_service() -> CatalogService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        db::init_schema(&pool).await.expect("schema");
        CatalogService::new(CatalogRepo::new(pool))
    }

    #[tokio::test]
    async fn create_rejects_blank_input_and_persists_nothing() {
        let service = test_service().await;
        let mut events = service.subscribe();

        let err = service
            .create_domain(&DomainInput::new("   "))
            .await
            .unwrap_err();
        match err {
            CatalogError::Validation(errors) => {
                assert_eq!(errors.on("name"), ["can't be blank"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(service.list_domains().await.unwrap().is_empty());
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn create_persists_and_publishes_the_record() {
        let service = test_service().await;
        let mut events = service.subscribe();

        let domain = service
            .create_domain(&DomainInput::new("Hydrology"))
            .await
            .unwrap();
        assert_eq!(service.list_domains().await.unwrap(), [domain.clone()]);
        assert_eq!(
            events.recv().await.unwrap(),
            CatalogEvent::Domain {
                kind: ChangeKind::Created,
                record: domain,
            }
        );
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found_even_with_bad_input() {
        let service = test_service().await;
        let err = service
            .update_domain(77, &DomainInput::new(""))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn failed_update_leaves_the_record_and_publishes_nothing() {
        let service = test_service().await;
        let domain = service
            .create_domain(&DomainInput::new("Hydrology"))
            .await
            .unwrap();
        let mut events = service.subscribe();

        let err = service
            .update_domain(domain.id, &DomainInput::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(service.get_domain(domain.id).await.unwrap().name, "Hydrology");
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn change_validates_without_touching_the_store() {
        let service = test_service().await;

        assert!(service.change_asset(&AssetInput::new("Streamflow 2023", None)).is_ok());
        let errors = service.change_asset(&AssetInput::new("", None)).unwrap_err();
        assert_eq!(errors.on("title"), ["can't be blank"]);
        assert!(service.list_assets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn later_update_wins_over_an_earlier_one() {
        let service = test_service().await;
        let domain = service
            .create_domain(&DomainInput::new("Hydrology"))
            .await
            .unwrap();

        // Two editors start from the same row; whoever saves last owns it.
        service
            .update_domain(domain.id, &DomainInput::new("Hydrology (draft)"))
            .await
            .unwrap();
        service
            .update_domain(domain.id, &DomainInput::new("Hydrology (final)"))
            .await
            .unwrap();

        assert_eq!(
            service.get_domain(domain.id).await.unwrap().name,
            "Hydrology (final)"
        );
    }

    #[tokio::test]
    async fn assets_join_to_their_domain_by_reference() {
        let service = test_service().await;
        let hydrology = service
            .create_domain(&DomainInput::new("Hydrology"))
            .await
            .unwrap();
        service
            .create_asset(&AssetInput::new("Streamflow 2023", Some(hydrology.id)))
            .await
            .unwrap();

        let joined = service.list_assets_with_domains().await.unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].asset.title, "Streamflow 2023");
        assert_eq!(joined[0].domain.as_ref().unwrap().name, "Hydrology");
    }

    #[tokio::test]
    async fn delete_publishes_the_removed_record() {
        let service = test_service().await;
        let asset = service
            .create_asset(&AssetInput::new("Streamflow 2023", None))
            .await
            .unwrap();
        let mut events = service.subscribe();

        let removed = service.delete_asset(asset.id).await.unwrap();
        assert_eq!(removed, asset);
        assert_eq!(
            events.recv().await.unwrap(),
            CatalogEvent::Asset {
                kind: ChangeKind::Deleted,
                record: asset,
            }
        );
        assert!(service.delete_asset(removed.id).await.unwrap_err().is_not_found());
    }
}
