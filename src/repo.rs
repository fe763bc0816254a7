// src/repo.rs
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::CatalogError;
use crate::models::{Asset, AssetDraft, AssetWithDomain, Domain, DomainDraft};

/// Repository layer: the single point of access to the relational store.
/// Every operation touches exactly one row (or is a pure read); there is no
/// cross-entity transaction to compose. Lookups that miss return
/// [`CatalogError::NotFound`] and the caller stops.
#[derive(Debug, Clone)]
pub struct CatalogRepo {
    pool: SqlitePool,
}

type JoinedRow = (
    i64,
    String,
    Option<i64>,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<i64>,
    Option<String>,
    Option<DateTime<Utc>>,
    Option<DateTime<Utc>>,
);

impl CatalogRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Domains

    pub async fn list_domains(&self) -> Result<Vec<Domain>, CatalogError> {
        let domains = sqlx::query_as::<_, Domain>(
            "SELECT id, name, created_at, updated_at FROM domains ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(domains)
    }

    pub async fn get_domain(&self, id: i64) -> Result<Domain, CatalogError> {
        sqlx::query_as::<_, Domain>(
            "SELECT id, name, created_at, updated_at FROM domains WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CatalogError::not_found("domain", id))
    }

    pub async fn insert_domain(&self, draft: &DomainDraft) -> Result<Domain, CatalogError> {
        let now = Utc::now();
        let domain = sqlx::query_as::<_, Domain>(
            "INSERT INTO domains (name, created_at, updated_at) VALUES (?, ?, ?)
             RETURNING id, name, created_at, updated_at",
        )
        .bind(&draft.name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(domain)
    }

    pub async fn update_domain(&self, id: i64, draft: &DomainDraft) -> Result<Domain, CatalogError> {
        sqlx::query_as::<_, Domain>(
            "UPDATE domains SET name = ?, updated_at = ? WHERE id = ?
             RETURNING id, name, created_at, updated_at",
        )
        .bind(&draft.name)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CatalogError::not_found("domain", id))
    }

    pub async fn delete_domain(&self, id: i64) -> Result<Domain, CatalogError> {
        sqlx::query_as::<_, Domain>(
            "DELETE FROM domains WHERE id = ? RETURNING id, name, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CatalogError::not_found("domain", id))
    }

    // Assets

    pub async fn list_assets(&self) -> Result<Vec<Asset>, CatalogError> {
        let assets = sqlx::query_as::<_, Asset>(
            "SELECT id, title, domain_id, created_at, updated_at FROM assets ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(assets)
    }

    pub async fn get_asset(&self, id: i64) -> Result<Asset, CatalogError> {
        sqlx::query_as::<_, Asset>(
            "SELECT id, title, domain_id, created_at, updated_at FROM assets WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CatalogError::not_found("asset", id))
    }

    pub async fn insert_asset(&self, draft: &AssetDraft) -> Result<Asset, CatalogError> {
        let now = Utc::now();
        let asset = sqlx::query_as::<_, Asset>(
            "INSERT INTO assets (title, domain_id, created_at, updated_at) VALUES (?, ?, ?, ?)
             RETURNING id, title, domain_id, created_at, updated_at",
        )
        .bind(&draft.title)
        .bind(draft.domain_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(asset)
    }

    pub async fn update_asset(&self, id: i64, draft: &AssetDraft) -> Result<Asset, CatalogError> {
        sqlx::query_as::<_, Asset>(
            "UPDATE assets SET title = ?, domain_id = ?, updated_at = ? WHERE id = ?
             RETURNING id, title, domain_id, created_at, updated_at",
        )
        .bind(&draft.title)
        .bind(draft.domain_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CatalogError::not_found("asset", id))
    }

    pub async fn delete_asset(&self, id: i64) -> Result<Asset, CatalogError> {
        sqlx::query_as::<_, Asset>(
            "DELETE FROM assets WHERE id = ? RETURNING id, title, domain_id, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CatalogError::not_found("asset", id))
    }

    /// Read-only join: every asset together with its domain, or `None` when
    /// the reference is unset or dangling.
    pub async fn list_assets_with_domains(&self) -> Result<Vec<AssetWithDomain>, CatalogError> {
        let rows: Vec<JoinedRow> = sqlx::query_as(
            "SELECT a.id, a.title, a.domain_id, a.created_at, a.updated_at,
                    d.id, d.name, d.created_at, d.updated_at
             FROM assets a
             LEFT JOIN domains d ON d.id = a.domain_id
             ORDER BY a.id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AssetWithDomain {
                asset: Asset {
                    id: row.0,
                    title: row.1,
                    domain_id: row.2,
                    created_at: row.3,
                    updated_at: row.4,
                },
                domain: match (row.5, row.6, row.7, row.8) {
                    (Some(id), Some(name), Some(created_at), Some(updated_at)) => Some(Domain {
                        id,
                        name,
                        created_at,
                        updated_at,
                    }),
                    _ => None,
                },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_repo() -> CatalogRepo {
        // One connection: each in-memory SQLite connection is its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        db::init_schema(&pool).await.expect("schema");
        CatalogRepo::new(pool)
    }

    fn domain_draft(name: &str) -> DomainDraft {
        DomainDraft {
            name: name.to_string(),
        }
    }

    fn asset_draft(title: &str, domain_id: Option<i64>) -> AssetDraft {
        AssetDraft {
            title: title.to_string(),
            domain_id,
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps_and_roundtrips() {
        let repo = test_repo().await;
        let created = repo.insert_domain(&domain_draft("Hydrology")).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.name, "Hydrology");

        let fetched = repo.get_domain(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_missing_id_is_not_found() {
        let repo = test_repo().await;
        let err = repo.get_domain(42).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "domain 42 not found");
    }

    #[tokio::test]
    async fn listing_preserves_insertion_order_across_deletes() {
        let repo = test_repo().await;
        let mut ids = Vec::new();
        for name in ["a", "b", "c", "d"] {
            ids.push(repo.insert_domain(&domain_draft(name)).await.unwrap().id);
        }
        repo.delete_domain(ids[1]).await.unwrap();

        let names: Vec<String> = repo
            .list_domains()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["a", "c", "d"]);
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_found() {
        let repo = test_repo().await;
        assert!(repo.delete_asset(9).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn join_surfaces_the_domain_or_an_absence() {
        let repo = test_repo().await;
        let hydrology = repo.insert_domain(&domain_draft("Hydrology")).await.unwrap();
        repo.insert_asset(&asset_draft("Streamflow 2023", Some(hydrology.id)))
            .await
            .unwrap();
        repo.insert_asset(&asset_draft("Unassigned notes", None))
            .await
            .unwrap();

        let joined = repo.list_assets_with_domains().await.unwrap();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].asset.title, "Streamflow 2023");
        assert_eq!(joined[0].domain.as_ref().unwrap().name, "Hydrology");
        assert!(joined[1].domain.is_none());
    }

    #[tokio::test]
    async fn deleting_a_domain_leaves_a_dangling_reference() {
        let repo = test_repo().await;
        let domain = repo.insert_domain(&domain_draft("Hydrology")).await.unwrap();
        let asset = repo
            .insert_asset(&asset_draft("Streamflow 2023", Some(domain.id)))
            .await
            .unwrap();
        repo.delete_domain(domain.id).await.unwrap();

        // The weak reference stays on the row; the join reports the absence.
        let kept = repo.get_asset(asset.id).await.unwrap();
        assert_eq!(kept.domain_id, Some(domain.id));
        let joined = repo.list_assets_with_domains().await.unwrap();
        assert!(joined[0].domain.is_none());
    }
}
