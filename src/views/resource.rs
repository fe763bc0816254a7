// src/views/resource.rs
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::error::{CatalogError, ValidationErrors};
use crate::models::{Asset, AssetInput, Domain, DomainInput};
use crate::services::{CatalogEvent, CatalogService, ChangeKind};

/// Which page a view session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewAction {
    Listing,
    New,
    Editing,
    Showing,
}

/// Adapts one catalog entity to the uniform view contract, so a single
/// [`ResourceView`] implementation serves every entity.
#[async_trait]
pub trait CatalogResource: Clone + PartialEq + Serialize + Send + Sync + Sized + 'static {
    type Input: Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync;

    const NAME: &'static str;

    fn id(&self) -> i64;

    /// Form contents for editing this record.
    fn to_input(&self) -> Self::Input;

    /// Extract the change if the event concerns this entity.
    fn from_event(event: &CatalogEvent) -> Option<(ChangeKind, Self)>;

    fn validate(service: &CatalogService, input: &Self::Input) -> Result<(), ValidationErrors>;

    async fn fetch_all(service: &CatalogService) -> Result<Vec<Self>, CatalogError>;
    async fn fetch(service: &CatalogService, id: i64) -> Result<Self, CatalogError>;
    async fn create(service: &CatalogService, input: &Self::Input) -> Result<Self, CatalogError>;
    async fn update(
        service: &CatalogService,
        id: i64,
        input: &Self::Input,
    ) -> Result<Self, CatalogError>;
    async fn delete(service: &CatalogService, id: i64) -> Result<Self, CatalogError>;
}

#[async_trait]
impl CatalogResource for Domain {
    type Input = DomainInput;

    const NAME: &'static str = "domain";

    fn id(&self) -> i64 {
        self.id
    }

    fn to_input(&self) -> DomainInput {
        DomainInput {
            name: self.name.clone(),
        }
    }

    fn from_event(event: &CatalogEvent) -> Option<(ChangeKind, Self)> {
        match event {
            CatalogEvent::Domain { kind, record } => Some((*kind, record.clone())),
            _ => None,
        }
    }

    fn validate(service: &CatalogService, input: &DomainInput) -> Result<(), ValidationErrors> {
        service.change_domain(input).map(|_| ())
    }

    async fn fetch_all(service: &CatalogService) -> Result<Vec<Self>, CatalogError> {
        service.list_domains().await
    }

    async fn fetch(service: &CatalogService, id: i64) -> Result<Self, CatalogError> {
        service.get_domain(id).await
    }

    async fn create(service: &CatalogService, input: &DomainInput) -> Result<Self, CatalogError> {
        service.create_domain(input).await
    }

    async fn update(
        service: &CatalogService,
        id: i64,
        input: &DomainInput,
    ) -> Result<Self, CatalogError> {
        service.update_domain(id, input).await
    }

    async fn delete(service: &CatalogService, id: i64) -> Result<Self, CatalogError> {
        service.delete_domain(id).await
    }
}

#[async_trait]
impl CatalogResource for Asset {
    type Input = AssetInput;

    const NAME: &'static str = "asset";

    fn id(&self) -> i64 {
        self.id
    }

    fn to_input(&self) -> AssetInput {
        AssetInput {
            title: self.title.clone(),
            domain_id: self.domain_id,
        }
    }

    fn from_event(event: &CatalogEvent) -> Option<(ChangeKind, Self)> {
        match event {
            CatalogEvent::Asset { kind, record } => Some((*kind, record.clone())),
            _ => None,
        }
    }

    fn validate(service: &CatalogService, input: &AssetInput) -> Result<(), ValidationErrors> {
        service.change_asset(input).map(|_| ())
    }

    async fn fetch_all(service: &CatalogService) -> Result<Vec<Self>, CatalogError> {
        service.list_assets().await
    }

    async fn fetch(service: &CatalogService, id: i64) -> Result<Self, CatalogError> {
        service.get_asset(id).await
    }

    async fn create(service: &CatalogService, input: &AssetInput) -> Result<Self, CatalogError> {
        service.create_asset(input).await
    }

    async fn update(
        service: &CatalogService,
        id: i64,
        input: &AssetInput,
    ) -> Result<Self, CatalogError> {
        service.update_asset(id, input).await
    }

    async fn delete(service: &CatalogService, id: i64) -> Result<Self, CatalogError> {
        service.delete_asset(id).await
    }
}

/// One live list/show/form session over a catalog entity. Holds the row
/// stream, the page the session is on, the form being edited, and the
/// current error set; stays in sync with sibling sessions by applying the
/// events its subscription delivers.
pub struct ResourceView<R: CatalogResource> {
    service: Arc<CatalogService>,
    events: broadcast::Receiver<CatalogEvent>,
    rows: Vec<R>,
    action: ViewAction,
    current: Option<R>,
    form: R::Input,
    errors: ValidationErrors,
}

impl<R: CatalogResource> ResourceView<R> {
    /// Subscribe first, then load, so no change slips between the two.
    pub async fn mount(service: Arc<CatalogService>) -> Result<Self, CatalogError> {
        let events = service.subscribe();
        let rows = R::fetch_all(&service).await?;
        Ok(Self {
            service,
            events,
            rows,
            action: ViewAction::Listing,
            current: None,
            form: R::Input::default(),
            errors: ValidationErrors::new(),
        })
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn action(&self) -> ViewAction {
        self.action
    }

    pub fn current(&self) -> Option<&R> {
        self.current.as_ref()
    }

    pub fn form(&self) -> &R::Input {
        &self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn open_new(&mut self) {
        self.action = ViewAction::New;
        self.current = None;
        self.form = R::Input::default();
        self.errors = ValidationErrors::new();
    }

    pub async fn open_edit(&mut self, id: i64) -> Result<(), CatalogError> {
        let record = R::fetch(&self.service, id).await?;
        self.form = record.to_input();
        self.current = Some(record);
        self.action = ViewAction::Editing;
        self.errors = ValidationErrors::new();
        Ok(())
    }

    pub async fn open_show(&mut self, id: i64) -> Result<(), CatalogError> {
        let record = R::fetch(&self.service, id).await?;
        self.current = Some(record);
        self.action = ViewAction::Showing;
        self.errors = ValidationErrors::new();
        Ok(())
    }

    pub fn back_to_listing(&mut self) {
        self.action = ViewAction::Listing;
        self.current = None;
        self.form = R::Input::default();
        self.errors = ValidationErrors::new();
    }

    /// Keystroke-level form update: keep the candidate and refresh the error
    /// set, without touching the store.
    pub fn change(&mut self, input: R::Input) {
        self.errors = match R::validate(&self.service, &input) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        self.form = input;
    }

    /// Save the form. Returns the persisted record on success (and goes back
    /// to the listing), `Ok(None)` when validation failed and the session
    /// stays on the form with errors shown.
    pub async fn submit(&mut self) -> Result<Option<R>, CatalogError> {
        let outcome = match self.action {
            ViewAction::New => R::create(&self.service, &self.form).await,
            ViewAction::Editing => match &self.current {
                Some(record) => R::update(&self.service, record.id(), &self.form).await,
                None => return Ok(None),
            },
            ViewAction::Listing | ViewAction::Showing => return Ok(None),
        };
        match outcome {
            Ok(record) => {
                let kind = if self.action == ViewAction::New {
                    ChangeKind::Created
                } else {
                    ChangeKind::Updated
                };
                self.apply_change(kind, record.clone());
                self.back_to_listing();
                Ok(Some(record))
            }
            Err(CatalogError::Validation(errors)) => {
                self.errors = errors;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Delete a row. A record someone else already removed counts as done.
    pub async fn delete(&mut self, id: i64) -> Result<(), CatalogError> {
        match R::delete(&self.service, id).await {
            Ok(_) => {}
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }
        self.rows.retain(|row| row.id() != id);
        Ok(())
    }

    /// Next change from the bus, or `None` once the bus is gone. A lagged
    /// receiver has lost events for good, so it reloads the whole list
    /// before carrying on; a burst past the bus capacity leaves the rows
    /// stale only until the reload lands.
    pub async fn next_event(&mut self) -> Option<CatalogEvent> {
        loop {
            match self.events.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "{} view lagged, skipped {} events; reloading rows",
                        R::NAME,
                        skipped
                    );
                    match R::fetch_all(&self.service).await {
                        Ok(rows) => self.rows = rows,
                        Err(err) => {
                            tracing::error!("{} view reload after lag failed: {}", R::NAME, err);
                        }
                    }
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Fold a bus event into the row stream if it concerns this entity.
    pub fn apply_event(&mut self, event: &CatalogEvent) {
        if let Some((kind, record)) = R::from_event(event) {
            self.apply_change(kind, record);
        }
    }

    fn apply_change(&mut self, kind: ChangeKind, record: R) {
        match kind {
            ChangeKind::Created | ChangeKind::Updated => {
                match self.rows.iter_mut().find(|row| row.id() == record.id()) {
                    Some(row) => *row = record,
                    None => self.rows.push(record),
                }
            }
            ChangeKind::Deleted => self.rows.retain(|row| row.id() != record.id()),
        }
    }
}
