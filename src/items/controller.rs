use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::flags::{FlagClient, FlagKey, GateOnError};

use super::model::{Item, ItemForm, PageParams, Pagination};
use super::store::ItemStore;

/// Page of items handed to the list view.
#[derive(Debug, Serialize)]
pub struct ItemsPage {
    pub items: Vec<Item>,
    pub pagination: Pagination,
    #[serde(rename = "creationEnabled")]
    pub creation_enabled: bool,
}

/// One item plus the gate state the view reflects.
#[derive(Debug, Serialize)]
pub struct ItemPage {
    pub item: Item,
    #[serde(rename = "creationEnabled")]
    pub creation_enabled: bool,
}

/// Items resource with its feature-flag gates.
///
/// * `creationenabled` blocks New and Create (errors propagate) and is only
///   advisory on the other operations (errors read as disabled).
/// * `uppercaseitemname` uppercases titles on List and Show (errors read
///   as disabled, so output passes through).
///
/// Flag evaluation always finishes before the gated operation touches the
/// store. Both collaborators are borrowed for the duration of one request.
pub struct ItemsController<'a> {
    store: &'a dyn ItemStore,
    flags: &'a FlagClient,
}

impl<'a> ItemsController<'a> {
    pub fn new(store: &'a dyn ItemStore, flags: &'a FlagClient) -> Self {
        Self { store, flags }
    }

    async fn creation_enabled(&self) -> bool {
        // Deny never yields an error
        self.flags
            .check(FlagKey::CREATION_ENABLED, GateOnError::Deny)
            .await
            .unwrap_or(false)
    }

    async fn require_creation(&self) -> Result<(), AppError> {
        let enabled = self
            .flags
            .check(FlagKey::CREATION_ENABLED, GateOnError::Propagate)
            .await?;

        if !enabled {
            return Err(AppError::AccessGateDenied(FlagKey::CREATION_ENABLED));
        }

        Ok(())
    }

    async fn uppercasing(&self) -> bool {
        self.flags
            .check(FlagKey::UPPERCASE_ITEM_NAME, GateOnError::Deny)
            .await
            .unwrap_or(false)
    }

    pub async fn list(&self, params: PageParams) -> Result<ItemsPage, AppError> {
        let creation_enabled = self.creation_enabled().await;
        let uppercasing = self.uppercasing().await;

        let (mut items, pagination) = self.store.list(params).await?;

        if uppercasing {
            items.iter_mut().for_each(uppercase_title);
        }

        Ok(ItemsPage {
            items,
            pagination,
            creation_enabled,
        })
    }

    pub async fn show(&self, id: Uuid) -> Result<ItemPage, AppError> {
        let creation_enabled = self.creation_enabled().await;

        let mut item = self.store.find(id).await?;

        if self.uppercasing().await {
            uppercase_title(&mut item);
        }

        Ok(ItemPage {
            item,
            creation_enabled,
        })
    }

    /// Blank item for the creation form.
    pub async fn new_item(&self) -> Result<ItemPage, AppError> {
        self.require_creation().await?;

        Ok(ItemPage {
            item: Item::default(),
            creation_enabled: true,
        })
    }

    /// Validates and stores the submission; returns the saved item with its
    /// assigned id.
    pub async fn create(&self, form: ItemForm) -> Result<Item, AppError> {
        self.require_creation().await?;

        let draft = Item::draft(form);
        self.store
            .create(draft.clone())
            .await
            .map_err(|e| AppError::from_store(e, draft, true))
    }

    pub async fn edit(&self, id: Uuid) -> Result<ItemPage, AppError> {
        let creation_enabled = self.creation_enabled().await;

        let item = self.store.find(id).await?;

        Ok(ItemPage {
            item,
            creation_enabled,
        })
    }

    pub async fn update(&self, id: Uuid, form: ItemForm) -> Result<ItemPage, AppError> {
        let creation_enabled = self.creation_enabled().await;

        let mut item = self.store.find(id).await?;
        item.apply(form);

        let item = self
            .store
            .update(item.clone())
            .await
            .map_err(|e| AppError::from_store(e, item, creation_enabled))?;

        Ok(ItemPage {
            item,
            creation_enabled,
        })
    }

    /// Removes the item and returns what was deleted.
    pub async fn destroy(&self, id: Uuid) -> Result<ItemPage, AppError> {
        let creation_enabled = self.creation_enabled().await;

        let item = self.store.find(id).await?;
        self.store.destroy(item.id).await?;

        Ok(ItemPage {
            item,
            creation_enabled,
        })
    }
}

/// Idempotent display transform; touches only the in-memory copy.
pub fn uppercase_title(item: &mut Item) {
    item.title = item.title.to_uppercase();
}
