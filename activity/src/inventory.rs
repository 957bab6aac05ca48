//! Seam between the inventory CRUD API and the activity ledger.
//!
//! The REST backend lives elsewhere; [`InventoryApi`] is its shape as seen
//! from the dashboard. [`Tracked`] records an activity only after the API
//! confirmed a mutation, so failed calls never touch the ledger.

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::ledger::Ledger;
use crate::types::ActivityType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Available,
    OutOfStock,
    Discontinued,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
}

impl Item {
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Payload for create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: u32,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub status: ItemStatus,
}

pub trait InventoryApi {
    type Error;

    fn create(&self, draft: &ItemDraft) -> Result<Item, Self::Error>;
    fn update(&self, id: &str, draft: &ItemDraft) -> Result<Item, Self::Error>;
    fn delete(&self, id: &str) -> Result<(), Self::Error>;
}

/// An [`InventoryApi`] whose successful mutations land in the ledger.
#[derive(Debug)]
pub struct Tracked<A> {
    api: A,
    ledger: Arc<Ledger>,
}

impl<A: InventoryApi> Tracked<A> {
    pub fn new(api: A, ledger: Arc<Ledger>) -> Self {
        Self { api, ledger }
    }

    pub fn inner(&self) -> &A {
        &self.api
    }

    pub fn create(&self, draft: &ItemDraft) -> Result<Item, A::Error> {
        let item = self.api.create(draft)?;
        self.ledger
            .record(ActivityType::Create, &item.id, &item.name, None);
        Ok(item)
    }

    pub fn update(&self, id: &str, draft: &ItemDraft) -> Result<Item, A::Error> {
        let item = self.api.update(id, draft)?;
        self.ledger
            .record(ActivityType::Update, &item.id, &item.name, None);
        Ok(item)
    }

    /// Delete `item`. The name is taken from the caller's copy since the
    /// API returns nothing for deletions.
    pub fn delete(&self, item: &Item) -> Result<(), A::Error> {
        self.api.delete(&item.id)?;
        self.ledger
            .record(ActivityType::Delete, &item.id, &item.name, None);
        Ok(())
    }
}
