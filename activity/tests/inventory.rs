use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use stockroom_activity::ActivityType;
use stockroom_activity::Ledger;
use stockroom_activity::LedgerConfig;
use stockroom_activity::inventory::InventoryApi;
use stockroom_activity::inventory::Item;
use stockroom_activity::inventory::ItemDraft;
use stockroom_activity::inventory::ItemStatus;
use stockroom_activity::inventory::Tracked;
use stockroom_activity::store::InMemoryStore;

#[derive(Debug, PartialEq)]
enum ApiError {
    NotFound,
    DuplicateSku,
}

/// In-process stand-in for the REST backend.
#[derive(Default)]
struct FakeApi {
    items: RefCell<HashMap<String, Item>>,
    next_id: RefCell<u32>,
}

impl InventoryApi for FakeApi {
    type Error = ApiError;

    fn create(&self, draft: &ItemDraft) -> Result<Item, ApiError> {
        let sku_taken = self
            .items
            .borrow()
            .values()
            .any(|i| i.sku.is_some() && i.sku == draft.sku);
        if sku_taken {
            return Err(ApiError::DuplicateSku);
        }
        let mut next = self.next_id.borrow_mut();
        *next += 1;
        let item = to_item(format!("item-{next}"), draft);
        self.items
            .borrow_mut()
            .insert(item.id.clone(), item.clone());
        Ok(item)
    }

    fn update(&self, id: &str, draft: &ItemDraft) -> Result<Item, ApiError> {
        let mut items = self.items.borrow_mut();
        let slot = items.get_mut(id).ok_or(ApiError::NotFound)?;
        *slot = to_item(id.to_string(), draft);
        Ok(slot.clone())
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.items
            .borrow_mut()
            .remove(id)
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }
}

fn to_item(id: String, draft: &ItemDraft) -> Item {
    Item {
        id,
        name: draft.name.clone(),
        description: draft.description.clone(),
        price: draft.price,
        quantity: draft.quantity,
        category: draft.category.clone(),
        sku: draft.sku.clone(),
        image_url: draft.image_url.clone(),
        status: draft.status,
    }
}

fn draft(name: &str, sku: &str) -> ItemDraft {
    ItemDraft {
        name: name.to_string(),
        description: None,
        price: 9.99,
        quantity: 4,
        category: Some("Tools".to_string()),
        sku: Some(sku.to_string()),
        image_url: None,
        status: ItemStatus::Available,
    }
}

fn tracked() -> (Tracked<FakeApi>, Arc<Ledger>) {
    let ledger = Arc::new(Ledger::new(
        Arc::new(InMemoryStore::new()),
        LedgerConfig::default(),
    ));
    (Tracked::new(FakeApi::default(), Arc::clone(&ledger)), ledger)
}

#[test]
fn successful_mutations_are_recorded() {
    let (inventory, ledger) = tracked();
    let item = inventory.create(&draft("Widget", "W-1")).unwrap();
    let renamed = inventory
        .update(&item.id, &draft("Widget Pro", "W-1"))
        .unwrap();
    inventory.delete(&renamed).unwrap();

    let log: Vec<(ActivityType, String)> = ledger
        .list()
        .into_iter()
        .map(|r| (r.kind, r.item_name))
        .collect();
    assert_eq!(
        log,
        vec![
            (ActivityType::Delete, "Widget Pro".to_string()),
            (ActivityType::Update, "Widget Pro".to_string()),
            (ActivityType::Create, "Widget".to_string()),
        ]
    );
    assert!(ledger.list().iter().all(|r| r.item_id == item.id));
}

#[test]
fn failed_mutations_leave_the_ledger_untouched() {
    let (inventory, ledger) = tracked();
    inventory.create(&draft("Widget", "W-1")).unwrap();

    assert_eq!(
        inventory.create(&draft("Clone", "W-1")),
        Err(ApiError::DuplicateSku)
    );
    assert_eq!(
        inventory.update("missing", &draft("Ghost", "G-1")),
        Err(ApiError::NotFound)
    );
    let ghost = to_item("missing".to_string(), &draft("Ghost", "G-1"));
    assert_eq!(inventory.delete(&ghost), Err(ApiError::NotFound));

    assert_eq!(ledger.list().len(), 1);
}

#[test]
fn item_json_matches_the_api() {
    let raw = r#"{"id":"64f","name":"Widget","price":12.5,"quantity":0,"sku":"W-1","imageUrl":null,"status":"OUT_OF_STOCK"}"#;
    let item: Item = serde_json::from_str(raw).unwrap();
    assert_eq!(item.status, ItemStatus::OutOfStock);
    assert!(!item.in_stock());
    assert_eq!(item.category, None);
}
