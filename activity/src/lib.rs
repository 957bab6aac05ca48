//! Local activity ledger for the stockroom inventory dashboard.
//!
//! Every confirmed create/update/delete of an inventory item is appended to
//! a capped, newest-first list persisted under one key of a key/value
//! store. Views read and filter that list and subscribe to change events.

pub mod clock;
pub mod codec;
pub mod config;
pub mod describe;
pub mod error;
pub mod export;
pub mod factory;
pub mod filter;
pub mod inventory;
pub mod ledger;
pub mod notify;
pub mod pagination;
pub mod store;
pub mod types;
pub mod view;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use error::StorageError;
pub use filter::DateRange;
pub use filter::FilterCriteria;
pub use filter::TypeFilter;
pub use ledger::Ledger;
pub use notify::LedgerEvent;
pub use notify::SubscriptionId;
pub use types::ActivityRecord;
pub use types::ActivityType;
pub use types::Details;
