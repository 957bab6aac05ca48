/// Storage key the dashboard has always used for its activity list.
pub const DEFAULT_STORAGE_KEY: &str = "tactical_report_activities";
/// Maximum number of records retained.
pub const DEFAULT_CAPACITY: usize = 100;
/// The dashboard is single-user; every record is attributed to this identity.
pub const DEFAULT_USER: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub storage_key: String,
    pub capacity: usize,
    pub user: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            capacity: DEFAULT_CAPACITY,
            user: DEFAULT_USER.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Capacity is at least one record.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Re-applies the capacity floor to a config built field by field.
    pub(crate) fn normalized(self) -> Self {
        let capacity = self.capacity;
        self.with_capacity(capacity)
    }
}
