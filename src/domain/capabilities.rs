/// Outcome of probing the catalog for an optional column.
///
/// `Unknown` means the probe itself failed; callers treat it exactly like
/// `Absent` but the distinction is kept so startup logging can say which one
/// happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStatus {
    Present,
    Absent,
    Unknown,
}

impl ColumnStatus {
    pub fn is_present(self) -> bool {
        matches!(self, ColumnStatus::Present)
    }
}

/// Which optional `orders` columns this database actually has, resolved once
/// at startup. A column that is not `Present` disables persistence of its
/// field for the lifetime of the process.
#[derive(Debug, Clone, Copy)]
pub struct SchemaCapabilities {
    pub delivery_address: ColumnStatus,
    pub pickup_address: ColumnStatus,
    pub customer_phone: ColumnStatus,
    pub original_status: ColumnStatus,
}

impl SchemaCapabilities {
    /// The post-migration steady state: every optional column exists.
    pub fn all_present() -> Self {
        Self {
            delivery_address: ColumnStatus::Present,
            pickup_address: ColumnStatus::Present,
            customer_phone: ColumnStatus::Present,
            original_status: ColumnStatus::Present,
        }
    }

    /// Fallback when the probe could not run at all (no connection at
    /// startup). Every optional feature is disabled.
    pub fn unknown() -> Self {
        Self {
            delivery_address: ColumnStatus::Unknown,
            pickup_address: ColumnStatus::Unknown,
            customer_phone: ColumnStatus::Unknown,
            original_status: ColumnStatus::Unknown,
        }
    }
}
