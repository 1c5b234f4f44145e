//! Garden service packages.

use crate::id::{FarmId, PackageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A farm's capacity/pricing configuration for contracted gardens.
///
/// A service request references one package; the per-kind caps bound how many
/// plants of each kind the request may list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePackage {
    pub id: PackageId,
    pub farm: FarmId,
    pub square_meters: f64,
    pub deliveries_per_week: u32,
    pub expected_output: f64,
    pub expected_delivery_amount: f64,
    pub price: f64,
    pub herb_max: u32,
    pub leafy_max: u32,
    pub root_max: u32,
    pub fruit_max: u32,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ServicePackage {
    #[must_use]
    pub fn new(farm: FarmId, now: DateTime<Utc>) -> Self {
        Self {
            id: PackageId::new(),
            farm,
            square_meters: 0.0,
            deliveries_per_week: 0,
            expected_output: 0.0,
            expected_delivery_amount: 0.0,
            price: 0.0,
            herb_max: 0,
            leafy_max: 0,
            root_max: 0,
            fruit_max: 0,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
        }
    }
}
