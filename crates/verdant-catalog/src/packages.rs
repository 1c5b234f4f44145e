//! Service package catalog.
//!
//! A package describes what a farm sells to a client: cultivated area,
//! delivery cadence, expected output, price, and the per-kind plant caps the
//! acceptance flow enforces.

use crate::error::CatalogError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use verdant_domain::{FarmId, PackageId, PlantKind, ServicePackage};
use verdant_store::Collection;

/// Caller-supplied fields for a new package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPackage {
    pub square_meters: f64,
    pub deliveries_per_week: u32,
    pub expected_output: f64,
    pub expected_delivery_amount: f64,
    pub price: f64,
    pub herb_max: u32,
    pub leafy_max: u32,
    pub root_max: u32,
    pub fruit_max: u32,
}

/// Package catalog operations for one deployment.
#[derive(Debug, Clone)]
pub struct PackageCatalog {
    packages: Arc<Collection<ServicePackage>>,
}

impl PackageCatalog {
    #[must_use]
    pub fn new(packages: Arc<Collection<ServicePackage>>) -> Self {
        Self { packages }
    }

    /// Create a package offered by a farm.
    pub async fn add_package(
        &self,
        farm: FarmId,
        data: NewPackage,
    ) -> Result<ServicePackage, CatalogError> {
        if data.square_meters <= 0.0 {
            return Err(CatalogError::InvalidInput(
                "package area must be positive".into(),
            ));
        }
        if data.price < 0.0 {
            return Err(CatalogError::InvalidInput(
                "package price must not be negative".into(),
            ));
        }

        let mut package = ServicePackage::new(farm, Utc::now());
        package.square_meters = data.square_meters;
        package.deliveries_per_week = data.deliveries_per_week;
        package.expected_output = data.expected_output;
        package.expected_delivery_amount = data.expected_delivery_amount;
        package.price = data.price;
        package.herb_max = data.herb_max;
        package.leafy_max = data.leafy_max;
        package.root_max = data.root_max;
        package.fruit_max = data.fruit_max;

        tracing::info!(package = %package.id, %farm, "adding service package");
        self.packages.insert(package.clone())?;
        Ok(package)
    }

    /// Look up a live package.
    pub async fn package_by_id(&self, id: PackageId) -> Result<ServicePackage, CatalogError> {
        self.packages
            .get_active(id)
            .ok_or_else(|| CatalogError::NotFound(format!("package {id} not found")))
    }

    /// All live packages offered by a farm, in insertion order.
    pub async fn packages_by_farm(&self, farm: FarmId) -> Vec<ServicePackage> {
        self.packages.find_active(|p| p.farm == farm)
    }

    /// Tombstone a farm-owned package.
    pub async fn delete_package(&self, id: PackageId, farm: FarmId) -> Result<(), CatalogError> {
        let current = self.package_by_id(id).await?;
        if current.farm != farm {
            return Err(CatalogError::Forbidden(
                "farm does not own this package".into(),
            ));
        }
        tracing::info!(package = %id, %farm, "deleting service package");
        self.packages.soft_delete(id, Utc::now())?;
        Ok(())
    }
}

/// Per-kind plant cap carried by a package.
#[must_use]
pub fn kind_cap(package: &ServicePackage, kind: PlantKind) -> u32 {
    match kind {
        PlantKind::Herb => package.herb_max,
        PlantKind::Leafy => package.leafy_max,
        PlantKind::Root => package.root_max,
        PlantKind::Fruit => package.fruit_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewPackage {
        NewPackage {
            square_meters: 40.0,
            deliveries_per_week: 2,
            expected_output: 12.5,
            expected_delivery_amount: 1.5,
            price: 900.0,
            herb_max: 2,
            leafy_max: 4,
            root_max: 2,
            fruit_max: 1,
        }
    }

    #[tokio::test]
    async fn add_and_list_packages() {
        let catalog = PackageCatalog::new(Arc::new(Collection::new()));
        let farm = FarmId::new();
        let package = catalog.add_package(farm, sample()).await.unwrap();

        let listed = catalog.packages_by_farm(farm).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, package.id);
        assert_eq!(kind_cap(&listed[0], PlantKind::Leafy), 4);
    }

    #[tokio::test]
    async fn rejects_nonpositive_area() {
        let catalog = PackageCatalog::new(Arc::new(Collection::new()));
        let err = catalog
            .add_package(FarmId::new(), NewPackage { square_meters: 0.0, ..sample() })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn delete_requires_ownership() {
        let catalog = PackageCatalog::new(Arc::new(Collection::new()));
        let farm = FarmId::new();
        let package = catalog.add_package(farm, sample()).await.unwrap();

        let err = catalog
            .delete_package(package.id, FarmId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Forbidden(_)));

        catalog.delete_package(package.id, farm).await.unwrap();
        assert!(catalog.package_by_id(package.id).await.is_err());
    }
}
