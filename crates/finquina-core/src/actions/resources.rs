//! Inventory actions.
//!
//! Buying stock also logs an expense. The two writes are independent:
//! if the expense fails the stock change still stands.

use chrono::Utc;
use finquina_db::ExpenseRecord;
use finquina_types::{NewResource, QuantityAdjustment, Resource, ResourceId};
use rust_decimal::Decimal;

use crate::error::ActionError;
use crate::farm::{Farm, read_or_default, validate, written};
use crate::revalidate::{ANALYTICS, EXPENSES, HOME, INVENTORY};

/// Shop recorded on expenses created from the inventory.
pub const INVENTORY_SHOP: &str = "Inventario";

/// Expense category for restocking.
pub const RESTOCK_CATEGORY: &str = "Mantenimiento";

/// Stock after applying a signed change, never below zero.
pub fn clamped_quantity(current: Decimal, delta: Decimal) -> Decimal {
    current
        .checked_add(delta)
        .unwrap_or(current)
        .max(Decimal::ZERO)
}

/// Views touched by a stock change. Stock feeds the dashboard's
/// low-stock alerts; a logged expense also moves spending.
const fn stock_paths(expense_logged: bool) -> &'static [&'static str] {
    if expense_logged {
        &[INVENTORY, HOME, EXPENSES, ANALYTICS]
    } else {
        &[INVENTORY, HOME]
    }
}

impl Farm {
    /// All resources, by name.
    pub async fn list_resources(&self) -> Vec<Resource> {
        read_or_default("list_resources", self.db.resources().list().await)
    }

    /// Add a resource; a positive cost is logged as a purchase.
    pub async fn add_resource(&self, new: &NewResource) -> Result<Option<Resource>, ActionError> {
        validate(new)?;
        let now = Utc::now();
        let Some(resource) = written("add_resource", self.db.resources().insert(new, now).await)
        else {
            return Ok(None);
        };

        let expense_logged = new.cost > Decimal::ZERO;
        if expense_logged {
            let item = format!("Compra recurso: {}", resource.name);
            let record = ExpenseRecord {
                item: &item,
                amount: new.cost,
                category: resource.category.expense_category(),
                date: now,
                shop: Some(INVENTORY_SHOP),
            };
            written("add_resource_expense", self.db.expenses().insert(&record).await);
        }

        self.revalidate(stock_paths(expense_logged));
        Ok(Some(resource))
    }

    /// Apply a signed stock change, clamped at zero.
    ///
    /// A positive change with a positive cost is logged as a restock.
    /// `None` when the resource does not exist or nothing was stored.
    pub async fn update_resource_quantity(
        &self,
        id: ResourceId,
        adjustment: QuantityAdjustment,
    ) -> Option<Resource> {
        let current = read_or_default("find_resource", self.db.resources().find(id).await)?;
        let quantity = clamped_quantity(current.quantity, adjustment.delta);
        let now = Utc::now();
        let updated = written(
            "update_resource_quantity",
            self.db.resources().set_quantity(id, quantity, now).await,
        )
        .flatten()?;

        let expense_logged = adjustment.delta > Decimal::ZERO && adjustment.cost > Decimal::ZERO;
        if expense_logged {
            let item = format!("Reposición: {}", updated.name);
            let record = ExpenseRecord {
                item: &item,
                amount: adjustment.cost,
                category: RESTOCK_CATEGORY,
                date: now,
                shop: Some(INVENTORY_SHOP),
            };
            written("restock_expense", self.db.expenses().insert(&record).await);
        }

        tracing::info!(
            resource_id = %id,
            from = %current.quantity,
            to = %updated.quantity,
            "Stock adjusted"
        );
        self.revalidate(stock_paths(expense_logged));
        Some(updated)
    }

    /// Delete a resource.
    pub async fn delete_resource(&self, id: ResourceId) -> bool {
        let deleted =
            written("delete_resource", self.db.resources().delete(id).await).unwrap_or(false);
        if deleted {
            self.revalidate(stock_paths(false));
        }
        deleted
    }
}

#[cfg(test)]
mod tests {
    use finquina_types::ResourceCategory;

    use crate::testing::offline_farm;

    use super::*;

    #[test]
    fn quantity_never_goes_negative() {
        let five = Decimal::new(5, 0);
        assert_eq!(clamped_quantity(five, Decimal::new(-8, 0)), Decimal::ZERO);
        assert_eq!(clamped_quantity(five, Decimal::new(-25, 1)), Decimal::new(25, 1));
        assert_eq!(clamped_quantity(five, Decimal::new(3, 0)), Decimal::new(8, 0));
        assert_eq!(clamped_quantity(Decimal::MAX, Decimal::ONE), Decimal::MAX);
    }

    #[test]
    fn stock_changes_refresh_the_dashboard() {
        assert!(stock_paths(false).contains(&HOME));
        assert!(!stock_paths(false).contains(&ANALYTICS));
        let with_expense = stock_paths(true);
        for path in [INVENTORY, HOME, EXPENSES, ANALYTICS] {
            assert!(with_expense.contains(&path), "{path}");
        }
    }

    #[tokio::test]
    async fn offline_inventory_degrades() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        let new = NewResource {
            name: "Tierra de diatomeas".to_owned(),
            category: ResourceCategory::Treatments,
            quantity: Decimal::new(2, 0),
            unit: "kg".to_owned(),
            min_stock: Decimal::ONE,
            cost: Decimal::new(15, 0),
        };
        assert!(farm.add_resource(&new).await.is_ok_and(|r| r.is_none()));
        let adjustment = QuantityAdjustment {
            delta: Decimal::ONE,
            cost: Decimal::new(4, 0),
        };
        assert!(farm.update_resource_quantity(ResourceId(1), adjustment).await.is_none());
        assert!(farm.list_resources().await.is_empty());
    }
}
