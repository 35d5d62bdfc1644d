//! Renovation cost estimation.
//!
//! One linear pass over the requested line items: resolve a unit price,
//! extend by quantity, append a fixed labor block, apply the platform fee.
//! All currency math is `Decimal`; every figure that leaves this module is
//! rounded to two decimal places.

pub mod price_book;

pub use price_book::PriceBook;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::{Estimate, LaborEntry, LineItem, PricedMaterial};

/// Disclaimer attached to every estimate.
pub const ESTIMATE_NOTES: &str = "Preliminary estimate based on regional average pricing. \
     Final costs vary with site conditions, finish selections, and contractor availability.";

/// Description used for the synthetic labor line.
const LABOR_ITEM: &str = "General labor";

#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("items must be a non-empty list")]
    EmptyItems,

    #[error("item \"{name}\" has an invalid quantity ({quantity}); quantities must be positive finite numbers")]
    InvalidQuantity { name: String, quantity: f64 },
}

/// Configured constants for the aggregation.
#[derive(Debug, Clone)]
pub struct EstimateParams {
    /// Fraction of the subtotal charged as the platform fee, e.g. 0.10.
    pub platform_fee_rate: Decimal,
    /// Hours assumed for the synthetic labor entry.
    pub labor_hours: Decimal,
    /// Rate per labor hour.
    pub labor_hourly_rate: Decimal,
}

/// Resolves a unit price for an item name: regional overrides first, then
/// the price book, then the book's default. Resolution never fails.
pub struct PriceResolver<'a> {
    book: &'a PriceBook,
    regional: Option<&'a HashMap<String, Decimal>>,
}

impl<'a> PriceResolver<'a> {
    pub fn new(book: &'a PriceBook) -> Self {
        Self {
            book,
            regional: None,
        }
    }

    /// Layer regional prices (keyed by normalized item name) over the book.
    pub fn with_regional(book: &'a PriceBook, regional: &'a HashMap<String, Decimal>) -> Self {
        Self {
            book,
            regional: Some(regional),
        }
    }

    fn unit_price(&self, name: &str) -> Decimal {
        if let Some(regional) = self.regional {
            if let Some(price) = regional.get(&price_book::normalize(name)) {
                return *price;
            }
        }
        self.book.unit_price_or_default(name)
    }
}

/// Round to two decimal places, midpoints away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute a complete estimate for the given line items.
///
/// `region_code` is opaque: echoed into the output and used only as a lookup
/// key by the optional regional price resolution upstream.
pub fn compute_estimate(
    items: &[LineItem],
    region_code: &str,
    prices: &PriceResolver<'_>,
    params: &EstimateParams,
) -> Result<Estimate, EstimateError> {
    if items.is_empty() {
        return Err(EstimateError::EmptyItems);
    }

    let mut materials = Vec::with_capacity(items.len());
    let mut total_material_cost = Decimal::ZERO;

    for item in items {
        // from_f64 rejects NaN and infinities
        let quantity = Decimal::from_f64(item.quantity)
            .filter(|q| q.is_sign_positive() && !q.is_zero())
            .ok_or_else(|| EstimateError::InvalidQuantity {
                name: item.name.clone(),
                quantity: item.quantity,
            })?;

        let unit_cost = prices.unit_price(&item.name);
        let total_cost = round2(quantity * unit_cost);
        total_material_cost += total_cost;

        materials.push(PricedMaterial {
            item: item.name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            unit_cost,
            total_cost,
        });
    }

    let labor_total = round2(params.labor_hours * params.labor_hourly_rate);
    let labor = vec![LaborEntry {
        item: LABOR_ITEM.to_string(),
        quantity: params.labor_hours,
        unit_cost: params.labor_hourly_rate,
        total_cost: labor_total,
    }];
    let total_labor_cost = labor_total;

    let subtotal = total_material_cost + total_labor_cost;
    let platform_fee = round2(subtotal * params.platform_fee_rate);
    let total_project_cost = round2(subtotal + platform_fee);

    Ok(Estimate {
        materials,
        labor,
        total_material_cost,
        total_labor_cost,
        subtotal,
        platform_fee_percent: round2(params.platform_fee_rate * Decimal::ONE_HUNDRED),
        platform_fee,
        total_project_cost,
        region_code: region_code.to_string(),
        notes: ESTIMATE_NOTES.to_string(),
    })
}
