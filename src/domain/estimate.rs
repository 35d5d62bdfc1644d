//! Estimate domain types
//!
//! Wire shapes for the cost estimator. Fields serialize camelCase to match
//! the contract the deployed frontend already consumes. Monetary values are
//! `Decimal` end to end; they serialize as exact two-decimal strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single requested line, as submitted by the client.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// A materials line after unit-price resolution.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricedMaterial {
    pub item: String,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
}

/// The synthetic labor line included with every estimate.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaborEntry {
    pub item: String,
    /// Hours.
    pub quantity: Decimal,
    /// Rate per hour.
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
}

/// A complete project estimate.
///
/// Deterministic for a given input: no identifiers or timestamps. Holds
/// `total_project_cost == round2(subtotal + platform_fee)` and
/// `subtotal == total_material_cost + total_labor_cost`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub materials: Vec<PricedMaterial>,
    pub labor: Vec<LaborEntry>,
    pub total_material_cost: Decimal,
    pub total_labor_cost: Decimal,
    pub subtotal: Decimal,
    pub platform_fee_percent: Decimal,
    pub platform_fee: Decimal,
    pub total_project_cost: Decimal,
    pub region_code: String,
    pub notes: String,
}
