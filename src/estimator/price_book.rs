//! Built-in unit pricing for common renovation materials.

use rust_decimal::Decimal;
use std::collections::HashMap;

/// Normalized lookup key for an item name.
pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One entry in the built-in table.
#[derive(Debug, Clone)]
pub struct PriceBookEntry {
    pub name: &'static str,
    pub unit: &'static str,
    pub unit_price: Decimal,
}

// name, unit, price in cents
const BUILTIN: &[(&str, &str, i64)] = &[
    ("paint", "gallon", 5500),
    ("primer", "gallon", 2800),
    ("drywall", "sheet", 1850),
    ("joint compound", "bucket", 1600),
    ("insulation", "sq ft", 110),
    ("laminate flooring", "sq ft", 275),
    ("hardwood flooring", "sq ft", 650),
    ("tile", "sq ft", 380),
    ("carpet", "sq ft", 225),
    ("baseboard", "linear ft", 190),
    ("crown molding", "linear ft", 310),
    ("cabinet", "each", 21000),
    ("countertop", "sq ft", 4500),
    ("sink", "each", 18000),
    ("faucet", "each", 9500),
    ("toilet", "each", 24000),
    ("vanity", "each", 32000),
    ("light fixture", "each", 12000),
    ("ceiling fan", "each", 16000),
    ("interior door", "each", 17500),
    ("window", "each", 32000),
];

/// Fixed name→price table with a default for unknown items.
///
/// Matching is case-insensitive on the trimmed item name. Lookup never
/// fails: unknown names get the configured default unit price.
#[derive(Debug, Clone)]
pub struct PriceBook {
    entries: Vec<PriceBookEntry>,
    by_name: HashMap<String, Decimal>,
    default_unit_price: Decimal,
}

impl PriceBook {
    /// Build the built-in table with the configured default unit price.
    pub fn builtin(default_unit_price: Decimal) -> Self {
        let entries: Vec<PriceBookEntry> = BUILTIN
            .iter()
            .map(|&(name, unit, cents)| PriceBookEntry {
                name,
                unit,
                unit_price: Decimal::new(cents, 2),
            })
            .collect();

        let by_name = entries
            .iter()
            .map(|e| (e.name.to_string(), e.unit_price))
            .collect();

        Self {
            entries,
            by_name,
            default_unit_price,
        }
    }

    /// Case-insensitive lookup on the trimmed item name.
    pub fn unit_price(&self, name: &str) -> Option<Decimal> {
        self.by_name.get(&normalize(name)).copied()
    }

    /// Lookup with the documented default for unknown items.
    pub fn unit_price_or_default(&self, name: &str) -> Decimal {
        self.unit_price(name).unwrap_or(self.default_unit_price)
    }

    pub fn default_unit_price(&self) -> Decimal {
        self.default_unit_price
    }

    /// All built-in entries, for the read-only listing endpoint.
    pub fn entries(&self) -> &[PriceBookEntry] {
        &self.entries
    }
}
