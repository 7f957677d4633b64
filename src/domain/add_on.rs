use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A customer-approved extra on top of the base price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    pub name: String,
    pub price: Decimal,
}

impl AddOn {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}
