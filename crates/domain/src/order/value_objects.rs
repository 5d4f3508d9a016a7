//! Value objects for the order domain.

use common::{ItemId, Money, ProductId};
use serde::{Deserialize, Serialize};

/// A line in an order.
///
/// Items are not addressable outside their order; the price is captured at
/// the moment the item is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier of this line, unique within the order.
    pub id: ItemId,

    /// The product this line refers to.
    pub product_id: ProductId,

    /// Price at time of add.
    pub price: Money,
}

impl Item {
    pub fn new(id: ItemId, product_id: ProductId, price: Money) -> Self {
        Self {
            id,
            product_id,
            price,
        }
    }
}
