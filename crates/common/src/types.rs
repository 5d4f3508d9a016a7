use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a UUID-backed identifier newtype.
///
/// Each identifier is a distinct type so an order ID can never be passed
/// where a user ID is expected.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of a ledger account.
    AccountId
);

define_id!(
    /// Identifier of the user owning an account.
    UserId
);

define_id!(
    /// Identifier of a settled payment transaction.
    TransactionId
);

define_id!(
    /// Identifier of an order. Also the idempotency key for payments.
    OrderId
);

define_id!(
    /// Identifier of the customer who owns an order.
    CustomerId
);

define_id!(
    /// Identifier of an item inside an order.
    ItemId
);

define_id!(
    /// Identifier of a catalog product.
    ProductId
);

define_id!(NotificationId);

define_id!(
    /// Identifier of a dispatched event envelope.
    EventId
);
