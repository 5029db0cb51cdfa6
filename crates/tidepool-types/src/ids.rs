//! Type-safe identifier wrappers for the tidepool vocabulary.
//!
//! Catalog entities (offers, item templates, fish species, equipment
//! templates) are keyed by `i64` rows in the backing catalog, actors by the
//! opaque string id handed to us by the chat platform, and equipment
//! *instances* by UUID v7 (time-ordered). Each gets its own newtype so the
//! compiler rejects accidental mixing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around `i64` for catalog-table keys.
macro_rules! define_catalog_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            /// Return the raw catalog key.
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_catalog_id! {
    /// Unique identifier for a purchasable shop offer.
    OfferId
}

define_catalog_id! {
    /// Unique identifier for a generic item template.
    ItemId
}

define_catalog_id! {
    /// Unique identifier for a fish species.
    FishId
}

define_catalog_id! {
    /// Unique identifier for an equipment template (rod or accessory).
    ///
    /// Rod and accessory templates live in separate catalog namespaces,
    /// so an [`EquipmentId`] is only meaningful together with an
    /// [`EquipmentCategory`](crate::enums::EquipmentCategory).
    EquipmentId
}

// ---------------------------------------------------------------------------
// ActorId
// ---------------------------------------------------------------------------

/// Unique identifier for an actor (the purchasing user).
///
/// Actor ids are opaque strings assigned by the surrounding platform; the
/// engine never inspects their content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    /// Wrap a platform-assigned actor id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ActorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// EquipmentInstanceId
// ---------------------------------------------------------------------------

/// Unique identifier for one concrete equipment instance owned by an actor.
///
/// Instances use UUID v7 (time-ordered) so storage backends index them
/// efficiently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EquipmentInstanceId(pub Uuid);

impl EquipmentInstanceId {
    /// Create a new instance identifier using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for EquipmentInstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for EquipmentInstanceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
