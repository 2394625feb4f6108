//! Core identifiers, chip type, and shared constants.
//!
//! Every other crate in the workspace depends on this one. It carries no
//! poker domain logic, only the small vocabulary everything else is built
//! from.
//!
//! ## Types
//!
//! - [`Chips`] — the integer chip unit used throughout the engine
//! - [`ID`] — a phantom-typed opaque identifier backed by a UUID
//! - [`Unique`] — assigns an [`ID`] to a domain type
//!
//! ## Constants
//!
//! - [`SEATS`] — maximum number of seats at a table

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Chip amount. Signed so that intermediate arithmetic (e.g. refunds,
/// pot/contribution differences) never needs a checked-subtraction dance.
pub type Chips = i64;

/// Maximum number of seats at a single table.
pub const SEATS: usize = 9;

/// An opaque identifier for a `T`, backed by a UUID.
///
/// `ID<Room>` and `ID<Hand>` are distinct types even though they share a
/// representation, so a room id can never be passed where a hand id is
/// expected.
pub struct ID<T> {
    uuid: uuid::Uuid,
    marker: PhantomData<fn() -> T>,
}

impl<T> ID<T> {
    pub fn random() -> Self {
        Self {
            uuid: uuid::Uuid::new_v4(),
            marker: PhantomData,
        }
    }

    pub fn uuid(&self) -> uuid::Uuid {
        self.uuid
    }
}

impl<T> From<uuid::Uuid> for ID<T> {
    fn from(uuid: uuid::Uuid) -> Self {
        Self {
            uuid,
            marker: PhantomData,
        }
    }
}

impl<T> FromStr for ID<T> {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(uuid::Uuid::parse_str(s)?))
    }
}

impl<T> fmt::Display for ID<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<T> fmt::Debug for ID<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID({})", self.uuid)
    }
}

impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}
impl<T> Eq for ID<T> {}
impl<T> std::hash::Hash for ID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.uuid.hash(state)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.uuid.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from(uuid::Uuid::deserialize(deserializer)?))
    }
}

/// Types that carry their own identity.
pub trait Unique {
    fn id(&self) -> ID<Self>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Room;
    struct Hand;

    #[test]
    fn ids_round_trip_through_display_and_parse() {
        let id: ID<Room> = ID::random();
        let text = id.to_string();
        let parsed: ID<Room> = text.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn distinct_phantom_types_do_not_collide_in_practice() {
        let room: ID<Room> = ID::random();
        let hand: ID<Hand> = ID::random();
        assert_ne!(room.to_string(), hand.to_string());
    }
}
