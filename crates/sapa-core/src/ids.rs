//! Newtype wrappers for identifiers to ensure type safety.
//!
//! Every entity in the booking database is keyed by an integer primary key.
//! Wrapping them keeps an `approve_school` call from ever receiving a user id.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CellValue, CoreError};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new id from its database value.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner database value.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl TryFrom<&CellValue> for $name {
            type Error = CoreError;

            fn try_from(cell: &CellValue) -> Result<Self, Self::Error> {
                cell.as_i64().map(Self).ok_or_else(|| {
                    CoreError::InvalidInput(format!(
                        "{} expects an integer cell, got '{}'",
                        stringify!($name),
                        cell
                    ))
                })
            }
        }
    };
}

define_id!(
    /// Unique identifier for a registered user.
    UserId
);
define_id!(
    /// Unique identifier for a School.
    SchoolId
);
define_id!(
    /// Unique identifier for a Hospital.
    HospitalId
);
define_id!(
    /// Unique identifier for a hospital Department (section).
    DepartmentId
);
define_id!(
    /// Unique identifier for an available slot date of a department.
    SlotDateId
);
define_id!(
    /// Unique identifier for a time slot on a slot date.
    TimeslotId
);
define_id!(
    /// Unique identifier for a booking (appointment).
    AppointmentId
);
