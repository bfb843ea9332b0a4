use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        "invalid {} '{}'",
                        stringify!($name),
                        other
                    )),
                }
            }
        }
    };
}

string_enum!(
    /// Access level stored on every user row.
    UserRole {
        Parker => "parker",
        Owner => "owner",
        Admin => "admin",
    }
);

string_enum!(VehicleType {
    Car => "car",
    Bike => "bike",
    Suv => "suv",
    Truck => "truck",
});

string_enum!(VerificationStatus {
    Verified => "Verified",
    Pending => "Pending",
    Rejected => "Rejected",
});

string_enum!(
    /// Booking lifecycle: `created -> paid -> completed`, with `cancelled` reachable from
    /// `created` or `paid`.
    OrderStatus {
        Created => "created",
        Paid => "paid",
        Cancelled => "cancelled",
        Completed => "completed",
    }
);

impl OrderStatus {
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Created, OrderStatus::Paid)
                | (OrderStatus::Created, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Completed)
        )
    }

    /// Statuses that still hold a reserved slot.
    pub fn holds_slot(&self) -> bool {
        matches!(self, OrderStatus::Created | OrderStatus::Paid)
    }
}
