//! Server enum encodings.
//!
//! Each enum exchanged with the REST API is declared once through [`wire_enum!`],
//! which produces the variant list, the server encoding, any legacy encodings
//! accepted on decode, and the display label from a single table. Every
//! conversion is a `match` over that table, so adding a variant without its
//! encoding does not compile.

use thiserror::Error;

/// A server value with no matching variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal $(| $alias:literal)* , $label:literal
            );+ $(;)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Encoding sent to the server.
            pub fn as_wire(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Decode a server value, including legacy encodings.
            pub fn from_wire(value: &str) -> Option<Self> {
                match value {
                    $($wire $(| $alias)* => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::wire::UnknownVariant;

            fn from_str(value: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::from_wire(value.trim()).ok_or_else(|| $crate::models::wire::UnknownVariant {
                    kind: stringify!($name),
                    value: value.to_string(),
                })
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_wire())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> ::core::result::Result<Self, D::Error> {
                let value = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::from_wire(&value)
                    .ok_or_else(|| ::serde::de::Error::unknown_variant(&value, &[$($wire),+]))
            }
        }
    };
}

pub(crate) use wire_enum;
