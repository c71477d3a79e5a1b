//! Macro for implementing wire-string conversions on closed enums
//!
//! Backend vocabularies (revocation reasons, HTTP methods, channel tags) are
//! fixed sets of exact strings. This macro generates the string table once
//! and derives `as_str`, `ALL`, `WIRE_VALUES`, `Display` and `FromStr` from it.
//!
//! # Example
//!
//! ```rust
//! use certgate_domain::impl_wire_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Color {
//!     Red,
//!     Green,
//! }
//!
//! impl_wire_enum_conversions!(Color {
//!     Red => "RED",
//!     Green => "GREEN",
//! });
//!
//! assert_eq!(Color::Red.to_string(), "RED");
//! assert_eq!("GREEN".parse::<Color>().unwrap(), Color::Green);
//! assert!("green".parse::<Color>().is_err());
//! ```

/// Implements wire-string conversions for a closed enum.
///
/// Parsing is exact: the backend treats these values case-sensitively, so
/// `"key_compromise"` is rejected where `"KEY_COMPROMISE"` is accepted.
#[macro_export]
macro_rules! impl_wire_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Every accepted wire string, in declaration order.
            pub const WIRE_VALUES: &'static [&'static str] = &[$($str),+];

            /// Exact wire representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
