//! Macro for implementing Display and FromStr for domain enums
//!
//! Keeps the string form of small enums (event types, recurrence kinds,
//! fallback policies) in one place. Parsing is case-insensitive and output
//! is always lowercase.
//!
//! # Example
//!
//! ```rust
//! use clubsched_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Surface {
//!     Grass,
//!     Turf,
//! }
//!
//! impl_domain_status_conversions!(Surface {
//!     Grass => "grass",
//!     Turf => "turf",
//! });
//!
//! assert_eq!(Surface::Turf.to_string(), "turf");
//! assert_eq!("GRASS".parse::<Surface>().unwrap(), Surface::Grass);
//! ```

/// Implements Display and FromStr traits for string-backed enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Stable lowercase string form.
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
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
