// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared by the string-backed enums in this crate.

/// Generate `as_str`, `Display` and `FromStr` for a fieldless enum whose
/// variants map one-to-one onto wire strings.
///
/// `FromStr` fails with the unrecognised input, which lets callers decide
/// whether to degrade (e.g. to `Unknown`) or surface an error.
///
/// ```ignore
/// crate::wire_enum! {
///     PodPhase {
///         Pending => "Pending",
///         Running => "Running",
///     }
/// }
/// ```
#[macro_export]
macro_rules! wire_enum {
    ($enum:ident { $( $variant:ident => $str:literal ),+ $(,)? }) => {
        impl $enum {
            pub const ALL: &'static [$enum] = &[$( $enum::$variant ),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $enum::$variant => $str, )+
                }
            }
        }

        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $str => Ok($enum::$variant), )+
                    other => Err(other.to_string()),
                }
            }
        }
    };
}
