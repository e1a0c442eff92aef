//! Macro for closed string vocabularies
//!
//! Every controlled vocabulary in a METS document is a fixed set of string
//! tokens. `vocabulary!` generates the enum together with its string form,
//! `Display`, `FromStr` and the optional serde derives.

#[doc(hidden)]
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $value:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[cfg_attr(feature = "serde", serde(rename = $value))]
                $variant,
            )+
        }

        impl $name {
            /// Every value of the vocabulary in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The token written to the document
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::core::error::MetsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err($crate::core::error::MetsError::InvalidValue(format!(
                        "'{}' is not a valid {}",
                        s,
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}
