//! Macros for ergonomic state declarations.

/// Declare a fieldless enum usable as a state identifier.
///
/// Derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Debug` and serde
/// support, and adds a `name()` method plus an `ALL` constant listing the
/// variants in declaration order. The calling crate must depend on `serde`.
///
/// # Example
///
/// ```
/// use gatefsm::state_enum;
///
/// state_enum! {
///     pub enum Light {
///         Red,
///         Green,
///         Yellow,
///     }
/// }
///
/// assert_eq!(Light::Green.name(), "Green");
/// assert_eq!(Light::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        #[allow(dead_code)]
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];

            /// Variant name for display and logging.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
