//! Macros for ergonomic state identifier declarations.

/// Declare a fieldless enum of state identifiers and implement
/// [`State`](crate::core::State) for it, naming each state after its variant.
///
/// # Example
///
/// ```
/// use vigil::core::State;
/// use vigil::state_enum;
///
/// state_enum! {
///     pub enum PanelState {
///         Open,
///         Check,
///         Close,
///     }
/// }
///
/// assert_eq!(PanelState::Check.name(), "Check");
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
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> ::std::borrow::Cow<'_, str> {
                match self {
                    $(Self::$variant => ::std::borrow::Cow::Borrowed(stringify!($variant))),*
                }
            }
        }
    };
}
