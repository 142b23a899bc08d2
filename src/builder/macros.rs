//! Macros for declaring state ids.

/// Declare an `i8`-backed enum implementing [`StateId`](crate::core::StateId).
///
/// Every variant needs an explicit discriminant; `-42` is reserved for
/// "no state" and is rejected at registration. The generated enum derives
/// serde's traits, so the calling crate needs `serde` with `derive`.
///
/// # Example
///
/// ```
/// use netfsm::core::StateId;
/// use netfsm::state_ids;
///
/// state_ids! {
///     pub enum Door {
///         Closed = 0,
///         Opening = 1,
///         Open = 2,
///     }
/// }
///
/// assert_eq!(Door::Opening.raw(), 1);
/// assert_eq!(Door::Open.name(), "Open");
/// ```
#[macro_export]
macro_rules! state_ids {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        #[repr(i8)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $value
            ),*
        }

        impl $crate::core::StateId for $name {
            fn raw(self) -> i8 {
                self as i8
            }

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::StateId;

    state_ids! {
        enum TestState {
            Initial = 0,
            Processing = 1,
            Complete = 2,
            Reserved = -42,
        }
    }

    #[test]
    fn state_ids_macro_generates_trait() {
        assert_eq!(TestState::Initial.raw(), 0);
        assert_eq!(TestState::Complete.raw(), 2);
        assert_eq!(TestState::Processing.name(), "Processing");
        assert!(TestState::Reserved.is_sentinel());
        assert!(!TestState::Initial.is_sentinel());
    }

    #[test]
    fn state_ids_supports_visibility() {
        state_ids! {
            /// Documented ids.
            pub enum PublicState {
                A = 1,
                B = 2,
            }
        }

        assert_eq!(PublicState::B.name(), "B");
    }
}
