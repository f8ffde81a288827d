//! Macros for declaring state tokens.

/// Declare a unit-variant enum usable as a state token.
///
/// Derives `Clone`, `Copy`, `PartialEq`, `Debug` and serde, implements
/// [`State`](crate::core::State) with the variant name, and adds an `all()`
/// constructor listing every variant in declaration order.
///
/// # Example
///
/// ```
/// use transys::core::State;
/// use transys::state_enum;
///
/// state_enum! {
///     pub enum Switch {
///         On,
///         Off,
///     }
/// }
///
/// assert_eq!(Switch::Off.name(), "Off");
/// assert_eq!(Switch::all(), vec![Switch::On, Switch::Off]);
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
        #[derive(Clone, Copy, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub fn all() -> ::std::vec::Vec<Self> {
                ::std::vec![$(Self::$variant),*]
            }
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Initial.name(), "Initial");
        assert_eq!(TestState::Complete.name(), "Complete");
    }

    #[test]
    fn all_lists_variants_in_order() {
        assert_eq!(
            TestState::all(),
            vec![
                TestState::Initial,
                TestState::Processing,
                TestState::Complete
            ]
        );
    }

    #[test]
    fn state_enum_supports_visibility_and_attributes() {
        state_enum! {
            /// Traffic light
            pub enum Light {
                Red,
                #[serde(rename = "AMBER")]
                Amber,
                Green,
            }
        }

        assert_eq!(Light::Amber.name(), "Amber");
        assert_eq!(serde_json::to_value(Light::Amber).unwrap(), "AMBER");
        let green: Light = serde_json::from_str("\"Green\"").unwrap();
        assert_eq!(green, Light::Green);
    }
}
