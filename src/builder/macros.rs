//! Macros for typed state labels.

/// Generate a label enum implementing [`State`](crate::core::State).
///
/// Each variant maps to the string label the coordinator stores. The enum
/// also gets `Display`, serde support using the label as the wire name, an
/// `ALL` list and `from_name` for parsing labels back.
///
/// # Example
///
/// ```
/// use statecoord::state_enum;
/// use statecoord::core::State;
///
/// state_enum! {
///     pub enum Visibility {
///         Collapsed => "collapsed",
///         Visible => "visible",
///     }
/// }
///
/// assert_eq!(Visibility::Visible.name(), "visible");
/// assert_eq!(Visibility::from_name("collapsed"), Some(Visibility::Collapsed));
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Parse a label back into a variant.
            #[allow(dead_code)]
            pub fn from_name(label: &str) -> Option<Self> {
                match label {
                    $($label => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $label),*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum Muting {
            Unmuted => "unmuted",
            Muted => "muted",
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(Muting::Muted.name(), "muted");
        assert_eq!(Muting::Unmuted.to_string(), "unmuted");
        assert_eq!(Muting::ALL, &[Muting::Unmuted, Muting::Muted]);
    }

    #[test]
    fn from_name_parses_labels() {
        assert_eq!(Muting::from_name("muted"), Some(Muting::Muted));
        assert_eq!(Muting::from_name("Muted"), None);
    }

    #[test]
    fn serde_uses_the_label() {
        let json = serde_json::to_string(&Muting::Muted).unwrap();
        assert_eq!(json, "\"muted\"");
        let parsed: Muting = serde_json::from_str("\"unmuted\"").unwrap();
        assert_eq!(parsed, Muting::Unmuted);
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum Loader {
                Visible => "visible",
                Collapsed => "collapsed",
            }
        }

        assert_eq!(Loader::Collapsed.name(), "collapsed");
    }
}
