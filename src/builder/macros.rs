//! Macros for ergonomic key declaration.

/// Declare a fieldless key enum with a reserved `None` sentinel.
///
/// The generated enum derives `Clone, Copy, PartialEq, Eq, Hash, Debug,
/// Default`, with `None` as the default variant, so it satisfies
/// [`StateKey`](crate::core::StateKey). It also gets a `name()` helper and an
/// `ALL` constant listing every registrable variant (everything but `None`).
///
/// # Example
///
/// ```
/// use statecraft::state_key;
/// use statecraft::core::StateKey;
///
/// state_key! {
///     pub enum Stance {
///         Idle,
///         Walk,
///         Run,
///     }
/// }
///
/// assert!(Stance::None.is_none());
/// assert_eq!(Stance::Run.name(), "Run");
/// assert_eq!(Stance::ALL, &[Stance::Idle, Stance::Walk, Stance::Run]);
/// ```
#[macro_export]
macro_rules! state_key {
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
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
        $vis enum $name {
            #[default]
            None,
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        #[allow(dead_code)]
        impl $name {
            /// Every variant except the `None` sentinel.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            pub fn name(&self) -> &'static str {
                match self {
                    Self::None => "None",
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
