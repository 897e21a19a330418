/*!
 * Queue Declaration
 * Generates the event enum, discriminants, decoder and manifest of a queue
 */

/// Declare the closed type list of a tagged queue
///
/// ```ignore
/// declare_queue! {
///     pub enum LogEvent {
///         StaticStr(LogStaticStrEvent),
///         String(TaggedLogString),
///     }
/// }
/// pub type LogQueue = HeterogeneousQueue<LogEvent>;
/// ```
///
/// Discriminants follow declaration order starting at 0. More than 256 types
/// overflows the `u8` discriminant at compile time, and listing a type twice
/// is a conflicting implementation error.
#[macro_export]
macro_rules! declare_queue {
    (@tags $name:ident, $idx:expr $(,)?) => {};
    (@tags $name:ident, $idx:expr, $variant:ident($ty:ty) $(, $rest_variant:ident($rest_ty:ty))*) => {
        impl $crate::queue::QueueMember<$name> for $ty {
            const TAG: u8 = $idx;
        }
        $crate::declare_queue!(@tags $name, $idx + 1u8, $($rest_variant($rest_ty)),*);
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident($ty:ty)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis enum $name {
            $($variant($ty)),+
        }

        $crate::declare_queue!(@tags $name, 0u8, $($variant($ty)),+);

        impl $crate::queue::QueueEvents for $name {
            fn decode(tag: u8, buf: &mut &[u8]) -> Self {
                $(
                    if tag == <$ty as $crate::queue::QueueMember<$name>>::TAG {
                        return $name::$variant($crate::queue::read_member::<$ty>(buf));
                    }
                )+
                panic!("unknown discriminant {} in {} queue", tag, stringify!($name));
            }

            fn manifest() -> Vec<$crate::queue::UserDefinedType> {
                vec![$(<$ty as $crate::queue::WireFormat>::reflect()),+]
            }
        }
    };
}
