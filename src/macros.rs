#[macro_export]
/// Declare one or more types as components
/// usage:
/// ```rust
/// use bulwark::component;
///
/// struct Health(f32);
/// struct Knockback { force: f32 }
///
/// component! {
///     Health,
///     Knockback,
/// }
/// ```
/// This implements [`Component`](crate::Component) for every listed type.
macro_rules! component {
    ($($ty: ty),* $(,)?) => {
        $(
            impl $crate::Component for $ty {}
        )*
    };
}
