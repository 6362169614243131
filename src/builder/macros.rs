//! Macros for declaring transition tables.

/// Build a [`TransitionTable`](crate::core::TransitionTable) from
/// `event => [successors]` pairs, keeping their order.
///
/// # Example
///
/// ```
/// use statewise::transitions;
///
/// let table = transitions! {
///     "fetch" => ["resolve", "reject"],
///     "resolve" => [],
///     "reject" => ["fetch"],
/// };
///
/// assert!(table.permits("fetch", "reject"));
/// assert!(table.permits("resolve", "fetch"));
/// assert!(!table.permits("reject", "resolve"));
/// ```
#[macro_export]
macro_rules! transitions {
    (
        $(
            $event:expr => [$($next:expr),* $(,)?]
        ),* $(,)?
    ) => {{
        #[allow(unused_mut)]
        let mut table = $crate::core::TransitionTable::new();
        $(
            let successors: ::std::vec::Vec<::std::string::String> =
                ::std::vec![$(::std::string::String::from($next)),*];
            table.insert($event, successors);
        )*
        table
    }};
}
