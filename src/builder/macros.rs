//! Macros for ergonomic machine construction.

/// Build a `Vec<EdgeSpec>` from `from => to` pairs.
///
/// A target is either a single state name or a bracketed list of names.
///
/// # Example
///
/// ```
/// use statewalk::builder::TargetSpec;
/// use statewalk::edges;
///
/// let edges = edges![
///     "menu" => ["playing", "settings"],
///     "settings" => "menu",
/// ];
///
/// assert_eq!(edges.len(), 2);
/// assert_eq!(edges[1].to, TargetSpec::One("menu".to_string()));
/// ```
#[macro_export]
macro_rules! edges {
    (@to [$($to:expr),* $(,)?]) => {
        $crate::builder::TargetSpec::Many(vec![$(::std::string::String::from($to)),*])
    };
    (@to $to:expr) => {
        $crate::builder::TargetSpec::One(::std::string::String::from($to))
    };
    ($($from:expr => $to:tt),* $(,)?) => {
        vec![$(
            $crate::builder::EdgeSpec {
                from: ::std::string::String::from($from),
                to: $crate::edges!(@to $to),
            }
        ),*]
    };
}
