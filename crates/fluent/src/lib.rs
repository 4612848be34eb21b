pub mod bundle;
pub mod error;
#[cfg(feature = "global-loader")]
pub mod global;
pub mod json;
pub mod loader;
pub mod parser;
pub mod resolver;

pub use bundle::FluentBundle;
pub use error::{LoadError, LoadWarning, compute_suggestions};
pub use loader::FluentLoader;
pub use parser::{ParseError, ParseMode, Resource, parse};
pub use resolver::{FluentArgs, FormatError, Formatted, Lookup, ResolverError, Value};

/// Creates a [`FluentArgs`] map from key-value pairs.
///
/// Values are converted via `Into<Value>`, so integers, floats and strings
/// can be passed directly.
///
/// # Example
///
/// ```
/// use fluent::{args, Value};
///
/// let a = args! { "count" => 3, "name" => "Ana" };
/// assert_eq!(a.len(), 2);
/// assert_eq!(a["count"].as_integer(), Some(3));
/// assert_eq!(a["name"].as_string(), Some("Ana"));
/// ```
#[macro_export]
macro_rules! args {
    {} => {
        $crate::FluentArgs::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = $crate::FluentArgs::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
