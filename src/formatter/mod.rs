pub mod value;

pub use value::{FormattedValue, ValueFormatter};
