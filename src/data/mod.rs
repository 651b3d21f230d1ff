/// Data layer: core types, loading, and the error taxonomy.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  suffix dispatch → parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  columns + Vec<Record>, typed cells
///   └──────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;

pub use error::{DataError, ParseError};
pub use loader::load_file;
pub use model::{Dataset, Record, Value};
