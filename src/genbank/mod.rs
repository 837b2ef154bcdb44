//! GenBank flat file support
//!
//! - `model`: records, features, qualifiers and the stored location form
//! - `location`: location string grammar
//! - `parser`: streaming record reader

pub mod location;
pub mod model;
pub mod parser;

pub use location::{parse_location, LocationExpr};
pub use model::{Feature, Location, Qualifier, Record, Strand};
pub use parser::GenbankReader;
