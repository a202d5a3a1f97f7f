//! Structured product retrieval
//!
//! A product name goes out with a fixed schema-bearing prompt; whatever text
//! comes back is validated, repaired where allowed, and either returned as a
//! [`ProductRecord`] or retried within a fixed attempt budget.

pub mod prompt;
pub mod search;
pub mod state;
pub mod types;
pub mod validator;

pub use search::{AttemptOutcome, ProductSearch, SearchReport};
pub use state::{SearchEvent, SearchProgress, SearchState};
pub use types::{
    Detail, Identity, ProductQuery, ProductRecord, Ratings, SearchError, SubRating, Tags,
};
pub use validator::{validate, ParseOutcome};
