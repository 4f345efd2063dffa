//! Progress reporting during a review run

pub mod reporter;
