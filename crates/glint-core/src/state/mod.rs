//! Driver state mirror.
//!
//! [`StateCache`] holds the last value the façade successfully submitted for each axis
//! of fixed-function state. It never talks to the driver itself.

mod cache;

pub use cache::{Cached, StateCache, Viewport};
