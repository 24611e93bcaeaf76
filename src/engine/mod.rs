pub mod audit;
pub mod dispatcher;
pub mod transition;

pub use dispatcher::{Dispatched, Dispatcher};
