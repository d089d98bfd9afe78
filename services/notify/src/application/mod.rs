//! Application layer - 派发协调

mod dispatcher;

pub use dispatcher::{DispatchReceipt, Dispatcher};
