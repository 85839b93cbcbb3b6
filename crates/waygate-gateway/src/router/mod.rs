//! Router module.

mod table;

pub use table::RouteTable;
