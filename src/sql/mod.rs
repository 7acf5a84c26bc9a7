//! Safe SQL builder: identifiers from model descriptors only, values as parameters.

mod builder;
mod ddl;
mod dialect;
pub mod filter;
pub mod params;
pub use builder::{
    count_by_key, delete, insert, select_by_key, select_filtered, update, QueryBuf,
};
pub use ddl::create_table_sql;
pub use dialect::Dialect;
pub use filter::{parse_filters, Filter, FilterOp, PREFIX_MODIFIER};
pub use params::*;
