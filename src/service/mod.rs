//! DataAccess: generic CRUD over one row model using the safe SQL builder.

mod crud;
pub use crud::{DataAccess, SearchResults};
