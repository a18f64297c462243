//! CrudService: generic table access using the safe SQL builder.

mod crud;
pub use crud::CrudService;
