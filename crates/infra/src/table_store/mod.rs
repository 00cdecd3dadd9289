pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryTableStore;
pub use r#trait::{RowFilter, StoreError, Table, TableStore};
