mod join;
mod mapping;
mod table;

pub use join::{enrich, JoinStats};
pub use mapping::{JoinColumn, MappingSpec};
pub use table::{cell_text, LookupTable};
