mod column;
mod enumeration;
mod project;
mod table;

pub use column::Column;
pub use enumeration::Enum;
pub use project::Project;
pub use table::Table;
