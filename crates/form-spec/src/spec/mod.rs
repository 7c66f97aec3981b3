pub mod field;
pub mod form;
pub mod page;

pub use field::{Constraint, FieldKind, FieldSpec};
pub use form::{FormSpec, Presentation};
pub use page::PageSpec;
