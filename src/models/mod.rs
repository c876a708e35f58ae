pub mod enums;
pub mod fact;
pub mod document;
pub mod evidence;

pub use enums::*;
pub use fact::*;
pub use document::*;
pub use evidence::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
