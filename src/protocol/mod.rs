/// Region wire protocol
///
/// This module implements the wire side of the region engine: the rectangle
/// record, its byte-order aware parser and encoder, and the error type.

pub mod types;
pub mod errors;
pub mod parser;
pub mod encoder;

pub use types::*;
pub use errors::*;
pub use parser::*;
pub use encoder::*;

