#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![warn(clippy::std_instead_of_core)]
#![cfg_attr(doc, warn(missing_docs))]

mod error;
mod field;
mod pdu_type;

pub use self::error::{SchemaError, SchemaErrorExt, SchemaErrorKind, SchemaResult};
pub use self::field::{CustomCodec, FieldSize, FieldSpec, FieldType};
pub use self::pdu_type::{PduType, PduTypeBuilder};
