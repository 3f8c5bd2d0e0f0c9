#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![cfg_attr(doc, warn(missing_docs))]

mod codec;
mod error;
mod gating;
mod offsets;
mod pdu;
mod sizeof;

pub use self::error::{DecodeError, DecodeErrorExt, DecodeErrorKind, DecodeResult, EncodeError, EncodeErrorExt, EncodeErrorKind, EncodeResult};
pub use self::pdu::PduCodec;
pub use self::sizeof::SizeUnit;
