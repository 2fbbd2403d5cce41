//!
//! IPP print protocol codec and PWG/URF raster codec.
//!
//! `ipp_raster` decodes and encodes the IPP binary wire format (RFC 8010)
//! and the two common raster page-description containers accepted by
//! driverless printers: PWG Raster (PWG5102.4) and Apple's URF/UNIRAST.
//! It is a library for talking to a printer over a caller-supplied
//! transport, not a print spooler or a rasterizer.
pub use num_traits::{FromPrimitive, ToPrimitive};

pub mod attribute;
#[cfg(feature = "client")]
pub mod client;
pub mod error;
pub mod model;
pub mod operation;
pub mod parser;
pub mod raster;
pub mod reader;
pub mod request;
pub mod value;

pub use attribute::{IppAttribute, IppAttributeGroup, IppAttributes};
pub use error::{ClientError, IppParseError, RasterError};
pub use model::{DelimiterTag, Operation, StatusCode, ValueTag};
pub use parser::IppParser;
pub use raster::PixelGrid;
pub use reader::IppReader;
pub use request::IppRequestResponse;
pub use value::IppValue;
