//!
//! IPP operations: each type here knows how to build the request
//! envelope for one operation (spec §4.3 / §1's minimum operation set).
//!
pub mod job;
pub mod printer;

use crate::model::Operation;
use crate::request::IppRequestResponse;

/// Common behavior for a buildable IPP operation.
pub trait IppOperation {
    /// The operation id this type builds a request for.
    fn operation(&self) -> Operation;

    /// IPP protocol version to stamp on the request. `(2, 0)` unless an
    /// operation needs to pin an older version for compatibility.
    fn version(&self) -> (u8, u8) {
        (2, 0)
    }

    /// Consume this operation and produce the full request envelope.
    fn into_ipp_request(self, request_id: i32) -> IppRequestResponse;
}
