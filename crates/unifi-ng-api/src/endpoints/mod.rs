// Controller endpoints
//
// Thin wrappers: each builds a suffix and payload, hands it to the session's
// read/write/update primitives, and decodes the envelope. Implemented as
// inherent methods on `Session`, one file per endpoint group.

pub mod clients;
pub mod devices;
pub mod firewall;
pub mod groups;
pub mod reservations;
pub mod sites;
