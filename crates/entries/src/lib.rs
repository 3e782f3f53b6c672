//! The declarative entries file: its model, parsing, validation and the
//! conversion into keyed [`Entry`](lotsync_primitives::Entry) values.

mod adapters;
mod convert;
mod errors;
mod file;
mod model;
#[cfg(test)]
mod test_utils;
mod validation;

pub use adapters::{CHAINLINK_NODE_IDS, EXTERNAL_ADAPTER_IDS};
pub use convert::{convert_entries, convert_entry};
pub use errors::{ConversionError, EntriesFileError, InvalidReason, ValidationError};
pub use file::{parse_entries_file, parse_entries_json};
pub use model::{Description, EntryDescription, ExternalAdapter, RequestData, Schedule};
pub use validation::{validate_entries, validate_entry, ValidationContext};
