use lotsync_params_codec::encode_request_params;
use lotsync_primitives::{
    derive_entry_key, selector_from_signature, spec_id_from_job_id, Entry, EntryMap,
};
use tracing::{debug, warn};

use crate::{errors::ConversionError, model::EntryDescription, validation::parse_request};

/// Converts the entry found at `index` into its stored form.
pub fn convert_entry(index: usize, entry: &EntryDescription) -> Result<Entry, ConversionError> {
    let request = &entry.request_data;
    let parsed = parse_request(index, request, &entry.schedule)?;

    let buffer = encode_request_params(&request.request_params)
        .map_err(|source| ConversionError::Encoding { index, source })?;
    let spec_id = spec_id_from_job_id(&parsed.job_id);

    Ok(Entry {
        key: derive_entry_key(&spec_id, &parsed.oracle, &buffer),
        spec_id,
        oracle: parsed.oracle,
        payment: parsed.payment,
        callback_addr: parsed.callback_addr,
        callback_function_signature: selector_from_signature(&request.callback_function_name),
        request_type: parsed.request_type,
        buffer,
        start_at: parsed.start_at,
        interval: parsed.interval,
        inactive: entry.inactive,
    })
}

/// Converts every entry, keyed and in file order.
///
/// Two definitions deriving the same key describe the same entry; the later
/// one wins and keeps the position of the first.
pub fn convert_entries(entries: &[EntryDescription]) -> Result<EntryMap, ConversionError> {
    let mut map = EntryMap::new();
    for (index, description) in entries.iter().enumerate() {
        let entry = convert_entry(index, description)?;
        let key = entry.key;
        if let Some(previous) = map.insert(entry, Some(index)) {
            warn!(
                %key,
                first_index = ?previous.source_index,
                index,
                "duplicated entry key, keeping the later definition"
            );
        }
    }
    debug!(count = map.len(), "converted entries");
    Ok(map)
}
