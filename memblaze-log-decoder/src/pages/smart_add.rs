//! Additive SMART log decoding
//!
//! Walks the uniform slot array of a validated revision, skipping empty slots
//! (id 0) and splitting structured slots into their sub-fields.

use crate::config::{DecoderConfig, UnknownAttributePolicy};
use crate::convert::read_u48;
use crate::layout::{SmartLayout, SubLayout};
use crate::registry::AttributeTable;
use crate::types::{Attribute, DecodedItem, SubValue};
use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

/// Decoded additive SMART log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmartLogPage {
    pub version: u8,
    /// Non-empty slots in physical order
    pub items: Vec<DecodedItem>,
}

/// Decode every slot of `layout`; the caller has checked the version tag and
/// that `raw` covers the slot array
pub(crate) fn decode(
    raw: &[u8],
    layout: &SmartLayout,
    table: &AttributeTable,
    config: &DecoderConfig,
) -> SmartLogPage {
    let slots = &layout.slots;
    let items = raw
        .chunks_exact(slots.width)
        .take(slots.count)
        .filter_map(|slot| decode_slot(slot, layout, table, config))
        .collect();

    SmartLogPage {
        version: layout.version,
        items,
    }
}

fn decode_slot(
    slot: &[u8],
    layout: &SmartLayout,
    table: &AttributeTable,
    config: &DecoderConfig,
) -> Option<DecodedItem> {
    let slots = &layout.slots;
    let id = slots.id.read(slot)? as u8;
    if id == 0 {
        return None;
    }

    let attribute = table.lookup(id);
    if attribute == Attribute::Unknown
        && config.unknown_attributes == UnknownAttributePolicy::Warn
    {
        log::warn!(
            "SMART log v{}: attribute id {:#04x} is not registered",
            layout.version,
            id
        );
    }

    let value_span = slot.get(slots.value.offset..slots.value.end())?;
    let detail = layout
        .sub_layout(id)
        .map(|sub| decode_sub_value(value_span, sub));

    Some(DecodedItem {
        id,
        attribute,
        normalized: slots.normalized.read(slot)? as u8,
        raw: read_u48(value_span)?,
        detail,
    })
}

/// Split a 6-byte value span into its three u16 sub-fields
fn decode_sub_value(span: &[u8], sub: SubLayout) -> SubValue {
    let a = LittleEndian::read_u16(&span[0..2]);
    let b = LittleEndian::read_u16(&span[2..4]);
    let c = LittleEndian::read_u16(&span[4..6]);
    match sub {
        SubLayout::WearLevel => SubValue::WearLevel { min: a, max: b, avg: c },
        SubLayout::Temperature => SubValue::Temperature { max: a, min: b, curr: c },
        SubLayout::Power => SubValue::Power { max: a, min: b, curr: c },
    }
}
