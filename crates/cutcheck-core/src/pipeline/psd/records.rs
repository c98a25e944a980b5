//! Layer records from the layer-and-mask information section.

use crate::error::PsdError;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::layers::{
    LayerBounds, LayerExtra, LayerProps, LayerTree, RecordKind, TaggedBlock,
};

use super::cursor::Cursor;

/// Parse the layer-and-mask section body into a layer tree.
///
/// An empty section (or an empty layer-info block) yields an empty tree:
/// the document is already flattened.
pub(crate) fn read_layer_tree(
    mut section: Cursor<'_>,
    cancel: &CancelToken,
) -> Result<LayerTree, PsdError> {
    if section.remaining() == 0 {
        return Ok(LayerTree::default());
    }
    let mut info = section.section("layer info")?;
    if info.remaining() == 0 {
        return Ok(LayerTree::default());
    }

    // Negative count means the first alpha channel of the merged image holds
    // its transparency; the magnitude is the record count either way.
    let count = info.i16()?.unsigned_abs() as usize;
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        if cancel.is_cancelled() {
            return Err(PsdError::Cancelled);
        }
        records.push(read_record(&mut info)?);
    }
    // Channel image data for each layer follows; the merged image is used instead.

    tracing::trace!(records = records.len(), "read layer records");
    Ok(LayerTree::from_records(records))
}

fn read_record(cur: &mut Cursor<'_>) -> Result<(RecordKind, LayerProps), PsdError> {
    let bounds = LayerBounds {
        top: cur.i32()?,
        left: cur.i32()?,
        bottom: cur.i32()?,
        right: cur.i32()?,
    };

    let channels = cur.u16()?;
    // id (i16) + data length (u32) per channel
    cur.skip(channels as usize * 6)?;

    let _signature = cur.array::<4>()?;
    let blend_key = cur.array::<4>()?;
    let opacity = cur.u8()?;
    let _clipping = cur.u8()?;
    let flags = cur.u8()?;
    let _filler = cur.u8()?;

    let mut extra = cur.section("layer extra data")?;
    extra.section("layer mask")?;
    extra.section("blending ranges")?;
    let name = extra.pascal_string(4)?;

    let mut blocks = Vec::new();
    while extra.remaining() >= 12 {
        let signature = extra.array::<4>()?;
        if &signature != b"8BIM" && &signature != b"8B64" {
            break;
        }
        let key = extra.array::<4>()?;
        let len = extra.u32()? as usize;
        let data = extra.bytes(len)?.to_vec();
        blocks.push(TaggedBlock {
            key: String::from_utf8_lossy(&key).into_owned(),
            data,
        });
    }

    let kind = record_kind(&blocks);
    let props = LayerProps {
        // bit 1 set means hidden
        visible: flags & 0x02 == 0,
        bounds,
        extra: LayerExtra {
            name,
            opacity,
            blend_mode: String::from_utf8_lossy(&blend_key).trim().to_string(),
            blocks,
        },
    };
    Ok((kind, props))
}

fn record_kind(blocks: &[TaggedBlock]) -> RecordKind {
    for block in blocks {
        match block.key.as_str() {
            "lsct" | "lsdk" => {
                let divider = block
                    .data
                    .get(..4)
                    .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
                    .unwrap_or(0);
                match divider {
                    1 | 2 => return RecordKind::GroupStart,
                    3 => return RecordKind::GroupEnd,
                    _ => {}
                }
            }
            "TySh" | "tySh" => return RecordKind::Text,
            _ => {}
        }
    }
    RecordKind::Pixel
}
