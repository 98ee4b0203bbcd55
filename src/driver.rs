use std::io;

use crate::{bitreader::BitReader, boxes, context::ParseContext, emitter::Emitter, error::DissectError};

/// Recursive descent over one box sequence: the driver loop, shared by the
/// top-level file scan and every container box's own children. `region` is a reader
/// scoped to exactly this sequence's bytes (the file, for the top level; a box's payload,
/// for everything else); `region_base` is the absolute file offset its position 0
/// corresponds to. `parent_type` qualifies box-registry lookups for context-dependent
/// grammars (e.g. `url `/`urn ` inside `dref`).
///
/// `ctx` is threaded by mutable reference across every sibling in this sequence, not
/// cloned per-box: a `hdlr` earlier in `mdia`'s children must still be visible when
/// `minf`/`stbl`/`stsd` are reached later in that same sequence. Containers that need an
/// isolated child scope (`trak`, `meta`) take their own `ParseContext::child_frame()`
/// before recursing rather than relying on this loop to reset anything.
///
/// Returns whether at least one box header was successfully read in this sequence — the
/// top-level caller uses this to distinguish "empty/unreadable from the first byte" (a
/// fatal condition) from an ordinary recoverable mid-stream failure.
pub fn dissect_box_sequence(region: &mut BitReader, region_base: u64, emitter: &mut Emitter, ctx: &mut ParseContext, parent_type: Option<&str>) -> io::Result<bool>
{
    let mut any_box = false;

    while !region.at_end()
    {
        if region.remaining() < 8
        {
            let offset = region_base + region.position();
            let rest = region.peek_rest().to_vec();
            emitter.error_with_dump("truncated box header", offset, &rest)?;
            break;
        }

        match read_header(region, region_base)
        {
            | Ok(header) =>
            {
                dissect_one_box(region, region_base, emitter, ctx, parent_type, header)?;
                any_box = true;
            },
            | Err(e) =>
            {
                let offset = region_base + region.position();
                let rest = region.peek_rest().to_vec();
                emitter.error_with_dump(&e.to_string(), offset, &rest)?;
                break;
            }
        }
    }

    Ok(any_box)
}

/// A parsed box header: offsets are absolute file positions.
struct BoxHeader
{
    box_type:      String,
    header_offset: u64,
    payload_start: u64,
    payload_end:   u64,
    uuid_extended: Option<[u8; 16]>
}

fn four_cc_to_string(bytes: [u8; 4]) -> String
{
    bytes.iter().map(|&b| if b.is_ascii_graphic() || b == b' ' || b == 0xA9 { b as char } else { '?' }).collect()
}

fn read_header(region: &mut BitReader, region_base: u64) -> Result<BoxHeader, DissectError>
{
    let header_offset = region_base + region.position();

    let size32 = region.u32()?;
    let type_bytes = region.bytes(4)?;
    let box_type = four_cc_to_string([type_bytes[0], type_bytes[1], type_bytes[2], type_bytes[3]]);

    let mut header_size: u64 = 8;

    let declared_size = if size32 == 1
    {
        header_size += 8;
        region.u64()?
    }
    else if size32 == 0
    {
        // "to end of enclosing region", uniformly, whether the enclosing region is a parent box or the file.
        region_base + region.len() - header_offset
    }
    else
    {
        size32 as u64
    };

    let uuid_extended = if box_type == "uuid"
    {
        let b = region.bytes(16)?;
        header_size += 16;
        Some([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7], b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]])
    }
    else
    {
        None
    };

    if declared_size < header_size
    {
        return Err(DissectError::Overflow(format!("box size {declared_size} smaller than its own header ({header_size} bytes)")));
    }

    let region_end = region_base + region.len();
    let payload_start = header_offset + header_size;
    let payload_end = header_offset + declared_size;

    if payload_end > region_end
    {
        return Err(DissectError::Overflow(format!("box at 0x{header_offset:X} declares size {declared_size}, extending past its enclosing region")));
    }

    Ok(BoxHeader { box_type, header_offset, payload_start, payload_end, uuid_extended })
}

fn dissect_one_box(
    region: &mut BitReader, region_base: u64, emitter: &mut Emitter, ctx: &mut ParseContext, parent_type: Option<&str>, header: BoxHeader
) -> io::Result<()>
{
    let payload_len = header.payload_end - header.payload_start;
    let mut child_reader = match region.sub_reader(payload_len)
    {
        | Ok(r) => r,
        | Err(e) =>
        {
            let offset = region_base + region.position();
            let rest = region.peek_rest().to_vec();
            emitter.error_with_dump(&e.to_string(), offset, &rest)?;
            return Ok(());
        }
    };

    emitter.enter(&header.box_type, header.header_offset, header.payload_start, header.payload_end)?;

    let parser = boxes::lookup(parent_type, &header.box_type);

    match parser(&mut child_reader, emitter, ctx, header.uuid_extended, header.payload_start)
    {
        | Ok(()) =>
        {
            if !child_reader.at_end()
            {
                let trailing = child_reader.remaining();
                let offset = header.payload_start + child_reader.position();
                let rest = child_reader.peek_rest().to_vec();
                emitter.warn(&format!("{trailing} trailing byte(s) not consumed by '{}'", header.box_type))?;
                emitter.hexdump(&rest, offset)?;
            }
        },
        | Err(e) =>
        {
            let offset = header.payload_start + child_reader.position();
            let rest = child_reader.peek_rest().to_vec();
            emitter.error_with_dump(&e.to_string(), offset, &rest)?;
        }
    }

    emitter.leave();
    Ok(())
}
