//! HEIF item boxes: `iloc`, `iinf`, `infe`, `pitm`, `iref`. These describe the
//! still-image item model a HEIF file layers on top of ISOBMFF rather than a
//! sample-based track.

use crate::{boxes::read_full_box_header, bitreader::BitReader, context::ParseContext, emitter::Emitter, error::DissectError};

/// `iloc`: item location table. Field widths for offsets/lengths/indices are themselves
/// declared in a nibble-packed byte at the start of the box (ISO/IEC 14496-12 §8.11.3),
/// so every extent read is parameterized by those widths rather than fixed.
pub fn parse_iloc(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let offset_size = reader.u(4)? as u32;
    let length_size = reader.u(4)? as u32;
    let base_offset_size = reader.u(4)? as u32;
    let index_size = if version == 1 || version == 2 { reader.u(4)? as u32 } else { reader.u(4)?; 0 };

    emitter.field("offset_size", &offset_size.to_string(), Some("bits"))?;
    emitter.field("length_size", &length_size.to_string(), Some("bits"))?;
    emitter.field("base_offset_size", &base_offset_size.to_string(), Some("bits"))?;

    let item_count = if version == 2 { reader.u32()? } else { reader.u16()? as u32 };
    emitter.field("item_count", &item_count.to_string(), None)?;

    for i in 0..item_count as usize
    {
        let item_id = if version == 2 { reader.u32()? } else { reader.u16()? as u32 };

        let construction_method = if version == 1 || version == 2
        {
            reader.u(12)?; // reserved
            reader.u(4)? as u32
        }
        else
        {
            0
        };

        let data_reference_index = reader.u16()?;
        let base_offset = if base_offset_size > 0 { reader.u(base_offset_size)? } else { 0 };
        let extent_count = reader.u16()?;

        let mut extents = Vec::with_capacity(extent_count as usize);
        for _ in 0..extent_count
        {
            if (version == 1 || version == 2) && index_size > 0
            {
                reader.u(index_size)?; // extent_index
            }
            let extent_offset = if offset_size > 0 { reader.u(offset_size)? } else { 0 };
            let extent_length = if length_size > 0 { reader.u(length_size)? } else { 0 };
            extents.push(format!("(offset=0x{extent_offset:X}, length={extent_length})"));
        }

        emitter.table_row(
            i,
            &format!(
                "- [{i}] item_ID={item_id} construction_method={construction_method} data_reference_index={data_reference_index} base_offset=0x{base_offset:X} extents=[{}]",
                extents.join(" ")
            )
        )?;
    }

    emitter.table_summary(&format!("[items = {item_count}]"))
}

/// `iinf`: FullBox preamble (`entry_count`) then a sequence of `infe` children — structured
/// like `stsd`/`dref`, so the registry's ordinary recursion handles the children.
pub fn parse_iinf(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let entry_count = if version == 0 { reader.u16()? as u32 } else { reader.u32()? };
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    crate::driver::dissect_box_sequence(reader, base, emitter, ctx, Some("iinf")).map(|_| ()).map_err(|e| DissectError::Custom(e.to_string()))
}

/// `infe`: one item's metadata entry. Versions 2/3 (the HEIF-era shape) carry a 4-CC
/// `item_type` and, for `mime`/`uri ` types, further string fields; versions 0/1 predate
/// `item_type` and carry only name/content-type/content-encoding.
pub fn parse_infe(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    if version < 2
    {
        let item_id = reader.u16()?;
        let item_protection_index = reader.u16()?;
        emitter.field("item_ID", &item_id.to_string(), None)?;
        emitter.field("item_protection_index", &item_protection_index.to_string(), None)?;

        if reader.remaining() > 0
        {
            emitter.field("item_name", &format!("\"{}\"", reader.utf8_until_nul()?), None)?;
        }
        if reader.remaining() > 0
        {
            emitter.field("content_type", &format!("\"{}\"", reader.utf8_until_nul()?), None)?;
        }
        if reader.remaining() > 0
        {
            emitter.field("content_encoding", &format!("\"{}\"", reader.utf8_until_nul()?), None)?;
        }

        return Ok(());
    }

    let item_id = if version == 2 { reader.u16()? as u32 } else { reader.u32()? };
    let item_protection_index = reader.u16()?;
    let item_type = String::from_utf8_lossy(reader.bytes(4)?).into_owned();

    emitter.field("item_ID", &item_id.to_string(), None)?;
    emitter.field("item_protection_index", &item_protection_index.to_string(), None)?;
    emitter.field("item_type", &format!("'{item_type}'"), None)?;

    if reader.remaining() > 0
    {
        emitter.field("item_name", &format!("\"{}\"", reader.utf8_until_nul()?), None)?;
    }

    match item_type.as_str()
    {
        | "mime" =>
        {
            if reader.remaining() > 0
            {
                emitter.field("content_type", &format!("\"{}\"", reader.utf8_until_nul()?), None)?;
            }
            if reader.remaining() > 0
            {
                emitter.field("content_encoding", &format!("\"{}\"", reader.utf8_until_nul()?), None)?;
            }
        },
        | "uri " =>
        {
            if reader.remaining() > 0
            {
                emitter.field("item_uri_type", &format!("\"{}\"", reader.utf8_until_nul()?), None)?;
            }
        },
        | _ => {}
    }

    Ok(())
}

/// `pitm`: the primary item pointer.
pub fn parse_pitm(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let item_id = if version == 0 { reader.u16()? as u32 } else { reader.u32()? };
    emitter.field("item_ID", &item_id.to_string(), None)
}

/// `iref`: item reference graph. Unlike every other container, each child's "box type" is
/// itself the reference semantic (`thmb`, `cdsc`, `dimg`, ...) rather than a registrable
/// grammar, so the header/body are read directly here instead of through the box
/// registry.
pub fn parse_iref(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let mut index = 0usize;
    while reader.remaining() >= 8
    {
        let entry_offset = base + reader.position();
        let size = reader.u32()?;
        let reference_type = String::from_utf8_lossy(reader.bytes(4)?).into_owned();

        if size < 8
        {
            return Err(DissectError::Custom(format!("iref entry at 0x{entry_offset:X} declares size {size} smaller than its own header")));
        }

        let from_item_id = if version == 0 { reader.u16()? as u32 } else { reader.u32()? };
        let reference_count = reader.u16()?;

        let mut to_items = Vec::with_capacity(reference_count as usize);
        for _ in 0..reference_count
        {
            let to_item_id = if version == 0 { reader.u16()? as u32 } else { reader.u32()? };
            to_items.push(to_item_id.to_string());
        }

        emitter.table_row(
            index,
            &format!("- [{index}] '{reference_type}' from_item_ID={from_item_id} to_item_IDs=[{}]", to_items.join(", "))
        )?;
        index += 1;
    }

    emitter.table_summary(&format!("[references = {index}]"))
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::cli::{ColorMode, Options};

    fn emitter(buf: &mut Vec<u8>) -> Emitter<'_>
    {
        Emitter::new(buf, Options { color_mode: ColorMode::Off, ..Options::default() })
    }

    #[test]
    fn pitm_version_zero_reads_16_bit_item_id()
    {
        let data = vec![0u8, 0, 0, 0, 0x00, 0x2A];
        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_pitm(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("item_ID = 42"));
    }

    #[test]
    fn infe_v2_mime_type_reads_content_type()
    {
        let mut data = vec![2u8, 0, 0, 0];
        data.extend_from_slice(&1u16.to_be_bytes()); // item_ID
        data.extend_from_slice(&0u16.to_be_bytes()); // item_protection_index
        data.extend_from_slice(b"mime");
        data.push(0); // empty item_name
        data.extend_from_slice(b"image/jpeg\0");

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_infe(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("content_type = \"image/jpeg\""));
    }

    #[test]
    fn iref_reads_reference_entries()
    {
        let mut entry = Vec::new();
        entry.extend_from_slice(&1u32.to_be_bytes()); // from_item_ID (version 1 => 32-bit)
        entry.extend_from_slice(&1u16.to_be_bytes()); // reference_count
        entry.extend_from_slice(&2u32.to_be_bytes()); // to_item_ID

        let mut child = Vec::new();
        child.extend_from_slice(&((8 + entry.len()) as u32).to_be_bytes());
        child.extend_from_slice(b"thmb");
        child.extend_from_slice(&entry);

        let mut data = vec![1u8, 0, 0, 0];
        data.extend_from_slice(&child);

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_iref(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("'thmb' from_item_ID=1 to_item_IDs=[2]"));
    }
}
