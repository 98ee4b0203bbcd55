use crate::{bitreader::BitReader, boxes::read_full_box_header, context::ParseContext, emitter::Emitter, error::DissectError, lookup};

fn read_matrix(reader: &mut BitReader) -> Result<[f64; 9], DissectError>
{
    let mut m = [0.0; 9];
    for (i, slot) in m.iter_mut().enumerate()
    {
        // Third column (indices 2, 5, 8) is 2.30 fixed point; the rest is 16.16.
        *slot = if i % 3 == 2 { reader.fixed(2, 30)? } else { reader.fixed(16, 16)? };
    }
    Ok(m)
}

fn format_matrix(m: &[f64; 9]) -> String
{
    format!("[{:.4} {:.4} {:.4} / {:.4} {:.4} {:.4} / {:.4} {:.4} {:.4}]", m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8])
}

/// `mvhd`: movie-wide timing, preferred rate/volume, transformation matrix, next track ID.
pub fn parse_mvhd(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let (creation_time, modification_time, timescale, duration) = if version == 1
    {
        (reader.u64()?, reader.u64()?, reader.u32()?, reader.u64()?)
    }
    else
    {
        (reader.u32()? as u64, reader.u32()? as u64, reader.u32()?, reader.u32()? as u64)
    };

    emitter.field("creation_time", &creation_time.to_string(), None)?;
    emitter.field("modification_time", &modification_time.to_string(), None)?;
    emitter.field("timescale", &timescale.to_string(), Some("units/second"))?;
    emitter.field("duration", &duration.to_string(), None)?;

    let rate = reader.fixed(16, 16)?;
    emitter.field_default("rate", &format!("{rate:.4}"), "1.0000", None)?;

    let volume = reader.fixed(8, 8)?;
    emitter.field_default("volume", &format!("{volume:.4}"), "1.0000", None)?;

    reader.bytes(2)?; // reserved
    reader.bytes(8)?; // reserved[2]

    let matrix = read_matrix(reader)?;
    emitter.field("matrix", &format_matrix(&matrix), None)?;

    reader.bytes(24)?; // pre_defined

    let next_track_id = reader.u32()?;
    emitter.field("next_track_ID", &next_track_id.to_string(), None)?;

    Ok(())
}

/// `tkhd`: per-track timing, layer/volume, geometry. `flags & 0x1/0x2/0x4` select
/// enabled/in-movie/in-preview.
pub fn parse_tkhd(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;
    emitter.field(
        "flags",
        &format!("0x{flags:06X}"),
        Some(&format!("enabled={}, in_movie={}, in_preview={}", flags & 1 != 0, flags & 2 != 0, flags & 4 != 0))
    )?;

    let (creation_time, modification_time, track_id, duration) = if version == 1
    {
        let c = reader.u64()?;
        let m = reader.u64()?;
        let id = reader.u32()?;
        reader.bytes(4)?; // reserved
        let d = reader.u64()?;
        (c, m, id, d)
    }
    else
    {
        let c = reader.u32()? as u64;
        let m = reader.u32()? as u64;
        let id = reader.u32()?;
        reader.bytes(4)?; // reserved
        let d = reader.u32()? as u64;
        (c, m, id, d)
    };

    emitter.field("creation_time", &creation_time.to_string(), None)?;
    emitter.field("modification_time", &modification_time.to_string(), None)?;
    emitter.field("track_ID", &track_id.to_string(), None)?;
    emitter.field("duration", &duration.to_string(), None)?;

    reader.bytes(8)?; // reserved[2]

    let layer = reader.i16()?;
    emitter.field_default("layer", &layer.to_string(), "0", None)?;

    let alternate_group = reader.i16()?;
    emitter.field_default("alternate_group", &alternate_group.to_string(), "0", None)?;

    let volume = reader.fixed(8, 8)?;
    emitter.field("volume", &format!("{volume:.4}"), None)?;

    reader.bytes(2)?; // reserved

    let matrix = read_matrix(reader)?;
    emitter.field("matrix", &format_matrix(&matrix), None)?;

    let width = reader.fixed(16, 16)?;
    let height = reader.fixed(16, 16)?;
    emitter.field("width", &format!("{width:.2}"), None)?;
    emitter.field("height", &format!("{height:.2}"), None)?;

    Ok(())
}

/// `mdhd`: track timescale/duration plus a packed 5+5+5-bit ISO-639-2 language code.
pub fn parse_mdhd(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let (creation_time, modification_time, timescale, duration) = if version == 1
    {
        (reader.u64()?, reader.u64()?, reader.u32()?, reader.u64()?)
    }
    else
    {
        (reader.u32()? as u64, reader.u32()? as u64, reader.u32()?, reader.u32()? as u64)
    };

    emitter.field("creation_time", &creation_time.to_string(), None)?;
    emitter.field("modification_time", &modification_time.to_string(), None)?;
    emitter.field("timescale", &timescale.to_string(), Some("units/second"))?;
    emitter.field("duration", &duration.to_string(), None)?;

    ctx.timescale = Some(timescale);

    let packed_lang = reader.u16()?;
    let language = lookup::unpack_iso639_language(packed_lang);
    emitter.field("language", &format!("'{language}'"), lookup::language_description(&language))?;

    reader.bytes(2)?; // pre_defined

    Ok(())
}

/// `hdlr`: the handler-type four-CC that drives sample-entry dispatch. Sets
/// `ctx.handler_type` for everything nested under this `mdia`.
pub fn parse_hdlr(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    reader.bytes(4)?; // pre_defined
    let handler_type = String::from_utf8_lossy(reader.bytes(4)?).into_owned();
    reader.bytes(12)?; // reserved[3]

    let name = if reader.remaining() > 0 { reader.utf8_until_nul()? } else { String::new() };

    emitter.field("handler_type", &format!("'{handler_type}'"), Some(lookup::handler_type_description(&handler_type)))?;
    if !name.is_empty()
    {
        emitter.field("name", &format!("\"{name}\""), None)?;
    }

    ctx.handler_type = Some(handler_type);

    // Consume any trailing padding a QuickTime-style Pascal-prefixed name may have left.
    if reader.remaining() > 0
    {
        reader.bytes(reader.remaining())?;
    }

    Ok(())
}

pub fn parse_vmhd(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;
    emitter.field_default("flags", &format!("0x{flags:06X}"), "0x000001", None)?;

    let graphics_mode = reader.u16()?;
    emitter.field_default("graphicsmode", &graphics_mode.to_string(), "0", None)?;

    let opcolor = [reader.u16()?, reader.u16()?, reader.u16()?];
    emitter.field("opcolor", &format!("R={} G={} B={}", opcolor[0], opcolor[1], opcolor[2]), None)?;

    Ok(())
}

pub fn parse_smhd(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let balance = reader.fixed(8, 8)?;
    emitter.field_default("balance", &format!("{balance:.4}"), "0.0000", None)?;

    reader.bytes(2)?; // reserved
    Ok(())
}

pub fn parse_hmhd(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    emitter.field("maxPDUsize", &reader.u16()?.to_string(), None)?;
    emitter.field("avgPDUsize", &reader.u16()?.to_string(), None)?;
    emitter.field("maxbitrate", &reader.u32()?.to_string(), Some("bits/second"))?;
    emitter.field("avgbitrate", &reader.u32()?.to_string(), Some("bits/second"))?;
    reader.bytes(4)?; // reserved

    Ok(())
}

pub fn parse_nmhd(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)
}

pub fn parse_mehd(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let duration = if version == 1 { reader.u64()? } else { reader.u32()? as u64 };
    emitter.field("fragment_duration", &duration.to_string(), None)
}

pub fn parse_mfro(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let size = reader.u32()?;
    emitter.field("size", &size.to_string(), Some("total size of the enclosing mfra box"))
}

pub fn parse_trex(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    emitter.field("track_ID", &reader.u32()?.to_string(), None)?;
    emitter.field("default_sample_description_index", &reader.u32()?.to_string(), None)?;
    emitter.field("default_sample_duration", &reader.u32()?.to_string(), None)?;
    emitter.field("default_sample_size", &reader.u32()?.to_string(), None)?;
    emitter.field("default_sample_flags", &format!("0x{:08X}", reader.u32()?), None)?;

    Ok(())
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
    fn mdhd_decodes_packed_language()
    {
        // 'und' => (21,15,4) each +1-offset => packed bits (15<<10)|(14<<5)|3 per the
        // letter-1 encoding ('u'-'a'+1=21, 'n'-'a'+1=14, 'd'-'a'+1=4).
        let mut data = Vec::new();
        data.push(0); // version
        data.extend_from_slice(&[0, 0, 0]); // flags
        data.extend_from_slice(&0u32.to_be_bytes()); // creation_time
        data.extend_from_slice(&0u32.to_be_bytes()); // modification_time
        data.extend_from_slice(&1000u32.to_be_bytes()); // timescale
        data.extend_from_slice(&0u32.to_be_bytes()); // duration
        let packed: u16 = (21 << 10) | (14 << 5) | 4;
        data.extend_from_slice(&packed.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_mdhd(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("language = 'und' (Undetermined)"));
        assert_eq!(ctx.timescale, Some(1000));
    }

    #[test]
    fn tkhd_decodes_flag_bits()
    {
        let mut data = Vec::new();
        data.push(0); // version
        data.extend_from_slice(&[0x00, 0x00, 0x07]); // flags = enabled|in_movie|in_preview
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&1u32.to_be_bytes()); // track_ID
        data.extend_from_slice(&0u32.to_be_bytes()); // reserved
        data.extend_from_slice(&0u32.to_be_bytes()); // duration
        data.extend_from_slice(&[0u8; 8]); // reserved[2]
        data.extend_from_slice(&0i16.to_be_bytes()); // layer
        data.extend_from_slice(&0i16.to_be_bytes()); // alternate_group
        data.extend_from_slice(&0x0100u16.to_be_bytes()); // volume = 1.0
        data.extend_from_slice(&0u16.to_be_bytes()); // reserved
        data.extend_from_slice(&0x00010000u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&0x00010000u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&0x40000000u32.to_be_bytes());
        data.extend_from_slice(&0x05000000u32.to_be_bytes()); // width
        data.extend_from_slice(&0x03000000u32.to_be_bytes()); // height

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_tkhd(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("enabled=true, in_movie=true, in_preview=true"));
        assert!(out.contains("track_ID = 1"));
    }
}
