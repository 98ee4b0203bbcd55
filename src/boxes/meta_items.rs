//! QuickTime/iTunes-style metadata items: `ilst` and its children (`©nam`, `©ART`,
//! freeform `----` entries, ...). `ilst`'s per-key item boxes are not individually
//! registered — their four-CC is
//! generic enough ASCII/`©`-prefixed text that the registry's unknown-box container probe
//! (`boxes::generic::parse_unknown`) already recurses into them and finds the registered
//! `data`/`mean`/`name` children beneath.

use crate::{
    boxes::read_full_box_header, bitreader::BitReader, context::ParseContext, driver, emitter::Emitter, error::DissectError
};

/// `ilst`: a pure container of per-key metadata item boxes.
pub fn parse_ilst(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    driver::dissect_box_sequence(reader, base, emitter, ctx, Some("ilst")).map(|_| ()).map_err(|e| DissectError::Custom(e.to_string()))
}

fn itunes_data_type_description(type_indicator: u32) -> &'static str
{
    match type_indicator
    {
        | 0 => "Binary",
        | 1 => "UTF-8",
        | 2 => "UTF-16 BE",
        | 13 => "JPEG",
        | 14 => "PNG",
        | 21 => "Signed Integer",
        | 22 => "Unsigned Integer",
        | _ => "Binary"
    }
}

/// `data`: the value child of an `ilst` item. Framed like a FullBox — `version` is always
/// 0, `flags` doubles as the 24-bit type indicator — followed by a 4-byte locale and then
/// the value itself, rendered per the iTunes data-type table below.
pub fn parse_data(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    let (version, flags) = read_full_box_header(reader)?;
    emitter.field_default("version", &version.to_string(), "0", None)?;

    let type_indicator = flags;
    emitter.field("type_indicator", &type_indicator.to_string(), Some(itunes_data_type_description(type_indicator)))?;

    let locale = reader.u32()?;
    emitter.field_default("locale", &locale.to_string(), "0", None)?;

    let value_len = reader.remaining();
    match type_indicator
    {
        | 1 =>
        {
            let text = String::from_utf8_lossy(reader.bytes(value_len)?).into_owned();
            emitter.field("value", &format!("\"{text}\""), None)?;
        },
        | 21 if value_len <= 8 =>
        {
            let bytes = reader.bytes(value_len)?;
            let mut buf = [0u8; 8];
            buf[8 - bytes.len()..].copy_from_slice(bytes);
            let signed = i64::from_be_bytes(buf);
            emitter.field("value", &signed.to_string(), None)?;
        },
        | 22 if value_len <= 8 =>
        {
            let bytes = reader.bytes(value_len)?;
            let mut buf = [0u8; 8];
            buf[8 - bytes.len()..].copy_from_slice(bytes);
            let unsigned = u64::from_be_bytes(buf);
            emitter.field("value", &unsigned.to_string(), None)?;
        },
        | 13 | 14 =>
        {
            let offset = base + reader.position();
            let data = reader.bytes(value_len)?;
            emitter.field("value", &format!("{value_len} byte(s)"), Some(if type_indicator == 13 { "JPEG" } else { "PNG" }))?;
            emitter.hexdump(data, offset)?;
        },
        | _ =>
        {
            let offset = base + reader.position();
            let data = reader.bytes(value_len)?;
            emitter.hexdump(data, offset)?;
        }
    }

    Ok(())
}

/// `mean`: the reverse-DNS namespace of a freeform `----` metadata item.
pub fn parse_mean(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field_default("version", &version.to_string(), "0", None)?;

    let namespace = String::from_utf8_lossy(reader.bytes(reader.remaining())?).into_owned();
    emitter.field("namespace", &format!("\"{namespace}\""), None)
}

/// `name`: the key name of a freeform `----` metadata item.
pub fn parse_name(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field_default("version", &version.to_string(), "0", None)?;

    let name = String::from_utf8_lossy(reader.bytes(reader.remaining())?).into_owned();
    emitter.field("name", &format!("\"{name}\""), None)
}

/// `chap`: inside `tref`, a flat list of referenced chapter-track IDs, one per 4 bytes.
pub fn parse_chap(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let mut index = 0usize;
    while reader.remaining() >= 4
    {
        let track_id = reader.u32()?;
        emitter.table_row(index, &format!("- [{index}] track_ID={track_id}"))?;
        index += 1;
    }
    emitter.table_summary(&format!("[referenced_tracks = {index}]"))
}

/// `keys`: the `mdta`-scheme metadata key namespace table paired with `ilst`. Each
/// entry's declared size includes its own 8-byte `size`+`key_namespace` prefix.
pub fn parse_keys(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field_default("version", &version.to_string(), "0", None)?;

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    for i in 0..entry_count as usize
    {
        let key_size = reader.u32()?;
        if key_size < 8
        {
            return Err(DissectError::Custom(format!("keys entry {i} declares size {key_size} smaller than its own header")));
        }
        let key_namespace = String::from_utf8_lossy(reader.bytes(4)?).into_owned();
        let key_value = String::from_utf8_lossy(reader.bytes(key_size as u64 - 8)?).into_owned();

        emitter.table_row(i, &format!("- [{}] '{key_namespace}' \"{key_value}\"", i + 1))?;
    }

    emitter.table_summary(&format!("[keys = {entry_count}]"))
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
    fn data_box_renders_utf8_value()
    {
        let mut data = vec![0u8, 0, 0, 1]; // version 0, type_indicator 1 (UTF-8)
        data.extend_from_slice(&0u32.to_be_bytes()); // locale
        data.extend_from_slice(b"Example Title");

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_data(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("value = \"Example Title\""));
        assert!(out.contains("type_indicator = 1 (UTF-8)"));
    }

    #[test]
    fn keys_lists_namespace_and_value()
    {
        let mut data = vec![0u8, 0, 0, 0];
        data.extend_from_slice(&1u32.to_be_bytes()); // entry_count
        let key_value = b"com.apple.quicktime.artwork";
        data.extend_from_slice(&((8 + key_value.len()) as u32).to_be_bytes());
        data.extend_from_slice(b"mdta");
        data.extend_from_slice(key_value);

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_keys(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("'mdta' \"com.apple.quicktime.artwork\""));
    }

    #[test]
    fn chap_lists_track_ids()
    {
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(&3u32.to_be_bytes());

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_chap(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("track_ID=2"));
        assert!(out.contains("track_ID=3"));
        assert!(out.contains("[referenced_tracks = 2]"));
    }
}
