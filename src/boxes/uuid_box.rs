//! `uuid`: extended-type box. The 16-byte extended type has already been consumed by the
//! driver's header read and is handed in as `uuid_extended`; this parser only decides what
//! to do with the payload that follows, via a small secondary table keyed by the full 16
//! bytes, falling back to a hex dump for anything unrecognized.

use crate::{bitreader::BitReader, context::ParseContext, emitter::Emitter, error::DissectError, lookup};

/// Apple's "Pico preview" uuid box and the common piff sample-encryption-box UUIDs are the
/// only ones seen often enough in the wild to warrant a name; everything else still
/// prints the extended type (so it's always visible) and falls back to hex dump.
fn known_uuid_description(uuid: &[u8; 16]) -> Option<&'static str>
{
    match uuid
    {
        // PIFF 1.1 Sample Encryption Box (same payload shape as ISOBMFF `senc`).
        | [0xA2, 0x39, 0x4F, 0x52, 0x5A, 0x9B, 0x4F, 0x14, 0xA2, 0x44, 0x6C, 0x42, 0x7C, 0x64, 0x8D, 0xF4] => Some("PIFF Sample Encryption Box"),
        // PIFF Track Encryption Box.
        | [0x89, 0x74, 0xDB, 0xCE, 0x7B, 0xE7, 0x4C, 0x51, 0x84, 0xF9, 0x71, 0x48, 0xF9, 0x88, 0x25, 0x54] => Some("PIFF Track Encryption Box"),
        | _ => lookup::pssh_system_id_description(uuid)
    }
}

pub fn parse_uuid(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    let extended_type = uuid.ok_or_else(|| DissectError::Custom("uuid box reached its parser without an extended type".to_string()))?;

    emitter.field("extended_type", &lookup::format_uuid(&extended_type), known_uuid_description(&extended_type))?;

    let data = reader.bytes(reader.remaining())?;
    if !data.is_empty()
    {
        emitter.hexdump(data, base)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::cli::{ColorMode, Options};

    #[test]
    fn uuid_without_extended_type_errors()
    {
        let data: [u8; 0] = [];
        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = Emitter::new(&mut buf, Options { color_mode: ColorMode::Off, ..Options::default() });
        let mut ctx = ParseContext::default();
        assert!(parse_uuid(&mut reader, &mut e, &mut ctx, None, 0).is_err());
    }

    #[test]
    fn uuid_hex_dumps_payload()
    {
        let data = [0xAAu8, 0xBB];
        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = Emitter::new(&mut buf, Options { color_mode: ColorMode::Off, ..Options::default() });
        let mut ctx = ParseContext::default();
        parse_uuid(&mut reader, &mut e, &mut ctx, Some([0u8; 16]), 0).unwrap();
        drop(e);
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("AA BB"));
    }
}
