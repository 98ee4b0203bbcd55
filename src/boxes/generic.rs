use crate::{bitreader::BitReader, context::ParseContext, driver, emitter::Emitter, error::DissectError};

/// `free`/`skip`: padding, no fields — just note its size.
pub fn parse_free(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    emitter.field("padding", &format!("{} byte(s)", reader.remaining()), None)?;
    reader.bytes(reader.remaining())?;
    Ok(())
}

/// `btrt`: bitrate box, a small informational child of a sample entry giving decoder
/// buffer/bitrate budget — the same three fields `esds`'s `DecoderConfigDescriptor`
/// already carries, but present even for codecs with no `esds`.
pub fn parse_btrt(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    emitter.field("bufferSizeDB", &reader.u32()?.to_string(), Some("bytes"))?;
    emitter.field("maxBitrate", &reader.u32()?.to_string(), Some("bits/second"))?;
    emitter.field("avgBitrate", &reader.u32()?.to_string(), Some("bits/second"))?;
    Ok(())
}

/// `mdat`/`idat`: opaque sample/item data. Dumped (bounded by `--rows`) rather than
/// decoded — this is the universal fallback for anything the dissector is told not to
/// understand.
pub fn parse_opaque(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    emitter.field("size", &format!("{} byte(s)", reader.remaining()), None)?;
    let rest = reader.bytes(reader.remaining())?;
    emitter.hexdump(rest, base)
}

/// Fallback for any box type the registry has no grammar for. Heuristically probes
/// whether the payload looks like a nested box sequence (its first child's declared size
/// plausibly fits the remaining bytes) and recurses if so; otherwise hex-dumps the
/// payload untouched. An unrecognized box type is never treated as an error.
pub fn parse_unknown(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    if looks_like_box_sequence(reader)
    {
        emitter.note("(probable container)")?;
        driver::dissect_box_sequence(reader, base, emitter, ctx, None).map(|_| ()).map_err(|e| DissectError::Custom(e.to_string()))?;
        return Ok(());
    }

    let rest = reader.bytes(reader.remaining())?;
    emitter.hexdump(rest, base)
}

fn looks_like_box_sequence(reader: &BitReader) -> bool
{
    let data = reader.peek_rest();
    if data.len() < 8
    {
        return false;
    }

    let size32 = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let type_ascii = data[4..8].iter().all(|&b| b.is_ascii_graphic() || b == b' ');

    if !type_ascii
    {
        return false;
    }

    match size32
    {
        | 0 => true,
        | 1 => data.len() >= 16,
        | n => (n as u64) >= 8 && (n as u64) <= data.len() as u64
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::{cli::Options, context::ParseContext};

    #[test]
    fn unknown_box_falls_back_to_hexdump()
    {
        let data = [0xDEu8, 0xAD, 0xBE, 0xEF];
        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf, Options { color_mode: crate::cli::ColorMode::Off, ..Options::default() });
        let mut ctx = ParseContext::default();
        parse_unknown(&mut reader, &mut emitter, &mut ctx, None, 0).unwrap();
        drop(emitter);
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("DE AD BE EF"));
    }
}
