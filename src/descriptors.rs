//! Descriptor registry: the MPEG-4 Part 1 (ISO/IEC 14496-1) tag/length
//! descriptor sub-grammar used inside `esds`/`iods`. Mirrors the box registry's shape — a
//! flat table from tag to a parser function — rather than a separate dispatch mechanism,
//! implemented as a closed set of variants registered at startup, not a dynamic dispatch mechanism.

use crate::{bitreader::BitReader, emitter::Emitter, error::DissectError, lookup};

/// A descriptor parser receives the reader scoped to exactly this descriptor's payload
/// (the tag and BER length have already been consumed by `parse_descriptor`) plus the
/// absolute file offset of the descriptor's payload start, for hex-dump fallbacks.
type DescriptorParser = fn(&mut BitReader, &mut Emitter, u64) -> Result<(), DissectError>;

fn lookup_descriptor(tag: u8) -> Option<(&'static str, DescriptorParser)>
{
    match tag
    {
        | 0x03 => Some(("ES_Descriptor", parse_es_descriptor)),
        | 0x04 => Some(("DecoderConfigDescriptor", parse_decoder_config_descriptor)),
        | 0x05 => Some(("DecoderSpecificInfo", parse_decoder_specific_info)),
        | 0x06 => Some(("SLConfigDescriptor", parse_sl_config_descriptor)),
        | 0x10 => Some(("MP4InitialObjectDescriptor", parse_iod_descriptor)),
        | _ => None
    }
}

/// Read one BER-style variable-length size: 1-4 bytes, 7 payload bits per byte, high bit
/// set on every byte but the last (ISO/IEC 14496-1 §8.3.3).
fn read_ber_length(reader: &mut BitReader) -> Result<u32, DissectError>
{
    let mut size: u32 = 0;
    for _ in 0..4
    {
        let b = reader.u8()?;
        size = (size << 7) | (b & 0x7F) as u32;
        if b & 0x80 == 0
        {
            return Ok(size);
        }
    }
    Err(DissectError::Custom("descriptor length varint exceeds 4 bytes".to_string()))
}

/// Parse one descriptor: tag, BER length, dispatch by tag. `base` is the absolute file
/// offset the reader's position 0 corresponds to, used to open the emitter scope with
/// correct offsets and to label hex-dump fallbacks — the tag + varint size + payload
/// framing is centralized here rather than repeated per descriptor parser.
pub fn parse_descriptor(reader: &mut BitReader, emitter: &mut Emitter, base: u64) -> Result<(), DissectError>
{
    let header_offset = base + reader.position();
    let tag = reader.u8()?;
    let size = read_ber_length(reader)?;

    let payload_start = base + reader.position();
    let payload_end = payload_start + size as u64;

    let mut body = reader.sub_reader(size as u64)?;

    match lookup_descriptor(tag)
    {
        | Some((name, parser)) =>
        {
            emitter.enter_labeled(&format!("[{tag}] {name}"), header_offset, payload_start, payload_end)?;
            let result = parser(&mut body, emitter, payload_start);
            if result.is_ok() && !body.at_end()
            {
                let trailing = body.remaining();
                let offset = payload_start + body.position();
                let rest = body.peek_rest().to_vec();
                emitter.warn(&format!("{trailing} trailing byte(s) not consumed by descriptor tag 0x{tag:02X}"))?;
                emitter.hexdump(&rest, offset)?;
            }
            emitter.leave();
            result
        },
        | None =>
        {
            emitter.enter_labeled(&format!("[0x{tag:02X}] UnknownDescriptor"), header_offset, payload_start, payload_end)?;
            let rest = body.bytes(body.remaining())?;
            let dump_result = emitter.hexdump(rest, payload_start).map_err(DissectError::from);
            emitter.leave();
            dump_result
        }
    }
}

/// Parse every descriptor that fits in the remaining bytes of `reader`, e.g. the child
/// descriptors of `ES_Descriptor`/`MP4InitialObjectDescriptor`.
fn parse_descriptor_sequence(reader: &mut BitReader, emitter: &mut Emitter, base: u64) -> Result<(), DissectError>
{
    while reader.remaining() >= 2
    {
        parse_descriptor(reader, emitter, base)?;
    }
    Ok(())
}

const ES_DEPENDS_ON: u8 = 0x80;
const ES_URL: u8 = 0x40;
const ES_OCR_STREAM: u8 = 0x20;

/// Tag `0x03` `ES_Descriptor`: the elementary stream's ID plus optional dependency/URL/OCR
/// fields gated by three flag bits, then nested `DecoderConfigDescriptor`/
/// `SLConfigDescriptor` children.
fn parse_es_descriptor(reader: &mut BitReader, emitter: &mut Emitter, base: u64) -> Result<(), DissectError>
{
    let es_id = reader.u16()?;
    emitter.field("ES_ID", &es_id.to_string(), None)?;

    let flags = reader.u8()?;
    let depends_on_es_id_flag = flags & ES_DEPENDS_ON != 0;
    let url_flag = flags & ES_URL != 0;
    let ocr_stream_flag = flags & ES_OCR_STREAM != 0;
    let stream_priority = flags & 0x1F;

    emitter.field(
        "flags",
        &format!("0x{flags:02X}"),
        Some(&format!("dependsOn={depends_on_es_id_flag}, URL={url_flag}, OCRstream={ocr_stream_flag}"))
    )?;
    emitter.field_default("streamPriority", &stream_priority.to_string(), "0", None)?;

    if depends_on_es_id_flag
    {
        emitter.field("dependsOn_ES_ID", &reader.u16()?.to_string(), None)?;
    }
    if url_flag
    {
        let url = reader.pascal_string(None)?;
        emitter.field("URL", &format!("\"{url}\""), None)?;
    }
    if ocr_stream_flag
    {
        emitter.field("OCR_ES_ID", &reader.u16()?.to_string(), None)?;
    }

    parse_descriptor_sequence(reader, emitter, base)
}

/// Tag `0x04` `DecoderConfigDescriptor`: codec identification plus buffer/bitrate budget,
/// then a `DecoderSpecificInfo` child.
fn parse_decoder_config_descriptor(reader: &mut BitReader, emitter: &mut Emitter, base: u64) -> Result<(), DissectError>
{
    let object_type_indication = reader.u8()?;
    emitter.field("objectTypeIndication", &object_type_indication.to_string(), lookup::object_type_indication_description(object_type_indication))?;

    let stream_type = reader.u(6)? as u8;
    let up_stream = reader.flag()?;
    reader.flag()?; // reserved, must be 1

    emitter.field("streamType", &stream_type.to_string(), lookup::stream_type_description(stream_type))?;
    emitter.field_default("upStream", &up_stream.to_string(), "false", None)?;

    let buffer_size_db = reader.u(24)?;
    let max_bitrate = reader.u32()?;
    let avg_bitrate = reader.u32()?;

    emitter.field("bufferSizeDB", &buffer_size_db.to_string(), Some("bytes"))?;
    emitter.field("maxBitrate", &max_bitrate.to_string(), Some("bits/second"))?;
    emitter.field("avgBitrate", &avg_bitrate.to_string(), Some("bits/second"))?;

    parse_descriptor_sequence(reader, emitter, base)
}

/// Tag `0x05` `DecoderSpecificInfo`: opaque codec-private data (SPS/PPS, AAC
/// `AudioSpecificConfig`, ...) — codec-private data is hex-dumped rather than decoded.
fn parse_decoder_specific_info(reader: &mut BitReader, emitter: &mut Emitter, base: u64) -> Result<(), DissectError>
{
    let data = reader.bytes(reader.remaining())?;
    emitter.hexdump(data, base)
}

/// Tag `0x06` `SLConfigDescriptor`: a `predefined` profile byte; `0x00` means the full
/// sync-layer header configuration follows (ISO/IEC 14496-1 §10.2.3), any other value is a
/// named preset with nothing further to parse.
fn parse_sl_config_descriptor(reader: &mut BitReader, emitter: &mut Emitter, base: u64) -> Result<(), DissectError>
{
    let predefined = reader.u8()?;
    emitter.field(
        "predefined",
        &predefined.to_string(),
        Some(match predefined
        {
            | 0x00 => "custom",
            | 0x01 => "null SL packet header",
            | 0x02 => "Reserved for use in MP4 files",
            | _ => "reserved/vendor-defined"
        })
    )?;

    if predefined == 0x00 && reader.remaining() > 0
    {
        let offset = base + reader.position();
        let data = reader.bytes(reader.remaining())?;
        emitter.note("(custom SL packet header configuration)")?;
        emitter.hexdump(data, offset)?;
    }

    Ok(())
}

/// Tag `0x10` `MP4InitialObjectDescriptor`: the top-level `iods` payload — profile
/// indications for each media category, then child `ES_Descriptor`s.
fn parse_iod_descriptor(reader: &mut BitReader, emitter: &mut Emitter, base: u64) -> Result<(), DissectError>
{
    let object_descriptor_id_and_url_flag = reader.u16()?;
    let object_descriptor_id = object_descriptor_id_and_url_flag >> 6;
    let url_flag = object_descriptor_id_and_url_flag & 0x20 != 0;

    emitter.field("ObjectDescriptorID", &object_descriptor_id.to_string(), None)?;

    if url_flag
    {
        let url = reader.pascal_string(None)?;
        emitter.field("URL", &format!("\"{url}\""), None)?;
        return Ok(());
    }

    emitter.field("includeInlineProfileLevelFlag", "false", None)?;
    emitter.field("ODProfileLevelIndication", &reader.u8()?.to_string(), None)?;
    emitter.field("sceneProfileLevelIndication", &reader.u8()?.to_string(), None)?;
    emitter.field("audioProfileLevelIndication", &reader.u8()?.to_string(), None)?;
    emitter.field("visualProfileLevelIndication", &reader.u8()?.to_string(), None)?;
    emitter.field("graphicsProfileLevelIndication", &reader.u8()?.to_string(), None)?;

    parse_descriptor_sequence(reader, emitter, base)
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
    fn esds_chain_nests_es_decoder_config_and_sl()
    {
        // ES_Descriptor(ES_ID=1, flags=0) { DecoderConfigDescriptor(objectTypeIndication=107,
        //   streamType=5) { } , SLConfigDescriptor(predefined=2) }
        let mut dcd = vec![107u8, (5 << 2) | 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut sl = vec![2u8];

        let mut es = Vec::new();
        es.extend_from_slice(&1u16.to_be_bytes());
        es.push(0); // flags

        let mut dcd_full = vec![0x04u8, dcd.len() as u8];
        dcd_full.append(&mut dcd);
        es.extend_from_slice(&dcd_full);

        let mut sl_full = vec![0x06u8, sl.len() as u8];
        sl_full.append(&mut sl);
        es.extend_from_slice(&sl_full);

        let mut data = vec![0x03u8, es.len() as u8];
        data.extend_from_slice(&es);

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        parse_descriptor(&mut reader, &mut e, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("[3] ES_Descriptor"));
        assert!(out.contains("[4] DecoderConfigDescriptor"));
        assert!(out.contains("[6] SLConfigDescriptor"));
        assert!(out.contains("objectTypeIndication = 107 (MPEG-1 Audio (usually MP3))"));
        assert!(out.contains("streamType = 5 (AudioStream)"));
    }

    #[test]
    fn unknown_tag_hex_dumps()
    {
        let data = vec![0xFEu8, 2, 0xAA, 0xBB];
        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        parse_descriptor(&mut reader, &mut e, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("UnknownDescriptor"));
        assert!(out.contains("AA BB"));
    }
}
