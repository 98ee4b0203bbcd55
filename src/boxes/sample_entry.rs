//! Sample entries: the `stsd` children whose grammar depends on the enclosing track's
//! handler type. Video and audio share the same base
//! record shape (reserved bytes, `data_reference_index`, then format-specific fields)
//! before falling through to a child box sequence for codec configuration boxes
//! (`avcC`/`hvcC`/`esds`/`btrt`/...), which are looked up unqualified like any other box.

use crate::{boxes::read_full_box_header, bitreader::BitReader, context::ParseContext, descriptors, driver, emitter::Emitter, error::DissectError};

fn recurse_children(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, base: u64) -> Result<(), DissectError>
{
    driver::dissect_box_sequence(reader, base, emitter, ctx, None).map(|_| ()).map_err(|e| DissectError::Custom(e.to_string()))
}

/// `avc1`/`avc3`/`hvc1`/`hvc3`/`encv`/`mp4v`/`vp08`/`vp09`/`av01` inside `stsd`: the common
/// `VisualSampleEntry` prefix (ISO/IEC 14496-12 §8.5.2.2), then a codec configuration box
/// sequence (`avcC`, `hvcC`, `colr`, `pasp`, `btrt`, ...).
pub fn parse_video_sample_entry(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    reader.bytes(6)?; // reserved
    let data_reference_index = reader.u16()?;
    emitter.field("data_reference_index", &data_reference_index.to_string(), None)?;

    reader.bytes(2)?; // pre_defined
    reader.bytes(2)?; // reserved
    reader.bytes(12)?; // pre_defined[3]

    let width = reader.u16()?;
    let height = reader.u16()?;
    emitter.field("width", &width.to_string(), Some("pixels"))?;
    emitter.field("height", &height.to_string(), Some("pixels"))?;

    let horizresolution = reader.fixed(16, 16)?;
    let vertresolution = reader.fixed(16, 16)?;
    emitter.field_default("horizresolution", &format!("{horizresolution:.4}"), "72.0000", None)?;
    emitter.field_default("vertresolution", &format!("{vertresolution:.4}"), "72.0000", None)?;

    reader.bytes(4)?; // reserved

    let frame_count = reader.u16()?;
    emitter.field_default("frame_count", &frame_count.to_string(), "1", None)?;

    let compressorname = reader.pascal_string(Some(32))?;
    if !compressorname.is_empty()
    {
        emitter.field("compressorname", &format!("\"{compressorname}\""), None)?;
    }

    let depth = reader.u16()?;
    emitter.field_default("depth", &depth.to_string(), "24", None)?;

    reader.bytes(2)?; // pre_defined = -1

    recurse_children(reader, emitter, ctx, base)
}

/// `mp4a`/`enca`/`ac-3`/`ec-3`/`opus`/`alac` inside `stsd`: the common `AudioSampleEntry`
/// prefix, version-selected per the QuickTime sound-description extensions (version 1
/// adds the QuickTime extension block, version 2 the full v2 extension), then a codec
/// configuration box sequence (typically `esds`).
pub fn parse_audio_sample_entry(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    reader.bytes(6)?; // reserved
    let data_reference_index = reader.u16()?;
    emitter.field("data_reference_index", &data_reference_index.to_string(), None)?;

    let version = reader.u16()?;
    emitter.field("version", &version.to_string(), None)?;
    reader.bytes(2)?; // revision_level
    reader.bytes(4)?; // vendor

    let channelcount = reader.u16()?;
    let samplesize = reader.u16()?;
    emitter.field_default("channelcount", &channelcount.to_string(), "2", None)?;
    emitter.field_default("samplesize", &format!("{samplesize} bits"), "16 bits", None)?;

    reader.bytes(2)?; // compression_id / pre_defined
    reader.bytes(2)?; // packet_size / reserved

    let samplerate = reader.fixed(16, 16)?;
    emitter.field("samplerate", &format!("{samplerate:.1} Hz"), None)?;

    if version == 1
    {
        let samples_per_packet = reader.u32()?;
        let bytes_per_packet = reader.u32()?;
        let bytes_per_frame = reader.u32()?;
        let bytes_per_sample = reader.u32()?;
        emitter.field("samplesPerPacket", &samples_per_packet.to_string(), None)?;
        emitter.field("bytesPerPacket", &bytes_per_packet.to_string(), None)?;
        emitter.field("bytesPerFrame", &bytes_per_frame.to_string(), None)?;
        emitter.field("bytesPerSample", &bytes_per_sample.to_string(), None)?;
    }
    else if version == 2
    {
        let size_of_struct_only = reader.u32()?;
        let sample_rate_bits = reader.u64()?;
        let num_audio_channels = reader.u32()?;
        reader.bytes(4)?; // always7F000000
        let const_bits_per_channel = reader.u32()?;
        let format_specific_flags = reader.u32()?;
        let const_bytes_per_audio_packet = reader.u32()?;
        let const_lpcm_frames_per_audio_packet = reader.u32()?;

        emitter.field("sizeOfStructOnly", &size_of_struct_only.to_string(), None)?;
        emitter.field("sampleRate64", &format!("{:.4} Hz", f64::from_bits(sample_rate_bits)), None)?;
        emitter.field("numAudioChannels", &num_audio_channels.to_string(), None)?;
        emitter.field("constBitsPerChannel", &const_bits_per_channel.to_string(), None)?;
        emitter.field("formatSpecificFlags", &format!("0x{format_specific_flags:08X}"), None)?;
        emitter.field("constBytesPerAudioPacket", &const_bytes_per_audio_packet.to_string(), None)?;
        emitter.field("constLPCMFramesPerAudioPacket", &const_lpcm_frames_per_audio_packet.to_string(), None)?;
    }

    recurse_children(reader, emitter, ctx, base)
}

/// `esds`/`iods`: a FullBox whose payload is one MPEG-4 descriptor (an `ES_Descriptor` for
/// `esds`, an `MP4InitialObjectDescriptor` for `iods`), delegated to the descriptor
/// registry.
pub fn parse_esds(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    while reader.remaining() >= 2
    {
        descriptors::parse_descriptor(reader, emitter, base)?;
    }

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
    fn video_sample_entry_reads_dimensions_and_compressorname()
    {
        let mut data = vec![0u8; 6]; // reserved
        data.extend_from_slice(&1u16.to_be_bytes()); // data_reference_index
        data.extend_from_slice(&[0u8; 2]); // pre_defined
        data.extend_from_slice(&[0u8; 2]); // reserved
        data.extend_from_slice(&[0u8; 12]); // pre_defined[3]
        data.extend_from_slice(&1920u16.to_be_bytes());
        data.extend_from_slice(&1080u16.to_be_bytes());
        data.extend_from_slice(&0x00480000u32.to_be_bytes()); // horizresolution
        data.extend_from_slice(&0x00480000u32.to_be_bytes()); // vertresolution
        data.extend_from_slice(&[0u8; 4]); // reserved
        data.extend_from_slice(&1u16.to_be_bytes()); // frame_count
        let mut name = vec![4u8];
        name.extend_from_slice(b"test");
        name.resize(32, 0);
        data.extend_from_slice(&name);
        data.extend_from_slice(&0x0018u16.to_be_bytes()); // depth
        data.extend_from_slice(&0xFFFFu16.to_be_bytes()); // pre_defined = -1

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_video_sample_entry(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("width = 1920"));
        assert!(out.contains("height = 1080"));
        assert!(out.contains("compressorname = \"test\""));
    }

    #[test]
    fn audio_sample_entry_v1_reads_extension_block()
    {
        let mut data = vec![0u8; 6];
        data.extend_from_slice(&1u16.to_be_bytes()); // data_reference_index
        data.extend_from_slice(&1u16.to_be_bytes()); // version = 1
        data.extend_from_slice(&[0u8; 2]); // revision_level
        data.extend_from_slice(&[0u8; 4]); // vendor
        data.extend_from_slice(&2u16.to_be_bytes()); // channelcount
        data.extend_from_slice(&16u16.to_be_bytes()); // samplesize
        data.extend_from_slice(&[0u8; 2]);
        data.extend_from_slice(&[0u8; 2]);
        data.extend_from_slice(&0x00AC_0000u32.to_be_bytes()); // samplerate = 172.0
        data.extend_from_slice(&1024u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&2u32.to_be_bytes());

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_audio_sample_entry(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("samplesPerPacket = 1024"));
    }

    #[test]
    fn esds_objectTypeIndication_annotation()
    {
        let mut dcd = vec![0x40u8, (5 << 2), 0, 0, 0, 0, 0, 0, 0, 0];
        let mut es = Vec::new();
        es.extend_from_slice(&1u16.to_be_bytes());
        es.push(0);
        let mut dcd_full = vec![0x04u8, dcd.len() as u8];
        dcd_full.append(&mut dcd);
        es.extend_from_slice(&dcd_full);

        let mut payload = vec![0x03u8, es.len() as u8];
        payload.extend_from_slice(&es);

        let mut data = vec![0u8, 0, 0, 0];
        data.extend_from_slice(&payload);

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_esds(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("objectTypeIndication = 64 (MPEG-4 Audio (AAC))"));
    }
}
