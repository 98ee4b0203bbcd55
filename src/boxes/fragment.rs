use crate::{bitreader::BitReader, boxes::read_full_box_header, context::ParseContext, emitter::Emitter, error::DissectError, lookup};

fn sample_depends_on_description(value: u64) -> &'static str
{
    match value
    {
        | 0 => "unknown",
        | 1 => "yes",
        | 2 => "no",
        | _ => "reserved"
    }
}

/// Decode a packed `sample_flags` 32-bit value (ISO/IEC 14496-12 §8.8.3.1), used by both
/// `tfhd.default_sample_flags` and `trun`'s per-sample/first-sample flags.
fn emit_sample_flags(emitter: &mut Emitter, label: &str, value: u32) -> Result<(), DissectError>
{
    let is_leading = (value >> 26) & 0x3;
    let depends_on = (value >> 24) & 0x3;
    let is_depended_on = (value >> 22) & 0x3;
    let has_redundancy = (value >> 20) & 0x3;
    let padding_value = (value >> 17) & 0x7;
    let is_non_sync = (value >> 16) & 0x1;
    let degradation_priority = value & 0xFFFF;

    emitter.note(&format!("{label}:"))?;
    emitter.field("  sample_is_leading", &is_leading.to_string(), None)?;
    emitter.field("  sample_depends_on", &depends_on.to_string(), Some(sample_depends_on_description(depends_on)))?;
    emitter.field("  sample_is_depended_on", &is_depended_on.to_string(), None)?;
    emitter.field("  sample_has_redundancy", &has_redundancy.to_string(), None)?;
    emitter.field("  sample_padding_value", &padding_value.to_string(), None)?;
    emitter.field("  sample_is_non_sync_sample", if is_non_sync != 0 { "True" } else { "False" }, None)?;
    emitter.field("  sample_degradation_priority", &degradation_priority.to_string(), None)?;
    Ok(())
}

const TFHD_BASE_DATA_OFFSET_PRESENT: u32 = 0x000001;
const TFHD_SAMPLE_DESCRIPTION_INDEX_PRESENT: u32 = 0x000002;
const TFHD_DEFAULT_SAMPLE_DURATION_PRESENT: u32 = 0x000008;
const TFHD_DEFAULT_SAMPLE_SIZE_PRESENT: u32 = 0x000010;
const TFHD_DEFAULT_SAMPLE_FLAGS_PRESENT: u32 = 0x000020;
const TFHD_DURATION_IS_EMPTY: u32 = 0x010000;
const TFHD_DEFAULT_BASE_IS_MOOF: u32 = 0x020000;

/// `tfhd`: track fragment header. Every optional field after `track_ID` is gated by a
/// flag bit in `tfhd.flags` that selects which optional fields are present.
pub fn parse_tfhd(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;
    emitter.field("flags", &format!("{flags:06X}"), None)?;

    let track_id = reader.u32()?;
    emitter.field("track_ID", &track_id.to_string(), None)?;

    if flags & TFHD_BASE_DATA_OFFSET_PRESENT != 0
    {
        let base_data_offset = reader.u64()?;
        emitter.field("base_data_offset", &format!("0x{base_data_offset:X}"), None)?;
    }
    if flags & TFHD_DEFAULT_BASE_IS_MOOF != 0
    {
        emitter.note("default-base-is-moof flag set")?;
    }
    if flags & TFHD_SAMPLE_DESCRIPTION_INDEX_PRESENT != 0
    {
        let index = reader.u32()?;
        emitter.field("sample_description_index", &index.to_string(), None)?;
    }
    if flags & TFHD_DEFAULT_SAMPLE_DURATION_PRESENT != 0
    {
        let duration = reader.u32()?;
        emitter.field("default_sample_duration", &duration.to_string(), None)?;
    }
    if flags & TFHD_DEFAULT_SAMPLE_SIZE_PRESENT != 0
    {
        let size = reader.u32()?;
        emitter.field("default_sample_size", &size.to_string(), None)?;
    }
    if flags & TFHD_DEFAULT_SAMPLE_FLAGS_PRESENT != 0
    {
        let sample_flags = reader.u32()?;
        emit_sample_flags(emitter, "default_sample_flags", sample_flags)?;
    }
    if flags & TFHD_DURATION_IS_EMPTY != 0
    {
        emitter.note("duration-is-empty flag set")?;
    }

    Ok(())
}

/// `tfdt`: the fragment's `baseMediaDecodeTime`, 32- or 64-bit per `version`.
pub fn parse_tfdt(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let base_media_decode_time = if version == 1 { reader.u64()? } else { reader.u32()? as u64 };
    emitter.field("baseMediaDecodeTime", &base_media_decode_time.to_string(), None)
}

const TRUN_DATA_OFFSET_PRESENT: u32 = 0x000001;
const TRUN_FIRST_SAMPLE_FLAGS_PRESENT: u32 = 0x000004;
const TRUN_SAMPLE_DURATION_PRESENT: u32 = 0x000100;
const TRUN_SAMPLE_SIZE_PRESENT: u32 = 0x000200;
const TRUN_SAMPLE_FLAGS_PRESENT: u32 = 0x000400;
const TRUN_SAMPLE_COMPOSITION_TIME_OFFSETS_PRESENT: u32 = 0x000800;

/// `trun`: track fragment run — the per-sample table driving an entire fragment's
/// playout. Every per-sample column is independently flag-gated.
pub fn parse_trun(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;
    emitter.field("flags", &format!("{flags:06X}"), None)?;

    let sample_count = reader.u32()?;
    emitter.field("sample_count", &sample_count.to_string(), None)?;

    if flags & TRUN_DATA_OFFSET_PRESENT != 0
    {
        let data_offset = reader.i32()?;
        emitter.field("data_offset", &data_offset.to_string(), None)?;
    }
    if flags & TRUN_FIRST_SAMPLE_FLAGS_PRESENT != 0
    {
        let first_sample_flags = reader.u32()?;
        emit_sample_flags(emitter, "first_sample_flags", first_sample_flags)?;
    }

    let mut total_duration: u64 = 0;
    let mut total_size: u64 = 0;

    for i in 0..sample_count as usize
    {
        let mut row = format!("- [{i}]");

        if flags & TRUN_SAMPLE_DURATION_PRESENT != 0
        {
            let duration = reader.u32()?;
            total_duration += duration as u64;
            row.push_str(&format!(" duration={duration}"));
        }
        if flags & TRUN_SAMPLE_SIZE_PRESENT != 0
        {
            let size = reader.u32()?;
            total_size += size as u64;
            row.push_str(&format!(" size={size}"));
        }
        if flags & TRUN_SAMPLE_FLAGS_PRESENT != 0
        {
            let sample_flags = reader.u32()?;
            row.push_str(&format!(" flags=0x{sample_flags:08X}"));
        }
        if flags & TRUN_SAMPLE_COMPOSITION_TIME_OFFSETS_PRESENT != 0
        {
            let raw = reader.u32()?;
            row.push_str(&format!(" composition_time_offset={}", raw as i32));
        }

        emitter.table_row(i, &row)?;
    }

    emitter.table_summary(&format!("[samples = {sample_count}, total_duration = {total_duration}, total_size = {total_size}]"))
}

/// `saio`: sample auxiliary information offsets — points at where `senc`-style auxiliary
/// data for each sample actually lives (it may be out-of-line, e.g. in a separate `mdat`).
pub fn parse_saio(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    if flags & 0x1 != 0
    {
        let aux_info_type = String::from_utf8_lossy(reader.bytes(4)?).into_owned();
        let aux_info_type_parameter = reader.u32()?;
        emitter.field("aux_info_type", &format!("'{aux_info_type}'"), None)?;
        emitter.field("aux_info_type_parameter", &aux_info_type_parameter.to_string(), None)?;
    }

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    for i in 0..entry_count as usize
    {
        let offset = if version == 1 { reader.u64()? } else { reader.u32()? as u64 };
        emitter.table_row(i, &format!("- [{i}] offset=0x{offset:X}"))?;
    }

    emitter.table_summary(&format!("[entries = {entry_count}]"))
}

/// `saiz`: sample auxiliary information sizes. `default_sample_info_size == 0` means
/// sizes vary per sample and a table of `sample_count` one-byte sizes follows.
pub fn parse_saiz(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    if flags & 0x1 != 0
    {
        let aux_info_type = String::from_utf8_lossy(reader.bytes(4)?).into_owned();
        let aux_info_type_parameter = reader.u32()?;
        emitter.field("aux_info_type", &format!("'{aux_info_type}'"), None)?;
        emitter.field("aux_info_type_parameter", &aux_info_type_parameter.to_string(), None)?;
    }

    let default_sample_info_size = reader.u8()?;
    let sample_count = reader.u32()?;
    emitter.field("default_sample_info_size", &default_sample_info_size.to_string(), None)?;
    emitter.field("sample_count", &sample_count.to_string(), None)?;

    if default_sample_info_size == 0
    {
        for i in 0..sample_count as usize
        {
            let size = reader.u8()?;
            emitter.table_row(i, &format!("- [{i}] size={size}"))?;
        }
        emitter.table_summary(&format!("[samples = {sample_count}]"))?;
    }

    Ok(())
}

/// `senc`: per-sample initialization vectors and, with `flags & 0x2`, subsample
/// encryption ranges. The per-sample IV size isn't carried in `senc` itself — it comes
/// from a sibling `tenc.default_Per_Sample_IV_Size` already seen in this track, or the
/// `--senc-per-sample-iv` override; absent both, the whole remaining payload is
/// hex-dumped rather than guessed at.
pub fn parse_senc(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    let (version, flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let sample_count = reader.u32()?;
    emitter.field("sample_count", &sample_count.to_string(), None)?;

    let iv_size = match ctx.senc_per_sample_iv_size()
    {
        | Some(size) => size,
        | None =>
        {
            emitter.warn("no tenc.default_Per_Sample_IV_Size in scope and no --senc-per-sample-iv override; dumping raw sample data")?;
            let offset = base + reader.position();
            let rest = reader.bytes(reader.remaining())?;
            emitter.hexdump(rest, offset)?;
            return Ok(());
        }
    };

    let has_subsamples = flags & 0x2 != 0;

    for i in 0..sample_count as usize
    {
        let iv = reader.bytes(iv_size as u64)?;
        let iv_hex: String = iv.iter().map(|b| format!("{b:02X}")).collect();
        let mut row = format!("- [{i}] InitializationVector={iv_hex}");

        if has_subsamples
        {
            let subsample_count = reader.u16()?;
            let mut parts = Vec::new();
            for _ in 0..subsample_count
            {
                let clear = reader.u16()?;
                let protected = reader.u32()?;
                parts.push(format!("(clear={clear}, protected={protected})"));
            }
            row.push_str(&format!(" subsamples=[{}]", parts.join(" ")));
        }

        emitter.table_row(i, &row)?;
    }

    emitter.table_summary(&format!("[samples = {sample_count}]"))
}

/// `tenc`: default per-track encryption parameters. Populates
/// `ctx.tenc_default_iv_size` so a following `senc` in the same `traf`/`schi` scope can
/// size its per-sample IVs without a user override.
pub fn parse_tenc(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    reader.u8()?; // reserved
    if version == 0
    {
        reader.u8()?; // reserved
    }
    else
    {
        let default_crypt_byte_block = reader.u(4)?;
        let default_skip_byte_block = reader.u(4)?;
        emitter.field("default_crypt_byte_block", &default_crypt_byte_block.to_string(), None)?;
        emitter.field("default_skip_byte_block", &default_skip_byte_block.to_string(), None)?;
    }

    let default_is_protected = reader.u8()?;
    let default_per_sample_iv_size = reader.u8()?;
    let default_kid = reader.bytes(16)?;
    let kid_array: [u8; 16] = default_kid.try_into().unwrap();

    emitter.field("default_isProtected", &default_is_protected.to_string(), None)?;
    emitter.field("default_Per_Sample_IV_Size", &default_per_sample_iv_size.to_string(), None)?;
    emitter.field("default_KID", &lookup::format_uuid(&kid_array), None)?;

    ctx.tenc_default_iv_size = Some(default_per_sample_iv_size);

    if default_is_protected == 1 && default_per_sample_iv_size == 0
    {
        let constant_iv_size = reader.u8()?;
        let constant_iv = reader.bytes(constant_iv_size as u64)?;
        let iv_hex: String = constant_iv.iter().map(|b| format!("{b:02X}")).collect();
        emitter.field("default_constant_IV", &iv_hex, None)?;
    }

    Ok(())
}

/// `schm`: scheme type box, identifying the protection scheme in force (`cenc`, `cbcs`, ...).
pub fn parse_schm(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let scheme_type = String::from_utf8_lossy(reader.bytes(4)?).into_owned();
    let scheme_version = reader.u32()?;
    emitter.field("scheme_type", &format!("'{scheme_type}'"), None)?;
    emitter.field("scheme_version", &scheme_version.to_string(), None)?;

    if flags & 0x1 != 0 && reader.remaining() > 0
    {
        let scheme_uri = reader.utf8_until_nul()?;
        emitter.field("scheme_uri", &format!("\"{scheme_uri}\""), None)?;
    }

    Ok(())
}

/// `frma`: original (pre-encryption) sample entry format, inside `sinf`.
pub fn parse_frma(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let data_format = String::from_utf8_lossy(reader.bytes(4)?).into_owned();
    emitter.field("data_format", &format!("'{data_format}'"), None)
}

/// `pssh`: protection system specific header, the DRM metadata carried for a particular
/// `SystemID` (Widevine, PlayReady, and similar). `Data` is opaque per-vendor license
/// material and is always hex-dumped, never decoded.
pub fn parse_pssh(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let system_id_bytes = reader.bytes(16)?;
    let system_id: [u8; 16] = system_id_bytes.try_into().unwrap();
    emitter.field("SystemID", &lookup::format_uuid(&system_id), lookup::pssh_system_id_description(&system_id))?;

    if version > 0
    {
        let kid_count = reader.u32()?;
        emitter.field("KID_count", &kid_count.to_string(), None)?;
        for i in 0..kid_count as usize
        {
            let kid_bytes = reader.bytes(16)?;
            let kid: [u8; 16] = kid_bytes.try_into().unwrap();
            emitter.table_row(i, &format!("- [{i}] KID={}", lookup::format_uuid(&kid)))?;
        }
    }

    let data_size = reader.u32()?;
    emitter.field("DataSize", &data_size.to_string(), None)?;

    if data_size > 0
    {
        let offset = base + reader.position();
        let data = reader.bytes(data_size as u64)?;
        emitter.hexdump(data, offset)?;
    }

    Ok(())
}

/// `sidx`: segment index, mapping byte ranges of the following `moof`/`mdat` pairs to
/// presentation time — the seek table CMAF/DASH players use before fetching segments.
pub fn parse_sidx(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let reference_id = reader.u32()?;
    let timescale = reader.u32()?;
    emitter.field("reference_ID", &reference_id.to_string(), None)?;
    emitter.field("timescale", &timescale.to_string(), Some("units/second"))?;

    let (earliest_presentation_time, first_offset) = if version == 0 { (reader.u32()? as u64, reader.u32()? as u64) } else { (reader.u64()?, reader.u64()?) };
    emitter.field("earliest_presentation_time", &earliest_presentation_time.to_string(), None)?;
    emitter.field("first_offset", &first_offset.to_string(), None)?;

    reader.bytes(2)?; // reserved
    let reference_count = reader.u16()?;
    emitter.field("reference_count", &reference_count.to_string(), None)?;

    for i in 0..reference_count as usize
    {
        let word1 = reader.u32()?;
        let reference_type = (word1 >> 31) & 0x1;
        let referenced_size = word1 & 0x7FFF_FFFF;

        let subsegment_duration = reader.u32()?;

        let word3 = reader.u32()?;
        let starts_with_sap = (word3 >> 31) & 0x1;
        let sap_type = (word3 >> 28) & 0x7;
        let sap_delta_time = word3 & 0x0FFF_FFFF;

        emitter.table_row(
            i,
            &format!(
                "- [{i}] reference_type={reference_type} referenced_size={referenced_size} subsegment_duration={subsegment_duration} starts_with_SAP={starts_with_sap} SAP_type={sap_type} SAP_delta_time={sap_delta_time}"
            )
        )?;
    }

    emitter.table_summary(&format!("[references = {reference_count}]"))
}

/// `ssix`: subsegment index, annotating each `sidx` reference with ranges per priority
/// level (used by DASH/CMAF clients to prioritize fetch of lower-quality ranges first).
pub fn parse_ssix(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let subsegment_count = reader.u32()?;
    emitter.field("subsegment_count", &subsegment_count.to_string(), None)?;

    for s in 0..subsegment_count as usize
    {
        let range_count = reader.u32()?;
        let mut parts = Vec::new();
        for _ in 0..range_count
        {
            let level = reader.u8()?;
            let range_size = reader.u(24)?;
            parts.push(format!("(level={level}, size={range_size})"));
        }
        emitter.table_row(s, &format!("- [{s}] ranges=[{}]", parts.join(" ")))?;
    }

    emitter.table_summary(&format!("[subsegments = {subsegment_count}]"))
}

/// `tfra`: per-track random-access table inside `mfra`, mapping presentation time to
/// fragment location for seeking without scanning every `moof`.
pub fn parse_tfra(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let track_id = reader.u32()?;
    emitter.field("track_ID", &track_id.to_string(), None)?;

    reader.u(26)?; // reserved
    let length_size_of_traf_num = reader.u(2)? as u32 + 1;
    let length_size_of_trun_num = reader.u(2)? as u32 + 1;
    let length_size_of_sample_num = reader.u(2)? as u32 + 1;

    let number_of_entries = reader.u32()?;
    emitter.field("number_of_entries", &number_of_entries.to_string(), None)?;

    for i in 0..number_of_entries as usize
    {
        let (time, moof_offset) = if version == 1 { (reader.u64()?, reader.u64()?) } else { (reader.u32()? as u64, reader.u32()? as u64) };
        let traf_number = reader.u(length_size_of_traf_num * 8)?;
        let trun_number = reader.u(length_size_of_trun_num * 8)?;
        let sample_number = reader.u(length_size_of_sample_num * 8)?;

        emitter.table_row(
            i,
            &format!("- [{i}] time={time} moof_offset=0x{moof_offset:X} traf_number={traf_number} trun_number={trun_number} sample_number={sample_number}")
        )?;
    }

    emitter.table_summary(&format!("[entries = {number_of_entries}]"))
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
    fn tfhd_default_base_is_moof_with_default_sample_flags()
    {
        let mut data = vec![0u8, 0x02, 0x00, 0x20];
        data.extend_from_slice(&1u32.to_be_bytes()); // track_ID
        // default_sample_flags: sample_depends_on=1, sample_is_non_sync_sample=1
        let sample_flags: u32 = (1 << 24) | (1 << 16);
        data.extend_from_slice(&sample_flags.to_be_bytes());

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_tfhd(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("flags = 020020"));
        assert!(out.contains("track_ID = 1"));
        assert!(out.contains("default-base-is-moof flag set"));
        assert!(out.contains("sample_depends_on = 1 (yes)"));
        assert!(out.contains("sample_is_non_sync_sample = True"));
    }

    #[test]
    fn pssh_widevine_system_id_is_annotated()
    {
        let mut data = vec![0u8, 0, 0, 0];
        data.extend_from_slice(&[0xed, 0xef, 0x8b, 0xa9, 0x79, 0xd6, 0x4a, 0xce, 0xa3, 0xc8, 0x27, 0xdc, 0xd5, 0x1d, 0x21, 0xed]);
        data.extend_from_slice(&0u32.to_be_bytes());

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_pssh(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("(Widevine Content Protection)"));
    }

    #[test]
    fn senc_falls_back_to_hexdump_without_iv_size()
    {
        let mut data = vec![0u8, 0, 0, 0];
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&[0xAAu8; 8]);

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_senc(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("WARNING"));
        assert!(out.contains("AA AA AA AA"));
    }
}
