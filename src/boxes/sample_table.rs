use crate::{bitreader::BitReader, boxes::read_full_box_header, context::ParseContext, emitter::Emitter, error::DissectError};

fn seconds_note(units: u64, timescale: Option<u32>) -> Option<String>
{
    let ts = timescale?;
    if ts == 0
    {
        return None;
    }
    Some(format!("{:.3}s", units as f64 / ts as f64))
}

/// `stts`: time-to-sample table. Each entry covers `sample_count` consecutive samples at
/// `sample_delta` duration; the running sample index and running time are the aggregate
/// summary printed at the end, accumulated across every entry regardless of whether
/// `--rows` lets that entry's own row print.
pub fn parse_stts(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    let mut total_samples: u64 = 0;
    let mut total_time: u64 = 0;

    for i in 0..entry_count as usize
    {
        let sample_count = reader.u32()?;
        let sample_delta = reader.u32()?;

        total_samples += sample_count as u64;
        total_time += sample_count as u64 * sample_delta as u64;

        emitter.table_row(i, &format!("- [{i}] sample_count={sample_count} sample_delta={sample_delta}"))?;
    }

    let mut summary = format!("[samples = {total_samples}, time = {total_time}");
    if let Some(s) = seconds_note(total_time, ctx.timescale)
    {
        summary.push_str(&format!(" ({s})"));
    }
    summary.push(']');
    emitter.table_summary(&summary)
}

/// `ctts`: composition-time-to-sample table. `version == 1` makes `sample_offset` signed
/// (negative composition offsets are common with B-frames under v1); `version == 0` keeps
/// it an unsigned 32-bit value per the original ISO/IEC 14496-12 definition.
pub fn parse_ctts(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    let mut total_samples: u64 = 0;

    for i in 0..entry_count as usize
    {
        let sample_count = reader.u32()?;
        let raw_offset = reader.u32()?;
        total_samples += sample_count as u64;

        if version == 1
        {
            emitter.table_row(i, &format!("- [{i}] sample_count={sample_count} sample_offset={}", raw_offset as i32))?;
        }
        else
        {
            emitter.table_row(i, &format!("- [{i}] sample_count={sample_count} sample_offset={raw_offset}"))?;
        }
    }

    emitter.table_summary(&format!("[samples = {total_samples}]"))
}

/// `stsc`: sample-to-chunk table. Each entry holds until the next entry's `first_chunk`.
pub fn parse_stsc(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    for i in 0..entry_count as usize
    {
        let first_chunk = reader.u32()?;
        let samples_per_chunk = reader.u32()?;
        let sample_description_index = reader.u32()?;
        emitter.table_row(i, &format!("- [{i}] first_chunk={first_chunk} samples_per_chunk={samples_per_chunk} sample_description_index={sample_description_index}"))?;
    }

    emitter.table_summary(&format!("[entries = {entry_count}]"))
}

/// `stsz`: sample size table. A nonzero `sample_size` means every sample shares that size
/// and no per-sample table follows; `sample_size == 0` means a `sample_count`-entry table
/// of individual 32-bit sizes follows instead.
pub fn parse_stsz(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let sample_size = reader.u32()?;
    let sample_count = reader.u32()?;
    emitter.field("sample_size", &sample_size.to_string(), None)?;
    emitter.field("sample_count", &sample_count.to_string(), None)?;

    if sample_size != 0
    {
        let total_bytes = sample_size as u64 * sample_count as u64;
        return emitter.table_summary(&format!("[samples = {sample_count}, constant_size = {sample_size}, total_bytes = {total_bytes}]"));
    }

    let mut total_bytes: u64 = 0;
    for i in 0..sample_count as usize
    {
        let size = reader.u32()?;
        total_bytes += size as u64;
        emitter.table_row(i, &format!("- [{i}] size={size}"))?;
    }

    emitter.table_summary(&format!("[samples = {sample_count}, total_bytes = {total_bytes}]"))
}

/// `stz2`: compact sample size table, field width selected by `field_size` (4, 8 or 16
/// bits) — the QuickTime/MP4 space optimization for tracks with many small samples.
pub fn parse_stz2(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    reader.bytes(3)?; // reserved
    let field_size = reader.u8()?;
    let sample_count = reader.u32()?;
    emitter.field("field_size", &field_size.to_string(), Some("bits per entry"))?;
    emitter.field("sample_count", &sample_count.to_string(), None)?;

    if ![4u8, 8, 16].contains(&field_size)
    {
        return Err(DissectError::Custom(format!("stz2 field_size {field_size} is not one of 4/8/16")));
    }

    let mut total_bytes: u64 = 0;
    for i in 0..sample_count as usize
    {
        let size = reader.u(field_size as u32)?;
        total_bytes += size;
        emitter.table_row(i, &format!("- [{i}] size={size}"))?;
    }

    emitter.table_summary(&format!("[samples = {sample_count}, total_bytes = {total_bytes}]"))
}

/// `stco`: 32-bit chunk offset table.
pub fn parse_stco(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    for i in 0..entry_count as usize
    {
        let offset = reader.u32()?;
        emitter.table_row(i, &format!("- [{i}] chunk_offset=0x{offset:X}"))?;
    }

    emitter.table_summary(&format!("[chunks = {entry_count}]"))
}

/// `co64`: 64-bit chunk offset table, for files whose `mdat` exceeds 4 GiB.
pub fn parse_co64(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    for i in 0..entry_count as usize
    {
        let offset = reader.u64()?;
        emitter.table_row(i, &format!("- [{i}] chunk_offset=0x{offset:X}"))?;
    }

    emitter.table_summary(&format!("[chunks = {entry_count}]"))
}

/// `stss`: sync-sample (keyframe) table — a sorted list of 1-based sample numbers.
pub fn parse_stss(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    for i in 0..entry_count as usize
    {
        let sample_number = reader.u32()?;
        emitter.table_row(i, &format!("- [{i}] sample_number={sample_number}"))?;
    }

    emitter.table_summary(&format!("[sync_samples = {entry_count}]"))
}

/// `stsh`: shadow sync sample table, mapping samples that should be replaced with an
/// earlier sync sample during fast scan.
pub fn parse_stsh(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    for i in 0..entry_count as usize
    {
        let shadowed_sample_number = reader.u32()?;
        let sync_sample_number = reader.u32()?;
        emitter.table_row(i, &format!("- [{i}] shadowed_sample_number={shadowed_sample_number} sync_sample_number={sync_sample_number}"))?;
    }

    emitter.table_summary(&format!("[entries = {entry_count}]"))
}

/// `sdtp`: per-sample dependency flags (ISO/IEC 14496-12 §8.7.4). No explicit count field
/// — one byte per sample, for as many samples as bytes remain in the box.
pub fn parse_sdtp(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let count = reader.remaining() as usize;
    for i in 0..count
    {
        let is_leading = reader.u(2)?;
        let depends_on = reader.u(2)?;
        let is_depended_on = reader.u(2)?;
        let has_redundancy = reader.u(2)?;
        emitter.table_row(
            i,
            &format!("- [{i}] is_leading={is_leading} sample_depends_on={depends_on} sample_is_depended_on={is_depended_on} sample_has_redundancy={has_redundancy}")
        )?;
    }

    emitter.table_summary(&format!("[samples = {count}]"))
}

/// `padb`: padding-bits table, two 3-bit pad values packed per byte (one per pair of
/// samples, since a sample's encoded data may end mid-byte).
pub fn parse_padb(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let sample_count = reader.u32()?;
    emitter.field("sample_count", &sample_count.to_string(), None)?;

    let pair_count = sample_count.div_ceil(2) as usize;
    for i in 0..pair_count
    {
        reader.u(1)?; // reserved
        let pad1 = reader.u(3)?;
        reader.u(1)?; // reserved
        let pad2 = reader.u(3)?;
        emitter.table_row(i, &format!("- [{i}] pad1={pad1} pad2={pad2}"))?;
    }

    emitter.table_summary(&format!("[pairs = {pair_count}]"))
}

/// `sbgp`: sample-to-group table, mapping runs of samples to a `sgpd` group description
/// by index. `version == 1` adds a `grouping_type_parameter` distinguishing multiple
/// groupings that share the same `grouping_type`.
pub fn parse_sbgp(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let grouping_type = String::from_utf8_lossy(reader.bytes(4)?).into_owned();
    emitter.field("grouping_type", &format!("'{grouping_type}'"), None)?;

    if version == 1
    {
        let grouping_type_parameter = reader.u32()?;
        emitter.field("grouping_type_parameter", &grouping_type_parameter.to_string(), None)?;
    }

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    for i in 0..entry_count as usize
    {
        let sample_count = reader.u32()?;
        let group_description_index = reader.u32()?;
        emitter.table_row(i, &format!("- [{i}] sample_count={sample_count} group_description_index={group_description_index}"))?;
    }

    emitter.table_summary(&format!("[entries = {entry_count}]"))
}

fn hex_preview(data: &[u8]) -> String
{
    let shown = data.len().min(8);
    let mut s: String = data[..shown].iter().map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" ");
    if data.len() > shown
    {
        s.push_str(" ...");
    }
    s
}

/// `sgpd`: sample group description table, paired with `sbgp` by `grouping_type`. Entry
/// payloads are per-grouping-type opaque structures (roll recovery, rate adaptation,
/// ...) that stay codec/grouping-private; each entry is previewed rather than fully
/// decoded.
pub fn parse_sgpd(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let grouping_type = String::from_utf8_lossy(reader.bytes(4)?).into_owned();
    emitter.field("grouping_type", &format!("'{grouping_type}'"), None)?;

    let default_length = if version >= 1
    {
        let len = reader.u32()?;
        emitter.field("default_length", &len.to_string(), None)?;
        Some(len)
    }
    else
    {
        None
    };

    if version >= 2
    {
        let default_sample_description_index = reader.u32()?;
        emitter.field("default_sample_description_index", &default_sample_description_index.to_string(), None)?;
    }

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    for i in 0..entry_count as usize
    {
        let length = match default_length
        {
            | Some(0) | None => reader.u32()? as usize,
            | Some(len) => len as usize
        };

        let payload = reader.bytes(length as u64)?;
        emitter.table_row(i, &format!("- [{i}] description ({length} bytes): {}", hex_preview(payload)))?;
    }

    emitter.table_summary(&format!("[entries = {entry_count}]"))
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::cli::{ColorMode, Options};

    fn emitter(buf: &mut Vec<u8>) -> Emitter<'_>
    {
        Emitter::new(buf, Options { color_mode: ColorMode::Off, max_rows: Some(3), ..Options::default() })
    }

    #[test]
    fn stts_truncates_and_emits_summary_row()
    {
        let mut data = vec![0u8, 0, 0, 0];
        data.extend_from_slice(&16243u32.to_be_bytes());
        for _ in 0..16243u32
        {
            data.extend_from_slice(&1u32.to_be_bytes());
            data.extend_from_slice(&1001u32.to_be_bytes());
        }

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_stts(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines.contains(&"..."));
        assert_eq!(lines.last().unwrap(), &"[samples = 16243, time = 16259243]");
    }

    #[test]
    fn stsz_constant_size_skips_table()
    {
        let mut data = vec![0u8, 0, 0, 0];
        data.extend_from_slice(&188u32.to_be_bytes());
        data.extend_from_slice(&100u32.to_be_bytes());

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = emitter(&mut buf);
        let mut ctx = ParseContext::default();
        parse_stsz(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("total_bytes = 18800"));
        assert!(!out.contains("- [0]"));
    }
}
