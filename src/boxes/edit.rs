use crate::{bitreader::BitReader, boxes::read_full_box_header, context::ParseContext, emitter::Emitter, error::DissectError};

/// `elst`: edit list. `version` selects 32- vs 64-bit `segment_duration`/`media_time`.
/// Rows stream one entry at a time; the aggregate summary is the total
/// segment duration in the movie timescale's raw units (no cross-box timescale lookup is
/// attempted here — `elst` lives in `edts`, a sibling of `mdia`, not inside it).
pub fn parse_elst(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    let mut total_duration: u64 = 0;

    for i in 0..entry_count as usize
    {
        let (segment_duration, media_time) = if version == 1 { (reader.u64()?, reader.u64()? as i64) } else { (reader.u32()? as u64, reader.i32()? as i64) };
        let rate_integer = reader.i16()?;
        let rate_fraction = reader.i16()?;

        total_duration += segment_duration;

        emitter.table_row(
            i,
            &format!("- [{i}] segment_duration={segment_duration} media_time={media_time} media_rate={rate_integer}.{rate_fraction:04}")
        )?;
    }

    emitter.table_summary(&format!("[entries = {entry_count}, total_duration = {total_duration}]"))
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::cli::{ColorMode, Options};

    #[test]
    fn version_zero_uses_32_bit_fields()
    {
        let mut data = vec![0u8, 0, 0, 0];
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&1000u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&1i16.to_be_bytes());
        data.extend_from_slice(&0i16.to_be_bytes());

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = Emitter::new(&mut buf, Options { color_mode: ColorMode::Off, ..Options::default() });
        let mut ctx = ParseContext::default();
        parse_elst(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("segment_duration=1000"));
        assert!(out.contains("total_duration = 1000"));
    }
}
