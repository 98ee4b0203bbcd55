use crate::{bitreader::BitReader, context::ParseContext, emitter::Emitter, error::DissectError};

/// `ftyp`/`styp`: major/minor brand then a list of compatible brands to end of box.
pub fn parse_ftyp(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    if reader.remaining() < 8
    {
        return Err(DissectError::Custom("ftyp/styp too short for major_brand + minor_version".to_string()));
    }

    let major_brand = String::from_utf8_lossy(reader.bytes(4)?).into_owned();
    let minor_version = reader.u32()?;

    emitter.field("major_brand", &format!("'{major_brand}'"), None)?;
    emitter.field("minor_version", &format!("{minor_version:08}"), None)?;

    while reader.remaining() >= 4
    {
        let brand = String::from_utf8_lossy(reader.bytes(4)?).into_owned();
        emitter.note(&format!("- compatible: '{brand}'"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::cli::{ColorMode, Options};

    #[test]
    fn cmaf_init_segment_ftyp_renders_brands()
    {
        let mut data = Vec::new();
        data.extend_from_slice(b"iso6");
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(b"cmfc");

        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf, Options { color_mode: ColorMode::Off, ..Options::default() });
        let mut ctx = ParseContext::default();
        parse_ftyp(&mut reader, &mut emitter, &mut ctx, None, 0x8).unwrap();
        drop(emitter);

        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "major_brand = 'iso6'\nminor_version = 00000000\n- compatible: 'cmfc'\n");
    }
}
