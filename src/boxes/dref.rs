use crate::{bitreader::BitReader, boxes::read_full_box_header, context::ParseContext, emitter::Emitter, error::DissectError};

/// `url ` inside `dref`: data-entry box pointing at an external (or, with `flags & 0x1`,
/// the same-file) location.
pub fn parse_url_entry(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let self_contained = flags & 0x1 != 0;
    emitter.field("flags", &format!("0x{flags:06X}"), Some(if self_contained { "self-contained" } else { "external" }))?;

    if !self_contained && reader.remaining() > 0
    {
        let location = reader.utf8_until_nul()?;
        emitter.field("location", &format!("\"{location}\""), None)?;
    }

    Ok(())
}

/// `urn ` inside `dref`: data-entry box carrying a name and (optionally) a location URI.
pub fn parse_urn_entry(reader: &mut BitReader, emitter: &mut Emitter, _ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, _base: u64) -> Result<(), DissectError>
{
    let (version, flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let self_contained = flags & 0x1 != 0;
    emitter.field("flags", &format!("0x{flags:06X}"), Some(if self_contained { "self-contained" } else { "external" }))?;

    if !self_contained
    {
        if reader.remaining() > 0
        {
            let name = reader.utf8_until_nul()?;
            emitter.field("name", &format!("\"{name}\""), None)?;
        }
        if reader.remaining() > 0
        {
            let location = reader.utf8_until_nul()?;
            emitter.field("location", &format!("\"{location}\""), None)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::cli::{ColorMode, Options};

    #[test]
    fn url_entry_self_contained_has_no_location()
    {
        let data = vec![0u8, 0x00, 0x00, 0x01];
        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = Emitter::new(&mut buf, Options { color_mode: ColorMode::Off, ..Options::default() });
        let mut ctx = ParseContext::default();
        parse_url_entry(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("self-contained"));
        assert!(!out.contains("location"));
    }

    #[test]
    fn urn_entry_external_reads_name_and_location()
    {
        let mut data = vec![0u8, 0x00, 0x00, 0x00];
        data.extend_from_slice(b"myurn\0");
        data.extend_from_slice(b"http://example.com/\0");
        let mut reader = BitReader::new(&data);
        let mut buf = Vec::new();
        let mut e = Emitter::new(&mut buf, Options { color_mode: ColorMode::Off, ..Options::default() });
        let mut ctx = ParseContext::default();
        parse_urn_entry(&mut reader, &mut e, &mut ctx, None, 0).unwrap();
        drop(e);
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("name = \"myurn\""));
        assert!(out.contains("location = \"http://example.com/\""));
    }
}
