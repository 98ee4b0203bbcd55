use crate::{bitreader::BitReader, boxes::read_full_box_header, context::ParseContext, driver, emitter::Emitter, error::DissectError};

fn recurse(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, base: u64, parent_type: Option<&str>) -> Result<(), DissectError>
{
    driver::dissect_box_sequence(reader, base, emitter, ctx, parent_type).map(|_| ()).map_err(|e| DissectError::Custom(e.to_string()))
}

/// A pure container with no preamble: its payload is exactly a child box sequence. Covers
/// `moov`, `mdia`, `minf`, `stbl`, `dinf`, `edts`, `udta`, `mvex`, `moof`, `traf`, `mfra`,
/// `sinf`, `schi`, `ipro`, `iprp`, `ipco`, `wave`, `rinf`, `tref`.
pub fn parse_container(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    recurse(reader, emitter, ctx, base, None)
}

/// `trak`: a pure container, but one that bounds the lifetime of its descendants'
/// `handler_type`/`timescale` context: entering a new `trak` pushes a frame and leaving
/// pops it. Siblings of `trak` (other tracks in `moov`) must not see
/// each other's handler type, so the frame taken here is never written back to `ctx`.
pub fn parse_trak(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    let mut frame = ctx.child_frame();
    recurse(reader, emitter, &mut frame, base, None)
}

/// `meta`: a FullBox container whose children (`hdlr`, `ilst`, `iloc`, ...) get their own
/// context frame for the same reason `trak` does — a file-level `meta` and a per-track
/// `meta` must not leak handler type into one another.
pub fn parse_meta(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    let (version, flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;
    emitter.field_default("flags", &format!("0x{flags:06X}"), "0x000000", None)?;

    let mut frame = ctx.child_frame();
    recurse(reader, emitter, &mut frame, base, None)
}

/// `dref`: a FullBox container preceded by `entry_count`; children are `url `/`urn `
/// data-entry boxes (and occasionally vendor-specific entries, which fall back to the
/// generic/unknown parser), keyed by parent type `dref` for the context-dependent lookup.
pub fn parse_dref(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    recurse(reader, emitter, ctx, base, Some("dref"))
}

/// `stsd`: a FullBox container preceded by `entry_count`; children are sample entries
/// whose grammar is dispatched by the enclosing track's handler type, looked up
/// unqualified since the dispatch key there is the sample
/// entry's own four-CC, not `stsd` itself — the `(parent, type)` qualification exists for
/// `avc1`/`mp4a`/etc. registrations, which already key on `"stsd"` as the parent.
pub fn parse_stsd(reader: &mut BitReader, emitter: &mut Emitter, ctx: &mut ParseContext, _uuid: Option<[u8; 16]>, base: u64) -> Result<(), DissectError>
{
    let (version, _flags) = read_full_box_header(reader)?;
    emitter.field("version", &version.to_string(), None)?;

    let entry_count = reader.u32()?;
    emitter.field("entry_count", &entry_count.to_string(), None)?;

    recurse(reader, emitter, ctx, base, Some("stsd"))
}
