//! Box registry: a lookup from a four-character box type, optionally qualified by its
//! parent's type, to a box parser. Implemented as a flat table of function values rather
//! than a dynamic class hierarchy.

mod container;
mod dref;
mod edit;
mod fragment;
mod ftyp;
mod generic;
mod heif;
mod meta_items;
mod movie;
mod sample_entry;
mod sample_table;
mod uuid_box;

use crate::{bitreader::BitReader, context::ParseContext, emitter::Emitter, error::DissectError};

/// `(reader, emitter, context, uuid_extended_type, payload_base_offset)` — every parser
/// takes the same shape. Only `uuid`'s parser consults the fourth argument; only
/// container parsers that recurse need the fifth (the absolute file offset the reader's
/// position 0 corresponds to, needed to report correct offsets for nested errors/dumps).
/// Everyone else ignores what they don't need, which is the price of a single
/// function-pointer table instead of one dispatch mechanism per box family.
pub type BoxParser = fn(&mut BitReader, &mut Emitter, &mut ParseContext, Option<[u8; 16]>, u64) -> Result<(), DissectError>;

type Entry = (Option<&'static str>, &'static str, BoxParser);

const fn u(box_type: &'static str, parser: BoxParser) -> Entry
{
    (None, box_type, parser)
}

const fn q(parent: &'static str, box_type: &'static str, parser: BoxParser) -> Entry
{
    (Some(parent), box_type, parser)
}

/// Registered grammars, qualified-parent entries first so `lookup` can prefer them.
const REGISTRY: &[Entry] = &[
    // context-dependent: parent-qualified
    q("dref", "url ", dref::parse_url_entry),
    q("dref", "urn ", dref::parse_urn_entry),
    q("stsd", "avc1", sample_entry::parse_video_sample_entry),
    q("stsd", "avc3", sample_entry::parse_video_sample_entry),
    q("stsd", "hev1", sample_entry::parse_video_sample_entry),
    q("stsd", "hvc1", sample_entry::parse_video_sample_entry),
    q("stsd", "encv", sample_entry::parse_video_sample_entry),
    q("stsd", "mp4v", sample_entry::parse_video_sample_entry),
    q("stsd", "vp08", sample_entry::parse_video_sample_entry),
    q("stsd", "vp09", sample_entry::parse_video_sample_entry),
    q("stsd", "av01", sample_entry::parse_video_sample_entry),
    q("stsd", "mp4a", sample_entry::parse_audio_sample_entry),
    q("stsd", "enca", sample_entry::parse_audio_sample_entry),
    q("stsd", "ac-3", sample_entry::parse_audio_sample_entry),
    q("stsd", "ec-3", sample_entry::parse_audio_sample_entry),
    q("stsd", "opus", sample_entry::parse_audio_sample_entry),
    q("stsd", "alac", sample_entry::parse_audio_sample_entry),
    // file type
    u("ftyp", ftyp::parse_ftyp),
    u("styp", ftyp::parse_ftyp),
    // movie / track / media headers
    u("mvhd", movie::parse_mvhd),
    u("tkhd", movie::parse_tkhd),
    u("mdhd", movie::parse_mdhd),
    u("hdlr", movie::parse_hdlr),
    u("vmhd", movie::parse_vmhd),
    u("smhd", movie::parse_smhd),
    u("hmhd", movie::parse_hmhd),
    u("nmhd", movie::parse_nmhd),
    u("mehd", movie::parse_mehd),
    u("mfro", movie::parse_mfro),
    u("trex", movie::parse_trex),
    // edit list
    u("elst", edit::parse_elst),
    // sample table
    u("stts", sample_table::parse_stts),
    u("ctts", sample_table::parse_ctts),
    u("stsc", sample_table::parse_stsc),
    u("stsz", sample_table::parse_stsz),
    u("stz2", sample_table::parse_stz2),
    u("stco", sample_table::parse_stco),
    u("co64", sample_table::parse_co64),
    u("stss", sample_table::parse_stss),
    u("stsh", sample_table::parse_stsh),
    u("sdtp", sample_table::parse_sdtp),
    u("padb", sample_table::parse_padb),
    u("sbgp", sample_table::parse_sbgp),
    u("sgpd", sample_table::parse_sgpd),
    // fragments
    u("tfhd", fragment::parse_tfhd),
    u("tfdt", fragment::parse_tfdt),
    u("trun", fragment::parse_trun),
    u("sidx", fragment::parse_sidx),
    u("ssix", fragment::parse_ssix),
    u("saio", fragment::parse_saio),
    u("saiz", fragment::parse_saiz),
    u("senc", fragment::parse_senc),
    u("tenc", fragment::parse_tenc),
    u("schm", fragment::parse_schm),
    u("frma", fragment::parse_frma),
    u("pssh", fragment::parse_pssh),
    u("tfra", fragment::parse_tfra),
    // containers with preambles / special children
    u("meta", container::parse_meta),
    u("dref", container::parse_dref),
    u("stsd", container::parse_stsd),
    u("ilst", meta_items::parse_ilst),
    u("data", meta_items::parse_data),
    u("mean", meta_items::parse_mean),
    u("name", meta_items::parse_name),
    u("chap", meta_items::parse_chap),
    u("keys", meta_items::parse_keys),
    // pure containers (no preamble)
    u("moov", container::parse_container),
    u("trak", container::parse_trak),
    u("mdia", container::parse_container),
    u("minf", container::parse_container),
    u("stbl", container::parse_container),
    u("dinf", container::parse_container),
    u("edts", container::parse_container),
    u("udta", container::parse_container),
    u("mvex", container::parse_container),
    u("moof", container::parse_container),
    u("traf", container::parse_container),
    u("mfra", container::parse_container),
    u("sinf", container::parse_container),
    u("schi", container::parse_container),
    u("ipro", container::parse_container),
    u("iprp", container::parse_container),
    u("ipco", container::parse_container),
    u("wave", container::parse_container),
    u("rinf", container::parse_container),
    u("tref", container::parse_container),
    // HEIF item boxes
    u("iloc", heif::parse_iloc),
    u("iinf", heif::parse_iinf),
    u("infe", heif::parse_infe),
    u("pitm", heif::parse_pitm),
    u("iref", heif::parse_iref),
    // esds links into the descriptor registry
    u("esds", sample_entry::parse_esds),
    u("iods", sample_entry::parse_esds),
    // extended type
    u("uuid", uuid_box::parse_uuid),
    // opaque leaves
    u("free", generic::parse_free),
    u("skip", generic::parse_free),
    u("mdat", generic::parse_opaque),
    u("idat", generic::parse_opaque),
    u("btrt", generic::parse_btrt)
];

fn lookup_unqualified(box_type: &str) -> Option<BoxParser>
{
    REGISTRY.iter().find(|(parent, t, _)| parent.is_none() && *t == box_type).map(|(_, _, p)| *p)
}

/// Two-level lookup: qualified key first, then unqualified, then a generic
/// container-probe-and-hex-dump fallback.
pub fn lookup(parent_type: Option<&str>, box_type: &str) -> BoxParser
{
    if let Some(parent) = parent_type
    {
        if let Some(parser) = REGISTRY.iter().find(|(p, t, _)| *p == Some(parent) && *t == box_type).map(|(_, _, p)| *p)
        {
            return parser;
        }
    }

    lookup_unqualified(box_type).unwrap_or(generic::parse_unknown)
}

/// Read a FullBox's 1-byte version + 3-byte flags preamble.
pub(crate) fn read_full_box_header(reader: &mut BitReader) -> Result<(u8, u32), DissectError>
{
    let version = reader.u8()?;
    let flags = reader.u24()?;
    Ok((version, flags))
}
