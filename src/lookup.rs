//! Shared lookup tables used by more than one box/descriptor grammar.
//!
//! Kept as flat data rather than scattered `match` arms inside each grammar, per
//! Keep defaults in data, not sprinkled as conditionals in each grammar —
//! the same principle applies to the descriptive-annotation tables.

/// ISO-639-2/T language codes packed as three 5-bit letters (`a`=1..`z`=26) per
/// ISO/IEC 14496-12 `mdhd`/`hdlr` language fields.
pub fn unpack_iso639_language(packed: u16) -> String
{
    let c1 = ((packed >> 10) & 0x1F) as u8;
    let c2 = ((packed >> 5) & 0x1F) as u8;
    let c3 = (packed & 0x1F) as u8;

    [c1, c2, c3].iter().map(|&c| (b'a' + c.saturating_sub(1)) as char).collect()
}

/// Human-readable name for a handful of common ISO-639-2 codes; unrecognized codes get
/// no parenthetical at all rather than a placeholder.
pub fn language_description(code: &str) -> Option<&'static str>
{
    match code
    {
        | "und" => Some("Undetermined"),
        | "eng" => Some("English"),
        | "fre" | "fra" => Some("French"),
        | "ger" | "deu" => Some("German"),
        | "spa" => Some("Spanish"),
        | "ita" => Some("Italian"),
        | "jpn" => Some("Japanese"),
        | "chi" | "zho" => Some("Chinese"),
        | "kor" => Some("Korean"),
        | "rus" => Some("Russian"),
        | "por" => Some("Portuguese"),
        | "ara" => Some("Arabic"),
        | _ => None
    }
}

/// Human name for a handler-type four-CC.
pub fn handler_type_description(handler_type: &str) -> &'static str
{
    match handler_type
    {
        | "vide" => "Video Track",
        | "soun" => "Audio Track",
        | "hint" => "Hint Track",
        | "meta" => "Metadata Track",
        | "mdir" => "Metadata Directory",
        | "auxv" => "Auxiliary Video Track",
        | "text" => "Text Track",
        | "sbtl" | "subt" => "Subtitle Track",
        | "clcp" => "Closed Caption Track",
        | "tmcd" => "Timecode Track",
        | _ => "Unknown Handler"
    }
}

/// MPEG-4 `objectTypeIndication` (ISO/IEC 14496-1 table 5) — the subset actually seen in
/// the wild inside `esds`/`DecoderConfigDescriptor`.
pub fn object_type_indication_description(value: u8) -> Option<&'static str>
{
    match value
    {
        | 0x20 => Some("MPEG-4 Visual"),
        | 0x21 => Some("H.264/AVC"),
        | 0x23 => Some("H.265/HEVC"),
        | 0x40 => Some("MPEG-4 Audio (AAC)"),
        | 0x60 => Some("MPEG-2 Visual (Simple Profile)"),
        | 0x61 => Some("MPEG-2 Visual (Main Profile)"),
        | 0x69 => Some("MPEG-2 Audio (Part 3)"),
        | 0x6B => Some("MPEG-1 Audio (usually MP3)"),
        | 0x6A => Some("MPEG-1 Visual"),
        | 0xA5 => Some("AC-3"),
        | 0xA6 => Some("E-AC-3"),
        | 0xDD => Some("Vorbis (non-standard)"),
        | 0xE1 => Some("Dolby TrueHD (non-standard)"),
        | _ => None
    }
}

/// `streamType` (6 bits) inside `DecoderConfigDescriptor`.
pub fn stream_type_description(value: u8) -> Option<&'static str>
{
    match value
    {
        | 0x04 => Some("VisualStream"),
        | 0x05 => Some("AudioStream"),
        | 0x06 => Some("SceneDescriptionStream"),
        | 0x09 => Some("IPMPStream"),
        | 0x0C => Some("MPEG7Stream"),
        | 0x0D => Some("IPMPToolStream"),
        | _ => None
    }
}

/// Well-known DRM system IDs seen in `pssh` boxes.
pub fn pssh_system_id_description(uuid: &[u8; 16]) -> Option<&'static str>
{
    match uuid
    {
        | [0xed, 0xef, 0x8b, 0xa9, 0x79, 0xd6, 0x4a, 0xce, 0xa3, 0xc8, 0x27, 0xdc, 0xd5, 0x1d, 0x21, 0xed] => Some("Widevine Content Protection"),
        | [0x9a, 0x04, 0xf0, 0x79, 0x98, 0x40, 0x42, 0x86, 0xab, 0x92, 0xe6, 0x5b, 0xe0, 0x88, 0x5f, 0x95] => Some("Microsoft PlayReady"),
        | [0x94, 0xce, 0x86, 0xfb, 0x07, 0xff, 0x4f, 0x43, 0xad, 0xb8, 0x93, 0xd2, 0xfa, 0x96, 0x8c, 0xa2] => Some("Apple FairPlay"),
        | [0xe2, 0x71, 0x9d, 0x58, 0xa9, 0x85, 0xb3, 0xc9, 0x78, 0x1a, 0xb0, 0x30, 0xaf, 0x78, 0xd3, 0x0e] => Some("Adobe Primetime DRM"),
        | _ => None
    }
}

pub fn format_uuid(uuid: &[u8; 16]) -> String
{
    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        uuid[0], uuid[1], uuid[2], uuid[3], uuid[4], uuid[5], uuid[6], uuid[7], uuid[8], uuid[9], uuid[10], uuid[11], uuid[12], uuid[13], uuid[14], uuid[15]
    )
}

/// Human-readable box name used in the emitter's container/leaf header line.
pub fn box_human_name(box_type: &str) -> &'static str
{
    match box_type
    {
        | "ftyp" => "FileType",
        | "styp" => "SegmentType",
        | "moov" => "MovieBox",
        | "trak" => "TrackBox",
        | "mdia" => "MediaBox",
        | "minf" => "MediaInformationBox",
        | "stbl" => "SampleTableBox",
        | "dinf" => "DataInformationBox",
        | "edts" => "EditBox",
        | "udta" => "UserDataBox",
        | "mvex" => "MovieExtendsBox",
        | "moof" => "MovieFragmentBox",
        | "traf" => "TrackFragmentBox",
        | "mfra" => "MovieFragmentRandomAccessBox",
        | "sinf" => "ProtectionSchemeInfoBox",
        | "schi" => "SchemeInformationBox",
        | "ipro" => "ItemProtectionBox",
        | "ilst" => "ItemListBox",
        | "dref" => "DataReferenceBox",
        | "stsd" => "SampleDescriptionBox",
        | "meta" => "MetaBox",
        | "iref" => "ItemReferenceBox",
        | "iprp" => "ItemPropertiesBox",
        | "ipco" => "ItemPropertyContainerBox",
        | "wave" => "SoundWaveInformationBox",
        | "rinf" => "RestrictedSchemeInfoBox",
        | "mvhd" => "MovieHeaderBox",
        | "tkhd" => "TrackHeaderBox",
        | "mdhd" => "MediaHeaderBox",
        | "hdlr" => "HandlerReferenceBox",
        | "vmhd" => "VideoMediaHeaderBox",
        | "smhd" => "SoundMediaHeaderBox",
        | "hmhd" => "HintMediaHeaderBox",
        | "nmhd" => "NullMediaHeaderBox",
        | "elst" => "EditListBox",
        | "stts" => "TimeToSampleBox",
        | "ctts" => "CompositionTimeToSampleBox",
        | "stsc" => "SampleToChunkBox",
        | "stsz" => "SampleSizeBox",
        | "stz2" => "CompactSampleSizeBox",
        | "stco" => "ChunkOffsetBox",
        | "co64" => "ChunkLargeOffsetBox",
        | "stss" => "SyncSampleBox",
        | "stsh" => "ShadowSyncSampleBox",
        | "sdtp" => "SampleDependencyTypeBox",
        | "padb" => "PaddingBitsBox",
        | "sbgp" => "SampleToGroupBox",
        | "sgpd" => "SampleGroupDescriptionBox",
        | "tfhd" => "TrackFragmentHeaderBox",
        | "tfdt" => "TrackFragmentBaseMediaDecodeTimeBox",
        | "trex" => "TrackExtendsBox",
        | "trun" => "TrackRunBox",
        | "saio" => "SampleAuxiliaryInformationOffsetsBox",
        | "saiz" => "SampleAuxiliaryInformationSizesBox",
        | "senc" => "SampleEncryptionBox",
        | "tenc" => "TrackEncryptionBox",
        | "schm" => "SchemeTypeBox",
        | "frma" => "OriginalFormatBox",
        | "pssh" => "ProtectionSystemSpecificHeaderBox",
        | "sidx" => "SegmentIndexBox",
        | "ssix" => "SubsegmentIndexBox",
        | "mehd" => "MovieExtendsHeaderBox",
        | "mfro" => "MovieFragmentRandomAccessOffsetBox",
        | "tfra" => "TrackFragmentRandomAccessBox",
        | "url " => "DataEntryUrlBox",
        | "urn " => "DataEntryUrnBox",
        | "iloc" => "ItemLocationBox",
        | "iinf" => "ItemInfoBox",
        | "infe" => "ItemInfoEntry",
        | "pitm" => "PrimaryItemBox",
        | "uuid" => "ExtendedTypeBox",
        | "esds" => "ElementaryStreamDescriptorBox",
        | "iods" => "ObjectDescriptorBox",
        | "data" => "MetadataValueBox",
        | "keys" => "MetadataKeyTableBox",
        | "mdat" => "MediaDataBox",
        | "free" | "skip" => "FreeSpaceBox",
        | _ => "Box"
    }
}
