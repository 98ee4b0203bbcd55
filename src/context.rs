/// Cross-box state threaded by value through parser calls. Entering a new
/// `trak`/`meta` scope clones the current frame and mutates the clone; leaving it just
/// drops the clone and the caller's original frame is back in scope. This is the only
/// channel cross-box information flows through — there is no global mutable state.
#[derive(Debug, Clone, Default)]
pub struct ParseContext
{
    /// Handler type of the track currently being parsed (`vide`, `soun`, `hint`, `meta`,
    /// `text`, `subt`, `auxv`), set when entering `hdlr` and reset on leaving `trak`/`meta`.
    pub handler_type: Option<String>,

    /// Track timescale from `mdhd`, used to annotate durations in seconds.
    pub timescale: Option<u32>,

    /// `tenc`'s `default_Per_Sample_IV_Size`, when a `tenc` has been seen in this scope.
    pub tenc_default_iv_size: Option<u8>,

    /// User-supplied `--senc-per-sample-iv` override; consulted by `senc` when no `tenc`
    /// default is available.
    pub senc_iv_size_override: Option<u8>
}

impl ParseContext
{
    pub fn root(senc_iv_size_override: Option<u8>) -> Self
    {
        ParseContext { senc_iv_size_override, ..ParseContext::default() }
    }

    /// The per-sample IV size `senc` should assume: prefer a sibling
    /// `tenc`'s declared default, fall back to the user override, otherwise `None` (hex
    /// dump fallback).
    pub fn senc_per_sample_iv_size(&self) -> Option<u8>
    {
        self.tenc_default_iv_size.or(self.senc_iv_size_override)
    }

    /// A frame for entering a new `trak`/`meta` scope: inherits the override but clears
    /// per-track state so a sibling track doesn't leak another track's handler type.
    pub fn child_frame(&self) -> Self
    {
        ParseContext { handler_type: None, timescale: None, tenc_default_iv_size: None, senc_iv_size_override: self.senc_iv_size_override }
    }
}
