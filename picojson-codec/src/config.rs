// SPDX-License-Identifier: Apache-2.0

/// Default size of each `read` issued by [`crate::load`]
pub const DEFAULT_READ_CHUNK_SIZE: usize = 4096;

/// Widest indent the encoder accepts. Wider settings fail with
/// [`crate::Error::Overflow`].
pub const MAX_INDENT: usize = 1024;

/// Output formatting for the encoder.
///
/// With no indent the output is compact: no whitespace outside strings and
/// no trailing newline. With `indent: Some(n)` every nesting level is
/// indented by `n` spaces, keys are followed by `": "` and the document ends
/// with a newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeConfig {
    pub indent: Option<usize>,
    /// Fail with [`crate::Error::DepthExceeded`] past this many nested containers
    pub max_depth: Option<usize>,
}

impl EncodeConfig {
    pub fn compact() -> Self {
        Self::default()
    }

    pub fn pretty(indent: usize) -> Self {
        Self {
            indent: Some(indent),
            ..Self::default()
        }
    }

    /// Set the indent from a signed width. Negative widths mean compact;
    /// widths past [`MAX_INDENT`] are kept so that encoding rejects them.
    pub fn with_indent(mut self, indent: i64) -> Self {
        self.indent = (indent >= 0).then(|| usize::try_from(indent).unwrap_or(usize::MAX));
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn is_pretty(&self) -> bool {
        self.indent.is_some()
    }
}

/// Decoder limits and streaming behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Fail with [`crate::Error::DepthExceeded`] past this many nested containers
    pub max_depth: Option<usize>,
    /// Bytes requested per `read` call when decoding from a reader
    pub read_chunk_size: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

impl DecodeConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Set the read size, clamped to at least one byte
    pub fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_indent_is_compact() {
        assert_eq!(EncodeConfig::default().with_indent(-1), EncodeConfig::compact());
        assert_eq!(EncodeConfig::default().with_indent(0).indent, Some(0));
        assert_eq!(EncodeConfig::default().with_indent(4), EncodeConfig::pretty(4));
        assert!(!EncodeConfig::compact().is_pretty());
        assert!(EncodeConfig::default().with_indent(i64::MAX).indent > Some(MAX_INDENT));
    }

    #[test]
    fn test_decode_defaults() {
        let config = DecodeConfig::default();
        assert_eq!(config.read_chunk_size, 4096);
        assert_eq!(config.max_depth, None);
        assert_eq!(config.with_read_chunk_size(0).read_chunk_size, 1);
    }
}
