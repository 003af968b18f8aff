use std::fmt;
use std::fs;
use std::path::Path;

use super::error::ShaderError;

const MARKER: &str = "#type";

/// One half of a shader program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Keyword used after `#type` in shader assets.
    pub const fn keyword(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "vertex" => Some(ShaderStage::Vertex),
            "fragment" => Some(ShaderStage::Fragment),
            _ => None,
        }
    }

    pub(crate) fn to_naga(self) -> wgpu::naga::ShaderStage {
        match self {
            ShaderStage::Vertex => wgpu::naga::ShaderStage::Vertex,
            ShaderStage::Fragment => wgpu::naga::ShaderStage::Fragment,
        }
    }

    pub(crate) fn to_wgpu(self) -> wgpu::ShaderStages {
        match self {
            ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Vertex and fragment sources split out of one shader asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

/// A `#type <ident>` marker found in the text.
#[derive(Debug)]
struct Marker<'s> {
    /// Byte span of `#type`, the separating blanks and the identifier.
    start: usize,
    end: usize,
    /// Rest of the marker line after `#type`, trimmed.
    keyword: &'s str,
}

impl ShaderSource {
    /// Reads and parses a shader asset.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Splits `text` into its two stages.
    ///
    /// The segment following a marker (up to the next marker or end of text)
    /// belongs to the stage that marker names. Text before the first marker
    /// is ignored. Marker order is free.
    pub fn parse(text: &str) -> Result<Self, ShaderError> {
        let markers = tokenize(text);

        let mut stages = Vec::with_capacity(markers.len());
        for m in &markers {
            let stage = ShaderStage::from_keyword(m.keyword).ok_or_else(|| {
                ShaderError::UnexpectedToken {
                    token: m.keyword.to_string(),
                }
            })?;
            stages.push(stage);
        }

        if markers.len() != 2 {
            return Err(ShaderError::MarkerCount {
                found: markers.len(),
            });
        }

        let mut vertex = None;
        let mut fragment = None;

        for (i, (m, stage)) in markers.iter().zip(&stages).enumerate() {
            let end = markers.get(i + 1).map_or(text.len(), |next| next.start);
            let body = text[m.end..end].trim().to_string();

            let slot = match stage {
                ShaderStage::Vertex => &mut vertex,
                ShaderStage::Fragment => &mut fragment,
            };
            if slot.replace(body).is_some() {
                return Err(ShaderError::DuplicateStage { stage: *stage });
            }
        }

        let (Some(vertex), Some(fragment)) = (vertex, fragment) else {
            return Err(ShaderError::MarkerCount {
                found: markers.len(),
            });
        };
        Ok(Self { vertex, fragment })
    }

    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

/// First pass: finds every `#type` followed by blanks and an identifier.
fn tokenize(text: &str) -> Vec<Marker<'_>> {
    let bytes = text.as_bytes();
    let mut markers = Vec::new();
    let mut from = 0;

    while let Some(found) = text[from..].find(MARKER) {
        let start = from + found;
        let mut pos = start + MARKER.len();
        from = pos;

        let blanks = count_while(&bytes[pos..], |b| b == b' ' || b == b'\t');
        if blanks == 0 {
            continue;
        }
        pos += blanks;

        let ident = count_while(&bytes[pos..], |b| b.is_ascii_alphabetic());
        if ident == 0 {
            continue;
        }

        let line_end = text[start..]
            .find(['\r', '\n'])
            .map_or(text.len(), |i| start + i);

        markers.push(Marker {
            start,
            end: pos + ident,
            keyword: text[start + MARKER.len()..line_end].trim(),
        });
        from = pos + ident;
    }

    markers
}

fn count_while(bytes: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|&&b| pred(b)).count()
}
