use std::io;
use std::path::Path;

use gwtkit_core::OutputStyle;

use crate::CompileParameters;

/// Shift applied to the persisted style id so a zero byte always denotes a
/// corrupt or legacy record.
pub const STYLE_ID_SHIFT: u8 = 1;

/// The persisted record deciding whether a previously compiled module's
/// output is still valid: one shifted style byte followed by the
/// length-prefixed output directory path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityRecord {
    pub style: OutputStyle,
    pub output_dir: String,
}

impl ValidityRecord {
    pub fn for_params(params: &CompileParameters) -> Self {
        Self {
            style: params.style,
            output_dir: params.output_dir.display().to_string(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let path = self.output_dir.as_bytes();
        let len = path.len().min(u16::MAX as usize);
        let mut out = Vec::with_capacity(3 + len);
        out.push(self.style.numeric_id() + STYLE_ID_SHIFT);
        out.extend_from_slice(&(len as u16).to_be_bytes());
        out.extend_from_slice(&path[..len]);
        out
    }

    /// Decode a record; corruption of any kind yields `None`, which callers
    /// treat as "previous output is not reusable".
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let (&style_byte, rest) = bytes.split_first()?;
        let style = OutputStyle::from_numeric_id(style_byte.checked_sub(STYLE_ID_SHIFT)?)?;

        let len_bytes: [u8; 2] = rest.get(..2)?.try_into().ok()?;
        let len = u16::from_be_bytes(len_bytes) as usize;
        let path = rest.get(2..2 + len)?;
        if rest.len() != 2 + len {
            return None;
        }

        Some(Self {
            style,
            output_dir: String::from_utf8(path.to_vec()).ok()?,
        })
    }

    /// Whether output produced under this record can be reused for `params`.
    pub fn is_up_to_date(&self, params: &CompileParameters) -> bool {
        self.style == params.style && self.output_dir == params.output_dir.display().to_string()
    }
}

/// Read a persisted record; a missing or corrupt file is `None`.
pub fn read_validity(path: &Path) -> io::Result<Option<ValidityRecord>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };
    Ok(ValidityRecord::decode(&bytes))
}

pub fn write_validity(path: &Path, record: &ValidityRecord) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, record.encode())
}
