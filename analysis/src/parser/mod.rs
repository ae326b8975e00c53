//! Load stage: delimited text to [`Observation`]s.
//!
//! Encoding and delimiter are auto-detected unless the caller fixes the
//! delimiter. Rows are read with the `csv` crate in strict mode, so a row
//! whose field count differs from the header is a parse error rather than
//! being padded or truncated.

use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{
    Observation, CHANGE_TYPE_COLUMN, EFFECT_SIZE_COLUMN, REFACTORINGS_COLUMN, REQUIRED_COLUMNS,
};

/// Row-level parsing error with context
#[derive(Debug, Clone)]
pub struct CsvError {
    pub line: u64,
    pub value: Option<String>,
    pub message: String,
}

impl std::fmt::Display for CsvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(val) => write!(f, "Line {} (value '{}'): {}", self.line, val, self.message),
            None => write!(f, "Line {}: {}", self.line, self.message),
        }
    }
}

impl std::error::Error for CsvError {}

impl CsvError {
    pub fn new(line: u64, message: impl Into<String>) -> Self {
        Self {
            line,
            value: None,
            message: message.into(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    fn from_csv(err: &csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.kind() {
            csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
                CsvError::new(line, format!("expected {} fields, found {}", expected_len, len))
            }
            _ => CsvError::new(line, err.to_string()),
        }
    }
}

/// Result of the load stage with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub observations: Vec<Observation>,
    /// Detected encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers, in file order
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the specified encoding.
///
/// A leading byte-order mark is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        // encoding_rs treats Latin-1 as windows-1252
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        // utf-8, ascii, and anything unrecognised
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    strip_bom(&decoded).to_string()
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Detect the delimiter by counting occurrences in the header line.
///
/// Falls back to `,` when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Load observations from a file.
pub fn parse_file(path: &Path, delimiter: Option<char>) -> PipelineResult<ParseResult> {
    let bytes = std::fs::read(path).map_err(|source| PipelineError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bytes(&bytes, delimiter, path)
}

/// Load observations from raw bytes. `source` only labels errors.
pub fn parse_bytes(bytes: &[u8], delimiter: Option<char>, source: &Path) -> PipelineResult<ParseResult> {
    // Valid UTF-8 is taken as is; chardet only guesses for legacy encodings.
    let (encoding, content) = match std::str::from_utf8(bytes) {
        Ok(text) => ("utf-8".to_string(), strip_bom(text).to_string()),
        Err(_) => {
            let encoding = detect_encoding(bytes);
            let content = decode_content(bytes, &encoding);
            (encoding, content)
        }
    };
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    let (headers, observations) = parse_str(&content, delimiter, source)?;

    Ok(ParseResult {
        observations,
        encoding,
        delimiter,
        headers,
    })
}

/// Parse decoded text with an explicit delimiter.
pub fn parse_str(
    content: &str,
    delimiter: char,
    source: &Path,
) -> PipelineResult<(Vec<String>, Vec<Observation>)> {
    let parse_err = |err: CsvError| PipelineError::Parse {
        path: source.to_path_buf(),
        source: err,
    };

    if !delimiter.is_ascii() {
        return Err(parse_err(
            CsvError::new(1, "delimiter must be a single ASCII character").with_value(delimiter.to_string()),
        ));
    }
    if content.trim().is_empty() {
        return Err(parse_err(CsvError::new(1, "Empty CSV file")));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_err(CsvError::from_csv(&e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h.as_str() == **required))
        .map(|s| s.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::Schema {
            path: source.to_path_buf(),
            missing,
            found: headers,
        });
    }

    // Safe: presence checked above.
    let column = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
    let refactorings_idx = column(REFACTORINGS_COLUMN);
    let change_type_idx = column(CHANGE_TYPE_COLUMN);
    let effect_size_idx = column(EFFECT_SIZE_COLUMN);

    let mut observations = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| parse_err(CsvError::from_csv(&e)))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let field = |idx: usize| record.get(idx).filter(|v| !v.is_empty()).map(str::to_string);

        observations.push(Observation {
            line,
            refactorings: field(refactorings_idx),
            change_type: field(change_type_idx),
            effect_size_interpretation: field(effect_size_idx),
        });
    }

    Ok((headers, observations))
}
