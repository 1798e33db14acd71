//! The three submission wizard steps: basic information, references, upload.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{check_length, split_list, Validate, ValidationErrors};
use crate::models::SubmissionFormat;

pub const TITLE_MIN: usize = 5;
pub const TITLE_MAX: usize = 300;
pub const ABSTRACT_MIN: usize = 100;
pub const ABSTRACT_MAX: usize = 5000;
pub const KEYWORDS_MIN: usize = 3;
pub const KEYWORDS_MAX: usize = 10;
pub const REFERENCES_MAX: usize = 50;
/// 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Message shown when a manuscript is over `max_bytes`.
pub fn too_large(max_bytes: usize) -> String {
    format!("The file exceeds the {} MB limit.", max_bytes / (1024 * 1024))
}

const ACCEPTED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];
const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Step 1 as posted by the browser.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BasicInfoForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub abstract_text: String,
    /// Comma separated.
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub format: String,
}

/// Step 1 after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicInfo {
    pub title: String,
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub format: SubmissionFormat,
}

impl Validate for BasicInfoForm {
    type Output = BasicInfo;

    fn validate(&self) -> Result<BasicInfo, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = self.title.trim().to_string();
        check_length(&mut errors, "title", &title, TITLE_MIN, TITLE_MAX);

        let abstract_text = self.abstract_text.trim().to_string();
        check_length(&mut errors, "abstract_text", &abstract_text, ABSTRACT_MIN, ABSTRACT_MAX);

        let keywords = split_list(&self.keywords);
        if keywords.len() < KEYWORDS_MIN {
            errors.add("keywords", format!("Provide at least {KEYWORDS_MIN} keywords."));
        } else if keywords.len() > KEYWORDS_MAX {
            errors.add("keywords", format!("Provide at most {KEYWORDS_MAX} keywords."));
        }

        let format = match self.format.parse::<SubmissionFormat>() {
            Ok(format) => Some(format),
            Err(_) => {
                errors.add("format", "Choose a presentation format.");
                None
            }
        };

        match format {
            Some(format) if errors.is_empty() => Ok(BasicInfo {
                title,
                abstract_text,
                keywords,
                format,
            }),
            _ => Err(errors),
        }
    }
}

impl From<&BasicInfo> for BasicInfoForm {
    fn from(info: &BasicInfo) -> Self {
        Self {
            title: info.title.clone(),
            abstract_text: info.abstract_text.clone(),
            keywords: info.keywords.join(", "),
            format: info.format.as_wire().to_string(),
        }
    }
}

/// Step 2: one DOI per line.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReferencesForm {
    #[serde(default)]
    pub dois: String,
}

impl Validate for ReferencesForm {
    type Output = Vec<String>;

    fn validate(&self) -> Result<Vec<String>, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut dois: Vec<String> = Vec::new();
        for raw in self.dois.split(['\n', ',', ';']).map(str::trim).filter(|s| !s.is_empty()) {
            let doi = normalize_doi(raw);
            if !is_valid_doi(&doi) {
                errors.add("dois", format!("`{raw}` is not a valid DOI."));
            } else if dois.iter().any(|d| d.eq_ignore_ascii_case(&doi)) {
                errors.add("dois", format!("`{doi}` is listed twice."));
            } else {
                dois.push(doi);
            }
        }
        if dois.len() > REFERENCES_MAX {
            errors.add("dois", format!("At most {REFERENCES_MAX} references are allowed."));
        }
        errors.finish(|| dois)
    }
}

fn doi_pattern() -> &'static Regex {
    static DOI: OnceLock<Regex> = OnceLock::new();
    DOI.get_or_init(|| Regex::new(r"^10\.\d{4,9}/\S+$").expect("DOI pattern is valid"))
}

/// Strip resolver prefixes such as `https://doi.org/` and `doi:`.
pub fn normalize_doi(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    for prefix in ["https://doi.org/", "http://doi.org/", "https://dx.doi.org/", "http://dx.doi.org/", "doi:"] {
        if lower.starts_with(prefix) {
            return trimmed[prefix.len()..].trim().to_string();
        }
    }
    trimmed.to_string()
}

pub fn is_valid_doi(doi: &str) -> bool {
    doi_pattern().is_match(doi)
}

/// Step 3: the manuscript file, held in memory for the duration of the request.
#[derive(Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.filter(|ct| !ct.trim().is_empty()),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("manuscript")
            .to_string();
        let content_type = mime_guess::from_path(path).first_raw().map(str::to_string);
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// Declared type, or one guessed from the file name.
    pub fn mime_type(&self) -> String {
        self.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.file_name)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string()
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Accepts the file when either its MIME type or its extension is a
    /// supported document type, and it fits in `max_bytes`.
    pub fn validate(&self, max_bytes: usize) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let mime = self.mime_type();
        let mime_ok = ACCEPTED_MIME_TYPES.contains(&mime.as_str());
        let extension_ok = self
            .extension()
            .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()));
        if !mime_ok && !extension_ok {
            errors.add("file", "Only PDF, DOC or DOCX files are accepted.");
        }

        if self.is_empty() {
            errors.add("file", "The file is empty.");
        } else if self.len() > max_bytes {
            errors.add("file", too_large(max_bytes));
        }
        errors.finish(|| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn long_abstract() -> String {
        "We study deep learning methods for X and report results on three benchmarks, \
         improving the state of the art by a wide margin."
            .to_string()
    }

    fn basic_form() -> BasicInfoForm {
        BasicInfoForm {
            title: "Deep Learning for X".into(),
            abstract_text: long_abstract(),
            keywords: "deep learning, X, benchmarks".into(),
            format: "POSTER".into(),
        }
    }

    #[test]
    fn valid_basic_info() {
        let info = basic_form().validate().unwrap();
        assert_eq!(info.format, SubmissionFormat::Poster);
        assert_eq!(info.keywords.len(), 3);
        assert!(info.abstract_text.chars().count() >= ABSTRACT_MIN);
    }

    #[test]
    fn short_fields_are_reported_per_field() {
        let form = BasicInfoForm {
            title: "DL".into(),
            abstract_text: "too short".into(),
            keywords: "a, b".into(),
            format: String::new(),
        };
        let errors = form.validate().unwrap_err();
        for field in ["title", "abstract_text", "keywords", "format"] {
            assert!(errors.has(field), "missing error for {field}");
        }
    }

    #[test]
    fn basic_info_round_trips_to_prefill() {
        let info = basic_form().validate().unwrap();
        let prefill = BasicInfoForm::from(&info);
        assert_eq!(prefill.validate().unwrap(), info);
    }

    #[test]
    fn doi_normalization_and_validation() {
        assert_eq!(normalize_doi("https://doi.org/10.1000/182"), "10.1000/182");
        assert_eq!(normalize_doi("doi:10.1145/3368089.3409741"), "10.1145/3368089.3409741");
        assert!(is_valid_doi("10.1000/182"));
        assert!(!is_valid_doi("10.10/182"));
        assert!(!is_valid_doi("11.1000/182"));
        assert!(!is_valid_doi("10.1000/"));
    }

    #[test]
    fn references_reject_invalid_and_duplicate() {
        let form = ReferencesForm {
            dois: "10.1000/182\nnot a doi\nhttps://doi.org/10.1000/182".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("dois").len(), 2);

        let ok = ReferencesForm {
            dois: " 10.1000/182 \n\n10.1145/1\n".into(),
        };
        assert_eq!(ok.validate().unwrap(), vec!["10.1000/182", "10.1145/1"]);
        assert!(ReferencesForm::default().validate().unwrap().is_empty());
    }

    #[test]
    fn unsupported_type_and_extension_is_rejected() {
        let file = FileUpload::new("photo.png", Some("image/png".into()), vec![1; 10]);
        assert!(file.validate(MAX_UPLOAD_BYTES).unwrap_err().has("file"));
    }

    #[test]
    fn either_mime_or_extension_is_enough() {
        let by_extension = FileUpload::new("paper.docx", Some("application/octet-stream".into()), vec![1; 10]);
        assert!(by_extension.validate(MAX_UPLOAD_BYTES).is_ok());

        let by_mime = FileUpload::new("paper", Some("application/pdf".into()), vec![1; 10]);
        assert!(by_mime.validate(MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn oversized_and_empty_files_are_rejected() {
        let big = FileUpload::new("paper.pdf", None, vec![0; MAX_UPLOAD_BYTES + 1]);
        assert!(big.validate(MAX_UPLOAD_BYTES).is_err());

        let exact = FileUpload::new("paper.pdf", None, vec![0; MAX_UPLOAD_BYTES]);
        assert!(exact.validate(MAX_UPLOAD_BYTES).is_ok());

        let empty = FileUpload::new("paper.pdf", None, vec![]);
        assert!(empty.validate(MAX_UPLOAD_BYTES).is_err());
    }

    #[test]
    fn from_path_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.7 test").unwrap();

        let upload = FileUpload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "paper.pdf");
        assert_eq!(upload.mime_type(), "application/pdf");
        assert!(upload.validate(MAX_UPLOAD_BYTES).is_ok());
    }
}
