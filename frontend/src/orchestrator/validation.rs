//! Client-side file validation.
//!
//! A candidate is accepted iff its declared MIME type is one of
//! [`ACCEPTED_MIME_TYPES`] and its size does not exceed [`MAX_FILE_SIZE`].

use crate::types::{RejectReason, Rejection, UploadFile};
use crate::{ACCEPTED_MIME_TYPES, MAX_FILE_SIZE};

/// Candidates split into accepted files and rejections, input order kept.
#[derive(Debug)]
pub struct Validated<F> {
    pub accepted: Vec<F>,
    pub rejected: Vec<Rejection>,
}

/// Check a single candidate.
pub fn check_file<F: UploadFile>(file: &F) -> Result<(), Rejection> {
    let mime_type = file.mime_type();
    if !ACCEPTED_MIME_TYPES.contains(&mime_type.as_str()) {
        return Err(Rejection {
            file_name: file.name(),
            reason: RejectReason::InvalidType { mime_type },
        });
    }

    let size = file.size();
    if size > MAX_FILE_SIZE {
        return Err(Rejection {
            file_name: file.name(),
            reason: RejectReason::TooLarge { size },
        });
    }

    Ok(())
}

/// Validate a batch of candidates from the picker or a drop event.
pub fn validate<F: UploadFile>(candidates: Vec<F>) -> Validated<F> {
    let mut accepted = Vec::with_capacity(candidates.len());
    let mut rejected = Vec::new();

    for file in candidates {
        match check_file(&file) {
            Ok(()) => accepted.push(file),
            Err(rejection) => rejected.push(rejection),
        }
    }

    Validated { accepted, rejected }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Candidate {
        name: &'static str,
        mime: &'static str,
        size: u64,
    }

    impl UploadFile for Candidate {
        fn name(&self) -> String {
            self.name.to_string()
        }
        fn mime_type(&self) -> String {
            self.mime.to_string()
        }
        fn size(&self) -> u64 {
            self.size
        }
    }

    fn candidate(name: &'static str, mime: &'static str, size: u64) -> Candidate {
        Candidate { name, mime, size }
    }

    #[test]
    fn test_accepts_every_supported_type() {
        for mime in ["image/jpeg", "image/jpg", "image/png", "image/tiff"] {
            assert!(check_file(&candidate("a", mime, 10)).is_ok(), "{} should pass", mime);
        }
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let err = check_file(&candidate("map.gif", "image/gif", 10)).unwrap_err();
        assert_eq!(err.file_name, "map.gif");
        assert_eq!(
            err.reason,
            RejectReason::InvalidType { mime_type: "image/gif".into() }
        );

        // Browsers report an empty type for unknown extensions
        assert!(check_file(&candidate("raw.dng", "", 10)).is_err());
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        assert!(check_file(&candidate("edge.png", "image/png", MAX_FILE_SIZE)).is_ok());

        let err = check_file(&candidate("big.png", "image/png", MAX_FILE_SIZE + 1)).unwrap_err();
        assert_eq!(err.reason, RejectReason::TooLarge { size: MAX_FILE_SIZE + 1 });
    }

    #[test]
    fn test_type_checked_before_size() {
        let err = check_file(&candidate("big.bmp", "image/bmp", MAX_FILE_SIZE * 2)).unwrap_err();
        assert!(matches!(err.reason, RejectReason::InvalidType { .. }));
    }

    #[test]
    fn test_validate_keeps_input_order() {
        let result = validate(vec![
            candidate("one.png", "image/png", 1),
            candidate("two.gif", "image/gif", 1),
            candidate("three.jpg", "image/jpeg", 1),
            candidate("four.tiff", "image/tiff", MAX_FILE_SIZE + 1),
        ]);

        let names: Vec<_> = result.accepted.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["one.png", "three.jpg"]);

        let rejected: Vec<_> = result.rejected.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(rejected, vec!["two.gif", "four.tiff"]);
    }
}
