//! 送信候補の形式・サイズ検証
//!
//! 申告MIMEタイプとサイズのみで判定する純粋関数。内容のマジックバイトは見ない。

use crate::candidate::CandidateFile;
use meditrend_common::MediaType;

/// 1ファイルあたりの上限（10 MiB）
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// 却下理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    UnsupportedFormat,
    FileTooLarge,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::UnsupportedFormat => f.write_str("unsupported format"),
            Rejection::FileTooLarge => f.write_str("file too large"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted(MediaType),
    Rejected(Rejection),
}

/// 却下されたファイルと理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRejection {
    pub file_name: String,
    pub reason: Rejection,
}

impl FileRejection {
    pub fn message(&self) -> String {
        match self.reason {
            Rejection::UnsupportedFormat => format!(
                "{}: unsupported format (upload a PDF, JPG or PNG)",
                self.file_name
            ),
            Rejection::FileTooLarge => {
                format!("{}: file too large (limit is 10 MB)", self.file_name)
            }
        }
    }
}

impl std::fmt::Display for FileRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// 形式 → サイズの順で判定
pub fn validate(file: &CandidateFile) -> Verdict {
    let Some(media) = MediaType::from_mime(&file.media_type) else {
        return Verdict::Rejected(Rejection::UnsupportedFormat);
    };
    if file.size > MAX_FILE_SIZE {
        return Verdict::Rejected(Rejection::FileTooLarge);
    }
    Verdict::Accepted(media)
}

/// バッチ検証の結果
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// 受理（入力順を保持）
    pub accepted: Vec<CandidateFile>,
    /// 却下（1件につき1メッセージ）
    pub rejections: Vec<FileRejection>,
}

/// 却下メッセージを "; " で連結（却下が無ければ None）
pub fn rejection_message(rejections: &[FileRejection]) -> Option<String> {
    if rejections.is_empty() {
        return None;
    }
    Some(
        rejections
            .iter()
            .map(FileRejection::message)
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// 各ファイルを個別に検証
pub fn validate_batch(files: Vec<CandidateFile>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for file in files {
        match validate(&file) {
            Verdict::Accepted(_) => outcome.accepted.push(file),
            Verdict::Rejected(reason) => {
                tracing::debug!(file = %file.name, size = file.size, %reason, "file rejected");
                outcome.rejections.push(FileRejection {
                    file_name: file.name,
                    reason,
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_supported_types_at_limit() {
        for mime in ["application/pdf", "image/jpeg", "image/png", "image/jpg"] {
            let file = CandidateFile::declared("report", mime, MAX_FILE_SIZE);
            assert!(matches!(validate(&file), Verdict::Accepted(_)), "{mime}");
        }
    }

    #[test]
    fn test_rejects_unsupported_type() {
        for mime in ["image/gif", "text/plain", "application/octet-stream", ""] {
            let file = CandidateFile::declared("report", mime, 10);
            assert_eq!(
                validate(&file),
                Verdict::Rejected(Rejection::UnsupportedFormat),
                "{mime}"
            );
        }
    }

    #[test]
    fn test_rejects_oversized() {
        let file = CandidateFile::declared("scan.png", "image/png", MAX_FILE_SIZE + 1);
        assert_eq!(validate(&file), Verdict::Rejected(Rejection::FileTooLarge));
    }

    #[test]
    fn test_format_checked_before_size() {
        let file = CandidateFile::declared("movie.mp4", "video/mp4", 50 * 1024 * 1024);
        assert_eq!(validate(&file), Verdict::Rejected(Rejection::UnsupportedFormat));
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(Rejection::UnsupportedFormat.to_string(), "unsupported format");
        assert_eq!(Rejection::FileTooLarge.to_string(), "file too large");
    }

    #[test]
    fn test_validate_batch_partitions_in_order() {
        let files = vec![
            CandidateFile::declared("a.pdf", "application/pdf", 100),
            CandidateFile::declared("b.gif", "image/gif", 100),
            CandidateFile::declared("c.png", "image/png", 100),
            CandidateFile::declared("d.pdf", "application/pdf", 12 * 1024 * 1024),
        ];

        let outcome = validate_batch(files);
        let accepted: Vec<&str> = outcome.accepted.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(accepted, vec!["a.pdf", "c.png"]);
        assert_eq!(outcome.rejections.len(), 2);
        assert_eq!(outcome.rejections[0].file_name, "b.gif");
        assert_eq!(outcome.rejections[1].reason, Rejection::FileTooLarge);

        let message = rejection_message(&outcome.rejections).unwrap();
        assert!(message.contains("b.gif: unsupported format"));
        assert!(message.contains("d.pdf: file too large"));
    }

    #[test]
    fn test_validate_batch_all_accepted_has_no_message() {
        let outcome = validate_batch(vec![CandidateFile::declared("a.pdf", "application/pdf", 1)]);
        assert!(rejection_message(&outcome.rejections).is_none());
    }
}
