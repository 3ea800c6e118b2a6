//! ローカルファイルから送信候補を作るモジュール
//!
//! 申告MIMEタイプは拡張子から決める。対応外の拡張子は
//! `application/octet-stream` として申告し、判定はバリデータに任せる。

use crate::candidate::{CandidateFile, FileContent};
use crate::error::{MediTrendError, Result};
use meditrend_common::MediaType;
use std::path::Path;
use walkdir::WalkDir;

const UNKNOWN_MIME: &str = "application/octet-stream";

/// 拡張子から申告MIMEタイプを決める
pub fn declared_mime(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| MediaType::from_extension(&ext.to_string_lossy()))
        .map(|media| media.as_mime())
        .unwrap_or(UNKNOWN_MIME)
}

/// 単一ファイルを候補として読み込む（内容は送信時に読む）
pub fn load_candidate(path: &Path) -> Result<CandidateFile> {
    if !path.exists() {
        return Err(MediTrendError::FileNotFound(path.display().to_string()));
    }

    let meta = std::fs::metadata(path)?;
    if !meta.is_file() {
        return Err(MediTrendError::FileNotFound(path.display().to_string()));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(CandidateFile {
        name,
        size: meta.len(),
        media_type: declared_mime(path).to_string(),
        content: FileContent::Path(path.to_path_buf()),
    })
}

pub fn load_candidates(paths: &[impl AsRef<Path>]) -> Result<Vec<CandidateFile>> {
    paths.iter().map(|p| load_candidate(p.as_ref())).collect()
}

/// フォルダ直下の対応ドキュメントを候補化（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<CandidateFile>> {
    if !folder.is_dir() {
        return Err(MediTrendError::FolderNotFound(folder.display().to_string()));
    }

    let mut candidates = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let supported = path
            .extension()
            .and_then(|ext| MediaType::from_extension(&ext.to_string_lossy()))
            .is_some();
        if supported {
            candidates.push(load_candidate(path)?);
        }
    }

    // ファイル名でソート
    candidates.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::debug!(folder = %folder.display(), count = candidates.len(), "scanned folder");

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_declared_mime() {
        assert_eq!(declared_mime(Path::new("a.pdf")), "application/pdf");
        assert_eq!(declared_mime(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(declared_mime(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(declared_mime(Path::new("a.png")), "image/png");
        assert_eq!(declared_mime(Path::new("a.gif")), UNKNOWN_MIME);
        assert_eq!(declared_mime(Path::new("noext")), UNKNOWN_MIME);
    }

    #[test]
    fn test_load_candidate_not_found() {
        let result = load_candidate(Path::new("/nonexistent/report.pdf"));
        assert!(matches!(result, Err(MediTrendError::FileNotFound(_))));
    }

    #[test]
    fn test_load_candidate_reads_size_not_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab.pdf");
        fs::write(&path, b"%PDF-1.7 dummy").unwrap();

        let candidate = load_candidate(&path).unwrap();
        assert_eq!(candidate.name, "lab.pdf");
        assert_eq!(candidate.size, 14);
        assert_eq!(candidate.media_type, "application/pdf");
        assert!(matches!(candidate.content, FileContent::Path(_)));
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(MediTrendError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("c-2024-03.png"), b"png").unwrap();
        fs::write(dir.path().join("a-2024-01.pdf"), b"pdf").unwrap();
        fs::write(dir.path().join("b-2024-02.JPG"), b"jpg").unwrap();
        fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join("archive").join("old.pdf"), b"pdf").unwrap();

        let result = scan_folder(dir.path()).unwrap();
        let names: Vec<&str> = result.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a-2024-01.pdf", "b-2024-02.JPG", "c-2024-03.png"]);
        assert_eq!(result[1].media_type, "image/jpeg");
    }
}
