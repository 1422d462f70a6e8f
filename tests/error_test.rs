//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use photo_orient::error::PhotoOrientError;
use photo_orient::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, PhotoOrientError::FolderNotFound(_)));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_folder(dir.path());

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// ファイルをフォルダとして渡した場合
#[test]
fn test_scan_file_instead_of_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("a.png");
    std::fs::write(&file, b"dummy").unwrap();

    let result = scanner::scan_folder(&file);
    assert!(matches!(result, Err(PhotoOrientError::FolderNotFound(_))));
}

/// PhotoOrientErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        PhotoOrientError::Config("テスト設定エラー".to_string()),
        PhotoOrientError::FileNotFound("reference.png".to_string()),
        PhotoOrientError::FolderNotFound("/path/to/folder".to_string()),
        PhotoOrientError::Decode("broken.jpg".to_string()),
        PhotoOrientError::Encode("out.png".to_string()),
        PhotoOrientError::InvalidArgument("part".to_string()),
        PhotoOrientError::NoImagesFound("フォルダ".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 読み込みエラーのメッセージにファイル名が含まれる
#[test]
fn test_decode_error_mentions_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"\x89PNG garbage").unwrap();

    let err = photo_orient::imageio::load_image(&path).unwrap_err();
    let display = format!("{}", err);
    assert!(display.contains("画像読み込みエラー"));
    assert!(display.contains("broken.png"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: PhotoOrientError = io_err.into();

    assert!(matches!(err, PhotoOrientError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: PhotoOrientError = json_err.into();

    assert!(matches!(err, PhotoOrientError::JsonParse(_)));
}
