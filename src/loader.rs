use crate::error::{UpdaterError, UpdaterResult};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Marker inserted before the extension of the output file
pub const PROPOSED_MARKER: &str = "proposed";

/// Load a locale document from a JSON file
///
/// The JSON file should have the following structure:
/// ```json
/// {
///     "common": { "save": "Save", "cancel": "Cancel" },
///     "message-key": "message text"
/// }
/// ```
///
/// # Errors
/// `UpdaterError::InputLoad` when the file cannot be read, is not valid
/// JSON, or its root is not an object.
pub fn load_document(path: &Path) -> UpdaterResult<Map<String, Value>> {
    let input_error = |reason: String| UpdaterError::InputLoad {
        path: path.to_path_buf(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| input_error(e.to_string()))?;

    let json: Value =
        serde_json::from_str(&content).map_err(|e| input_error(format!("invalid JSON: {}", e)))?;

    match json {
        Value::Object(doc) => {
            tracing::debug!(path = %path.display(), keys = doc.len(), "loaded locale document");
            Ok(doc)
        }
        _ => Err(input_error("root must be an object".to_string())),
    }
}

/// Serialize `doc` with 2-space indentation, non-ASCII kept literal
pub fn render_document(doc: &Value) -> UpdaterResult<String> {
    let mut rendered = serde_json::to_string_pretty(doc).map_err(|e| UpdaterError::OutputWrite {
        path: PathBuf::new(),
        reason: e.to_string(),
    })?;
    rendered.push('\n');
    Ok(rendered)
}

/// Write `doc` to `path`, see [`render_document`] for the format
pub fn save_document(path: &Path, doc: &Value) -> UpdaterResult<()> {
    let rendered = render_document(doc)?;
    fs::write(path, rendered).map_err(|e| UpdaterError::OutputWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), "wrote proposed locale document");
    Ok(())
}

/// Output path for a target locale: `<dir>/<stem>.proposed.<ext>`
///
/// The stem is everything before the first `.` of the target's file name,
/// so `fr.json` and `fr.proposed.json` both yield `fr.proposed.json`. A
/// target without an extension gets `json`.
pub fn proposed_path(target: &Path, output_dir: &Path) -> PathBuf {
    let file = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file.split('.').next().unwrap_or_default();
    let extension = target
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "json".to_string());

    output_dir.join(format!("{}.{}.{}", stem, PROPOSED_MARKER, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("en.json");
        fs::write(&path, r#"{"b": "B", "a": {"c": "C"}}"#).unwrap();

        let doc = load_document(&path).unwrap();
        let keys: Vec<&String> = doc.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(doc["a"]["c"], json!("C"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");
        match load_document(&path) {
            Err(UpdaterError::InputLoad { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("Expected InputLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{"a": "#).unwrap();
        match load_document(&path) {
            Err(UpdaterError::InputLoad { reason, .. }) => assert!(reason.contains("invalid JSON")),
            other => panic!("Expected InputLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_load_non_object_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.json");
        fs::write(&path, r#"["a", "b"]"#).unwrap();
        match load_document(&path) {
            Err(UpdaterError::InputLoad { reason, .. }) => assert!(reason.contains("object")),
            other => panic!("Expected InputLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_render_two_space_indent_and_literal_unicode() {
        let rendered = render_document(&json!({"greeting": {"hello": "你好 {{name}}"}})).unwrap();
        assert_eq!(
            rendered,
            "{\n  \"greeting\": {\n    \"hello\": \"你好 {{name}}\"\n  }\n}\n"
        );
    }

    #[test]
    fn test_save_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fr.proposed.json");
        save_document(&path, &json!({"a": "é"})).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n  \"a\": \"é\"\n}\n");
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("fr.proposed.json");
        assert!(matches!(
            save_document(&path, &json!({})),
            Err(UpdaterError::OutputWrite { .. })
        ));
    }

    #[test]
    fn test_proposed_path() {
        let out = Path::new("out");
        assert_eq!(
            proposed_path(Path::new("web/src/locales/zh-Hant.json"), out),
            Path::new("out/zh-Hant.proposed.json")
        );
        assert_eq!(
            proposed_path(Path::new("fr.proposed.json"), out),
            Path::new("out/fr.proposed.json")
        );
        assert_eq!(
            proposed_path(Path::new("locales/de"), Path::new("")),
            Path::new("de.proposed.json")
        );
    }
}
