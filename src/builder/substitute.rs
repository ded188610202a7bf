//! Literal token replacement in staged text files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::BuildError;
use crate::core::request::BuildRequest;
use crate::core::template::{MODULE_NAME, PACKAGE_TOKEN, REDIRECT_PACKAGE_TOKEN};
use crate::core::workspace::BuildWorkspace;

/// Suffix appended to the target package to form the redirect app's own id.
pub const REDIRECT_SUFFIX: &str = ".redirect";

/// One token replacement in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub file: PathBuf,
    pub token: String,
    pub replacement: String,
}

impl Substitution {
    pub fn new(
        file: impl Into<PathBuf>,
        token: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Substitution {
            file: file.into(),
            token: token.into(),
            replacement: replacement.into(),
        }
    }

    /// Apply this substitution, returning the number of replacements.
    pub fn apply(&self) -> Result<usize, BuildError> {
        if !self.file.is_file() {
            return Err(BuildError::validation(format!(
                "missing template file: {}",
                self.file.display()
            )));
        }
        substitute(&self.file, &self.token, &self.replacement)
    }
}

/// Replace every occurrence of `token` in `path` with `replacement`.
///
/// Exact, case-sensitive substring matching. A file without the token is
/// left untouched. Returns the number of replacements made.
pub fn substitute(path: &Path, token: &str, replacement: &str) -> Result<usize, BuildError> {
    if token.is_empty() {
        return Err(BuildError::validation("substitution token must not be empty"));
    }

    let contents = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    let count = contents.matches(token).count();
    if count == 0 {
        tracing::debug!("`{}` not present in {}", token, path.display());
        return Ok(0);
    }

    fs::write(path, contents.replace(token, replacement)).map_err(|e| BuildError::io(path, e))?;
    tracing::debug!(
        "replaced {} occurrence(s) of `{}` in {}",
        count,
        token,
        path.display()
    );
    Ok(count)
}

/// The three substitutions that specialize a workspace for `request`.
pub fn substitutions_for(ws: &BuildWorkspace, request: &BuildRequest) -> Vec<Substitution> {
    vec![
        Substitution::new(ws.activity_file(), PACKAGE_TOKEN, &request.package_name),
        Substitution::new(
            ws.manifest_file(),
            REDIRECT_PACKAGE_TOKEN,
            format!("{}{}", request.package_name, REDIRECT_SUFFIX),
        ),
        Substitution::new(ws.strings_file(), MODULE_NAME, escape_xml(&request.app_name)),
    ]
}

/// Apply substitutions in order, stopping at the first failure.
///
/// Substitutions already applied stay applied.
pub fn apply_all(substitutions: &[Substitution]) -> Result<usize, BuildError> {
    let mut total = 0;
    for sub in substitutions {
        total += sub.apply()?;
    }
    Ok(total)
}

/// Escape text for use inside an XML element.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::stage::stage;
    use crate::core::error::ErrorKind;
    use crate::core::template::TemplateRoot;
    use crate::test_support::create_template;
    use tempfile::TempDir;

    #[test]
    fn test_replaces_every_occurrence() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, "?x? and ?x? and ?x?").unwrap();

        assert_eq!(substitute(&file, "?x?", "y").unwrap(), 3);
        assert_eq!(fs::read_to_string(&file).unwrap(), "y and y and y");
    }

    #[test]
    fn test_absent_token_is_noop() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, "nothing here").unwrap();
        let before = fs::metadata(&file).unwrap().modified().unwrap();

        assert_eq!(substitute(&file, "?x?", "y").unwrap(), 0);
        assert_eq!(fs::read_to_string(&file).unwrap(), "nothing here");
        assert_eq!(fs::metadata(&file).unwrap().modified().unwrap(), before);
    }

    #[test]
    fn test_matching_is_literal_and_case_sensitive() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, "a.b A.B a*b").unwrap();

        assert_eq!(substitute(&file, "a.b", "X").unwrap(), 1);
        assert_eq!(fs::read_to_string(&file).unwrap(), "X A.B a*b");
    }

    #[test]
    fn test_missing_target_names_file() {
        let tmp = TempDir::new().unwrap();
        let sub = Substitution::new(tmp.path().join("AndroidManifest.xml"), "?x?", "y");

        let err = sub.apply().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("AndroidManifest.xml"));
    }

    #[test]
    fn test_workspace_substitutions() {
        let tmp = TempDir::new().unwrap();
        let template = TemplateRoot::open(create_template(tmp.path())).unwrap();
        let ws = stage(&template, "com.acme.app", |_| true).unwrap();
        let request = BuildRequest::new("com.acme.app", "Acme & Co");

        apply_all(&substitutions_for(&ws, &request)).unwrap();

        let manifest = fs::read_to_string(ws.manifest_file()).unwrap();
        assert!(manifest.contains("com.acme.app.redirect"));
        assert!(!manifest.contains(REDIRECT_PACKAGE_TOKEN));

        let activity = fs::read_to_string(ws.activity_file()).unwrap();
        assert!(activity.contains("GetLaunchIntentForPackage(\"com.acme.app\")"));
        assert!(!activity.contains(PACKAGE_TOKEN));

        let strings = fs::read_to_string(ws.strings_file()).unwrap();
        assert!(strings.contains("Acme &amp; Co"));
        assert!(!strings.contains(MODULE_NAME));

        // The template itself is never touched.
        let original = fs::read_to_string(template.root().join("AndroidManifest.xml")).unwrap();
        assert!(original.contains(REDIRECT_PACKAGE_TOKEN));
    }

    #[test]
    fn test_apply_all_keeps_earlier_substitutions_on_failure() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first.txt");
        fs::write(&first, "?a?").unwrap();

        let subs = vec![
            Substitution::new(&first, "?a?", "done"),
            Substitution::new(tmp.path().join("missing.txt"), "?b?", "x"),
        ];

        assert!(apply_all(&subs).is_err());
        assert_eq!(fs::read_to_string(&first).unwrap(), "done");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Tom & \"Jerry\" <3"), "Tom &amp; &quot;Jerry&quot; &lt;3");
        assert_eq!(escape_xml("Plain"), "Plain");
    }
}
