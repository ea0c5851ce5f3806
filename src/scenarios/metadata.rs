//! Expected extension metadata, read from the extension manifest.
//!
//! Built once per run and handed to each scenario as a value dependency.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the scenarios assert against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtensionMetadata {
    pub display_name: String,
    pub description: String,
    pub author: String,
    /// Titles of the contributed commands, in manifest order
    pub commands: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    display_name: String,
    #[serde(default)]
    description: String,
    author: Option<Author>,
    #[serde(default)]
    contributes: Contributes,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Author {
    Name(String),
    Person { name: String },
}

#[derive(Default, Deserialize)]
struct Contributes {
    #[serde(default)]
    commands: Vec<CommandContribution>,
}

#[derive(Deserialize)]
struct CommandContribution {
    title: String,
}

impl ExtensionMetadata {
    pub fn new(
        display_name: impl Into<String>,
        description: impl Into<String>,
        author: impl Into<String>,
        commands: Vec<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            description: description.into(),
            author: author.into(),
            commands,
        }
    }

    /// Parse a `package.json` style manifest.
    pub fn from_manifest_str(json: &str) -> Result<Self, ConfigError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        let author = match manifest.author {
            Some(Author::Name(name)) | Some(Author::Person { name }) => name,
            None => return Err(ConfigError::MissingAuthor),
        };

        Ok(Self {
            display_name: manifest.display_name,
            description: manifest.description,
            author,
            commands: manifest
                .contributes
                .commands
                .into_iter()
                .map(|c| c.title)
                .collect(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_manifest_str(&json)
    }

    /// Expect a different author than the manifest declares.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MANIFEST: &str = r#"{
        "name": "jbang-vscode",
        "displayName": "JBang",
        "description": "JBang support for Visual Studio Code",
        "author": "Red Hat",
        "publisher": "jbangdev",
        "contributes": {
            "commands": [
                { "command": "jbang.synchronize", "title": "JBang: Synchronize JBang", "category": "JBang" },
                { "command": "jbang.script.run", "title": "JBang: Run JBang" }
            ]
        }
    }"#;

    #[test]
    fn manifest_yields_expected_metadata() {
        let metadata = ExtensionMetadata::from_manifest_str(MANIFEST).unwrap();

        assert_eq!(metadata.display_name, "JBang");
        assert_eq!(metadata.description, "JBang support for Visual Studio Code");
        assert_eq!(metadata.author, "Red Hat");
        assert_eq!(
            metadata.commands,
            vec!["JBang: Synchronize JBang", "JBang: Run JBang"]
        );
    }

    #[test]
    fn author_object_form_is_accepted() {
        let metadata = ExtensionMetadata::from_manifest_str(
            r#"{ "displayName": "Foo", "author": { "name": "Red Hat", "email": "x@y.z" } }"#,
        )
        .unwrap();

        assert_eq!(metadata.author, "Red Hat");
        assert!(metadata.commands.is_empty());
    }

    #[test]
    fn missing_author_is_an_error() {
        let result = ExtensionMetadata::from_manifest_str(r#"{ "displayName": "Foo" }"#);
        assert!(matches!(result, Err(ConfigError::MissingAuthor)));
    }

    #[test]
    fn with_author_overrides_manifest() {
        let metadata = ExtensionMetadata::from_manifest_str(MANIFEST)
            .unwrap()
            .with_author("Acme");
        assert_eq!(metadata.author, "Acme");
    }

    #[test]
    fn load_reads_manifest_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();

        let metadata = ExtensionMetadata::load(file.path()).unwrap();
        assert_eq!(metadata.display_name, "JBang");
    }

    #[test]
    fn load_reports_missing_file() {
        let result = ExtensionMetadata::load("/definitely/not/here/package.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
