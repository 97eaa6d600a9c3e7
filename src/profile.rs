//! Vendor profile for the target slicer
//!
//! The profile holds every fixed string the output format needs: document
//! language, the vendor namespace declared on the geometry root, the vendor
//! metadata written into the geometry document, and where the config sidecar
//! lives in the package. [`VendorProfile::default`] targets Slic3r PE /
//! PrusaSlicer.

use crate::model::{MetadataEntry, Model};

/// Slic3r PE vendor namespace URI
pub const SLIC3R_PE_NAMESPACE: &str = "http://schemas.slic3r.org/3mf/2017/06";

/// Package path of the Slic3r PE per-object config
pub const SLIC3R_PE_CONFIG_PATH: &str = "Metadata/Slic3r_PE_model.config";

/// Fixed strings describing the target slicer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorProfile {
    language: String,
    namespace_prefix: String,
    namespace_uri: String,
    format_version: String,
    title: String,
    application: String,
    config_path: String,
}

impl VendorProfile {
    /// The Slic3r PE profile
    pub fn slic3r_pe() -> Self {
        Self {
            language: "en-US".to_string(),
            namespace_prefix: "slic3rpe".to_string(),
            namespace_uri: SLIC3R_PE_NAMESPACE.to_string(),
            format_version: "1".to_string(),
            title: "model".to_string(),
            application: "Canvas".to_string(),
            config_path: SLIC3R_PE_CONFIG_PATH.to_string(),
        }
    }

    /// Set the document language tag
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the vendor namespace prefix and URI
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespace_prefix = prefix.into();
        self.namespace_uri = uri.into();
        self
    }

    /// Set the vendor format version written as `<prefix>:Version3mf`
    pub fn with_format_version(mut self, version: impl Into<String>) -> Self {
        self.format_version = version.into();
        self
    }

    /// Set the document title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the application identifier
    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = application.into();
        self
    }

    /// Set the package path of the config sidecar
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Document language tag
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Vendor namespace prefix
    pub fn namespace_prefix(&self) -> &str {
        &self.namespace_prefix
    }

    /// Vendor namespace URI
    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    /// Package path of the config sidecar
    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    /// Metadata entries every geometry document carries
    pub fn metadata_entries(&self) -> Vec<MetadataEntry> {
        vec![
            MetadataEntry::new(
                format!("{}:Version3mf", self.namespace_prefix),
                self.format_version.as_str(),
            ),
            MetadataEntry::new("Title", self.title.as_str()),
            MetadataEntry::new("Application", self.application.as_str()),
        ]
    }

    /// Extra attributes for the geometry root element
    ///
    /// Declares the vendor namespace once, at the document root.
    pub fn root_attributes(&self) -> Vec<(String, String)> {
        vec![(
            format!("xmlns:{}", self.namespace_prefix),
            self.namespace_uri.clone(),
        )]
    }

    /// Stamp the language tag and default metadata onto a document
    ///
    /// Entries already present under the same name are replaced, so applying
    /// a profile twice leaves one copy of each entry.
    pub fn apply_to(&self, model: &mut Model) {
        model.language = self.language.clone();
        for entry in self.metadata_entries() {
            model.metadata.retain(|existing| existing.name != entry.name);
            model.metadata.push(entry);
        }
    }
}

impl Default for VendorProfile {
    fn default() -> Self {
        Self::slic3r_pe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slic3r_pe_defaults() {
        let profile = VendorProfile::default();
        assert_eq!(profile.language(), "en-US");
        assert_eq!(profile.config_path(), "Metadata/Slic3r_PE_model.config");
        assert_eq!(
            profile.root_attributes(),
            vec![(
                "xmlns:slic3rpe".to_string(),
                "http://schemas.slic3r.org/3mf/2017/06".to_string()
            )]
        );

        let names: Vec<_> = profile
            .metadata_entries()
            .into_iter()
            .map(|entry| (entry.name, entry.value))
            .collect();
        assert_eq!(
            names,
            vec![
                ("slic3rpe:Version3mf".to_string(), "1".to_string()),
                ("Title".to_string(), "model".to_string()),
                ("Application".to_string(), "Canvas".to_string()),
            ]
        );
    }

    #[test]
    fn test_alternate_profile() {
        let profile = VendorProfile::default()
            .with_namespace("acme", "http://example.com/acme/2024")
            .with_application("Acme Studio")
            .with_language("de-DE");
        assert_eq!(profile.root_attributes()[0].0, "xmlns:acme");
        assert_eq!(profile.metadata_entries()[0].name, "acme:Version3mf");
        assert_eq!(profile.metadata_entries()[2].value, "Acme Studio");
        assert_eq!(profile.language(), "de-DE");
    }

    #[test]
    fn test_apply_to_is_idempotent() {
        let profile = VendorProfile::default();
        let mut model = Model::new();
        model.language = "fr-FR".to_string();
        profile.apply_to(&mut model);
        profile.apply_to(&mut model);
        assert_eq!(model.language, "en-US");
        assert_eq!(model.metadata.len(), 3);
        assert_eq!(model.get_metadata("Application"), Some("Canvas"));
    }
}
