//! Catalog command handler

use crate::error::Result;
use crate::output::OutputWriter;
use remap_core::TransformKind;
use serde::Serialize;

/// One named transform
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
}

/// Every transform a rule's `transform_type` may name
pub fn catalog_entries() -> Vec<CatalogEntry> {
    TransformKind::ALL
        .iter()
        .map(|kind| CatalogEntry {
            name: kind.name(),
            description: kind.description(),
        })
        .collect()
}

/// Handle the catalog command
pub fn handle_catalog(output: &mut OutputWriter) -> Result<()> {
    output.catalog(&catalog_entries())?;
    output.info("Unknown or empty transform names copy the value unchanged.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::output::capture;

    #[test]
    fn test_catalog_lists_every_transform() {
        let names: Vec<_> = catalog_entries().iter().map(|e| e.name).collect();
        assert_eq!(names.len(), TransformKind::ALL.len());
        for name in ["toUpperCase", "capitalize", "mapGender", "formatDate", "toBool"] {
            assert!(names.contains(&name), "{}", name);
        }
    }

    #[test]
    fn test_catalog_as_json() {
        let (mut output, buffer) = capture::writer(OutputFormat::Json);
        handle_catalog(&mut output).unwrap();

        let listed: serde_json::Value = serde_json::from_str(&buffer.contents()).unwrap();
        assert_eq!(listed.as_array().map(Vec::len), Some(TransformKind::ALL.len()));
        assert!(listed[0]["description"].is_string());
    }

    #[test]
    fn test_catalog_as_table() {
        let (mut output, buffer) = capture::writer(OutputFormat::Human);
        handle_catalog(&mut output).unwrap();

        let text = buffer.contents();
        assert!(text.starts_with("TRANSFORM"));
        assert!(text.contains("formatDate"));
        assert!(text.contains("INFO: Unknown or empty transform names"));
    }
}
