use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("category `{category}` has no diagram named `{diagram}`")]
    UnknownDiagram { category: String, diagram: String },
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Diagram {
    pub name: String,
    pub file: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub diagrams: Vec<Diagram>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Catalog {
    categories: Vec<Category>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DatasetId {
    pub category: String,
    pub diagram: String,
}

impl DatasetId {
    pub fn new(category: impl Into<String>, diagram: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            diagram: diagram.into(),
        }
    }

    /// Parses `category/diagram`.
    pub fn parse(value: &str) -> Result<Self> {
        let (category, diagram) = value
            .split_once('/')
            .filter(|(category, diagram)| !category.is_empty() && !diagram.is_empty())
            .ok_or_else(|| anyhow!("dataset `{value}` is not of the form category/diagram"))?;
        Ok(Self::new(category, diagram))
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.diagram)
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        let diagrams = || {
            [
                ("Characters", "characters.json"),
                ("Locations", "locations.json"),
                ("Clues", "clues.json"),
            ]
            .into_iter()
            .map(|(name, file)| Diagram {
                name: name.to_owned(),
                file: file.to_owned(),
            })
            .collect::<Vec<_>>()
        };

        Self {
            categories: ["module1", "module2"]
                .into_iter()
                .map(|name| Category {
                    name: name.to_owned(),
                    diagrams: diagrams(),
                })
                .collect(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(raw).context("invalid catalog JSON")?;
        for category in &catalog.categories {
            if category.diagrams.is_empty() {
                return Err(anyhow!("catalog category `{}` has no diagrams", category.name));
            }
        }
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to load catalog {}", path.display()))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn diagrams(&self, category: &str) -> Result<&[Diagram], CatalogError> {
        self.categories
            .iter()
            .find(|entry| entry.name == category)
            .map(|entry| entry.diagrams.as_slice())
            .ok_or_else(|| CatalogError::UnknownCategory(category.to_owned()))
    }

    /// Data-root-relative path `<category>/<file>`, defaulting the extension to `.json`.
    pub fn resolve(&self, dataset: &DatasetId) -> Result<PathBuf, CatalogError> {
        let diagram = self
            .diagrams(&dataset.category)?
            .iter()
            .find(|diagram| diagram.name == dataset.diagram)
            .ok_or_else(|| CatalogError::UnknownDiagram {
                category: dataset.category.clone(),
                diagram: dataset.diagram.clone(),
            })?;

        let mut path = Path::new(&dataset.category).join(&diagram.file);
        if path.extension().is_none() {
            path.set_extension("json");
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn builtin_resolves_category_relative_paths() {
        let catalog = Catalog::builtin();
        let path = catalog
            .resolve(&DatasetId::new("module2", "Locations"))
            .unwrap();
        assert_eq!(path, Path::new("module2").join("locations.json"));
        assert_eq!(catalog.categories().len(), 2);
        assert_eq!(catalog.diagrams("module1").unwrap().len(), 3);
    }

    #[test]
    fn unknown_entries_are_reported() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.resolve(&DatasetId::new("module9", "Clues")),
            Err(CatalogError::UnknownCategory("module9".to_owned()))
        );
        assert!(matches!(
            catalog.resolve(&DatasetId::new("module1", "Weapons")),
            Err(CatalogError::UnknownDiagram { .. })
        ));
    }

    #[test]
    fn file_catalog_keeps_order_and_adds_extension() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name": "manor", "diagrams": [
                    {{"name": "Suspects", "file": "suspects"}},
                    {{"name": "Rooms", "file": "rooms.json"}}
                ]}}
            ]"#
        )
        .unwrap();

        let catalog = Catalog::from_file(file.path()).unwrap();
        let names = catalog
            .diagrams("manor")
            .unwrap()
            .iter()
            .map(|diagram| diagram.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Suspects", "Rooms"]);
        assert_eq!(
            catalog
                .resolve(&DatasetId::new("manor", "Suspects"))
                .unwrap(),
            Path::new("manor").join("suspects.json")
        );
    }

    #[test]
    fn empty_category_is_rejected() {
        let error = Catalog::from_json(r#"[{"name": "empty", "diagrams": []}]"#).unwrap_err();
        assert!(error.to_string().contains("has no diagrams"));
    }

    #[test]
    fn dataset_id_parses_and_displays() {
        let id = DatasetId::parse("module1/Clues").unwrap();
        assert_eq!(id, DatasetId::new("module1", "Clues"));
        assert_eq!(id.to_string(), "module1/Clues");
        assert!(DatasetId::parse("module1").is_err());
        assert!(DatasetId::parse("/Clues").is_err());
    }
}
