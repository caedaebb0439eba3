//! The dataset catalog: named groups of archive URLs.
//!
//! A group is either a set of standalone archives or the numbered
//! chunks of one split archive; the latter carries a `merge_target`
//! naming the file the chunks are reassembled into. The built-in
//! catalog covers the TII drone-racing releases and the UZH FPV
//! sequences; a TOML file can replace it.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("group '{0}' has no locators")]
    EmptyGroup(String),

    #[error("group '{0}' has an empty merge target")]
    EmptyMergeTarget(String),

    #[error("duplicate group name '{0}'")]
    DuplicateGroup(String),

    #[error("unknown group '{0}'")]
    UnknownGroup(String),
}

/// One named dataset: the URLs to fetch and, for split archives, the
/// file name the chunks merge into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceGroup {
    pub name: String,

    /// Download URLs in publication order. For chunked groups the
    /// order is the concatenation order.
    pub locators: Vec<String>,

    /// Merge target file name; `None` for groups of standalone
    /// archives, which are left as downloaded.
    #[serde(default)]
    pub merge_target: Option<String>,
}

impl ResourceGroup {
    /// Whether this group's files are chunks of a single archive.
    #[must_use]
    pub fn is_chunked(&self) -> bool {
        self.merge_target.is_some()
    }
}

/// An ordered collection of resource groups.
///
/// The TOML form is a `[[group]]` array:
///
/// ```toml
/// [[group]]
/// name = "ratm_autonomous"
/// merge_target = "autonomous.zip"
/// locators = [
///     "https://github.com/tii-racing/drone-racing-dataset/releases/download/v3.0.0/autonomous_zipchunk01",
/// ]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    #[serde(rename = "group", default)]
    pub groups: Vec<ResourceGroup>,
}

impl Catalog {
    /// The compiled-in dataset table.
    pub fn builtin() -> Self {
        Self {
            groups: vec![
                group(
                    "ratm_autonomous",
                    Some("autonomous.zip"),
                    &[
                        "https://github.com/tii-racing/drone-racing-dataset/releases/download/v3.0.0/autonomous_zipchunk01",
                        "https://github.com/tii-racing/drone-racing-dataset/releases/download/v3.0.0/autonomous_zipchunk02",
                        "https://github.com/tii-racing/drone-racing-dataset/releases/download/v3.0.0/autonomous_zipchunk03",
                    ],
                ),
                group(
                    "ratm_piloted",
                    Some("piloted.zip"),
                    &[
                        "https://github.com/tii-racing/drone-racing-dataset/releases/download/v3.0.0/piloted_zipchunk01",
                        "https://github.com/tii-racing/drone-racing-dataset/releases/download/v3.0.0/piloted_zipchunk02",
                        "https://github.com/tii-racing/drone-racing-dataset/releases/download/v3.0.0/piloted_zipchunk03",
                        "https://github.com/tii-racing/drone-racing-dataset/releases/download/v3.0.0/piloted_zipchunk04",
                        "https://github.com/tii-racing/drone-racing-dataset/releases/download/v3.0.0/piloted_zipchunk05",
                        "https://github.com/tii-racing/drone-racing-dataset/releases/download/v3.0.0/piloted_zipchunk06",
                        "https://github.com/tii-racing/drone-racing-dataset/releases/download/v3.0.0/piloted_zipchunk07",
                    ],
                ),
                group(
                    "uzh_indoor_forward",
                    None,
                    &[
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/indoor_forward_3_snapdragon_with_gt.zip",
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/indoor_forward_5_snapdragon_with_gt.zip",
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/indoor_forward_6_snapdragon_with_gt.zip",
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/indoor_forward_7_snapdragon_with_gt.zip",
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/indoor_forward_9_snapdragon_with_gt.zip",
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/indoor_forward_10_snapdragon_with_gt.zip",
                    ],
                ),
                group(
                    "uzh_indoor_45",
                    None,
                    &[
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/indoor_45_2_snapdragon_with_gt.zip",
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/indoor_45_4_snapdragon_with_gt.zip",
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/indoor_45_9_snapdragon_with_gt.zip",
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/indoor_45_12_snapdragon_with_gt.zip",
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/indoor_45_13_snapdragon_with_gt.zip",
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/indoor_45_14_snapdragon_with_gt.zip",
                    ],
                ),
                group(
                    "uzh_outdoor_forward",
                    None,
                    &[
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/outdoor_forward_1_snapdragon_with_gt.zip",
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/outdoor_forward_3_snapdragon_with_gt.zip",
                        "http://rpg.ifi.uzh.ch/datasets/uzh-fpv/outdoor_forward_5_snapdragon_with_gt.zip",
                    ],
                ),
                group(
                    "uzh_outdoor_45",
                    None,
                    &["http://rpg.ifi.uzh.ch/datasets/uzh-fpv/outdoor_45_1_snapdragon_with_gt.zip"],
                ),
            ],
        }
    }

    /// Load a catalog from a TOML file and validate it.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path)?;
        let catalog: Catalog = toml::from_str(&text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load from `path`, or fall back to the built-in table.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Keep only the named groups, in the order given.
    pub fn select(&self, names: &[String]) -> Result<Self, CatalogError> {
        let mut groups = Vec::with_capacity(names.len());
        for name in names {
            let group = self
                .groups
                .iter()
                .find(|g| g.name == *name)
                .ok_or_else(|| CatalogError::UnknownGroup(name.clone()))?;
            groups.push(group.clone());
        }
        Ok(Self { groups })
    }

    /// Every locator of every group, in catalog order.
    pub fn locators(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.locators.iter().map(String::as_str))
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            if group.locators.is_empty() {
                return Err(CatalogError::EmptyGroup(group.name.clone()));
            }
            if group.merge_target.as_deref() == Some("") {
                return Err(CatalogError::EmptyMergeTarget(group.name.clone()));
            }
            if seen.contains(&group.name.as_str()) {
                return Err(CatalogError::DuplicateGroup(group.name.clone()));
            }
            seen.push(group.name.as_str());
        }
        Ok(())
    }
}

fn group(name: &str, merge_target: Option<&str>, locators: &[&str]) -> ResourceGroup {
    ResourceGroup {
        name: name.to_string(),
        locators: locators.iter().map(|s| s.to_string()).collect(),
        merge_target: merge_target.map(str::to_string),
    }
}
