use crate::error::DataError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};

/// One dataset record as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub title: Title,
    #[serde(default)]
    pub parent: Option<ParentRef>,
    #[serde(default)]
    pub children_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: String,
}

impl Entity {
    pub fn new(id: &str, label: &str, parent: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            title: Title {
                translation: label.to_string(),
            },
            parent: parent.map(|id| ParentRef { id: id.to_string() }),
            children_count: None,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_ref().map(|p| p.id.as_str())
    }
}

/// Asynchronous source of the entity list.
#[async_trait]
pub trait DataProvider {
    async fn fetch(&self) -> Result<Vec<Entity>, DataError>;
}

#[derive(Deserialize)]
struct Envelope {
    data: EnvelopeData,
}

#[derive(Deserialize)]
struct EnvelopeData {
    assemblies: Vec<Entity>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Envelope(Envelope),
    List(Vec<Entity>),
}

/// Parses either `{"data": {"assemblies": [...]}}` or a bare entity array.
pub fn parse_assemblies(input: &str) -> Result<Vec<Entity>, DataError> {
    let payload: Payload = serde_json::from_str(input)?;
    Ok(match payload {
        Payload::Envelope(envelope) => envelope.data.assemblies,
        Payload::List(list) => list,
    })
}

/// Reads the dataset from a JSON file, or from stdin when the path is `-`.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataProvider for JsonFileProvider {
    async fn fetch(&self) -> Result<Vec<Entity>, DataError> {
        let contents = if self.path == Path::new("-") {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(&self.path)?
        };
        parse_assemblies(&contents)
    }
}

/// Serves a fixed entity list.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    entities: Vec<Entity>,
}

impl StaticProvider {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }
}

#[async_trait]
impl DataProvider for StaticProvider {
    async fn fetch(&self) -> Result<Vec<Entity>, DataError> {
        Ok(self.entities.clone())
    }
}
