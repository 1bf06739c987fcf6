//! Account template: which characters are tracked, grouped by element, in sheet order.
//! Accepts the keyed form `{"elements": {"Fire": {"Name": {...}}}}` and the
//! array form `{"elements": {"Fire": [{"name": "Name", ...}]}}`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Language;
use crate::data::account::{AccountSheet, CharacterRecord, ElementGroup, Equipment, Priority};
use crate::data::cube::initial_cube_levels;

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCharacter {
    pub name: String,
    pub name_code: u32,
    /// First equipment character id; slots live at `id..id + span`.
    pub id: u64,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateElement {
    pub name: String,
    pub characters: Vec<TemplateCharacter>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountTemplate {
    pub elements: Vec<TemplateElement>,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse template JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid template: {0}")]
    Shape(String),
    #[error("name_code {name_code} listed twice ('{first}' and '{second}')")]
    DuplicateCharacter {
        name_code: u32,
        first: String,
        second: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawCharacter {
    #[serde(default)]
    name: Option<String>,
    name_code: u32,
    id: u64,
    #[serde(default)]
    priority: Option<String>,
}

impl RawCharacter {
    fn into_character(self, fallback_name: Option<&str>) -> TemplateCharacter {
        TemplateCharacter {
            name: fallback_name
                .map(str::to_string)
                .or(self.name)
                .unwrap_or_default(),
            name_code: self.name_code,
            id: self.id,
            priority: self
                .priority
                .as_deref()
                .map(Priority::parse)
                .unwrap_or_default(),
        }
    }
}

pub fn load_template(path: impl AsRef<Path>) -> Result<AccountTemplate, TemplateError> {
    let raw = fs::read_to_string(path)?;
    parse_template(&raw)
}

pub fn parse_template(raw: &str) -> Result<AccountTemplate, TemplateError> {
    let root: Value = serde_json::from_str(raw)?;
    let Some(elements) = root.get("elements").and_then(Value::as_object) else {
        return Err(TemplateError::Shape("missing 'elements' object".to_string()));
    };

    let mut template = AccountTemplate::default();
    for (element_name, body) in elements {
        let characters = match body {
            Value::Object(by_name) => by_name
                .iter()
                .map(|(name, details)| {
                    let raw: RawCharacter = serde_json::from_value(details.clone())?;
                    Ok(raw.into_character(Some(name)))
                })
                .collect::<Result<Vec<_>, TemplateError>>()?,
            Value::Array(items) => items
                .iter()
                .map(|details| {
                    let raw: RawCharacter = serde_json::from_value(details.clone())?;
                    Ok(raw.into_character(None))
                })
                .collect::<Result<Vec<_>, TemplateError>>()?,
            _ => {
                return Err(TemplateError::Shape(format!(
                    "element '{element_name}' must be an object or array"
                )))
            }
        };
        template.elements.push(TemplateElement {
            name: element_name.clone(),
            characters,
        });
    }

    template.check_unique()?;
    Ok(template)
}

impl AccountTemplate {
    pub fn character_count(&self) -> usize {
        self.elements.iter().map(|e| e.characters.len()).sum()
    }

    fn check_unique(&self) -> Result<(), TemplateError> {
        let mut seen: HashMap<u32, &str> = HashMap::new();
        for character in self.elements.iter().flat_map(|e| &e.characters) {
            if let Some(first) = seen.insert(character.name_code, &character.name) {
                return Err(TemplateError::DuplicateCharacter {
                    name_code: character.name_code,
                    first: first.to_string(),
                    second: character.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Blank account sheet with every tracked character and cube, nothing fetched yet.
    pub fn to_account_sheet(&self, name: &str, language: Language) -> AccountSheet {
        AccountSheet {
            name: name.to_string(),
            synchro_level: 0,
            language,
            elements: self
                .elements
                .iter()
                .map(|element| ElementGroup {
                    name: element.name.clone(),
                    characters: element
                        .characters
                        .iter()
                        .map(|c| CharacterRecord {
                            name: c.name.clone(),
                            name_code: c.name_code,
                            id: c.id,
                            priority: c.priority,
                            progress: None,
                            equipment: Equipment::default(),
                            ael_score: None,
                        })
                        .collect(),
                })
                .collect(),
            cubes: initial_cube_levels(),
        }
    }
}
