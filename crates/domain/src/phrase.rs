use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    pub phrase: String,
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phrases: Vec<Phrase>,
}

/// All the languages that can be learned together with their phrases
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhraseCatalog {
    pub languages: Vec<Language>,
}

impl PhraseCatalog {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn language(&self, language_id: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.id == language_id)
    }

    /// Phrases of the given language, or of the first language when none is selected
    /// or the selected one is unknown
    pub fn phrases_for(&self, language_id: Option<&str>) -> &[Phrase] {
        language_id
            .and_then(|id| self.language(id))
            .or_else(|| self.languages.first())
            .map(|l| l.phrases.as_slice())
            .unwrap_or(&[])
    }
}
