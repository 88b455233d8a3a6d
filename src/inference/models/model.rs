use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelBase {
    /// The name of the model
    pub name: String,

    /// The license of the model
    pub license: String,

    /// The domain that the model is designed for including the tasks it can perform
    pub domain: ModelDomain,

    /// The id of the model repository
    pub repo_id: String,

    /// The revision of the model repository
    pub repo_revision: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
pub enum ModelDomain {
    Text(Vec<TextTask>),
    Image(Vec<ImageTask>),
    Audio(Vec<AudioTask>),
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
pub enum TextTask {
    Generate,
    Translate,
    Summarize,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
pub enum ImageTask {
    Generate,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
pub enum AudioTask {
    Generate,
}
