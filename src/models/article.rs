use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Article document. Created by the bulk-write step with only a `type`;
/// `tags` appears once the update models in the same batch have run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// One of "a", "b", "c"
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}
