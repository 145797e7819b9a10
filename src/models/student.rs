use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Student document (stored in the `students` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub name: String,

    #[serde(default)]
    pub scores: Vec<Score>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    #[serde(rename = "type")]
    pub kind: ScoreType,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreType {
    Homework,
    Exam,
    Quiz,
}

// ==================== AGGREGATION OUTPUTS ====================

/// Output of the worst-homework aggregation:
/// `[ { name: <name>, worst_homework_score: <score> } ]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorstHomework {
    pub name: String,
    pub worst_homework_score: f64,
}

/// Output of the homework-average aggregation: `[ { avg_score: <number> } ]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeworkAverage {
    pub avg_score: f64,
}

/// Per-type average inside [`StudentAverages`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeAverage {
    #[serde(rename = "type")]
    pub kind: ScoreType,
    pub avg_score: f64,
}

/// Output row of the per-student averages aggregation, sorted descending by
/// `total_avg_score` (the mean of the per-type means, not of raw scores).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAverages {
    pub name: String,
    pub scores: Vec<TypeAverage>,
    pub total_avg_score: f64,
}
