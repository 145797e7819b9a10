// ==================== STUDENT STATISTICS (AGGREGATIONS) ====================

use crate::{
    database::MongoDb,
    models::{HomeworkAverage, Student, StudentAverages, WorstHomework},
    runner::StepResult,
    utils::AppError,
};
use futures::stream::StreamExt;
use mongodb::bson::{deserialize_from_document, doc, Document};
use serde::de::DeserializeOwned;

const STUDENTS: &str = "students";

async fn run_pipeline<T: DeserializeOwned>(
    db: &MongoDb,
    pipeline: Vec<Document>,
) -> Result<Vec<T>, AppError> {
    let students = db.collection::<Student>(STUDENTS);
    let mut cursor = students.aggregate(pipeline).await?;

    let mut rows = Vec::new();
    while let Some(document) = cursor.next().await {
        rows.push(deserialize_from_document(document?)?);
    }
    Ok(rows)
}

/// The single student with the lowest homework score:
/// `[ { name, worst_homework_score } ]`.
pub async fn worst_homework_rows(db: &MongoDb) -> Result<Vec<WorstHomework>, AppError> {
    let pipeline = vec![
        doc! { "$unwind": "$scores" },
        doc! { "$match": { "scores.type": "homework" } },
        doc! { "$group": {
            "_id": "$name",
            "worst_homework_score": { "$min": "$scores.score" }
        } },
        doc! { "$sort": { "worst_homework_score": 1 } },
        doc! { "$limit": 1 },
        doc! { "$project": {
            "_id": 0,
            "name": "$_id",
            "worst_homework_score": 1
        } },
    ];
    run_pipeline(db, pipeline).await
}

pub async fn worst_homework(db: &MongoDb) -> StepResult {
    let rows = worst_homework_rows(db).await?;
    let worst = rows
        .first()
        .ok_or_else(|| AppError::NotFound("no homework scores in collection".to_string()))?;

    Ok(format!(
        "{} has the worst homework score: {}",
        worst.name, worst.worst_homework_score
    ))
}

/// Average homework score over all students: `[ { avg_score } ]`.
pub async fn homework_average_rows(db: &MongoDb) -> Result<Vec<HomeworkAverage>, AppError> {
    let pipeline = vec![
        doc! { "$unwind": "$scores" },
        doc! { "$match": { "scores.type": "homework" } },
        doc! { "$group": {
            "_id": null,
            "avg_score": { "$avg": "$scores.score" }
        } },
        doc! { "$project": { "_id": 0, "avg_score": 1 } },
    ];
    run_pipeline(db, pipeline).await
}

pub async fn homework_average(db: &MongoDb) -> StepResult {
    let rows = homework_average_rows(db).await?;
    let avg = rows
        .first()
        .ok_or_else(|| AppError::NotFound("no homework scores in collection".to_string()))?;

    Ok(format!("average homework score: {:.2}", avg.avg_score))
}

/// Per-student average per score type, then the mean of those per-type
/// averages, sorted from largest to smallest. Note the overall value is a
/// mean of means, not a mean over raw scores.
pub async fn student_averages_rows(db: &MongoDb) -> Result<Vec<StudentAverages>, AppError> {
    let pipeline = vec![
        doc! { "$unwind": "$scores" },
        doc! { "$group": {
            "_id": { "name": "$name", "type": "$scores.type" },
            "avg_score": { "$avg": "$scores.score" }
        } },
        doc! { "$group": {
            "_id": "$_id.name",
            "scores": { "$push": { "type": "$_id.type", "avg_score": "$avg_score" } }
        } },
        doc! { "$project": {
            "_id": 0,
            "name": "$_id",
            "scores": 1,
            "total_avg_score": { "$avg": "$scores.avg_score" }
        } },
        doc! { "$sort": { "total_avg_score": -1 } },
    ];
    run_pipeline(db, pipeline).await
}

pub async fn student_averages(db: &MongoDb) -> StepResult {
    let rows = student_averages_rows(db).await?;

    for row in &rows {
        log::info!(
            "   {} — overall {:.2} across {} score types",
            row.name,
            row.total_avg_score,
            row.scores.len()
        );
    }

    let leader = rows
        .first()
        .map(|r| format!("{} ({:.2})", r.name, r.total_avg_score))
        .unwrap_or_else(|| "<none>".to_string());
    Ok(format!("ranked {} students, best overall: {}", rows.len(), leader))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Score, ScoreType};

    async fn connect() -> MongoDb {
        dotenv::dotenv().ok();
        MongoDb::connect().await.expect("MongoDB must be running")
    }

    fn student(name: &str, scores: Vec<(ScoreType, f64)>) -> Student {
        Student {
            id: None,
            name: name.to_string(),
            scores: scores
                .into_iter()
                .map(|(kind, score)| Score { kind, score })
                .collect(),
        }
    }

    async fn reset_students(db: &MongoDb, students: Vec<Student>) {
        let collection = db.collection::<Student>(STUDENTS);
        collection.delete_many(doc! {}).await.unwrap();
        collection.insert_many(&students).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_worst_homework_picks_the_single_lowest() {
        let db = connect().await;
        reset_students(
            &db,
            vec![
                student("High", vec![(ScoreType::Homework, 90.0), (ScoreType::Homework, 80.0)]),
                student("Low", vec![(ScoreType::Homework, 12.5), (ScoreType::Exam, 99.0)]),
            ],
        )
        .await;

        let rows = worst_homework_rows(&db).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Low");
        assert_eq!(rows[0].worst_homework_score, 12.5);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_homework_average_ignores_other_score_types() {
        let db = connect().await;
        reset_students(
            &db,
            vec![
                student("A", vec![(ScoreType::Homework, 40.0), (ScoreType::Exam, 0.0)]),
                student("B", vec![(ScoreType::Homework, 60.0), (ScoreType::Quiz, 0.0)]),
            ],
        )
        .await;

        let rows = homework_average_rows(&db).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].avg_score, 50.0);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_overall_average_is_mean_of_per_type_means() {
        let db = connect().await;
        // Unequal type sizes: raw mean would be (100+100+40)/3 = 80,
        // mean of means is (100 + 40) / 2 = 70.
        reset_students(
            &db,
            vec![
                student(
                    "Skewed",
                    vec![
                        (ScoreType::Homework, 100.0),
                        (ScoreType::Homework, 100.0),
                        (ScoreType::Exam, 40.0),
                    ],
                ),
                student("Plain", vec![(ScoreType::Homework, 10.0)]),
            ],
        )
        .await;

        let rows = student_averages_rows(&db).await.unwrap();

        assert_eq!(rows.len(), 2);
        // Sorted descending by overall average
        assert_eq!(rows[0].name, "Skewed");
        assert_eq!(rows[0].total_avg_score, 70.0);
        assert_eq!(rows[1].name, "Plain");
        assert_eq!(rows[1].total_avg_score, 10.0);
    }
}
