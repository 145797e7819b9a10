use crate::database::MongoDb;
use crate::models::{Address, Score, ScoreType, Student, User};
use mongodb::bson::doc;

/// Seed the fixture users and students the pipeline expects, and clear out
/// any articles from a previous run. Only touches `users`/`students` when
/// they are empty.
pub async fn seed_all(db: &MongoDb) {
    seed_users(db).await;
    seed_students(db).await;
    reset_articles(db).await;
}

async fn seed_users(db: &MongoDb) {
    let collection = db.collection::<User>("users");

    let count = collection.count_documents(doc! {}).await.unwrap_or(0);
    if count > 0 {
        log::info!("👥 Users: {} documents already in DB — skipping seed", count);
        return;
    }

    let users = fixture_users();
    match collection.insert_many(&users).await {
        Ok(result) => {
            log::info!("   ✅ Inserted {} fixture users", result.inserted_ids.len());
        }
        Err(e) => {
            log::error!("   ❌ Failed to seed users: {}", e);
        }
    }
}

async fn seed_students(db: &MongoDb) {
    let collection = db.collection::<Student>("students");

    let count = collection.count_documents(doc! {}).await.unwrap_or(0);
    if count > 0 {
        log::info!("🎓 Students: {} documents already in DB — skipping seed", count);
        return;
    }

    let students = fixture_students();
    match collection.insert_many(&students).await {
        Ok(result) => {
            log::info!("   ✅ Inserted {} fixture students", result.inserted_ids.len());
        }
        Err(e) => {
            log::error!("   ❌ Failed to seed students: {}", e);
        }
    }
}

/// The bulk-write step recreates articles from scratch; drop leftovers so a
/// rerun does not accumulate duplicates.
async fn reset_articles(db: &MongoDb) {
    let collection = db.collection::<mongodb::bson::Document>("articles");
    match collection.delete_many(doc! {}).await {
        Ok(result) if result.deleted_count > 0 => {
            log::info!("📰 Articles: cleared {} documents from previous run", result.deleted_count);
        }
        Ok(_) => {}
        Err(e) => log::error!("   ❌ Failed to clear articles: {}", e),
    }
}

/// Fixture users. John Doe is the replace-user target (email prefix "john",
/// state CA); Emma carries the Engineering tag for the skills grant.
fn fixture_users() -> Vec<User> {
    vec![
        user("John", "Doe", "john.doe@example.com", 28, &[], Some("CA"), "Sales"),
        user(
            "Emma",
            "Stone",
            "emma.stone@example.com",
            26,
            &["Engineering"],
            Some("NY"),
            "Engineering",
        ),
        user("Liam", "Brown", "liam.brown@example.com", 24, &[], Some("TX"), "Marketing"),
        user(
            "Olivia",
            "Smith",
            "olivia.smith@example.com",
            31,
            &["Management"],
            None,
            "Sales",
        ),
        user("Noah", "Davis", "noah.davis@example.com", 29, &[], Some("WA"), "Engineering"),
    ]
}

fn user(
    first: &str,
    last: &str,
    email: &str,
    age: i32,
    tags: &[&str],
    state: Option<&str>,
    department: &str,
) -> User {
    User {
        id: None,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: Some(email.to_string()),
        age: Some(age),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        address: state.map(|s| Address {
            state: s.to_string(),
            city: None,
        }),
        department: Some(department.to_string()),
        skills: None,
    }
}

fn fixture_students() -> Vec<Student> {
    vec![
        student("Ava Wilson", &[(ScoreType::Homework, 54.0), (ScoreType::Exam, 88.5), (ScoreType::Quiz, 72.0)]),
        student("Ethan Clark", &[(ScoreType::Homework, 91.0), (ScoreType::Exam, 67.5), (ScoreType::Quiz, 80.0)]),
        student("Mia Turner", &[(ScoreType::Homework, 33.5), (ScoreType::Exam, 95.0), (ScoreType::Quiz, 64.5)]),
        student("Lucas Hall", &[(ScoreType::Homework, 78.0), (ScoreType::Exam, 70.0), (ScoreType::Quiz, 85.5)]),
    ]
}

fn student(name: &str, scores: &[(ScoreType, f64)]) -> Student {
    Student {
        id: None,
        name: name.to_string(),
        scores: scores
            .iter()
            .map(|&(kind, score)| Score { kind, score })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_cover_the_pipeline_preconditions() {
        let users = fixture_users();

        // replace-user needs an email starting with "john" in CA
        assert!(users.iter().any(|u| {
            u.email.as_deref().is_some_and(|e| e.starts_with("john"))
                && u.address.as_ref().is_some_and(|a| a.state == "CA")
        }));
        // grant-skills needs at least one Engineering-tagged user
        assert!(users.iter().any(|u| u.tags.iter().any(|t| t == "Engineering")));
    }

    #[test]
    fn test_every_student_has_homework_scores() {
        for s in fixture_students() {
            assert!(s.scores.iter().any(|sc| sc.kind == ScoreType::Homework));
        }
    }
}
