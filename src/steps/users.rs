// ==================== USER STEPS ====================
// Steps over the `users` collection. Later steps here depend on earlier ones:
// push-skills needs the skills field granted first, pull-tag/add-tag-unique
// need the Jason Wood document produced by replace-user.

use crate::{
    database::MongoDb,
    models::{User, UserSummary},
    runner::StepResult,
    utils::AppError,
};
use futures::stream::StreamExt;
use mongodb::bson::raw::cstr;
use mongodb::bson::{doc, Document, Regex};
use mongodb::options::ReturnDocument;

const USERS: &str = "users";

async fn fetch_all_users(db: &MongoDb) -> Result<Vec<User>, AppError> {
    let users = db.collection::<User>(USERS);
    let mut cursor = users.find(doc! {}).await?;

    let mut all = Vec::new();
    while let Some(user) = cursor.next().await {
        all.push(user?);
    }
    Ok(all)
}

/// Fetch the full collection and one arbitrary user, in parallel. The two
/// reads are independent; this is the only concurrency in the pipeline.
pub async fn fetch_users(db: &MongoDb) -> StepResult {
    let users = db.collection::<User>(USERS);

    let (all, first) = tokio::try_join!(fetch_all_users(db), async {
        Ok::<_, AppError>(users.find_one(doc! {}).await?)
    })?;

    let first_name = first
        .map(|u| u.display_name())
        .unwrap_or_else(|| "<none>".to_string());
    Ok(format!("{} users in collection, first: {}", all.len(), first_name))
}

/// Sort ascending by age, take the first `n`, keep only name and age.
/// Done in memory, like the original exercise asked for.
pub fn top_n_by_age(mut users: Vec<User>, n: usize) -> Vec<UserSummary> {
    // Documents without an age sort last
    users.sort_by_key(|u| u.age.unwrap_or(i32::MAX));
    users
        .into_iter()
        .take(n)
        .map(|u| UserSummary {
            first_name: u.first_name,
            last_name: u.last_name,
            age: u.age,
        })
        .collect()
}

pub async fn top_five_by_age(db: &MongoDb) -> StepResult {
    let all = fetch_all_users(db).await?;
    let total = all.len();
    let top = top_n_by_age(all, 5);

    log::info!(
        "Youngest users: {}",
        serde_json::to_string(&top).unwrap_or_default()
    );
    Ok(format!("picked {} of {} users, sorted by age", top.len(), total))
}

/// Users qualifying for the skills grant: 25 <= age < 30, or tagged Engineering.
pub fn skills_grant_filter() -> Document {
    doc! {
        "$or": [
            { "$and": [ { "age": { "$gte": 25 } }, { "age": { "$lt": 30 } } ] },
            { "tags": "Engineering" }
        ]
    }
}

/// Add an empty `skills` array to every qualifying user. Non-matching
/// documents are left untouched.
pub async fn grant_skills(db: &MongoDb) -> StepResult {
    let users = db.collection::<User>(USERS);

    let result = users
        .update_many(skills_grant_filter(), doc! { "$set": { "skills": [] } })
        .await?;

    Ok(format!(
        "matched {} users, set skills on {}",
        result.matched_count, result.modified_count
    ))
}

/// Push "js" and "git" onto the first document that already has a `skills`
/// field, returning the post-update document.
/// Precondition: grant-skills has run (something has a skills field).
pub async fn push_skills(db: &MongoDb) -> StepResult {
    let users = db.collection::<User>(USERS);

    let updated = users
        .find_one_and_update(
            doc! { "skills": { "$exists": true } },
            doc! { "$push": { "skills": { "$each": ["js", "git"] } } },
        )
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::NotFound("no user with a skills field".to_string()))?;

    Ok(format!(
        "{} now has skills {:?}",
        updated.display_name(),
        updated.skills.unwrap_or_default()
    ))
}

/// Replace the first user whose email starts with "john" (case-insensitive)
/// and whose address state is CA with a fixed Jason Wood document.
pub async fn replace_user(db: &MongoDb) -> StepResult {
    let users = db.collection::<User>(USERS);

    let filter = doc! {
        "email": Regex { pattern: cstr!("^john").into(), options: cstr!("i").into() },
        "address.state": "CA",
    };
    let replacement = User {
        id: None,
        first_name: "Jason".to_string(),
        last_name: "Wood".to_string(),
        email: None,
        age: None,
        tags: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        address: None,
        department: Some("Support".to_string()),
        skills: None,
    };

    let replaced = users
        .find_one_and_replace(filter, &replacement)
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::NotFound("no john/CA user to replace".to_string()))?;

    Ok(format!(
        "replaced with {} ({})",
        replaced.display_name(),
        replaced.department.unwrap_or_default()
    ))
}

/// Pull tag "c" from the Jason Wood document created by replace-user.
pub async fn pull_tag(db: &MongoDb) -> StepResult {
    let updated = find_and_update_jason(db, doc! { "$pull": { "tags": "c" } }).await?;
    Ok(format!("tags after pull: {:?}", updated.tags))
}

/// Add tag "b" to the Jason Wood document only if it is not already there.
/// Running this twice never duplicates the tag.
pub async fn add_tag_unique(db: &MongoDb) -> StepResult {
    let updated = find_and_update_jason(db, doc! { "$addToSet": { "tags": "b" } }).await?;
    Ok(format!("tags after addToSet: {:?}", updated.tags))
}

async fn find_and_update_jason(db: &MongoDb, update: Document) -> Result<User, AppError> {
    let users = db.collection::<User>(USERS);

    users
        .find_one_and_update(doc! { "firstName": "Jason", "lastName": "Wood" }, update)
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::NotFound("Jason Wood not found".to_string()))
}

/// Delete every user in the Support department, reporting the count.
pub async fn delete_support_users(db: &MongoDb) -> StepResult {
    let users = db.collection::<User>(USERS);

    let result = users.delete_many(doc! { "department": "Support" }).await?;
    Ok(format!("deleted {} Support users", result.deleted_count))
}
