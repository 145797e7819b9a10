// ==================== ARTICLE STEPS ====================
// The articles collection is created here: one ordered bulk write inserts and
// mutates the documents the tag search then reads.

use crate::{database::MongoDb, models::Article, runner::StepResult};
use futures::stream::StreamExt;
use mongodb::bson::doc;
use mongodb::options::{InsertOneModel, UpdateManyModel, UpdateOneModel, WriteModel};

const ARTICLES: &str = "articles";

/// One ordered batch: insert an article per type (a, b, c), tag the type-a
/// article, add shared tags to everything else, then pull "tag2"/"tag1-a"
/// from the whole collection.
pub async fn seed_articles_bulk(db: &MongoDb) -> StepResult {
    let articles = db.collection::<Article>(ARTICLES);
    let ns = articles.namespace();

    let mut models: Vec<WriteModel> = Vec::new();
    for kind in ["a", "b", "c"] {
        models.push(WriteModel::InsertOne(
            InsertOneModel::builder()
                .namespace(ns.clone())
                .document(doc! { "type": kind })
                .build(),
        ));
    }
    models.push(WriteModel::UpdateOne(
        UpdateOneModel::builder()
            .namespace(ns.clone())
            .filter(doc! { "type": "a" })
            .update(doc! { "$set": { "tags": ["tag1-a", "tag2-a", "tag3"] } })
            .build(),
    ));
    models.push(WriteModel::UpdateMany(
        UpdateManyModel::builder()
            .namespace(ns.clone())
            .filter(doc! { "type": { "$ne": "a" } })
            .update(doc! { "$addToSet": { "tags": { "$each": ["tag2", "tag3", "super"] } } })
            .build(),
    ));
    models.push(WriteModel::UpdateMany(
        UpdateManyModel::builder()
            .namespace(ns)
            .filter(doc! {})
            .update(doc! { "$pull": { "tags": { "$in": ["tag2", "tag1-a"] } } })
            .build(),
    ));

    // Ordered: the updates must see the inserted documents
    let result = db.client().bulk_write(models).ordered(true).await?;

    Ok(format!(
        "inserted {}, matched {}, modified {}",
        result.inserted_count, result.matched_count, result.modified_count
    ))
}

/// All articles tagged "super" or "tag2-a".
/// Precondition: seed-articles-bulk has populated the collection.
pub async fn find_tagged_articles(db: &MongoDb) -> StepResult {
    let articles = db.collection::<Article>(ARTICLES);

    let mut cursor = articles
        .find(doc! { "$or": [ { "tags": "super" }, { "tags": "tag2-a" } ] })
        .await?;

    let mut found = Vec::new();
    while let Some(article) = cursor.next().await {
        found.push(article?);
    }

    let kinds: Vec<&str> = found.iter().map(|a| a.kind.as_str()).collect();
    Ok(format!("{} articles match (types {:?})", found.len(), kinds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB 8.0+ to be running (client-level bulk write)
    async fn test_bulk_write_leaves_expected_tags() {
        dotenv::dotenv().ok();
        let db = MongoDb::connect().await.expect("MongoDB must be running");
        let articles = db.collection::<Article>(ARTICLES);
        articles.delete_many(doc! {}).await.unwrap();

        seed_articles_bulk(&db).await.unwrap();

        let mut cursor = articles.find(doc! {}).await.unwrap();
        let mut by_kind = std::collections::HashMap::new();
        while let Some(article) = cursor.next().await {
            let article = article.unwrap();
            by_kind.insert(article.kind.clone(), article.tags);
        }

        assert_eq!(by_kind.len(), 3);
        // tag1-a and tag2 were pulled at the end of the batch
        assert_eq!(by_kind["a"], ["tag2-a", "tag3"]);
        assert_eq!(by_kind["b"], ["tag3", "super"]);
        assert_eq!(by_kind["c"], ["tag3", "super"]);

        // every article ends up carrying "super" or "tag2-a"
        let summary = find_tagged_articles(&db).await.unwrap();
        assert!(summary.starts_with("3 articles match"));
    }
}
