pub mod articles;
pub mod students;
pub mod users;

use crate::database::MongoDb;
use crate::runner::{Runner, Step, StepResult};
use futures::future::BoxFuture;
use futures::FutureExt;

fn step<F, Fut>(name: &'static str, run: F) -> Step<MongoDb>
where
    F: Fn(MongoDb) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = StepResult> + Send + 'static,
{
    Step::new(name, move |db| -> BoxFuture<'static, StepResult> {
        run(db).boxed()
    })
}

/// The full catalog, in the order the original exercise ran its tasks.
/// The ordering matters: push-skills assumes grant-skills ran, pull-tag and
/// add-tag-unique assume replace-user created Jason Wood, delete-support-users
/// removes him again, and find-tagged-articles reads what seed-articles-bulk
/// wrote.
pub fn catalog() -> Runner<MongoDb> {
    Runner::new(vec![
        step("fetch-users", |db| async move { users::fetch_users(&db).await }),
        step("top-five-by-age", |db| async move { users::top_five_by_age(&db).await }),
        step("grant-skills", |db| async move { users::grant_skills(&db).await }),
        step("push-skills", |db| async move { users::push_skills(&db).await }),
        step("replace-user", |db| async move { users::replace_user(&db).await }),
        step("pull-tag", |db| async move { users::pull_tag(&db).await }),
        step("add-tag-unique", |db| async move { users::add_tag_unique(&db).await }),
        step("delete-support-users", |db| async move {
            users::delete_support_users(&db).await
        }),
        step("seed-articles-bulk", |db| async move {
            articles::seed_articles_bulk(&db).await
        }),
        step("find-tagged-articles", |db| async move {
            articles::find_tagged_articles(&db).await
        }),
        step("worst-homework", |db| async move { students::worst_homework(&db).await }),
        step("homework-average", |db| async move {
            students::homework_average(&db).await
        }),
        step("student-averages", |db| async move {
            students::student_averages(&db).await
        }),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_the_exercise() {
        let runner = catalog();
        assert_eq!(
            runner.step_names(),
            [
                "fetch-users",
                "top-five-by-age",
                "grant-skills",
                "push-skills",
                "replace-user",
                "pull-tag",
                "add-tag-unique",
                "delete-support-users",
                "seed-articles-bulk",
                "find-tagged-articles",
                "worst-homework",
                "homework-average",
                "student-averages",
            ]
        );
    }
}
