//! Test utilities with lazy testcontainers support
//!
//! Form fixtures, a seeded in-memory store, a PostgreSQL store per test and
//! the behavior both stores must share.

#[cfg(test)]
pub mod fixtures {
    use crate::{
        db::MemoryDatabase,
        models::ProblemForm,
        services::ProblemService,
    };

    /// Categories every test store starts with, after `uncategorized`
    pub const CATEGORIES: &[(&str, &str)] = &[("math", "Math"), ("graph", "Graph Theory")];

    /// A form that passes every check, with two test cases and no categories or tags
    pub fn valid_form() -> ProblemForm {
        ProblemForm {
            problem_name: "A+B Problem".to_string(),
            time_limit: 1000,
            memory_limit: 65536,
            description: "Add two integers.".to_string(),
            hint: "Mind the overflow.".to_string(),
            input_format: "Two integers a and b.".to_string(),
            output_format: "Their sum.".to_string(),
            sample_input: "1 2".to_string(),
            sample_output: "3".to_string(),
            test_cases: r#"[{"input": "1 2", "output": "3"}, {"input": "2 3", "output": "5"}]"#
                .to_string(),
            problem_categories: "[]".to_string(),
            problem_tags: "[]".to_string(),
            is_public: true,
            is_exactly_match: true,
        }
    }

    /// JSON array of `count` distinct test cases
    pub fn test_cases(count: usize) -> String {
        let cases: Vec<_> = (0..count)
            .map(|i| serde_json::json!({ "input": i.to_string(), "output": (i * 2).to_string() }))
            .collect();
        serde_json::Value::Array(cases).to_string()
    }

    /// Problem service over a fresh seeded store, plus a handle on the store
    pub fn service() -> (ProblemService<MemoryDatabase>, MemoryDatabase) {
        let db = MemoryDatabase::with_categories(CATEGORIES);
        (ProblemService::new(db.clone()), db)
    }
}

#[cfg(test)]
pub mod containers {
    use std::sync::atomic::{AtomicU32, Ordering};

    use sqlx::{Connection, PgConnection, PgPool, postgres::PgPoolOptions};
    use testcontainers::{ContainerAsync, runners::AsyncRunner};
    use testcontainers_modules::postgres::Postgres;
    use tokio::sync::OnceCell;

    use super::fixtures::CATEGORIES;
    use crate::{
        db::{PgDatabase, run_migrations},
        services::ProblemService,
    };

    /// PostgreSQL container shared by every test, with its server URL
    static POSTGRES: OnceCell<(ContainerAsync<Postgres>, String)> = OnceCell::const_new();

    /// Monotonic counter for unique database names
    static DB_COUNTER: AtomicU32 = AtomicU32::new(0);

    /// Server URL without a database path
    ///
    /// `TEST_POSTGRES_URL` points the tests at an existing server instead of
    /// starting a container.
    async fn server_url() -> String {
        if let Ok(url) = std::env::var("TEST_POSTGRES_URL") {
            return url.trim_end_matches('/').to_string();
        }

        let (_, url) = POSTGRES
            .get_or_init(|| async {
                let container = Postgres::default()
                    .start()
                    .await
                    .expect("Failed to start PostgreSQL container");
                let host = container.get_host().await.unwrap();
                let port = container.get_host_port_ipv4(5432).await.unwrap();
                let url = format!("postgres://postgres:postgres@{}:{}", host, port);
                (container, url)
            })
            .await;
        url.clone()
    }

    /// Create an empty, migrated and seeded database
    pub async fn postgres_pool() -> PgPool {
        let server = server_url().await;
        let db_name = format!(
            "problemset_test_{}_{}",
            std::process::id(),
            DB_COUNTER.fetch_add(1, Ordering::Relaxed)
        );

        let mut admin = PgConnection::connect(&format!("{}/postgres", server))
            .await
            .expect("Failed to connect to admin database");
        sqlx::raw_sql(&format!("CREATE DATABASE \"{}\"", db_name))
            .execute(&mut admin)
            .await
            .expect("Failed to create test database");
        admin.close().await.ok();

        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(&format!("{}/{}", server, db_name))
            .await
            .expect("Failed to connect to test database");
        run_migrations(&pool).await.expect("Failed to run migrations");

        for &(slug, name) in CATEGORIES {
            sqlx::query(
                r#"
                INSERT INTO problem_categories (problem_category_slug, problem_category_name)
                VALUES ($1, $2)
                "#,
            )
            .bind(slug)
            .bind(name)
            .execute(&pool)
            .await
            .expect("Failed to seed categories");
        }

        pool
    }

    /// Problem service over a fresh PostgreSQL database
    pub async fn pg_service() -> ProblemService<PgDatabase> {
        ProblemService::new(PgDatabase::new(postgres_pool().await))
    }
}

/// Behavior every [`crate::db::Database`] must show through the service
///
/// Each check expects a fresh store seeded with [`fixtures::CATEGORIES`].
#[cfg(test)]
pub mod properties {
    use tokio_test::assert_err;

    use super::fixtures::{test_cases, valid_form};
    use crate::{
        db::Database,
        error::AppError,
        models::{Problem, ProblemCategory, ProblemForm},
        services::ProblemService,
    };

    fn slugs_of(categories: &[ProblemCategory]) -> Vec<&str> {
        categories
            .iter()
            .map(|c| c.problem_category_slug.as_str())
            .collect()
    }

    fn names_of(problems: Vec<Problem>) -> Vec<String> {
        problems.into_iter().map(|p| p.problem_name).collect()
    }

    async fn create<D: Database>(problems: &ProblemService<D>, form: &ProblemForm) -> i64 {
        let outcome = problems.create_problem(form).await.unwrap();
        assert!(outcome.successful, "rejected: {:?}", outcome.checks);
        outcome.problem_id.unwrap()
    }

    pub async fn create_persists_every_field<D: Database>(problems: &ProblemService<D>) {
        let form = ProblemForm {
            hint: "Überlauf beachten".to_string(),
            is_public: false,
            ..valid_form()
        };
        let problem_id = create(problems, &form).await;

        let problem = problems.get_problem(problem_id).await.unwrap().unwrap();
        assert_eq!(problem, form.to_new_problem().with_id(problem_id));
    }

    pub async fn checkpoint_scores_total_one_hundred<D: Database>(problems: &ProblemService<D>) {
        for (count, expected) in [
            (1, vec![100]),
            (2, vec![50, 50]),
            (3, vec![33, 33, 34]),
            (7, vec![14, 14, 14, 14, 14, 14, 16]),
        ] {
            let form = ProblemForm {
                test_cases: test_cases(count),
                ..valid_form()
            };
            let problem_id = create(problems, &form).await;

            let checkpoints = problems
                .get_checkpoints_using_problem_id(problem_id)
                .await
                .unwrap();
            let scores: Vec<i32> = checkpoints.iter().map(|c| c.score).collect();
            let ids: Vec<i32> = checkpoints.iter().map(|c| c.checkpoint_id).collect();
            assert_eq!(scores, expected);
            assert_eq!(ids, (0..count as i32).collect::<Vec<_>>());
            assert!(checkpoints.iter().all(|c| c.is_exactly_match));
        }
    }

    pub async fn empty_categories_fall_back_to_uncategorized<D: Database>(
        problems: &ProblemService<D>,
    ) {
        let problem_id = create(problems, &valid_form()).await;

        let categories = problems
            .get_problem_categories_using_problem_id(problem_id)
            .await
            .unwrap();
        assert_eq!(slugs_of(&categories), vec!["uncategorized"]);
    }

    pub async fn categories_and_tags_round_trip<D: Database>(problems: &ProblemService<D>) {
        let form = ProblemForm {
            problem_categories: r#"["math", "graph"]"#.to_string(),
            problem_tags: r#"["Dynamic Programming", "Greedy"]"#.to_string(),
            ..valid_form()
        };
        let problem_id = create(problems, &form).await;

        let categories = problems
            .get_problem_categories_using_problem_id(problem_id)
            .await
            .unwrap();
        assert_eq!(slugs_of(&categories), vec!["math", "graph"]);

        let tags = problems
            .get_problem_tags_using_problem_id(problem_id)
            .await
            .unwrap();
        let tags: Vec<_> = tags
            .iter()
            .map(|t| (t.problem_tag_slug.as_str(), t.problem_tag_name.as_str()))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("dynamic-programming", "Dynamic Programming"),
                ("greedy", "Greedy")
            ]
        );
    }

    pub async fn tag_names_sharing_a_slug_link_once<D: Database>(problems: &ProblemService<D>) {
        let form = ProblemForm {
            problem_tags: r#"["Hello World", "Hello-World"]"#.to_string(),
            ..valid_form()
        };
        let problem_id = create(problems, &form).await;

        let tags = problems
            .get_problem_tags_using_problem_id(problem_id)
            .await
            .unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].problem_tag_slug, "hello-world");
        assert_eq!(tags[0].problem_tag_name, "Hello World");
    }

    pub async fn existing_tags_are_reused<D: Database>(problems: &ProblemService<D>) {
        let first = ProblemForm {
            problem_tags: r#"["Greedy"]"#.to_string(),
            ..valid_form()
        };
        let second = ProblemForm {
            problem_tags: r#"["GREEDY"]"#.to_string(),
            ..valid_form()
        };

        let a = create(problems, &first).await;
        let b = create(problems, &second).await;

        let tags_a = problems.get_problem_tags_using_problem_id(a).await.unwrap();
        let tags_b = problems.get_problem_tags_using_problem_id(b).await.unwrap();
        assert_eq!(tags_a, tags_b);
        assert_eq!(tags_b[0].problem_tag_name, "Greedy");
    }

    pub async fn long_tag_names_are_stored<D: Database>(problems: &ProblemService<D>) {
        let name = "Segment Tree ".repeat(20);
        let form = ProblemForm {
            problem_tags: serde_json::json!([name]).to_string(),
            ..valid_form()
        };
        let problem_id = create(problems, &form).await;

        let tags = problems
            .get_problem_tags_using_problem_id(problem_id)
            .await
            .unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].problem_tag_name, name);
        assert!(tags[0].problem_tag_slug.len() > 200);
    }

    pub async fn unknown_category_links_nothing_visible<D: Database>(
        problems: &ProblemService<D>,
    ) {
        let form = ProblemForm {
            problem_categories: r#"["no-such-category"]"#.to_string(),
            ..valid_form()
        };
        let problem_id = create(problems, &form).await;

        let categories = problems
            .get_problem_categories_using_problem_id(problem_id)
            .await
            .unwrap();
        assert!(categories.is_empty());
    }

    pub async fn malformed_payload_rolls_back_create<D: Database>(problems: &ProblemService<D>) {
        let form = ProblemForm {
            problem_tags: "not json".to_string(),
            ..valid_form()
        };

        let err = assert_err!(problems.create_problem(&form).await);
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(problems.get_number_of_problems().await.unwrap(), 0);
        assert_eq!(problems.get_number_of_checkpoints().await.unwrap(), 0);
    }

    pub async fn edit_missing_problem<D: Database>(problems: &ProblemService<D>) {
        let outcome = problems.edit_problem(424_242, &valid_form()).await.unwrap();
        assert!(!outcome.successful);
        assert_eq!(outcome.problem_exists, Some(false));
        assert!(outcome.checks.passed());
        assert_eq!(problems.get_number_of_problems().await.unwrap(), 0);
    }

    pub async fn edit_replaces_everything<D: Database>(problems: &ProblemService<D>) {
        let created = ProblemForm {
            problem_categories: r#"["math"]"#.to_string(),
            problem_tags: r#"["Greedy"]"#.to_string(),
            ..valid_form()
        };
        let problem_id = create(problems, &created).await;

        let edited = ProblemForm {
            problem_name: "A+B Problem II".to_string(),
            is_public: false,
            is_exactly_match: false,
            test_cases: test_cases(3),
            problem_categories: r#"["graph"]"#.to_string(),
            problem_tags: r#"["Shortest Path"]"#.to_string(),
            ..valid_form()
        };
        let outcome = problems.edit_problem(problem_id, &edited).await.unwrap();
        assert!(outcome.successful);
        assert_eq!(outcome.problem_exists, Some(true));
        assert!(outcome.problem_id.is_none());

        let problem = problems.get_problem(problem_id).await.unwrap().unwrap();
        assert_eq!(problem, edited.to_new_problem().with_id(problem_id));

        let checkpoints = problems
            .get_checkpoints_using_problem_id(problem_id)
            .await
            .unwrap();
        assert_eq!(checkpoints.len(), 3);
        assert!(checkpoints.iter().all(|c| !c.is_exactly_match));
        assert_eq!(problems.get_number_of_checkpoints().await.unwrap(), 3);

        let categories = problems
            .get_problem_categories_using_problem_id(problem_id)
            .await
            .unwrap();
        assert_eq!(slugs_of(&categories), vec!["graph"]);

        let tags = problems
            .get_problem_tags_using_problem_id(problem_id)
            .await
            .unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].problem_tag_slug, "shortest-path");
    }

    pub async fn malformed_payload_rolls_back_edit<D: Database>(problems: &ProblemService<D>) {
        let problem_id = create(problems, &valid_form()).await;

        let edited = ProblemForm {
            problem_name: "Renamed".to_string(),
            problem_categories: "{".to_string(),
            ..valid_form()
        };
        let err = assert_err!(problems.edit_problem(problem_id, &edited).await);
        assert!(matches!(err, AppError::InvalidInput(_)));

        let problem = problems.get_problem(problem_id).await.unwrap().unwrap();
        assert_eq!(problem.problem_name, "A+B Problem");
    }

    pub async fn delete_problem_cascades<D: Database>(problems: &ProblemService<D>) {
        let form = ProblemForm {
            problem_categories: r#"["math"]"#.to_string(),
            problem_tags: r#"["Greedy"]"#.to_string(),
            ..valid_form()
        };
        let problem_id = create(problems, &form).await;

        problems.delete_problem(problem_id).await.unwrap();

        assert!(problems.get_problem(problem_id).await.unwrap().is_none());
        assert_eq!(problems.get_number_of_checkpoints().await.unwrap(), 0);
        assert!(problems
            .get_problem_categories_using_problem_id(problem_id)
            .await
            .unwrap()
            .is_empty());
        assert!(problems
            .get_problem_tags_using_problem_id(problem_id)
            .await
            .unwrap()
            .is_empty());
    }

    pub async fn listing_filters_and_bounds<D: Database>(problems: &ProblemService<D>) {
        let mut ids = Vec::new();
        for (name, is_public, categories) in [
            ("Sum of Digits", true, r#"["math"]"#),
            ("Digit DP", false, r#"["math"]"#),
            ("Graph Walk", true, r#"["graph"]"#),
            ("Prime Sieve", true, r#"["math"]"#),
        ] {
            let form = ProblemForm {
                problem_name: name.to_string(),
                is_public,
                problem_categories: categories.to_string(),
                ..valid_form()
            };
            ids.push(create(problems, &form).await);
        }

        assert_eq!(problems.get_first_index_of_problems().await.unwrap(), ids[0]);
        assert_eq!(problems.get_number_of_problems().await.unwrap(), 4);
        assert_eq!(
            problems.get_last_index_of_problems(true, ids[0], 2).await.unwrap(),
            ids[2]
        );

        let found = problems
            .get_problems_using_filters(ids[0], None, Some("math"), true, 10)
            .await
            .unwrap();
        assert_eq!(names_of(found), vec!["Sum of Digits", "Prime Sieve"]);

        let found = problems
            .get_problems_using_filters(ids[0], Some("digit"), None, false, 10)
            .await
            .unwrap();
        assert_eq!(names_of(found), vec!["Sum of Digits", "Digit DP"]);

        let found = problems
            .get_problems_using_filters(ids[1], Some(""), None, false, 2)
            .await
            .unwrap();
        assert_eq!(names_of(found), vec!["Digit DP", "Graph Walk"]);

        // An unknown slug disables the category filter
        let found = problems
            .get_problems_using_filters(ids[0], None, Some("no-such-category"), true, 10)
            .await
            .unwrap();
        assert_eq!(found.len(), 3);

        assert_eq!(
            problems
                .get_number_of_problems_using_filters(None, Some("math"), false)
                .await
                .unwrap(),
            3
        );
        assert_eq!(
            problems
                .get_number_of_problems_using_filters(Some("graph"), Some("no-such-category"), false)
                .await
                .unwrap(),
            1
        );
    }

    pub async fn keyword_is_matched_literally<D: Database>(problems: &ProblemService<D>) {
        let mut first = None;
        for name in ["100% Correct", "Sum of Digits", "a_b"] {
            let form = ProblemForm {
                problem_name: name.to_string(),
                ..valid_form()
            };
            let problem_id = create(problems, &form).await;
            first.get_or_insert(problem_id);
        }
        let first = first.unwrap();

        let found = problems
            .get_problems_using_filters(first, Some("%"), None, false, 10)
            .await
            .unwrap();
        assert_eq!(names_of(found), vec!["100% Correct"]);

        let found = problems
            .get_problems_using_filters(first, Some("_"), None, false, 10)
            .await
            .unwrap();
        assert_eq!(names_of(found), vec!["a_b"]);

        for (keyword, expected) in [("%", 1), ("_", 1), ("\\", 0), ("100%", 1), ("DIGITS", 1)] {
            assert_eq!(
                problems
                    .get_number_of_problems_using_filters(Some(keyword), None, false)
                    .await
                    .unwrap(),
                expected,
                "keyword {:?}",
                keyword
            );
        }
    }

    pub async fn negative_limit_lists_nothing<D: Database>(problems: &ProblemService<D>) {
        let first = create(problems, &valid_form()).await;
        create(problems, &valid_form()).await;

        let found = problems
            .get_problems_using_filters(first, None, None, false, -1)
            .await
            .unwrap();
        assert!(found.is_empty());
        assert_eq!(
            problems.get_last_index_of_problems(false, first, -5).await.unwrap(),
            0
        );
    }

    pub async fn list_categories<D: Database>(problems: &ProblemService<D>) {
        let categories = problems.get_problem_categories().await.unwrap();
        assert_eq!(slugs_of(&categories), vec!["uncategorized", "math", "graph"]);
    }
}
