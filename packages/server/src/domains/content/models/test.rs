use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{TestId, TestQuestionId};
use crate::domains::content::questions::QuestionDraft;

/// Test model - a scored assessment with a passing threshold
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Test {
    pub id: TestId,
    pub title: String,
    pub description: String,
    pub time_limit: String,
    /// Percentage (0-100) needed to pass
    pub passing_score: i32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TestSummary {
    #[sqlx(flatten)]
    pub test: Test,
    pub question_count: i64,
    pub total_points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TestQuestion {
    pub id: TestQuestionId,
    pub test_id: TestId,
    pub position: i32,
    pub question: String,
    pub option_1: String,
    pub option_2: String,
    pub option_3: String,
    pub option_4: String,
    pub correct_answer: i16,
    pub points: i32,
}

impl TestQuestion {
    pub fn options(&self) -> Vec<(i16, &str)> {
        [&self.option_1, &self.option_2, &self.option_3, &self.option_4]
            .into_iter()
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(i, text)| (i as i16 + 1, text.as_str()))
            .collect()
    }
}

/// Sum of question points
pub fn total_points(questions: &[TestQuestion]) -> i64 {
    questions.iter().map(|q| i64::from(q.points)).sum()
}

/// Points needed to pass, rounded up
pub fn points_to_pass(total: i64, passing_score: i32) -> i64 {
    (total * i64::from(passing_score) + 99) / 100
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTest {
    pub title: String,
    pub description: String,
    pub time_limit: String,
    pub passing_score: i32,
    pub questions: Vec<QuestionDraft>,
}

impl Test {
    pub async fn find_by_id(id: TestId, pool: &PgPool) -> Result<Option<Self>> {
        let test = sqlx::query_as::<_, Self>("SELECT * FROM tests WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(test)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<TestSummary>> {
        let tests = sqlx::query_as::<_, TestSummary>(
            r#"
            SELECT t.*,
                   COUNT(tq.id) AS question_count,
                   COALESCE(SUM(tq.points), 0)::BIGINT AS total_points
            FROM tests t
            LEFT JOIN test_questions tq ON tq.test_id = t.id
            GROUP BY t.id
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(tests)
    }

    pub async fn questions(id: TestId, pool: &PgPool) -> Result<Vec<TestQuestion>> {
        let questions = sqlx::query_as::<_, TestQuestion>(
            "SELECT * FROM test_questions WHERE test_id = $1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        Ok(questions)
    }

    /// Insert the test and its questions atomically
    pub async fn create(input: CreateTest, created_by: &str, pool: &PgPool) -> Result<Self> {
        let mut tx = pool.begin().await?;

        let test = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO tests (id, title, description, time_limit, passing_score, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(TestId::new())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.time_limit)
        .bind(input.passing_score)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        for (position, draft) in input.questions.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO test_questions (
                    id, test_id, position, question,
                    option_1, option_2, option_3, option_4, correct_answer, points
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(TestQuestionId::new())
            .bind(test.id)
            .bind(position as i32 + 1)
            .bind(&draft.question)
            .bind(&draft.options[0])
            .bind(&draft.options[1])
            .bind(&draft.options[2])
            .bind(&draft.options[3])
            .bind(draft.correct_answer)
            .bind(draft.points)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(test)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tests")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(points: i32) -> TestQuestion {
        TestQuestion {
            id: TestQuestionId::new(),
            test_id: TestId::new(),
            position: 1,
            question: "Q".to_string(),
            option_1: "A".to_string(),
            option_2: "B".to_string(),
            option_3: String::new(),
            option_4: "D".to_string(),
            correct_answer: 1,
            points,
        }
    }

    #[test]
    fn total_points_sums_questions() {
        assert_eq!(total_points(&[question(1), question(3), question(5)]), 9);
        assert_eq!(total_points(&[]), 0);
    }

    #[test]
    fn points_to_pass_rounds_up() {
        assert_eq!(points_to_pass(10, 70), 7);
        assert_eq!(points_to_pass(9, 70), 7);
        assert_eq!(points_to_pass(0, 70), 0);
        assert_eq!(points_to_pass(3, 100), 3);
    }

    #[test]
    fn options_skip_blank_slots_and_keep_numbers() {
        let q = question(1);
        assert_eq!(q.options(), vec![(1, "A"), (2, "B"), (4, "D")]);
    }
}
