use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{QuizId, QuizQuestionId};
use crate::domains::content::questions::QuestionDraft;

/// Quiz model - an ungraded multiple-choice practice set
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub time_limit: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// A quiz row with the number of questions attached (list pages)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuizSummary {
    #[sqlx(flatten)]
    pub quiz: Quiz,
    pub question_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuizQuestion {
    pub id: QuizQuestionId,
    pub quiz_id: QuizId,
    pub position: i32,
    pub question: String,
    pub option_1: String,
    pub option_2: String,
    pub option_3: String,
    pub option_4: String,
    /// 1-4, the option holding the right answer
    pub correct_answer: i16,
}

impl QuizQuestion {
    /// Non-blank options with their 1-based numbers
    pub fn options(&self) -> Vec<(i16, &str)> {
        [&self.option_1, &self.option_2, &self.option_3, &self.option_4]
            .into_iter()
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(i, text)| (i as i16 + 1, text.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateQuiz {
    pub title: String,
    pub description: String,
    pub time_limit: String,
    pub questions: Vec<QuestionDraft>,
}

impl Quiz {
    pub async fn find_by_id(id: QuizId, pool: &PgPool) -> Result<Option<Self>> {
        let quiz = sqlx::query_as::<_, Self>("SELECT * FROM quizzes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(quiz)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<QuizSummary>> {
        let quizzes = sqlx::query_as::<_, QuizSummary>(
            r#"
            SELECT q.*,
                   (SELECT COUNT(*) FROM quiz_questions qq WHERE qq.quiz_id = q.id) AS question_count
            FROM quizzes q
            ORDER BY q.created_at DESC, q.id DESC
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(quizzes)
    }

    pub async fn questions(id: QuizId, pool: &PgPool) -> Result<Vec<QuizQuestion>> {
        let questions = sqlx::query_as::<_, QuizQuestion>(
            "SELECT * FROM quiz_questions WHERE quiz_id = $1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        Ok(questions)
    }

    /// Insert the quiz and its questions atomically
    pub async fn create(input: CreateQuiz, created_by: &str, pool: &PgPool) -> Result<Self> {
        let mut tx = pool.begin().await?;

        let quiz = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO quizzes (id, title, description, time_limit, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(QuizId::new())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.time_limit)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        for (position, draft) in input.questions.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO quiz_questions (
                    id, quiz_id, position, question,
                    option_1, option_2, option_3, option_4, correct_answer
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(QuizQuestionId::new())
            .bind(quiz.id)
            .bind(position as i32 + 1)
            .bind(&draft.question)
            .bind(&draft.options[0])
            .bind(&draft.options[1])
            .bind(&draft.options[2])
            .bind(&draft.options[3])
            .bind(draft.correct_answer)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(quiz)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quizzes")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
