//! Question bank backed by the remote REST API.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::instrument;

use examsim_core::model::{Question, SessionConfig};
use examsim_core::traits::QuestionBank;

use crate::error::BankError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches questions over HTTP.
///
/// `GET {base}/questions?limit=N` when the session has no subject
/// allocation, otherwise one `GET {base}/subjects/{subject}/questions?limit=N`
/// per allocation, issued concurrently.
pub struct HttpBank {
    base_url: Url,
    api_key: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpBank {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout_secs: Option<u64>,
    ) -> anyhow::Result<Self> {
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid question bank URL '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("question bank URL '{base_url}' cannot carry a path");
        }

        Ok(Self {
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
            timeout_secs,
            client,
        })
    }

    /// `base_url` with `segments` appended as percent-encoded path segments
    /// plus the `limit` query.
    fn endpoint(&self, segments: &[&str], limit: u32) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        url
    }

    async fn get_questions(
        &self,
        url: Url,
        limit: u32,
        what: &str,
    ) -> Result<Vec<Question>, BankError> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                BankError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                BankError::Network(format!(
                    "question bank not reachable at {}",
                    self.base_url
                ))
            } else {
                BankError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        match status {
            401 | 403 => {
                let body = response.text().await.unwrap_or_default();
                return Err(BankError::Unauthorized(body));
            }
            404 => return Err(BankError::NotFound(what.to_string())),
            s if s >= 400 => {
                let body = response.text().await.unwrap_or_default();
                return Err(BankError::Api {
                    status,
                    message: body,
                });
            }
            _ => {}
        }

        let body: QuestionsResponse = response.json().await.map_err(|e| BankError::Api {
            status: 0,
            message: format!("failed to parse questions response: {e}"),
        })?;

        let mut questions = body.questions;
        if questions.len() > limit as usize {
            tracing::warn!(
                source = what,
                returned = questions.len(),
                limit,
                "bank ignored limit, truncating"
            );
            questions.truncate(limit as usize);
        }
        for question in &questions {
            question.validate()?;
        }
        Ok(questions)
    }
}

#[derive(Deserialize)]
struct QuestionsResponse {
    questions: Vec<Question>,
}

#[async_trait]
impl QuestionBank for HttpBank {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, config), fields(total = config.total_questions))]
    async fn fetch_questions(&self, config: &SessionConfig) -> anyhow::Result<Vec<Question>> {
        if config.subjects.is_empty() {
            let url = self.endpoint(&["questions"], config.total_questions);
            return Ok(self
                .get_questions(url, config.total_questions, "questions")
                .await?);
        }

        let requests = config
            .subjects
            .iter()
            .filter(|a| a.count > 0)
            .map(|a| {
                let url = self.endpoint(&["subjects", a.subject.as_str(), "questions"], a.count);
                self.get_questions(url, a.count, &a.subject)
            });

        let batches = futures::future::try_join_all(requests).await?;
        let mut questions: Vec<Question> = batches.into_iter().flatten().collect();
        questions.truncate(config.total_questions as usize);
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn question_json(id: &str, subject: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "subject": subject,
            "difficulty": "easy",
            "prompt": format!("{id}?"),
            "options": [
                {"id": "a", "text": "yes", "correct": true},
                {"id": "b", "text": "no"}
            ],
            "explanation": "because",
            "source": {"board": "FGV", "year": 2022}
        })
    }

    #[tokio::test]
    async fn fetches_without_allocation() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/questions"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "questions": [question_json("q1", "civil"), question_json("q2", "penal")]
            })))
            .mount(&server)
            .await;

        let bank = HttpBank::new(&server.uri(), None, None).unwrap();
        let questions = bank
            .fetch_questions(&SessionConfig::new(2, 10))
            .await
            .unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].subject, "penal");
        assert_eq!(questions[0].source.as_ref().unwrap().board, "FGV");
    }

    #[tokio::test]
    async fn fetches_per_subject_in_allocation_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subjects/penal/questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "questions": [question_json("p1", "penal")]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/subjects/civil/questions"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "questions": [question_json("c1", "civil"), question_json("c2", "civil")]
            })))
            .mount(&server)
            .await;

        let bank = HttpBank::new(&server.uri(), None, None).unwrap();
        let config = SessionConfig::new(3, 10)
            .with_subject("penal", 1)
            .with_subject("civil", 2);
        let questions = bank.fetch_questions(&config).await.unwrap();
        let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "c1", "c2"]);
    }

    #[tokio::test]
    async fn subject_is_a_single_encoded_path_segment() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "questions": [question_json("x1", "civil?x/y")]
            })))
            .mount(&server)
            .await;

        let bank = HttpBank::new(&format!("{}/api/", server.uri()), None, None).unwrap();
        let config = SessionConfig::new(1, 10).with_subject("civil?x/y", 1);
        let questions = bank.fetch_questions(&config).await.unwrap();
        assert_eq!(questions.len(), 1);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/api/subjects/civil%3Fx%2Fy/questions");
        assert_eq!(requests[0].url.query(), Some("limit=1"));
    }

    #[test]
    fn rejects_malformed_base_url() {
        assert!(HttpBank::new("not a url", None, None).is_err());
        assert!(HttpBank::new("mailto:bank@example.com", None, None).is_err());
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/questions"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "questions": []
            })))
            .mount(&server)
            .await;

        let bank = HttpBank::new(&server.uri(), Some("secret".into()), None).unwrap();
        let questions = bank
            .fetch_questions(&SessionConfig::new(5, 10))
            .await
            .unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let bank = HttpBank::new(&server.uri(), Some("wrong".into()), None).unwrap();
        let err = bank
            .fetch_questions(&SessionConfig::new(1, 1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("authentication failed"));
    }

    #[tokio::test]
    async fn unknown_subject() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let bank = HttpBank::new(&server.uri(), None, None).unwrap();
        let config = SessionConfig::new(1, 1).with_subject("maritime", 1);
        let err = bank.fetch_questions(&config).await.unwrap_err();
        assert!(err.to_string().contains("not found: maritime"));
    }

    #[tokio::test]
    async fn rejects_question_with_two_correct_options() {
        let server = MockServer::start().await;

        let mut bad = question_json("q1", "civil");
        bad["options"][1]["correct"] = serde_json::json!(true);

        Mock::given(method("GET"))
            .and(path("/questions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "questions": [bad] })),
            )
            .mount(&server)
            .await;

        let bank = HttpBank::new(&server.uri(), None, None).unwrap();
        let err = bank
            .fetch_questions(&SessionConfig::new(1, 1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid question"));
    }

    #[tokio::test]
    async fn server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let bank = HttpBank::new(&server.uri(), None, None).unwrap();
        let err = bank
            .fetch_questions(&SessionConfig::new(1, 1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP 503"));
    }
}
