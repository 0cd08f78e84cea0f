//! Wire types for Doc2X JSON responses.
//!
//! Every endpoint wraps its payload in a top-level `data` object. Only the
//! fields the adapter reads are modelled; serde ignores the rest.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct TokenData {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitData {
    pub remain: serde_json::Number,
}

#[derive(Debug, Deserialize)]
pub struct UploadData {
    pub uuid: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusData {
    pub status: String,
    #[serde(default)]
    pub result: Option<JobResult>,
}

#[derive(Debug, Deserialize)]
pub struct JobResult {
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub md: String,
}

/// The job states the adapter distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Ready,
    Processing,
    PagesLimitExceeded,
    Success,
    Other(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "ready" => JobStatus::Ready,
            "processing" => JobStatus::Processing,
            "pages limit exceeded" => JobStatus::PagesLimitExceeded,
            "success" => JobStatus::Success,
            other => JobStatus::Other(other.to_string()),
        }
    }

    /// `ready` and `processing` mean "poll again later".
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Ready | JobStatus::Processing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::PagesLimitExceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_statuses() {
        assert_eq!(JobStatus::parse("ready"), JobStatus::Ready);
        assert_eq!(JobStatus::parse("processing"), JobStatus::Processing);
        assert_eq!(
            JobStatus::parse("pages limit exceeded"),
            JobStatus::PagesLimitExceeded
        );
        assert_eq!(JobStatus::parse("success"), JobStatus::Success);
        assert_eq!(
            JobStatus::parse("failed"),
            JobStatus::Other("failed".into())
        );
        assert!(JobStatus::Processing.is_pending());
        assert!(!JobStatus::Other("x".into()).is_pending());
        assert!(JobStatus::PagesLimitExceeded.is_terminal());
        assert!(!JobStatus::Ready.is_terminal());
    }

    #[test]
    fn status_success_payload() {
        let body = r#"{
            "code": "success",
            "data": {
                "status": "success",
                "progress": 100,
                "result": { "version": "v2", "pages": [ { "md": "A", "page_idx": 0 }, { "md": "B" } ] }
            }
        }"#;
        let env: Envelope<StatusData> = serde_json::from_str(body).unwrap();
        let pages = env.data.result.unwrap().pages;
        let md: Vec<_> = pages.iter().map(|p| p.md.as_str()).collect();
        assert_eq!(md, ["A", "B"]);
    }

    #[test]
    fn status_pending_has_no_result() {
        let env: Envelope<StatusData> =
            serde_json::from_str(r#"{"data":{"status":"processing","progress":40}}"#).unwrap();
        assert_eq!(env.data.status, "processing");
        assert!(env.data.result.is_none());
    }

    #[test]
    fn remain_accepts_integers_and_floats() {
        let env: Envelope<LimitData> = serde_json::from_str(r#"{"data":{"remain":1200}}"#).unwrap();
        assert_eq!(env.data.remain.to_string(), "1200");
        let env: Envelope<LimitData> = serde_json::from_str(r#"{"data":{"remain":3.5}}"#).unwrap();
        assert_eq!(env.data.remain.to_string(), "3.5");
    }
}
