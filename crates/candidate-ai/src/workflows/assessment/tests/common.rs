use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::oracle::{OracleClient, OracleError, OracleRequest};
use crate::workflows::assessment::bank::QuestionBank;
use crate::workflows::assessment::domain::{
    AssessmentId, AssessmentItem, ItemKind, Submission, ViolationLog,
};
use crate::workflows::assessment::repository::{
    AssessmentRecord, AssessmentRepository, RepositoryError,
};
use crate::workflows::assessment::service::AssessmentService;
use crate::workflows::assessment::GradingConfig;
use crate::workflows::screening::domain::{CandidateProfile, Opportunity, OpportunityId};

/// Oracle double replaying a scripted queue of replies and recording
/// every prompt it saw.
pub(super) struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String, OracleError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    pub(super) fn new(replies: Vec<Result<String, OracleError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub(super) fn silent() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

impl OracleClient for ScriptedOracle {
    async fn complete(&self, request: OracleRequest) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(request.user);
        self.replies
            .lock()
            .expect("reply mutex poisoned")
            .pop_front()
            .unwrap_or(Err(OracleError::EmptyResponse))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.assessment_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.assessment_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.assessment_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn pending(&self, _limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: AssessmentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn pending(&self, _limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn opportunity() -> Opportunity {
    Opportunity {
        id: OpportunityId("opp-backend-1".to_string()),
        title: "Backend Engineer".to_string(),
        description: "Design APIs and keep our SQL storage honest.".to_string(),
        required_skills: vec!["rust".to_string(), "sql".to_string()],
        duration_minutes: Some(40),
        posted_on: None,
    }
}

pub(super) fn profile() -> CandidateProfile {
    CandidateProfile {
        candidate_id: "cand-42".to_string(),
        claimed_skills: vec!["rust".to_string(), "sql".to_string()],
        summary: "Backend engineer, eight years in payments.".to_string(),
    }
}

pub(super) fn mc_item(id: &str, options: [&str; 4], correct: &str) -> AssessmentItem {
    AssessmentItem {
        id: id.to_string(),
        kind: ItemKind::MultipleChoice,
        prompt: format!("Question {id}"),
        options: options.iter().map(|option| option.to_string()).collect(),
        correct_option: Some(correct.to_string()),
        skill: "backend".to_string(),
        reference_context: String::new(),
    }
}

pub(super) fn free_text_item(id: &str, skill: &str) -> AssessmentItem {
    AssessmentItem {
        id: id.to_string(),
        kind: ItemKind::FreeText,
        prompt: format!("Discuss {id}"),
        options: Vec::new(),
        correct_option: None,
        skill: skill.to_string(),
        reference_context: "model answer notes".to_string(),
    }
}

pub(super) fn code_item(id: &str, skill: &str) -> AssessmentItem {
    AssessmentItem {
        id: id.to_string(),
        kind: ItemKind::CodeChallenge,
        prompt: format!("Implement {id}"),
        options: Vec::new(),
        correct_option: None,
        skill: skill.to_string(),
        reference_context: "expected approach notes".to_string(),
    }
}

/// Two multiple-choice items, one free-text, one code challenge.
pub(super) fn fixture_items() -> Vec<AssessmentItem> {
    vec![
        mc_item("mc-1", ["A", "B", "C", "D"], "B"),
        mc_item("mc-2", ["1", "2", "3", "4"], "3"),
        free_text_item("ft-1", "communication"),
        code_item("code-1", "backend"),
    ]
}

pub(super) fn submission(answers: &[(usize, &str)]) -> Submission {
    Submission {
        answers: answers
            .iter()
            .map(|(index, answer)| (*index, answer.to_string()))
            .collect::<BTreeMap<_, _>>(),
        violations: ViolationLog {
            focus_loss_count: 0,
            paste_attempt_count: 0,
            elapsed_seconds: 310,
        },
    }
}

/// A grading reply covering the given item ids with a fixed score.
pub(super) fn grading_reply(item_ids: &[&str], score: u32, credibility: u8) -> String {
    let items: Vec<serde_json::Value> = item_ids
        .iter()
        .map(|id| {
            json!({
                "item_id": id,
                "score": score,
                "feedback": format!("feedback for {id}"),
                "plagiarism_suspected": false
            })
        })
        .collect();

    json!({
        "items": items,
        "credibility_score": credibility,
        "cheating_analysis": "no anomalies observed"
    })
    .to_string()
}

pub(super) fn integrity_reply(integrity_score: u8) -> String {
    json!({
        "integrity_score": integrity_score,
        "flags": [],
        "bot_probability": 8,
        "skill_validation": [
            {"skill": "rust", "claimed": true, "observed_performance": "consistent", "status": "verified"}
        ]
    })
    .to_string()
}

pub(super) fn build_service(
    oracle: Arc<ScriptedOracle>,
) -> (
    AssessmentService<MemoryRepository, ScriptedOracle>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(
        repository.clone(),
        oracle,
        QuestionBank::standard(),
        GradingConfig::default(),
    );
    (service, repository)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
