//! Static question bank indexed by category.
//!
//! The bank is a collaborator boundary: the selector consumes any bank
//! shaped like this, and `standard()` provides the built-in item set used
//! by the demo and the default service wiring.

use std::collections::BTreeMap;

use super::domain::{AssessmentItem, ItemKind};

pub const DEFAULT_CATEGORY: &str = "general";
pub const BASELINE_CATEGORY: &str = "problem-solving";

#[derive(Debug)]
pub struct QuestionBank {
    items_by_category: BTreeMap<String, Vec<AssessmentItem>>,
}

impl QuestionBank {
    pub fn new(items_by_category: BTreeMap<String, Vec<AssessmentItem>>) -> Self {
        Self { items_by_category }
    }

    pub fn standard() -> Self {
        let mut items_by_category = BTreeMap::new();
        items_by_category.insert(DEFAULT_CATEGORY.to_string(), general_items());
        items_by_category.insert(BASELINE_CATEGORY.to_string(), problem_solving_items());
        items_by_category.insert("frontend".to_string(), frontend_items());
        items_by_category.insert("backend".to_string(), backend_items());
        items_by_category.insert("data".to_string(), data_items());
        Self { items_by_category }
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.items_by_category.keys().map(String::as_str)
    }

    pub fn items_for(&self, category: &str) -> &[AssessmentItem] {
        self.items_by_category
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pool the items of every listed category, in listing order.
    pub fn pooled(&self, categories: &[&str]) -> Vec<AssessmentItem> {
        categories
            .iter()
            .flat_map(|category| self.items_for(category).iter().cloned())
            .collect()
    }
}

fn mc(id: &str, skill: &str, prompt: &str, options: [&str; 4], correct: &str) -> AssessmentItem {
    AssessmentItem {
        id: id.to_string(),
        kind: ItemKind::MultipleChoice,
        prompt: prompt.to_string(),
        options: options.iter().map(|option| option.to_string()).collect(),
        correct_option: Some(correct.to_string()),
        skill: skill.to_string(),
        reference_context: String::new(),
    }
}

fn free_text(id: &str, skill: &str, prompt: &str, context: &str) -> AssessmentItem {
    AssessmentItem {
        id: id.to_string(),
        kind: ItemKind::FreeText,
        prompt: prompt.to_string(),
        options: Vec::new(),
        correct_option: None,
        skill: skill.to_string(),
        reference_context: context.to_string(),
    }
}

fn code(id: &str, skill: &str, prompt: &str, context: &str) -> AssessmentItem {
    AssessmentItem {
        id: id.to_string(),
        kind: ItemKind::CodeChallenge,
        prompt: prompt.to_string(),
        options: Vec::new(),
        correct_option: None,
        skill: skill.to_string(),
        reference_context: context.to_string(),
    }
}

fn general_items() -> Vec<AssessmentItem> {
    vec![
        mc(
            "gen-mc-01",
            "general",
            "Which HTTP status code indicates that a resource was not found?",
            ["301", "404", "500", "201"],
            "404",
        ),
        mc(
            "gen-mc-02",
            "general",
            "What does the acronym API stand for?",
            [
                "Application Programming Interface",
                "Automated Process Integration",
                "Applied Protocol Implementation",
                "Application Process Invocation",
            ],
            "Application Programming Interface",
        ),
        mc(
            "gen-mc-03",
            "general",
            "Which data structure gives O(1) average-time lookups by key?",
            ["Linked list", "Hash map", "Binary heap", "Sorted array"],
            "Hash map",
        ),
        mc(
            "gen-mc-04",
            "general",
            "In version control, what does a merge conflict indicate?",
            [
                "The repository is corrupted",
                "Two branches changed the same lines differently",
                "A commit was signed with an unknown key",
                "The remote is ahead of the local branch",
            ],
            "Two branches changed the same lines differently",
        ),
        mc(
            "gen-mc-05",
            "general",
            "Which of these is a symmetric encryption algorithm?",
            ["RSA", "AES", "ECDSA", "Diffie-Hellman"],
            "AES",
        ),
        mc(
            "gen-mc-06",
            "general",
            "What is the primary purpose of an index in a relational database?",
            [
                "Enforce foreign keys",
                "Speed up row lookups",
                "Compress table storage",
                "Validate column types",
            ],
            "Speed up row lookups",
        ),
        free_text(
            "gen-ft-01",
            "general",
            "Describe a production incident you handled end to end: detection, mitigation, and the follow-up that prevented recurrence.",
            "Strong answers name a concrete detection signal, a containment step, and a durable fix such as an alert, test, or rollout change.",
        ),
        free_text(
            "gen-ft-02",
            "general",
            "Explain the difference between optimistic and pessimistic locking, and give one situation where each is the better choice.",
            "Optimistic locking validates at commit time and suits low-contention workloads; pessimistic locking holds locks up front and suits hot rows.",
        ),
        code(
            "gen-code-01",
            "general",
            "Write a function that takes a list of integers and returns the two distinct indices whose values sum to a given target, or signals that no pair exists. State the complexity of your approach.",
            "A single-pass hash map solution in O(n) time and O(n) space is the expected answer; a nested-loop O(n^2) answer earns partial marks.",
        ),
    ]
}

fn problem_solving_items() -> Vec<AssessmentItem> {
    vec![
        mc(
            "ps-mc-01",
            "problem-solving",
            "A service's p99 latency doubled after a deploy while p50 stayed flat. Which explanation fits best?",
            [
                "Every request became uniformly slower",
                "A subset of requests now hits a slow path",
                "The load balancer dropped half the fleet",
                "Clocks drifted on the metrics host",
            ],
            "A subset of requests now hits a slow path",
        ),
        mc(
            "ps-mc-02",
            "problem-solving",
            "You can reproduce a bug only under load. What is the most effective next step?",
            [
                "Add sleeps until it disappears",
                "Capture a trace or profile while reproducing it",
                "Rewrite the suspicious module",
                "Increase instance sizes",
            ],
            "Capture a trace or profile while reproducing it",
        ),
        mc(
            "ps-mc-03",
            "problem-solving",
            "Which estimate is closest to the number of seconds in a day?",
            ["8,640", "86,400", "864,000", "14,400"],
            "86,400",
        ),
        mc(
            "ps-mc-04",
            "problem-solving",
            "A cache in front of a database has a 95% hit rate. Requests cost 1 ms on hit and 100 ms on miss. What is the approximate average cost?",
            ["1 ms", "6 ms", "51 ms", "95 ms"],
            "6 ms",
        ),
        mc(
            "ps-mc-05",
            "problem-solving",
            "Two teams report the same API returning different results. What should you check first?",
            [
                "Whether they call the same environment and version",
                "Whether the API language is memory safe",
                "Whether DNS uses IPv6",
                "Whether the teams share a time zone",
            ],
            "Whether they call the same environment and version",
        ),
        free_text(
            "ps-ft-01",
            "problem-solving",
            "You inherit a flaky test suite where 2% of runs fail on unrelated tests. Walk through how you would stabilize it.",
            "Good answers quarantine flaky tests, rank them by failure rate, fix shared-state and timing issues, and gate new flakiness in CI.",
        ),
        free_text(
            "ps-ft-02",
            "problem-solving",
            "A batch job that must finish nightly now takes 26 hours. Describe how you would diagnose and shorten it.",
            "Expect profiling to find the dominant stage, then parallelism, incremental processing, or I/O batching; naming a measurable target is a plus.",
        ),
        code(
            "ps-code-01",
            "problem-solving",
            "Given a log file where each line starts with an ISO-8601 timestamp, write a function that finds the longest gap between consecutive lines. Explain how you would handle out-of-order lines.",
            "Expected: parse timestamps, track the max delta in one pass, and either sort first or tolerate bounded reordering with a small buffer.",
        ),
    ]
}

fn frontend_items() -> Vec<AssessmentItem> {
    vec![
        mc(
            "fe-mc-01",
            "frontend",
            "Which browser API lets you observe when an element enters the viewport?",
            [
                "MutationObserver",
                "IntersectionObserver",
                "ResizeObserver",
                "PerformanceObserver",
            ],
            "IntersectionObserver",
        ),
        mc(
            "fe-mc-02",
            "frontend",
            "In CSS, which property creates a new stacking context?",
            ["color", "z-index on a positioned element", "font-weight", "text-align"],
            "z-index on a positioned element",
        ),
        mc(
            "fe-mc-03",
            "frontend",
            "What problem do keys solve when rendering lists in component frameworks?",
            [
                "They encrypt list items",
                "They let the renderer match items across updates",
                "They enforce unique CSS classes",
                "They prevent XSS in list content",
            ],
            "They let the renderer match items across updates",
        ),
        mc(
            "fe-mc-04",
            "frontend",
            "Which technique most directly reduces a page's time-to-interactive?",
            [
                "Inlining all images as base64",
                "Code-splitting and deferring non-critical scripts",
                "Switching to a larger font",
                "Adding more analytics tags",
            ],
            "Code-splitting and deferring non-critical scripts",
        ),
        mc(
            "fe-mc-05",
            "frontend",
            "What does the `defer` attribute on a script tag do?",
            [
                "Downloads and runs the script before parsing continues",
                "Downloads in parallel and runs after the document is parsed",
                "Runs the script in a web worker",
                "Disables the script on slow connections",
            ],
            "Downloads in parallel and runs after the document is parsed",
        ),
        free_text(
            "fe-ft-01",
            "frontend",
            "Explain how you would make a data-heavy dashboard accessible, covering keyboard navigation and screen reader support.",
            "Expect semantic markup or ARIA roles, focus management, visible focus indicators, and text alternatives for charts.",
        ),
        code(
            "fe-code-01",
            "frontend",
            "Implement a debounce utility: a function that delays invoking its callback until N milliseconds have passed since the last call. Show how you would use it for a search-as-you-type input.",
            "Expected: timer reset per call, cancellation of the pending timer, and passing through the latest arguments; bonus for a leading-edge option.",
        ),
    ]
}

fn backend_items() -> Vec<AssessmentItem> {
    vec![
        mc(
            "be-mc-01",
            "backend",
            "Which isolation level prevents dirty reads but still allows non-repeatable reads?",
            [
                "Read uncommitted",
                "Read committed",
                "Repeatable read",
                "Serializable",
            ],
            "Read committed",
        ),
        mc(
            "be-mc-02",
            "backend",
            "What is the main benefit of idempotent request handlers?",
            [
                "Lower memory usage",
                "Safe client retries without duplicated effects",
                "Faster JSON serialization",
                "Smaller response payloads",
            ],
            "Safe client retries without duplicated effects",
        ),
        mc(
            "be-mc-03",
            "backend",
            "A message queue consumer crashes mid-message. With at-least-once delivery, what must the consumer guarantee?",
            [
                "Messages are processed in priority order",
                "Processing is idempotent or deduplicated",
                "The broker is restarted",
                "Messages are smaller than 1 MB",
            ],
            "Processing is idempotent or deduplicated",
        ),
        mc(
            "be-mc-04",
            "backend",
            "Which strategy best limits the blast radius of a failing downstream dependency?",
            [
                "Infinite retries with no backoff",
                "A circuit breaker with a fallback",
                "Doubling the connection pool",
                "Catching and ignoring all errors",
            ],
            "A circuit breaker with a fallback",
        ),
        mc(
            "be-mc-05",
            "backend",
            "In a REST API, which status code is most appropriate for a well-formed request that fails business validation?",
            ["400", "404", "422", "500"],
            "422",
        ),
        free_text(
            "be-ft-01",
            "backend",
            "Design a rate limiter for a public API. Compare token bucket and sliding window approaches and pick one for bursty traffic.",
            "Expect the trade-off between burst tolerance (token bucket) and smoothness (sliding window), plus storage placement for a distributed fleet.",
        ),
        code(
            "be-code-01",
            "backend",
            "Write a function that merges overlapping time intervals, e.g. [(1,4),(2,6),(8,9)] becomes [(1,6),(8,9)]. State its complexity.",
            "Expected: sort by start then sweep, O(n log n); careful handling of touching intervals is a plus.",
        ),
    ]
}

fn data_items() -> Vec<AssessmentItem> {
    vec![
        mc(
            "da-mc-01",
            "data",
            "Which SQL clause removes duplicate rows from a result set?",
            ["GROUP BY", "DISTINCT", "HAVING", "UNIQUE"],
            "DISTINCT",
        ),
        mc(
            "da-mc-02",
            "data",
            "A LEFT JOIN from orders to customers returns NULL customer columns. What does that mean?",
            [
                "The join key types mismatch",
                "Those orders have no matching customer row",
                "The customers table is empty",
                "NULLs are a syntax error",
            ],
            "Those orders have no matching customer row",
        ),
        mc(
            "da-mc-03",
            "data",
            "Which metric is most robust to outliers when summarizing latency?",
            ["Mean", "Median", "Maximum", "Sum"],
            "Median",
        ),
        mc(
            "da-mc-04",
            "data",
            "What is the purpose of a training/validation/test split?",
            [
                "Tripling the dataset size",
                "Measuring generalization instead of memorization",
                "Speeding up gradient descent",
                "Balancing class labels",
            ],
            "Measuring generalization instead of memorization",
        ),
        mc(
            "da-mc-05",
            "data",
            "Which storage layout favors analytical scans over point lookups?",
            ["Row-oriented", "Column-oriented", "Key-value", "Document"],
            "Column-oriented",
        ),
        free_text(
            "da-ft-01",
            "data",
            "A nightly pipeline produced silently wrong aggregates for a week. How would you detect this class of failure earlier?",
            "Expect data-quality checks: row counts, freshness, distribution drift, reconciliation against a source of truth, and alerting on violations.",
        ),
        code(
            "da-code-01",
            "data",
            "Given a table events(user_id, event_type, occurred_at), write a query returning each user's first and last event timestamps and total event count.",
            "Expected: GROUP BY user_id with MIN, MAX, COUNT; window-function variants are equally acceptable.",
        ),
    ]
}
