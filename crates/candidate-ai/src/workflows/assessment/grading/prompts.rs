//! Prompt construction for the batched grading call.

use crate::workflows::assessment::domain::{AssessmentItem, ViolationLog};

pub(super) const GRADING_SYSTEM_PROMPT: &str = "\
You are a strict technical grader for hiring assessments. Score each \
submitted answer from 0 to 10 against its question and reference notes. \
You also receive the session's behavioral log. Weigh a high paste-attempt \
count against answers that look unusually clean or polished, and flag \
abrupt stylistic shifts within free-text answers. Reply with strict JSON \
and nothing else.";

pub(super) struct OracleWorkItem<'a> {
    pub item: &'a AssessmentItem,
    pub answer: &'a str,
}

pub(super) fn grading_prompt(queue: &[OracleWorkItem<'_>], violations: &ViolationLog) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Session behavior log: {} focus losses, {} paste attempts, {} seconds elapsed.\n\n",
        violations.focus_loss_count, violations.paste_attempt_count, violations.elapsed_seconds
    ));

    prompt.push_str("Answers to grade:\n");
    for work in queue {
        prompt.push_str(&format!(
            "\n- item_id: {}\n  kind: {}\n  question: {}\n  reference notes: {}\n  candidate answer:\n---\n{}\n---\n",
            work.item.id,
            work.item.kind.label(),
            work.item.prompt,
            work.item.reference_context,
            work.answer,
        ));
    }

    prompt.push_str(
        "\nRespond with a JSON object: {\"items\": [{\"item_id\": string, \"score\": integer 0-10, \
         \"feedback\": string, \"plagiarism_suspected\": boolean}], \"credibility_score\": \
         integer 0-100, \"cheating_analysis\": string}. Include every item_id exactly once.",
    );
    prompt
}
