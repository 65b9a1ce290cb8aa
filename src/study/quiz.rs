//! Quiz sheet state: question cursor, option selections, and the answers
//! payload built at submit time.

use std::collections::BTreeMap;

use crate::api::types::{QuizInfo, QuizQuestion};

/// An in-progress quiz attempt.
#[derive(Debug)]
pub struct QuizSheet {
    quiz: QuizInfo,
    attempt_id: u64,
    cursor: usize,
    /// question id → selected option value, overwritten on re-selection
    selections: BTreeMap<u64, String>,
}

impl QuizSheet {
    pub fn new(quiz: QuizInfo, attempt_id: u64) -> Self {
        Self { quiz, attempt_id, cursor: 0, selections: BTreeMap::new() }
    }

    pub fn attempt_id(&self) -> u64 {
        self.attempt_id
    }

    pub fn title(&self) -> &str {
        &self.quiz.title
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.quiz.questions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn next_question(&mut self) {
        if self.cursor + 1 < self.quiz.questions.len() {
            self.cursor += 1;
        }
    }

    pub fn previous_question(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Choose an option (zero-based) for the question under the cursor.
    /// Out-of-range indexes are ignored; re-selection overwrites.
    pub fn select_option(&mut self, option_index: usize) {
        let Some(question) = self.quiz.questions.get(self.cursor) else {
            return;
        };
        if let Some(option) = question.options.get(option_index) {
            self.selections.insert(question.id, option.value.clone());
        }
    }

    /// Selected option value for a question, if any.
    pub fn selection_for(&self, question_id: u64) -> Option<&str> {
        self.selections.get(&question_id).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.selections.len()
    }

    /// Submission payload: question ids stringified the way the server keys
    /// them. Unanswered questions are absent; zero selections still produce
    /// a valid (empty) map rather than blocking the submission.
    pub fn answers(&self) -> BTreeMap<String, String> {
        self.selections.iter().map(|(id, value)| (id.to_string(), value.clone())).collect()
    }
}
