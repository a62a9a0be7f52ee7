//! Step definitions and their builder.
//!
//! A step definition is the render contract for one step: the question to
//! show, the fields it edits, the guard gating submission, and how the
//! submitted answer is summarized for the ledger.

use crate::core::{Answers, Field, Guard, RawData, Step};
use crate::effects::Action;
use crate::flow::error::BuildError;
use std::sync::Arc;

/// Ledger summary and raw field data produced by a submission.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub answer: String,
    pub raw: RawData,
}

/// Type alias for summary functions.
type Summarizer = Arc<dyn Fn(&Answers) -> Summary + Send + Sync>;

/// Keystroke filter applied to a field before it is stored.
pub type InputFilter = fn(&str) -> String;

/// Everything the view layer needs to render and submit one step.
pub struct StepDefinition {
    pub step: Step,
    pub question: String,
    pub fields: Vec<Field>,
    pub guard: Guard,
    /// Whether the ledger entry offers an edit affordance
    pub editable: bool,
    summarizer: Option<Summarizer>,
    input_filters: Vec<(Field, InputFilter)>,
}

impl StepDefinition {
    /// Whether the guard currently allows submission (pure)
    pub fn is_complete(&self, answers: &Answers) -> bool {
        self.guard.check(answers)
    }

    /// Summarize the current answers for this step.
    ///
    /// Without a custom summarizer the answer is the step's field values
    /// joined by spaces and the raw data is those fields unchanged.
    pub fn summarize(&self, answers: &Answers) -> Summary {
        if let Some(summarizer) = &self.summarizer {
            return summarizer(answers);
        }

        let raw: RawData = self
            .fields
            .iter()
            .map(|field| (*field, answers.get(*field).to_string()))
            .collect();
        let answer = self
            .fields
            .iter()
            .map(|field| answers.get(*field))
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Summary { answer, raw }
    }

    /// Build the submit action, or `None` while the guard fails.
    pub fn submission(&self, answers: &Answers) -> Option<Action> {
        if !self.is_complete(answers) {
            return None;
        }
        let Summary { answer, raw } = self.summarize(answers);
        Some(Action::SubmitStep {
            question: self.question.clone(),
            answer_summary: answer,
            step: self.step,
            raw,
        })
    }

    /// Apply the field's input filter, if any.
    pub fn sanitize(&self, field: Field, value: &str) -> String {
        self.input_filters
            .iter()
            .find(|(filtered, _)| *filtered == field)
            .map_or_else(|| value.to_string(), |(_, filter)| filter(value))
    }

    /// The field a single free-text answer is written to.
    pub fn primary_field(&self) -> Field {
        // Non-empty: enforced by StepBuilder::build.
        self.fields[0]
    }
}

impl std::fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDefinition")
            .field("step", &self.step)
            .field("question", &self.question)
            .field("fields", &self.fields)
            .field("editable", &self.editable)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing step definitions with a fluent API.
#[derive(Default)]
pub struct StepBuilder {
    step: Option<Step>,
    question: Option<String>,
    fields: Vec<Field>,
    guard: Option<Guard>,
    editable: Option<bool>,
    summarizer: Option<Summarizer>,
    input_filters: Vec<(Field, InputFilter)>,
}

impl StepBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the step being defined (required).
    pub fn step(mut self, step: Step) -> Self {
        self.step = Some(step);
        self
    }

    /// Set the question text (required).
    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    /// Add a field the step collects (at least one required).
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the completeness guard (required).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Set the completeness guard using a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Answers) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Override the default summary.
    pub fn summary<F>(mut self, summarizer: F) -> Self
    where
        F: Fn(&Answers) -> Summary + Send + Sync + 'static,
    {
        self.summarizer = Some(Arc::new(summarizer));
        self
    }

    /// Filter keystrokes for `field` before they are stored.
    pub fn filter(mut self, field: Field, filter: InputFilter) -> Self {
        self.input_filters.push((field, filter));
        self
    }

    /// Override editability. Defaults to every step but the last.
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = Some(editable);
        self
    }

    /// Build the step definition.
    pub fn build(self) -> Result<StepDefinition, BuildError> {
        let step = self.step.ok_or(BuildError::MissingStep)?;
        let question = self.question.ok_or(BuildError::MissingQuestion(step))?;
        let guard = self.guard.ok_or(BuildError::MissingGuard(step))?;
        if self.fields.is_empty() {
            return Err(BuildError::NoFields(step));
        }

        Ok(StepDefinition {
            step,
            question,
            fields: self.fields,
            guard,
            editable: self.editable.unwrap_or(!step.is_last()),
            summarizer: self.summarizer,
            input_filters: self.input_filters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_step() -> StepDefinition {
        StepBuilder::new()
            .step(Step::Email)
            .question("What's your name?")
            .field(Field::FirstName)
            .field(Field::LastName)
            .when(|answers| !answers.get(Field::FirstName).is_empty())
            .build()
            .unwrap()
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = StepBuilder::new().question("q").build();
        assert!(matches!(result, Err(BuildError::MissingStep)));

        let result = StepBuilder::new().step(Step::Phone).build();
        assert_eq!(result.unwrap_err(), BuildError::MissingQuestion(Step::Phone));
    }

    #[test]
    fn builder_validates_missing_guard() {
        let result = StepBuilder::new()
            .step(Step::Phone)
            .question("q")
            .field(Field::PhoneNumber)
            .build();

        assert_eq!(result.unwrap_err(), BuildError::MissingGuard(Step::Phone));
    }

    #[test]
    fn builder_requires_a_field() {
        let result = StepBuilder::new()
            .step(Step::Phone)
            .question("q")
            .guard(Guard::phone())
            .build();

        assert_eq!(result.unwrap_err(), BuildError::NoFields(Step::Phone));
    }

    #[test]
    fn editable_defaults_to_all_but_last_step() {
        assert!(name_step().editable);

        let last = StepBuilder::new()
            .step(Step::Moved)
            .question("q")
            .field(Field::Moved)
            .guard(Guard::moved())
            .build()
            .unwrap();
        assert!(!last.editable);
    }

    #[test]
    fn default_summary_joins_field_values() {
        let answers = Answers::new()
            .set_field(Field::FirstName, "Hasya")
            .set_field(Field::LastName, "Ram");

        let summary = name_step().summarize(&answers);

        assert_eq!(summary.answer, "Hasya Ram");
        assert_eq!(summary.raw.len(), 2);
        assert_eq!(summary.raw[&Field::LastName], "Ram");
    }

    #[test]
    fn submission_is_withheld_until_guard_passes() {
        let step = name_step();
        assert!(step.submission(&Answers::new()).is_none());

        let answers = Answers::new().set_field(Field::FirstName, "Hasya");
        match step.submission(&answers) {
            Some(Action::SubmitStep {
                step, question, answer_summary, ..
            }) => {
                assert_eq!(step, Step::Email);
                assert_eq!(question, "What's your name?");
                assert_eq!(answer_summary, "Hasya");
            }
            other => panic!("Expected submission, got {other:?}"),
        }
    }

    #[test]
    fn sanitize_applies_only_matching_filter() {
        let step = StepBuilder::new()
            .step(Step::Email)
            .question("q")
            .field(Field::Email)
            .guard(Guard::email())
            .filter(Field::Email, |value| value.trim().to_lowercase())
            .build()
            .unwrap();

        assert_eq!(step.sanitize(Field::Email, " A@B.COM "), "a@b.com");
        assert_eq!(step.sanitize(Field::Dob, " 1990 "), " 1990 ");
    }
}
