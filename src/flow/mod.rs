//! Flow definitions.
//!
//! A flow pairs every step in the fixed order with its definition. Flows
//! are assembled with [`FlowBuilder`] and validated once, up front, so the
//! rest of the crate can look any step up without failure.

pub mod definition;
pub mod error;

pub use definition::{InputFilter, StepBuilder, StepDefinition, Summary};
pub use error::BuildError;

use crate::core::{phone_digits, Answers, Field, Guard, RawData, Step};

pub const EMAIL_QUESTION: &str = "I need a few details to set up your account so we can save your info in case you want to get back to your quote later";
pub const PHONE_QUESTION: &str = "Excellent, and What was your phone number?";
pub const MOVED_QUESTION: &str = "Have you moved in the last 2 months?";

/// Validated set of step definitions, one per step.
#[derive(Debug)]
pub struct Flow {
    definitions: Vec<StepDefinition>,
}

impl Flow {
    /// The stock email, phone and moved flow.
    pub fn standard() -> Self {
        Self {
            definitions: vec![email_step(), phone_step(), moved_step()],
        }
    }

    pub fn definition(&self, step: Step) -> &StepDefinition {
        // Complete and ordered: enforced by FlowBuilder::build.
        &self.definitions[step.ordinal() - 1]
    }

    pub fn definitions(&self) -> &[StepDefinition] {
        &self.definitions
    }
}

impl Default for Flow {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for constructing flows with a fluent API.
#[derive(Default)]
pub struct FlowBuilder {
    definitions: Vec<StepDefinition>,
}

impl FlowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step using a builder.
    /// Returns an error if the builder fails validation.
    pub fn step(mut self, builder: StepBuilder) -> Result<Self, BuildError> {
        self.definitions.push(builder.build()?);
        Ok(self)
    }

    /// Add a pre-built step definition.
    pub fn add_step(mut self, definition: StepDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Build the flow.
    /// Every step must be defined exactly once.
    pub fn build(mut self) -> Result<Flow, BuildError> {
        self.definitions.sort_by_key(|definition| definition.step);

        for pair in self.definitions.windows(2) {
            if pair[0].step == pair[1].step {
                return Err(BuildError::DuplicateStep(pair[0].step));
            }
        }
        for step in Step::ALL {
            if !self.definitions.iter().any(|d| d.step == step) {
                return Err(BuildError::UndefinedStep(step));
            }
        }

        Ok(Flow {
            definitions: self.definitions,
        })
    }
}

fn email_step() -> StepDefinition {
    StepBuilder::new()
        .step(Step::Email)
        .question(EMAIL_QUESTION)
        .field(Field::Email)
        .guard(Guard::email())
        .build()
        .expect("Email step should always build")
}

fn phone_step() -> StepDefinition {
    StepBuilder::new()
        .step(Step::Phone)
        .question(PHONE_QUESTION)
        .field(Field::PhoneNumber)
        .guard(Guard::phone())
        .filter(Field::PhoneNumber, sanitize_phone_input)
        .summary(|answers: &Answers| {
            let digits = phone_digits(answers.get(Field::PhoneNumber));
            Summary {
                answer: format_phone(&digits),
                raw: RawData::from([(Field::PhoneNumber, digits)]),
            }
        })
        .build()
        .expect("Phone step should always build")
}

fn moved_step() -> StepDefinition {
    StepBuilder::new()
        .step(Step::Moved)
        .question(MOVED_QUESTION)
        .field(Field::Moved)
        .guard(Guard::moved())
        .filter(Field::Moved, normalize_choice)
        .build()
        .expect("Moved step should always build")
}

/// Map a typed yes/no answer onto the `YES`/`NO` choice values.
pub fn normalize_choice(value: &str) -> String {
    match value.trim().to_ascii_uppercase().as_str() {
        "Y" | "YES" => "YES".to_string(),
        "N" | "NO" => "NO".to_string(),
        other => other.to_string(),
    }
}

/// Keep digits, parentheses, hyphens and whitespace.
pub fn sanitize_phone_input(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '(' | ')' | '-') || c.is_whitespace())
        .collect()
}

/// Render digits as `(XXX) XXX-XXXX`. Short input yields short groups.
pub fn format_phone(digits: &str) -> String {
    let group = |start: usize, end: usize| {
        let len = digits.len();
        digits.get(start.min(len)..end.min(len)).unwrap_or_default()
    };
    format!("({}) {}-{}", group(0, 3), group(3, 6), group(6, 10))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_flow_defines_every_step_in_order() {
        let flow = Flow::standard();
        let steps: Vec<Step> = flow.definitions().iter().map(|d| d.step).collect();
        assert_eq!(steps, Step::ALL.to_vec());
        for step in Step::ALL {
            assert_eq!(flow.definition(step).step, step);
        }
    }

    #[test]
    fn standard_flow_edits_only_email_and_phone() {
        let flow = Flow::standard();
        assert!(flow.definition(Step::Email).editable);
        assert!(flow.definition(Step::Phone).editable);
        assert!(!flow.definition(Step::Moved).editable);
    }

    #[test]
    fn phone_summary_is_formatted_and_raw_is_digits() {
        let flow = Flow::standard();
        let answers = Answers::new().set_field(Field::PhoneNumber, "555 123 4567");

        let summary = flow.definition(Step::Phone).summarize(&answers);

        assert_eq!(summary.answer, "(555) 123-4567");
        assert_eq!(summary.raw[&Field::PhoneNumber], "5551234567");
    }

    #[test]
    fn phone_input_drops_letters() {
        let flow = Flow::standard();
        let phone = flow.definition(Step::Phone);

        assert_eq!(
            phone.sanitize(Field::PhoneNumber, "(555) abc 123-4567"),
            "(555)  123-4567"
        );
    }

    #[test]
    fn moved_input_maps_to_choice_values() {
        let flow = Flow::standard();
        let moved = flow.definition(Step::Moved);

        assert_eq!(moved.sanitize(Field::Moved, " y "), "YES");
        assert_eq!(moved.sanitize(Field::Moved, "No"), "NO");
        assert_eq!(moved.sanitize(Field::Moved, "maybe"), "MAYBE");
    }

    #[test]
    fn format_phone_tolerates_short_input() {
        assert_eq!(format_phone("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone("5551"), "(555) 1-");
        assert_eq!(format_phone(""), "() -");
    }

    #[test]
    fn flow_builder_requires_every_step() {
        let result = FlowBuilder::new()
            .step(
                StepBuilder::new()
                    .step(Step::Email)
                    .question(EMAIL_QUESTION)
                    .field(Field::Email)
                    .guard(Guard::email()),
            )
            .unwrap()
            .build();

        assert_eq!(result.unwrap_err(), BuildError::UndefinedStep(Step::Phone));
    }

    #[test]
    fn flow_builder_rejects_duplicates() {
        let result = FlowBuilder::new()
            .add_step(email_step())
            .add_step(email_step())
            .add_step(phone_step())
            .add_step(moved_step())
            .build();

        assert_eq!(result.unwrap_err(), BuildError::DuplicateStep(Step::Email));
    }

    #[test]
    fn flow_builder_sorts_definitions() {
        let flow = FlowBuilder::new()
            .add_step(moved_step())
            .add_step(email_step())
            .add_step(phone_step())
            .build()
            .unwrap();

        assert_eq!(flow.definition(Step::Phone).question, PHONE_QUESTION);
    }
}
