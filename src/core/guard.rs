//! Completeness guards for step submission.
//!
//! Guards are pure boolean functions over the answer store that decide
//! whether a step may be submitted. They never mutate state and never
//! report errors; an incomplete step simply stays unsubmittable.

use super::answers::{Answers, Field};

/// Pure predicate that determines if a step's answer is complete.
///
/// The view layer checks the guard before dispatching a submission.
///
/// # Example
///
/// ```rust
/// use chatform::core::{Answers, Field, Guard};
///
/// let has_city = Guard::new(|answers: &Answers| !answers.get(Field::City).is_empty());
///
/// assert!(!has_city.check(&Answers::new()));
/// assert!(has_city.check(&Answers::new().set_field(Field::City, "Staten Island")));
/// ```
pub struct Guard {
    predicate: Box<dyn Fn(&Answers) -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Answers) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Check if the current answers allow submission.
    pub fn check(&self, answers: &Answers) -> bool {
        (self.predicate)(answers)
    }

    /// Email: non-empty after trimming and contains `@`.
    pub fn email() -> Self {
        Guard::new(|answers| is_email_complete(answers.get(Field::Email)))
    }

    /// Phone: exactly 10 digits once non-digits are stripped.
    pub fn phone() -> Self {
        Guard::new(|answers| is_phone_complete(answers.get(Field::PhoneNumber)))
    }

    /// Moved: exactly `YES` or `NO`.
    pub fn moved() -> Self {
        Guard::new(|answers| is_moved_complete(answers.get(Field::Moved)))
    }
}

impl std::fmt::Debug for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Guard")
    }
}

pub fn is_email_complete(value: &str) -> bool {
    !value.trim().is_empty() && value.contains('@')
}

pub fn is_phone_complete(value: &str) -> bool {
    phone_digits(value).len() == 10
}

pub fn is_moved_complete(value: &str) -> bool {
    value == "YES" || value == "NO"
}

/// Strip everything but ASCII digits.
pub fn phone_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(field: Field, value: &str) -> Answers {
        Answers::new().set_field(field, value)
    }

    #[test]
    fn email_requires_at_sign() {
        let guard = Guard::email();

        assert!(guard.check(&with(Field::Email, "a@b.com")));
        assert!(!guard.check(&with(Field::Email, "ab.com")));
        assert!(!guard.check(&with(Field::Email, "")));
        assert!(!guard.check(&with(Field::Email, "   ")));
    }

    #[test]
    fn phone_requires_ten_digits() {
        let guard = Guard::phone();

        assert!(guard.check(&with(Field::PhoneNumber, "(555) 123-4567")));
        assert!(guard.check(&with(Field::PhoneNumber, "5551234567")));
        assert!(!guard.check(&with(Field::PhoneNumber, "555-123")));
        assert!(!guard.check(&with(Field::PhoneNumber, "(555) 123-45678")));
    }

    #[test]
    fn moved_accepts_only_yes_or_no() {
        let guard = Guard::moved();

        assert!(guard.check(&with(Field::Moved, "YES")));
        assert!(guard.check(&with(Field::Moved, "NO")));
        assert!(!guard.check(&with(Field::Moved, "")));
        assert!(!guard.check(&with(Field::Moved, "MAYBE")));
        assert!(!guard.check(&with(Field::Moved, "yes")));
    }

    #[test]
    fn guard_reads_only_its_own_field() {
        let answers = with(Field::Email, "a@b.com");
        assert!(!Guard::phone().check(&answers));
        assert!(!Guard::moved().check(&answers));
    }

    #[test]
    fn guard_is_deterministic() {
        let answers = with(Field::PhoneNumber, "(555) 123-4567");
        let guard = Guard::phone();

        assert_eq!(guard.check(&answers), guard.check(&answers));
    }

    #[test]
    fn phone_digits_strips_formatting() {
        assert_eq!(phone_digits("(555) 123-4567"), "5551234567");
        assert_eq!(phone_digits("abc"), "");
    }
}
