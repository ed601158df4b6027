//! Feedback form: input state, validation, submission.

use std::future::Future;
use std::sync::OnceLock;

use feedback_dom::DomNode;
use regex::Regex;

use crate::entry::{FeedbackEntry, FeedbackInput, Field};
use crate::error::{StoreError, SubmitError, ValidationError};
use crate::notify::{NoticeKind, Notify};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

pub const RATING_CHOICES: [(&str, &str); 5] = [
    ("1", "1 - Poor"),
    ("2", "2 - Fair"),
    ("3", "3 - Good"),
    ("4", "4 - Very Good"),
    ("5", "5 - Excellent"),
];

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Check completeness, then email format, then rating range.
pub fn validate(input: &FeedbackInput) -> Result<FeedbackEntry, ValidationError> {
    if Field::ALL.iter().any(|f| input.get(*f).trim().is_empty()) {
        return Err(ValidationError::IncompleteFields);
    }
    if !is_valid_email(&input.email) {
        return Err(ValidationError::InvalidEmail);
    }
    let rating = input
        .rating
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|r| (1..=5).contains(r))
        .ok_or(ValidationError::InvalidRating)?;

    Ok(FeedbackEntry {
        student_name: input.student_name.clone(),
        course_name: input.course_name.clone(),
        email: input.email.clone(),
        rating,
        feedback_message: input.feedback_message.clone(),
    })
}

/// Receives validated entries. The page controller implements this by
/// writing to the backend store.
pub trait SubmitFeedback {
    fn submit_feedback(
        &mut self,
        entry: FeedbackEntry,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Debug, Default)]
pub struct FeedbackForm {
    input: FeedbackInput,
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &FeedbackInput {
        &self.input
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.input.set(field, value.into());
    }

    pub fn replace_input(&mut self, input: FeedbackInput) {
        self.input = input;
    }

    pub fn reset(&mut self) {
        self.input = FeedbackInput::default();
    }

    /// Validate the current input and hand it to `callback`.
    ///
    /// Validation failures and store failures keep the input so the user can
    /// correct or retry; only an accepted submission clears the form. Every
    /// outcome is reported through `notify`.
    pub async fn submit<C, N>(
        &mut self,
        callback: &mut C,
        notify: &mut N,
    ) -> Result<FeedbackEntry, SubmitError>
    where
        C: SubmitFeedback + Send,
        N: Notify + Send,
    {
        let entry = match validate(&self.input) {
            Ok(entry) => entry,
            Err(e) => {
                let (title, description) = match e {
                    ValidationError::IncompleteFields => {
                        ("Missing Information", "Please fill in all fields before submitting.")
                    }
                    ValidationError::InvalidEmail => {
                        ("Invalid Email", "Please enter a valid email address.")
                    }
                    ValidationError::InvalidRating => {
                        ("Invalid Rating", "Please select a rating between 1 and 5.")
                    }
                };
                notify.notify(NoticeKind::Destructive, title, description);
                return Err(e.into());
            }
        };

        if let Err(e) = callback.submit_feedback(entry.clone()).await {
            notify.notify(
                NoticeKind::Destructive,
                "Submission Failed",
                "We couldn't save your feedback. Please try again.",
            );
            return Err(e.into());
        }

        self.reset();
        notify.notify(
            NoticeKind::Success,
            "Feedback Submitted!",
            "Thank you for your valuable feedback.",
        );
        Ok(entry)
    }

    // ── View ────────────────────────────────────────────────────────

    pub fn render(&self) -> DomNode {
        let input = &self.input;
        let form = DomNode::new("form")
            .keyed("form")
            .class("feedback-form")
            .attr("novalidate", "true")
            .on("submit", "on_submit")
            .child(text_field(Field::StudentName, "Student Name", "text", "Enter your full name", input))
            .child(text_field(Field::CourseName, "Course Name", "text", "Enter the course name", input))
            .child(text_field(Field::Email, "Email Address", "email", "your.email@example.com", input))
            .child(rating_field(input))
            .child(message_field(input))
            .child(
                DomNode::text("button", "Submit Feedback")
                    .keyed("submit")
                    .attr("type", "submit")
                    .class("submit-btn"),
            );

        DomNode::new("section")
            .keyed("form-card")
            .class("card")
            .child(
                DomNode::new("header")
                    .keyed("form-header")
                    .class("card-header")
                    .child(DomNode::text("h2", "Student Feedback Form"))
                    .child(
                        DomNode::text("p", "Share your thoughts about the course and help us improve")
                            .class("card-description"),
                    ),
            )
            .child(form)
    }
}

fn field_wrapper(field: Field, label: &str) -> DomNode {
    DomNode::new("div")
        .keyed(format!("f-{}", field.as_str()))
        .class("field")
        .child(DomNode::text("label", label).attr("for", field.as_str()))
}

fn text_field(field: Field, label: &str, input_type: &str, placeholder: &str, input: &FeedbackInput) -> DomNode {
    let name = field.as_str();
    field_wrapper(field, label).child(
        DomNode::new("input")
            .keyed(format!("i-{}", name))
            .attr("id", name)
            .attr("name", name)
            .attr("type", input_type)
            .attr("placeholder", placeholder)
            .attr("value", input.get(field))
            .on("input", format!("on_input_{}", name)),
    )
}

fn rating_field(input: &FeedbackInput) -> DomNode {
    let name = Field::Rating.as_str();
    let current = input.get(Field::Rating);

    let mut placeholder = DomNode::text("option", "Select a rating (1-5)")
        .attr("value", "")
        .attr("disabled", "disabled");
    if current.is_empty() {
        placeholder = placeholder.attr("selected", "selected");
    }
    let options = RATING_CHOICES.iter().map(|(value, label)| {
        let opt = DomNode::text("option", label).attr("value", *value);
        if current == *value {
            opt.attr("selected", "selected")
        } else {
            opt
        }
    });

    field_wrapper(Field::Rating, "Course Rating").child(
        DomNode::new("select")
            .keyed(format!("i-{}", name))
            .attr("id", name)
            .attr("name", name)
            .on("change", format!("on_input_{}", name))
            .child(placeholder)
            .children(options),
    )
}

fn message_field(input: &FeedbackInput) -> DomNode {
    let name = Field::FeedbackMessage.as_str();
    field_wrapper(Field::FeedbackMessage, "Feedback Message").child(
        DomNode::new("textarea")
            .keyed(format!("i-{}", name))
            .attr("id", name)
            .attr("name", name)
            .attr("rows", "5")
            .attr("placeholder", "Share your detailed feedback about the course...")
            .with_text(input.get(Field::FeedbackMessage))
            .on("input", format!("on_input_{}", name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Toasts;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<FeedbackEntry>,
        fail: bool,
    }

    impl SubmitFeedback for Recorder {
        async fn submit_feedback(&mut self, entry: FeedbackEntry) -> Result<(), StoreError> {
            self.calls.push(entry);
            if self.fail {
                Err(StoreError::Upstream("503".into()))
            } else {
                Ok(())
            }
        }
    }

    fn filled() -> FeedbackInput {
        FeedbackInput {
            student_name: "Ann".into(),
            course_name: "CS101".into(),
            email: "a@b.com".into(),
            rating: "5".into(),
            feedback_message: "Great!".into(),
        }
    }

    #[test]
    fn test_email_pattern() {
        for ok in ["a@b.com", "first.last@uni.example.edu", "x+tag@d.io"] {
            assert!(is_valid_email(ok), "{}", ok);
        }
        for bad in ["not-an-email", "a@b", "@b.com", "a@.com", "a b@c.com", "a@b.com ", "a@@b.com"] {
            assert!(!is_valid_email(bad), "{}", bad);
        }
    }

    #[test]
    fn test_each_missing_field_is_incomplete() {
        for field in Field::ALL {
            for blank in ["", "   ", "\t\n"] {
                let mut input = filled();
                input.set(field, blank.into());
                assert_eq!(validate(&input), Err(ValidationError::IncompleteFields), "{:?}", field);
            }
        }
    }

    #[test]
    fn test_completeness_checked_before_email() {
        let mut input = filled();
        input.email = "not-an-email".into();
        input.course_name.clear();
        assert_eq!(validate(&input), Err(ValidationError::IncompleteFields));
    }

    #[test]
    fn test_rating_range() {
        for bad in ["0", "6", "-1", "four", "4.5"] {
            let mut input = filled();
            input.rating = bad.into();
            assert_eq!(validate(&input), Err(ValidationError::InvalidRating), "{}", bad);
        }
        let mut input = filled();
        input.rating = "3".into();
        assert_eq!(validate(&input).unwrap().rating, 3);
    }

    #[tokio::test]
    async fn test_invalid_email_keeps_input_and_skips_callback() {
        let mut form = FeedbackForm::new();
        let mut input = filled();
        input.email = "not-an-email".into();
        form.replace_input(input.clone());

        let mut recorder = Recorder::default();
        let mut toasts = Toasts::default();
        let err = form.submit(&mut recorder, &mut toasts).await.unwrap_err();

        assert!(matches!(err, SubmitError::Validation(ValidationError::InvalidEmail)));
        assert!(recorder.calls.is_empty());
        assert_eq!(form.input(), &input);
        let notice = toasts.current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Destructive);
        assert_eq!(notice.title, "Invalid Email");
    }

    #[tokio::test]
    async fn test_missing_fields_notify() {
        let mut form = FeedbackForm::new();
        form.set_field(Field::StudentName, "Ann");

        let mut recorder = Recorder::default();
        let mut toasts = Toasts::default();
        let err = form.submit(&mut recorder, &mut toasts).await.unwrap_err();

        assert!(matches!(err, SubmitError::Validation(ValidationError::IncompleteFields)));
        assert!(recorder.calls.is_empty());
        assert_eq!(form.input().student_name, "Ann");
        assert_eq!(toasts.current().unwrap().title, "Missing Information");
    }

    #[tokio::test]
    async fn test_success_calls_once_and_clears() {
        let mut form = FeedbackForm::new();
        form.replace_input(filled());

        let mut recorder = Recorder::default();
        let mut toasts = Toasts::default();
        let entry = form.submit(&mut recorder, &mut toasts).await.unwrap();

        assert_eq!(recorder.calls, vec![entry.clone()]);
        assert_eq!(entry.rating, 5);
        assert!(form.input().is_blank());
        let notice = toasts.current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.title, "Feedback Submitted!");
    }

    #[tokio::test]
    async fn test_store_failure_keeps_input() {
        let mut form = FeedbackForm::new();
        form.replace_input(filled());

        let mut recorder = Recorder { fail: true, ..Default::default() };
        let mut toasts = Toasts::default();
        let err = form.submit(&mut recorder, &mut toasts).await.unwrap_err();

        assert!(matches!(err, SubmitError::RemoteWrite(_)));
        assert_eq!(recorder.calls.len(), 1);
        assert_eq!(form.input(), &filled());
        assert_eq!(toasts.current().unwrap().title, "Submission Failed");
    }

    #[test]
    fn test_render_reflects_input() {
        let mut form = FeedbackForm::new();
        form.set_field(Field::Email, "a@b.com");
        form.set_field(Field::Rating, "4");
        form.set_field(Field::FeedbackMessage, "Loved the labs");
        let node = form.render();

        let email = node.find("i-email").unwrap();
        assert_eq!(email.attrs.get("type").map(String::as_str), Some("email"));
        assert_eq!(email.attrs.get("value").map(String::as_str), Some("a@b.com"));
        assert_eq!(email.event("input"), Some("on_input_email"));

        let select = node.find("i-rating").unwrap();
        let selected: Vec<_> = select
            .children
            .iter()
            .filter(|o| o.attrs.contains_key("selected"))
            .map(|o| o.attrs["value"].as_str())
            .collect();
        assert_eq!(selected, vec!["4"]);
        assert_eq!(select.children.len(), 6);

        let message = node.find("i-feedbackMessage").unwrap();
        assert_eq!(message.text.as_deref(), Some("Loved the labs"));
        assert_eq!(node.find("form").unwrap().event("submit"), Some("on_submit"));
    }
}
