//! The page state shared by every connected browser and the UI actions that
//! drive it.

use feedback_dom::Snapshot;
use serde::Deserialize;

use crate::controller::PageController;
use crate::entry::{FeedbackEntry, FeedbackInput, Field};
use crate::error::SubmitError;
use crate::form::{self, FeedbackForm};
use crate::notify::Toasts;
use crate::store::FeedbackStore;
use crate::view;

/// Body of `POST /actions/:action`.
#[derive(Debug, Default, Deserialize)]
pub struct ActionPayload {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub form: Option<FeedbackInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Input(Field, String),
    /// Submit, optionally overwriting the form with the client's copy first.
    Submit(Option<FeedbackInput>),
    DismissToast,
    Reset,
    Unknown(String),
}

impl Action {
    pub fn parse(name: &str, payload: ActionPayload) -> Action {
        if let Some(field) = name.strip_prefix("on_input_") {
            return match field.parse::<Field>() {
                Ok(f) => Action::Input(f, payload.value.unwrap_or_default()),
                Err(_) => Action::Unknown(name.to_string()),
            };
        }
        match name {
            "on_submit" => Action::Submit(payload.form),
            "dismiss_toast" => Action::DismissToast,
            "reset" => Action::Reset,
            _ => Action::Unknown(name.to_string()),
        }
    }
}

pub struct Page<S> {
    pub form: FeedbackForm,
    pub controller: PageController<S>,
    pub toasts: Toasts,
}

impl<S: FeedbackStore> Page<S> {
    pub fn new(store: S) -> Self {
        Self {
            form: FeedbackForm::new(),
            controller: PageController::new(store),
            toasts: Toasts::default(),
        }
    }

    pub fn latest(&self) -> Option<&FeedbackEntry> {
        self.controller.latest()
    }

    /// Apply one UI action. Only `Submit` can fail; its error has already
    /// been surfaced to the user as a toast when this returns.
    pub async fn apply(&mut self, action: Action) -> Result<(), SubmitError> {
        match action {
            Action::Input(field, value) => self.form.set_field(field, value),
            Action::Submit(input) => {
                if let Some(input) = input {
                    self.form.replace_input(input);
                }
                self.form.submit(&mut self.controller, &mut self.toasts).await?;
            }
            Action::DismissToast => self.toasts.dismiss(),
            Action::Reset => {
                self.form.reset();
                self.toasts.dismiss();
            }
            Action::Unknown(name) => tracing::debug!(action = %name, "ignoring unknown action"),
        }
        Ok(())
    }

    /// Validate and record an entry coming from the JSON API. The browser
    /// form and its toasts are left alone.
    pub async fn submit_direct(&mut self, input: &FeedbackInput) -> Result<FeedbackEntry, SubmitError> {
        let entry = form::validate(input)?;
        let stored = self.controller.record(&entry).await?;
        Ok(stored.clone())
    }

    /// The page as the user who just acted sees it, toast included.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(view::render(&self.form, self.latest(), self.toasts.render()))
    }

    /// The page for a newly connected visitor. Notices belong to whoever
    /// triggered them, so none is shown.
    pub fn first_paint(&self) -> Snapshot {
        Snapshot::new(view::render(&self.form, self.latest(), None))
    }
}
