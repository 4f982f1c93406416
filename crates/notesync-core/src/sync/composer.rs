//! Pending note input and its submit state.

/// Lifecycle of one submission from the note form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Creating,
    Created,
}

impl SubmitStatus {
    /// Label for the submit control
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Create note",
            Self::Creating => "Creating...",
            Self::Created => "Created!",
        }
    }
}

/// The note form: text typed so far plus the submit status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    text: String,
    status: SubmitStatus,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: SubmitStatus::Idle,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub const fn status(&self) -> SubmitStatus {
        self.status
    }

    pub const fn is_submitting(&self) -> bool {
        matches!(self.status, SubmitStatus::Creating)
    }

    /// Put a `Created` composer back to `Idle`; other states are kept.
    pub fn reset_status(&mut self) {
        if self.status == SubmitStatus::Created {
            self.status = SubmitStatus::Idle;
        }
    }

    pub(crate) fn begin_submit(&mut self) {
        self.status = SubmitStatus::Creating;
    }

    pub(crate) fn finish_submit(&mut self) {
        self.text.clear();
        self.status = SubmitStatus::Created;
    }

    pub(crate) fn abort_submit(&mut self) {
        self.status = SubmitStatus::Idle;
    }
}
