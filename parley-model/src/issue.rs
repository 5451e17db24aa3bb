use std::fmt;

/// A problem found while validating a canonical model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelIssue {
    /// What is wrong.
    pub message: String,
    /// Where in the model (e.g. "intents.HelloIntent").
    pub location: Option<String>,
}

impl ModelIssue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Add a location to this issue.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ModelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " (at {})", loc)?;
        }
        Ok(())
    }
}
