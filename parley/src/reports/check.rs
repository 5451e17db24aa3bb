//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report, Status};

/// One model file in the models directory.
#[derive(Debug)]
pub struct ModelCheck {
    pub locale: String,
    pub problem: Option<String>,
}

/// One resolved locale of a platform.
#[derive(Debug)]
pub struct LocaleCheck {
    pub locale: String,
    pub problem: Option<String>,
}

/// Locales a platform would build.
#[derive(Debug)]
pub struct PlatformSummary {
    pub default_locale: String,
    pub locales: Vec<LocaleCheck>,
}

#[derive(Debug)]
pub struct PlatformCheck {
    pub name: String,
    /// The error message if locale resolution or platform validation failed.
    pub result: Result<PlatformSummary, String>,
}

impl PlatformCheck {
    fn is_valid(&self) -> bool {
        match &self.result {
            Ok(summary) => summary.locales.iter().all(|locale| locale.problem.is_none()),
            Err(_) => false,
        }
    }
}

/// Report data from project validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    pub models: Vec<ModelCheck>,
    pub platforms: Vec<PlatformCheck>,
}

impl CheckReport {
    /// Whether the check passed (no problems anywhere).
    pub fn is_valid(&self) -> bool {
        self.models.iter().all(|model| model.problem.is_none())
            && self.platforms.iter().all(PlatformCheck::is_valid)
    }
}

fn item(out: &mut dyn Output, depth: usize, label: &str, problem: Option<&String>) {
    match problem {
        None => out.status_item(depth, Status::Ok, label),
        Some(problem) => out.status_item(depth, Status::Failed, &format!("{}: {}", label, problem)),
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        out.section("Models");
        if self.models.is_empty() {
            out.warning("no model files found");
        }
        for model in &self.models {
            item(out, 0, &model.locale, model.problem.as_ref());
        }

        for platform in &self.platforms {
            out.newline();
            out.section(&platform.name);
            match &platform.result {
                Ok(summary) => {
                    out.key_value("default locale", &summary.default_locale);
                    for locale in &summary.locales {
                        item(out, 0, &locale.locale, locale.problem.as_ref());
                    }
                }
                Err(message) => out.status_item(0, Status::Failed, message),
            }
        }
        out.newline();

        if self.is_valid() {
            out.success(&format!("{} is valid", self.config_path.display()));
        } else {
            out.error(&format!("{} has problems", self.config_path.display()));
        }
    }
}
