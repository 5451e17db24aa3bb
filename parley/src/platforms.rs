//! Known platforms.
//!
//! Maps platform ids from the command line and `[platforms]` to backends.

use parley_alexa::AlexaPlatform;
use parley_build::{Driver, Error, Platform, PlatformPlugin, Result};
use parley_googleassistant::GoogleAssistantPlatform;
use parley_project::ProjectConfig;

/// A platform backend this binary ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownPlatform {
    Alexa,
    GoogleAssistant,
}

impl KnownPlatform {
    pub const ALL: [KnownPlatform; 2] = [KnownPlatform::Alexa, KnownPlatform::GoogleAssistant];

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|platform| platform.id() == id)
    }

    pub fn id(self) -> &'static str {
        match self {
            KnownPlatform::Alexa => "alexa",
            KnownPlatform::GoogleAssistant => "googleassistant",
        }
    }

    /// The backend, configured from the project where it takes settings.
    pub fn platform(self, config: &ProjectConfig) -> Box<dyn Platform> {
        match self {
            KnownPlatform::Alexa => Box::new(AlexaPlatform::new()),
            KnownPlatform::GoogleAssistant => {
                Box::new(GoogleAssistantPlatform::from_config(config))
            }
        }
    }

    /// Install the backend's lifecycle hooks.
    pub fn install(self, driver: Driver, config: &ProjectConfig) -> Driver {
        match self {
            KnownPlatform::Alexa => driver.plugin(PlatformPlugin::new(AlexaPlatform::new())),
            KnownPlatform::GoogleAssistant => driver.plugin(PlatformPlugin::new(
                GoogleAssistantPlatform::from_config(config),
            )),
        }
    }
}

/// Platforms to install: every configured one plus any named on the
/// command line, in a fixed order.
pub fn selected(config: &ProjectConfig, requested: &[String]) -> Result<Vec<KnownPlatform>> {
    let known = KnownPlatform::ALL.map(KnownPlatform::id).join(", ");
    for id in requested {
        if KnownPlatform::from_id(id).is_none() {
            return Err(Error::configuration(
                format!("unknown platform '{}'", id),
                Some(format!("known platforms: {}", known).as_str()),
            ));
        }
    }

    let configured = config.platforms.configured();
    let selected: Vec<KnownPlatform> = KnownPlatform::ALL
        .into_iter()
        .filter(|platform| {
            configured.contains(&platform.id()) || requested.iter().any(|id| id == platform.id())
        })
        .collect();

    if selected.is_empty() {
        return Err(Error::configuration(
            "no platform configured",
            Some(
                format!(
                    "add a [platforms.<id>] table to parley.toml or pass --platform ({})",
                    known
                )
                .as_str(),
            ),
        ));
    }
    Ok(selected)
}

/// A driver with the hooks of every selected platform installed.
pub fn driver(config: &ProjectConfig, requested: &[String]) -> Result<Driver> {
    let driver = selected(config, requested)?
        .into_iter()
        .fold(Driver::new(), |driver, platform| platform.install(driver, config));
    Ok(driver)
}
