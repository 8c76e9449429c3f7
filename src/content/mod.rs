//! Panel content producers.
//!
//! The windowing core treats content as opaque. Each panel kind maps to a
//! producer that is looked up once when the panel opens. Unknown kinds get
//! [`EmptyContent`].

pub mod card;
pub mod countdown;
pub mod inspiration;
pub mod open_when;
pub mod photos;
pub mod reasons;
pub mod text;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

pub use card::{Birthday, CardContent, Inspiration, Letter, PhotoPair, Template};
pub use countdown::CountdownContent;
pub use inspiration::InspirationContent;
pub use open_when::OpenWhenContent;
pub use photos::{PhotoEntry, PhotoGallery};
pub use reasons::ReasonsContent;
pub use text::TextContent;

use crate::components::{Component, ComponentContext};
use crate::ui::UiFrame;
use crate::window::PanelKind;

/// Inner content of one panel.
pub trait PanelContent: Component + std::fmt::Debug {
    /// Period of the per-panel refresh timer, if the content needs one.
    fn refresh_interval(&self) -> Option<Duration> {
        None
    }

    /// Called once when the panel opens.
    fn start(&mut self, _now: DateTime<Utc>) {}

    /// Called each time the refresh timer fires.
    fn refresh(&mut self, _now: DateTime<Utc>) {}
}

/// Shared inputs available to every producer.
#[derive(Debug, Clone)]
pub struct ContentEnv {
    pub card: Arc<CardContent>,
    pub photo_dir: Option<PathBuf>,
}

pub trait ContentProducer {
    fn produce(&self, env: &ContentEnv) -> Box<dyn PanelContent>;
}

impl<F> ContentProducer for F
where
    F: Fn(&ContentEnv) -> Box<dyn PanelContent>,
{
    fn produce(&self, env: &ContentEnv) -> Box<dyn PanelContent> {
        self(env)
    }
}

/// Launchable application as shown in menus and icon grids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    pub kind: PanelKind,
    pub label: String,
    pub icon: char,
}

struct Registration {
    app: AppEntry,
    producer: Box<dyn ContentProducer>,
}

/// Mapping from kind tag to content producer.
pub struct ContentRegistry {
    env: ContentEnv,
    registrations: Vec<Registration>,
}

impl std::fmt::Debug for ContentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRegistry")
            .field("kinds", &self.apps())
            .finish()
    }
}

impl ContentRegistry {
    pub fn new(env: ContentEnv) -> Self {
        Self {
            env,
            registrations: Vec::new(),
        }
    }

    /// Registry with every built-in content kind.
    pub fn with_defaults(card: CardContent, photo_dir: Option<PathBuf>) -> Self {
        let template_kinds: Vec<(String, String)> = card
            .templates
            .iter()
            .map(|(kind, template)| (kind.clone(), template.title.clone()))
            .collect();
        let mut registry = Self::new(ContentEnv {
            card: Arc::new(card),
            photo_dir,
        });
        registry.register("countdown", "Countdown", '⏳', |env: &ContentEnv| {
            Box::new(CountdownContent::new(env.card.birthday.clone())) as Box<dyn PanelContent>
        });
        registry.register("inspiration", "Inspiration", '✨', |env: &ContentEnv| {
            Box::new(InspirationContent::new(env.card.inspiration.clone())) as Box<dyn PanelContent>
        });
        registry.register("open-when", "Open When", '✉', |env: &ContentEnv| {
            Box::new(OpenWhenContent::new(env.card.letters.clone())) as Box<dyn PanelContent>
        });
        registry.register("awesome-reasons", "Reasons", '♥', |env: &ContentEnv| {
            Box::new(ReasonsContent::new(env.card.reasons.clone())) as Box<dyn PanelContent>
        });
        registry.register("photo-memory", "Photos", '▣', |env: &ContentEnv| {
            Box::new(PhotoGallery::load(
                env.photo_dir.as_deref(),
                &env.card.photos,
                env.card.comparison.as_ref(),
            )) as Box<dyn PanelContent>
        });
        for (kind, title) in template_kinds {
            let key = kind.clone();
            registry.register(&kind, &title, '✦', move |env: &ContentEnv| {
                match env.card.templates.get(&key) {
                    Some(template) => Box::new(TextContent::new(template.body.clone()))
                        as Box<dyn PanelContent>,
                    None => Box::new(EmptyContent) as Box<dyn PanelContent>,
                }
            });
        }
        registry
    }

    /// Register or replace the producer for `kind`.
    pub fn register<P>(&mut self, kind: &str, label: &str, icon: char, producer: P)
    where
        P: ContentProducer + 'static,
    {
        let app = AppEntry {
            kind: PanelKind::new(kind),
            label: label.to_string(),
            icon,
        };
        let registration = Registration {
            app,
            producer: Box::new(producer),
        };
        match self
            .registrations
            .iter_mut()
            .find(|r| r.app.kind.as_str() == kind)
        {
            Some(existing) => *existing = registration,
            None => self.registrations.push(registration),
        }
    }

    pub fn env(&self) -> &ContentEnv {
        &self.env
    }

    pub fn card(&self) -> &CardContent {
        &self.env.card
    }

    pub fn is_registered(&self, kind: &PanelKind) -> bool {
        self.registrations.iter().any(|r| &r.app.kind == kind)
    }

    pub fn apps(&self) -> Vec<AppEntry> {
        self.registrations.iter().map(|r| r.app.clone()).collect()
    }

    /// Content for a newly opened panel. Unknown kinds are logged and yield
    /// empty content.
    pub fn produce(&self, kind: &PanelKind) -> Box<dyn PanelContent> {
        match self.registrations.iter().find(|r| &r.app.kind == kind) {
            Some(registration) => registration.producer.produce(&self.env),
            None => {
                tracing::warn!(kind = %kind, "no content producer registered");
                Box::new(EmptyContent)
            }
        }
    }
}

/// Content for kinds with no producer.
#[derive(Debug, Default)]
pub struct EmptyContent;

impl Component for EmptyContent {
    fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {}
}

impl PanelContent for EmptyContent {}

/// Stand-in for content that panicked while rendering or handling input.
#[derive(Debug, Default)]
pub struct FaultContent;

pub const FAULT_MESSAGE: &str = "This widget stopped working.";

impl Component for FaultContent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        let style = Style::default()
            .fg(crate::theme::error_fg())
            .add_modifier(Modifier::ITALIC);
        frame.set_string(area.x.saturating_add(1), area.y, FAULT_MESSAGE, style);
    }

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}

impl PanelContent for FaultContent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_yields_empty_content() {
        let registry = ContentRegistry::with_defaults(CardContent::default(), None);
        let content = registry.produce(&PanelKind::new("no-such-app"));
        assert_eq!(format!("{content:?}"), "EmptyContent");
    }

    #[test]
    fn defaults_include_templates_after_builtins() {
        let registry = ContentRegistry::with_defaults(CardContent::default(), None);
        let kinds: Vec<String> = registry
            .apps()
            .into_iter()
            .map(|a| a.kind.to_string())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "countdown",
                "inspiration",
                "open-when",
                "awesome-reasons",
                "photo-memory",
                "birthday-vault"
            ]
        );
    }

    #[test]
    fn register_replaces_existing_kind() {
        let mut registry = ContentRegistry::with_defaults(CardContent::default(), None);
        let before = registry.apps().len();
        registry.register("countdown", "Timer", '⌛', |_: &ContentEnv| {
            Box::new(EmptyContent) as Box<dyn PanelContent>
        });
        assert_eq!(registry.apps().len(), before);
        assert_eq!(registry.apps()[0].label, "Timer");
        let content = registry.produce(&PanelKind::new("countdown"));
        assert_eq!(format!("{content:?}"), "EmptyContent");
    }
}
