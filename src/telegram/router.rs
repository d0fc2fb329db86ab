//! Route table: match specifications mapped to composed handler chains.
//!
//! Routes are evaluated in registration order and the first match wins, so
//! overlapping specifications resolve deterministically. Events matching no
//! route are dropped silently.

use crate::telegram::event::Event;
use crate::telegram::middleware::EventHandler;
use crate::telegram::Bot;

/// How a route decides whether it wants an event.
///
/// A closed set of matchers instead of arbitrary predicate closures: what a
/// route matches on is visible at the registration site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSpec {
    /// Exact command token: `Command("start")` matches `/start` and
    /// `/start@botname`, arguments ignored.
    Command(&'static str),
    /// Exact callback datum.
    CallbackData(&'static str),
    /// Callback datum prefix, for `namespace:` style data.
    CallbackPrefix(&'static str),
}

impl MatchSpec {
    fn matches(&self, event: &Event) -> bool {
        match self {
            MatchSpec::Command(name) => event.command() == Some(*name),
            MatchSpec::CallbackData(data) => event.callback_data() == Some(*data),
            MatchSpec::CallbackPrefix(prefix) => event
                .callback_data()
                .map(|data| data.starts_with(*prefix))
                .unwrap_or(false),
        }
    }
}

struct Route {
    spec: MatchSpec,
    handler: EventHandler,
}

/// Ordered route table.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a route. Registration order is evaluation order.
    pub fn register(&mut self, spec: MatchSpec, handler: EventHandler) {
        self.routes.push(Route { spec, handler });
    }

    /// Dispatches an event to the first matching route.
    ///
    /// # Returns
    /// `true` when a route ran, `false` when the event was dropped.
    pub async fn dispatch(&self, bot: Bot, event: Event) -> bool {
        for route in &self.routes {
            if route.spec.matches(&event) {
                (*route.handler)(bot, event).await;
                return true;
            }
        }

        log::debug!("No route matched {}; dropping event", event.describe());
        false
    }
}
