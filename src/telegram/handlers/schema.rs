//! Dispatcher schema: route table construction and teloxide wiring.

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::callbacks::handle_stats;
use super::commands::handle_start;
use super::types::{HandlerDeps, HandlerError};
use crate::telegram::event::Event;
use crate::telegram::menu;
use crate::telegram::middleware::{compose, endpoint};
use crate::telegram::router::{MatchSpec, Router};
use crate::telegram::Bot;

/// Builds the route table: one registration per user-facing operation, each
/// wrapped in the full middleware chain at registration time.
pub fn build_router(deps: &HandlerDeps) -> Router {
    let mut router = Router::new();

    router.register(
        MatchSpec::Command("start"),
        compose(Arc::clone(&deps.db_pool), deps.admin_ids.clone(), endpoint(handle_start)),
    );
    router.register(
        MatchSpec::CallbackData(menu::STATS_CALLBACK),
        compose(Arc::clone(&deps.db_pool), deps.admin_ids.clone(), endpoint(handle_stats)),
    );

    router
}

/// Creates the main dispatcher schema for the Telegram bot.
///
/// This function returns a handler tree that can be used with teloxide's
/// Dispatcher. The same schema is used in production and in integration
/// tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let router = Arc::new(build_router(&deps));
    let router_commands = Arc::clone(&router);
    let router_callbacks = Arc::clone(&router);

    dptree::entry()
        .branch(
            Update::filter_message()
                .filter(|msg: Message| msg.text().map(|text| text.starts_with('/')).unwrap_or(false))
                .endpoint(move |bot: Bot, msg: Message| {
                    let router = Arc::clone(&router_commands);
                    async move {
                        router.dispatch(bot, Event::Command(msg)).await;
                        Ok(())
                    }
                }),
        )
        .branch(
            Update::filter_callback_query().endpoint(move |bot: Bot, query: CallbackQuery| {
                let router = Arc::clone(&router_callbacks);
                async move {
                    router.dispatch(bot, Event::Callback(query)).await;
                    Ok(())
                }
            }),
        )
}
