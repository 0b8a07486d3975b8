//! Synchronous publish/subscribe dispatch of [`Command`]s
//!
//! A handler subscribes either to one concrete command variant ([`Topic::Kind`]) or
//! to a capability shared by many variants ([`Topic::Capability`]). Publishing a
//! command notifies, in order:
//! 1. every handler of its exact kind
//! 2. every handler of each capability it carries, in the command's capability order
//!
//! Within a topic, handlers run in registration order. A handler may publish
//! further commands; those are dispatched to completion before the outer dispatch
//! continues.

use bevy::log::trace;
use std::collections::HashMap;
use std::rc::Rc;

use crate::commands::{Capability, Command, CommandKind};
use crate::context::EditorContext;

/// Subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Kind(CommandKind),
    Capability(Capability),
}

impl From<CommandKind> for Topic {
    fn from(kind: CommandKind) -> Self {
        Topic::Kind(kind)
    }
}

impl From<Capability> for Topic {
    fn from(capability: Capability) -> Self {
        Topic::Capability(capability)
    }
}

/// Command handler. State lives in the [`EditorContext`], not in the handler.
pub type Handler = Rc<dyn Fn(&mut EditorContext, &mut EventBus, &Command)>;

#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<Topic, Vec<Handler>>,
    processed_count: u64,
    last_published: Option<Command>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `topic`. Handlers are never removed.
    pub fn subscribe<F>(&mut self, topic: impl Into<Topic>, handler: F)
    where
        F: Fn(&mut EditorContext, &mut EventBus, &Command) + 'static,
    {
        self.handlers
            .entry(topic.into())
            .or_default()
            .push(Rc::new(handler));
    }

    /// Dispatch a command to every matching handler, depth-first
    pub fn publish(&mut self, ctx: &mut EditorContext, command: impl Into<Command>) {
        let command = command.into();
        self.processed_count += 1;
        self.last_published = Some(command.clone());
        trace!(
            "Publishing {:?} (#{})",
            command.kind(),
            self.processed_count
        );

        let topics = std::iter::once(Topic::Kind(command.kind()))
            .chain(command.capabilities().iter().copied().map(Topic::Capability));
        for topic in topics {
            // Subscriptions made while dispatching apply to later publishes only
            let Some(handlers) = self.handlers.get(&topic).cloned() else {
                continue;
            };
            for handler in handlers {
                handler(ctx, self, &command);
            }
        }
    }

    /// Publish if there is something to publish
    pub fn publish_opt(&mut self, ctx: &mut EditorContext, command: Option<impl Into<Command>>) {
        if let Some(command) = command {
            self.publish(ctx, command);
        }
    }

    /// Number of commands published so far, nested ones included
    pub fn processed_count(&self) -> u64 {
        self.processed_count
    }

    /// Most recently published command
    pub fn last_published(&self) -> Option<&Command> {
        self.last_published.as_ref()
    }

    pub fn subscriber_count(&self, topic: impl Into<Topic>) -> usize {
        self.handlers.get(&topic.into()).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.handlers.len())
            .field("processed_count", &self.processed_count)
            .finish()
    }
}
