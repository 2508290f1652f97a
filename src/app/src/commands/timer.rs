//! Timer command definitions.
//!
//! The Shell owns the clock: the Core asks it to fire after a delay and
//! hears back once the timer fired or was cancelled. Timers are identified
//! by kind and id; a cancelled `Start` resolves with `Cancelled`.

use crux_core::{capability::Operation, command, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// What a timer is for, so the Core can route its output
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerKind {
    WifiPoll,
    SaveTimeout,
}

// Operations that the Shell needs to perform for timers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerOperation {
    Start {
        id: u64,
        kind: TimerKind,
        millis: u64,
    },
    Cancel {
        id: u64,
        kind: TimerKind,
    },
}

// The output from timer operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerOutput {
    Fired { id: u64, kind: TimerKind },
    Cancelled { id: u64, kind: TimerKind },
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

/// Command-based timer API
pub struct Timer<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Timer<Effect, Event>
where
    Effect: Send + From<crux_core::Request<TimerOperation>> + 'static,
    Event: Send + 'static,
{
    /// Ask the Shell to fire timer `id` after `millis` milliseconds
    pub fn start(id: u64, kind: TimerKind, millis: u64) -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(TimerOperation::Start { id, kind, millis })
    }

    /// Ask the Shell to drop timer `id` if it has not fired yet
    pub fn cancel(id: u64, kind: TimerKind) -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(TimerOperation::Cancel { id, kind })
    }
}

/// Request builder for timer operations
#[must_use]
pub struct RequestBuilder<Effect, Event> {
    operation: TimerOperation,
    _effect: PhantomData<Effect>,
    _event: PhantomData<fn() -> Event>,
}

impl<Effect, Event> RequestBuilder<Effect, Event>
where
    Effect: Send + From<crux_core::Request<TimerOperation>> + 'static,
    Event: Send + 'static,
{
    fn new(operation: TimerOperation) -> Self {
        Self {
            operation,
            _effect: PhantomData,
            _event: PhantomData,
        }
    }

    /// Build the request into a Command RequestBuilder
    pub fn build(
        self,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = TimerOutput>> {
        command::RequestBuilder::new(move |ctx| async move {
            Command::request_from_shell(self.operation)
                .into_future(ctx)
                .await
        })
    }
}
