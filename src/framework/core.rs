//! # Core Actor Plumbing
//!
//! ## Key Types
//!
//! - [`Actor`]: The trait implemented by anything that owns state behind a mailbox.
//! - [`Mailbox`]: Runs the message loop for one actor.
//! - [`Address`]: The client-side handle used to send requests.
//! - [`FrameworkError`]: Errors raised when the actor is gone.

use async_trait::async_trait;
use std::fmt::Debug;
use std::ops::ControlFlow;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// State owned by exactly one task, mutated only through requests.
///
/// # Architecture Note
/// The actor never shares its state. Every request is delivered through the
/// [`Mailbox`] and handled to completion before the next one is looked at, so
/// the state needs no `Mutex` even though many tasks hold an [`Address`].
///
/// # Context
/// Dependencies are handed to [`Mailbox::run`] rather than to the constructor.
/// This lets an actor be created before the things it talks to exist.
#[async_trait]
pub trait Actor: Send + 'static {
    /// The request enum this actor understands.
    type Request: Send + Debug + 'static;

    /// Runtime dependencies injected into every handler.
    /// Use `()` if none are needed.
    type Context: Send + Sync + 'static;

    /// Handle one request. Return `ControlFlow::Break(())` to stop the loop.
    async fn handle(&mut self, request: Self::Request, ctx: &Self::Context) -> ControlFlow<()>;

    /// Called once after the loop ends, whatever the reason.
    async fn on_stop(&mut self, _ctx: &Self::Context) {}

    /// Short name used in log fields.
    fn name() -> &'static str {
        std::any::type_name::<Self>()
            .split("::")
            .last()
            .unwrap_or("Unknown")
    }
}

// =============================================================================
// 2. ERRORS & RESPONSES
// =============================================================================

/// Errors that can occur within the actor plumbing itself.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
}

/// The one-shot channel a request carries to send its answer back.
pub type Response<T> = oneshot::Sender<T>;

// =============================================================================
// 3. THE MAILBOX (server half)
// =============================================================================

/// The receiving half of an actor's channel.
pub struct Mailbox<A: Actor> {
    receiver: mpsc::Receiver<A::Request>,
}

/// Creates a bounded mailbox and the address that feeds it.
///
/// `buffer` is the number of requests that may queue before senders wait.
pub fn mailbox<A: Actor>(buffer: usize) -> (Mailbox<A>, Address<A>) {
    let (sender, receiver) = mpsc::channel(buffer);
    (Mailbox { receiver }, Address { sender })
}

impl<A: Actor> Mailbox<A> {
    /// Runs the actor's event loop.
    ///
    /// The loop ends when every [`Address`] has been dropped or when the actor
    /// asks to stop. [`Actor::on_stop`] runs in both cases, and the actor is
    /// handed back so callers can inspect its final state.
    pub async fn run(mut self, mut actor: A, context: A::Context) -> A {
        let actor_name = A::name();
        info!(actor = actor_name, "Actor started");

        while let Some(request) = self.receiver.recv().await {
            debug!(actor = actor_name, ?request, "Request");
            if actor.handle(request, &context).await.is_break() {
                debug!(actor = actor_name, "Stop requested");
                break;
            }
        }

        self.receiver.close();
        actor.on_stop(&context).await;
        info!(actor = actor_name, "Shutdown");
        actor
    }
}

// =============================================================================
// 4. THE ADDRESS (client half)
// =============================================================================

/// A handle for sending requests to an actor.
pub struct Address<A: Actor> {
    sender: mpsc::Sender<A::Request>,
}

impl<A: Actor> Clone for Address<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A: Actor> Address<A> {
    pub(crate) fn from_sender(sender: mpsc::Sender<A::Request>) -> Self {
        Self { sender }
    }

    /// Sends a request built around a fresh response channel and waits for the answer.
    ///
    /// ```ignore
    /// let stats = address.ask(|respond_to| LogRequest::Stats { respond_to }).await?;
    /// ```
    pub async fn ask<T>(
        &self,
        make_request: impl FnOnce(Response<T>) -> A::Request,
    ) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make_request(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }

    /// True once the mailbox has stopped accepting requests.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum CounterRequest {
        Add { n: u64, respond_to: Response<u64> },
        Stop,
    }

    struct Counter {
        total: u64,
        stopped: bool,
    }

    #[async_trait]
    impl Actor for Counter {
        type Request = CounterRequest;
        type Context = u64;

        async fn handle(&mut self, request: CounterRequest, step: &u64) -> ControlFlow<()> {
            match request {
                CounterRequest::Add { n, respond_to } => {
                    self.total += n * step;
                    let _ = respond_to.send(self.total);
                    ControlFlow::Continue(())
                }
                CounterRequest::Stop => ControlFlow::Break(()),
            }
        }

        async fn on_stop(&mut self, _ctx: &u64) {
            self.stopped = true;
        }
    }

    #[tokio::test]
    async fn requests_are_answered_in_order() {
        let (mailbox, address) = mailbox::<Counter>(4);
        let handle = tokio::spawn(mailbox.run(Counter { total: 0, stopped: false }, 2));

        let first = address.ask(|respond_to| CounterRequest::Add { n: 1, respond_to }).await;
        let second = address.ask(|respond_to| CounterRequest::Add { n: 5, respond_to }).await;
        assert_eq!(first, Ok(2));
        assert_eq!(second, Ok(12));

        drop(address);
        let counter = handle.await.unwrap();
        assert!(counter.stopped);
        assert_eq!(counter.total, 12);
    }

    #[tokio::test]
    async fn break_stops_the_loop_and_closes_the_address() {
        let (mailbox, address) = mailbox::<Counter>(4);
        let handle = tokio::spawn(mailbox.run(Counter { total: 0, stopped: false }, 1));

        address.sender.send(CounterRequest::Stop).await.unwrap();
        let counter = handle.await.unwrap();
        assert!(counter.stopped);

        let late = address.ask(|respond_to| CounterRequest::Add { n: 1, respond_to }).await;
        assert_eq!(late, Err(FrameworkError::ActorClosed));
        assert!(address.is_closed());
    }

    #[test]
    fn name_is_the_bare_type_name() {
        assert_eq!(Counter::name(), "Counter");
    }
}
