//! # Mock Addresses
//!
//! Utilities for testing code that talks to an actor without spawning the actor.
//!
//! A [`MockAddress`] owns a background task that receives requests and hands each
//! one to a closure. The closure answers through the request's own response
//! channel, so the code under test sees exactly what a real actor would send.
//!
//! ```ignore
//! let mock = MockAddress::<LogWriter>::new(|request| match request {
//!     LogRequest::Append { respond_to, .. } => { let _ = respond_to.send(Ok(42)); }
//!     _ => {}
//! });
//! let client = LogClient::new(mock.address());
//! // exercise code that uses the client...
//! assert_eq!(mock.calls(), 1);
//! ```

use crate::framework::{Actor, Address};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// An [`Address`] backed by a closure instead of a running actor.
pub struct MockAddress<A: Actor> {
    address: Address<A>,
    calls: Arc<AtomicUsize>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<A: Actor> MockAddress<A> {
    /// Spawns the responder task. Must be called inside a Tokio runtime.
    pub fn new(mut respond: impl FnMut(A::Request) + Send + 'static) -> Self {
        let (sender, mut receiver) = mpsc::channel::<A::Request>(100);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                counter.fetch_add(1, Ordering::SeqCst);
                respond(request);
            }
        });

        Self {
            address: Address::from_sender(sender),
            calls,
            _handle: handle,
        }
    }

    /// A fresh address that feeds the mock.
    pub fn address(&self) -> Address<A> {
        self.address.clone()
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}
