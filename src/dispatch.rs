//! Background fetching.
//!
//! Every request runs on its own thread and reports back as a
//! [`StateEvent`] over a channel, so the interaction thread never blocks.
//! Requests are not cancelled; ordering is settled by the reducer.

use crate::api::StatsSource;
use crate::dashboard::StateEvent;
use crate::models::Region;
use crate::selection::RequestTicket;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct Dispatcher<S> {
    source: Arc<S>,
    sender: mpsc::Sender<StateEvent>,
    receiver: mpsc::Receiver<StateEvent>,
    in_flight: usize,
}

impl<S> Dispatcher<S>
where
    S: StatsSource + Send + Sync + 'static,
{
    pub fn new(source: Arc<S>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            source,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Number of requests started and not yet received.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn spawn(&mut self, job: impl FnOnce(&S) -> StateEvent + Send + 'static) {
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let event = job(&source);
            // The receiver is gone only when the dashboard shut down.
            let _ = sender.send(event);
        });
    }

    pub fn spawn_global(&mut self) {
        self.spawn(|s| StateEvent::GlobalFetched(s.global()));
    }

    pub fn spawn_countries(&mut self) {
        self.spawn(|s| StateEvent::CountriesFetched(s.countries()));
    }

    pub fn spawn_history(&mut self, last_days: u32) {
        self.spawn(move |s| StateEvent::HistoryFetched(s.history(&Region::Worldwide, last_days)));
    }

    pub fn spawn_detail(&mut self, ticket: RequestTicket) {
        self.spawn(move |s| {
            let result = s.detail(&ticket.region);
            StateEvent::DetailFetched { ticket, result }
        });
    }

    /// Everything that has arrived so far, in arrival order.
    pub fn poll(&mut self) -> Vec<StateEvent> {
        let events: Vec<StateEvent> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(events.len());
        events
    }

    /// Wait up to `timeout` for the next result.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<StateEvent> {
        let event = self.receiver.recv_timeout(timeout).ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(event)
    }
}
