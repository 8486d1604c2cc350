//! Lifecycle of the work done for a single address.
//!
//! ```text
//! Pending -> Probing -> Unreachable
//!                    -> ProbeOk -> Resolving -> Resolved
//! ```

use std::fmt;
use std::net::Ipv4Addr;

use tracing::{error, trace};

use super::SweepContext;
use super::resolver::{self, ResolutionResult};
use crate::report::HostRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Probing,
    Unreachable,
    ProbeOk,
    Resolving,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    StartProbe,
    ProbeFinished { reachable: bool },
    StartResolve,
    ResolveFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: TaskState,
    pub event: TaskEvent,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} cannot handle {:?}", self.from, self.event)
    }
}

impl TaskState {
    pub fn advance(self, event: TaskEvent) -> Result<TaskState, InvalidTransition> {
        use TaskEvent::*;
        use TaskState::*;

        match (self, event) {
            (Pending, StartProbe) => Ok(Probing),
            (Probing, ProbeFinished { reachable: true }) => Ok(ProbeOk),
            (Probing, ProbeFinished { reachable: false }) => Ok(Unreachable),
            (ProbeOk, StartResolve) => Ok(Resolving),
            (Resolving, ResolveFinished) => Ok(Resolved),
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Unreachable | TaskState::Resolved)
    }
}

pub(crate) struct AddressTask {
    addr: Ipv4Addr,
    state: TaskState,
}

impl AddressTask {
    pub(crate) fn new(addr: Ipv4Addr) -> Self {
        Self {
            addr,
            state: TaskState::Pending,
        }
    }

    /// Probes the address and, if it answered, resolves its name.
    pub(crate) async fn run(mut self, ctx: &SweepContext) -> HostRecord {
        self.transition(TaskEvent::StartProbe);
        let probe = ctx.probe(self.addr).await;
        self.transition(TaskEvent::ProbeFinished {
            reachable: probe.reachable,
        });

        if self.state == TaskState::Unreachable {
            return HostRecord::new(probe, None);
        }

        self.transition(TaskEvent::StartResolve);
        let resolution: ResolutionResult =
            resolver::resolve(ctx.resolver.as_ref(), self.addr, ctx.settings.timeout).await;
        self.transition(TaskEvent::ResolveFinished);

        HostRecord::new(probe, Some(resolution))
    }

    fn transition(&mut self, event: TaskEvent) {
        match self.state.advance(event) {
            Ok(next) => {
                trace!("{}: {:?} -> {:?}", self.addr, self.state, next);
                self.state = next;
            }
            Err(e) => error!("{}: {e}", self.addr),
        }
    }
}
