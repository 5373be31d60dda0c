// crates/credit-ledger-core/src/runtime/router.rs
// ============================================================================
// Module: Ledger Router
// Description: One actor task per client, addressed by client id.
// Purpose: Serialize commands per client while clients run in parallel.
// Dependencies: crate::{audit, core, interfaces, runtime}, tokio
// ============================================================================

//! ## Overview
//! [`LedgerRouter`] owns a bounded mailbox per client. Each mailbox is
//! drained by one tokio task that runs commands strictly one at a time,
//! executing each on the blocking pool because stores are synchronous.
//!
//! An actor with an empty mailbox for the idle timeout closes its mailbox,
//! drains anything already queued, and exits. A send that races with the
//! close fails, and the router respawns the actor and resends. For the short
//! overlap where a draining actor and its replacement coexist, store
//! transactions keep their commands serialized.
//!
//! The router hands the current policy snapshot to every command, so a
//! reload applies to the next command without restarting actors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::oneshot;

use crate::audit::LedgerAuditSink;
use crate::audit::OperationAuditEvent;
use crate::audit::OperationAuditEventParams;
use crate::audit::PolicyAuditEvent;
use crate::audit::SweepAuditEvent;
use crate::core::ClientId;
use crate::core::Clock;
use crate::core::LedgerPolicy;
use crate::core::LedgerRequest;
use crate::core::LedgerResponse;
use crate::interfaces::LedgerStore;
use crate::runtime::ledger::ClientLedger;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Default idle time before an actor retires.
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
/// Default per-client mailbox capacity.
const DEFAULT_MAILBOX_CAPACITY: usize = 64;
/// Sends attempted before giving up on a client.
const MAX_SEND_ATTEMPTS: usize = 3;

/// Actor lifecycle settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorSettings {
    /// Idle time before an actor retires.
    pub idle_timeout: Duration,
    /// Bounded mailbox capacity per client.
    pub mailbox_capacity: usize,
}

impl Default for ActorSettings {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Message delivered to a client actor.
struct Command {
    /// Request to execute.
    request: LedgerRequest,
    /// Policy snapshot taken at dispatch time.
    policy: Arc<LedgerPolicy>,
    /// Reply channel.
    reply: oneshot::Sender<LedgerResponse>,
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Routes ledger commands to per-client actors.
pub struct LedgerRouter {
    /// Shared store.
    store: Arc<dyn LedgerStore>,
    /// Shared clock.
    clock: Arc<dyn Clock>,
    /// Audit sink.
    audit: Arc<dyn LedgerAuditSink>,
    /// Actor settings.
    settings: ActorSettings,
    /// Current policy snapshot.
    policy: RwLock<Arc<LedgerPolicy>>,
    /// Live mailboxes by client.
    actors: Mutex<HashMap<ClientId, mpsc::Sender<Command>>>,
}

impl LedgerRouter {
    /// Creates a router with no running actors.
    #[must_use]
    pub fn new(
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
        policy: LedgerPolicy,
        settings: ActorSettings,
        audit: Arc<dyn LedgerAuditSink>,
    ) -> Self {
        Self {
            store,
            clock,
            audit,
            settings,
            policy: RwLock::new(Arc::new(policy)),
            actors: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the current policy snapshot.
    #[must_use]
    pub fn policy(&self) -> Arc<LedgerPolicy> {
        Arc::clone(&self.policy.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replaces the policy snapshot used by subsequent commands.
    pub fn reload_policy(&self, policy: LedgerPolicy, source: Option<String>) {
        let version = policy.version;
        *self.policy.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(policy);
        self.audit.record_policy(&PolicyAuditEvent::new(version, source));
    }

    /// Returns the number of clients with a live actor.
    #[must_use]
    pub fn active_actors(&self) -> usize {
        self.actors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|sender| !sender.is_closed())
            .count()
    }

    /// Executes a command on the client's actor.
    ///
    /// Never fails: infrastructure problems become an `INTERNAL` response.
    pub async fn dispatch(&self, client_id: &ClientId, request: LedgerRequest) -> LedgerResponse {
        let (reply, receiver) = oneshot::channel();
        let mut command = Command {
            request,
            policy: self.policy(),
            reply,
        };
        for _ in 0 .. MAX_SEND_ATTEMPTS {
            let sender = self.mailbox(client_id);
            match sender.send(command).await {
                Ok(()) => return receiver.await.unwrap_or_else(|_| LedgerResponse::internal()),
                Err(mpsc::error::SendError(returned)) => {
                    self.forget(client_id, &sender);
                    command = returned;
                }
            }
        }
        LedgerResponse::internal()
    }

    /// Returns the live mailbox for a client, spawning an actor if needed.
    fn mailbox(&self, client_id: &ClientId) -> mpsc::Sender<Command> {
        let mut actors = self.actors.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = actors.get(client_id)
            && !sender.is_closed()
        {
            return sender.clone();
        }
        actors.retain(|_, sender| !sender.is_closed());

        let (sender, receiver) = mpsc::channel(self.settings.mailbox_capacity.max(1));
        let ledger = Arc::new(ClientLedger::new(
            client_id.clone(),
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
        ));
        tokio::spawn(run_actor(
            ledger,
            receiver,
            self.settings.idle_timeout,
            Arc::clone(&self.audit),
        ));
        actors.insert(client_id.clone(), sender.clone());
        sender
    }

    /// Drops a mailbox entry if it still points at the given channel.
    fn forget(&self, client_id: &ClientId, sender: &mpsc::Sender<Command>) {
        let mut actors = self.actors.lock().unwrap_or_else(PoisonError::into_inner);
        if actors.get(client_id).is_some_and(|current| current.same_channel(sender)) {
            actors.remove(client_id);
        }
    }
}

// ============================================================================
// SECTION: Actor
// ============================================================================

/// Actor loop for one client.
async fn run_actor(
    ledger: Arc<ClientLedger>,
    mut receiver: mpsc::Receiver<Command>,
    idle_timeout: Duration,
    audit: Arc<dyn LedgerAuditSink>,
) {
    loop {
        match tokio::time::timeout(idle_timeout, receiver.recv()).await {
            Ok(Some(command)) => handle(&ledger, audit.as_ref(), command).await,
            Ok(None) => return,
            Err(_) => {
                receiver.close();
                while let Some(command) = receiver.recv().await {
                    handle(&ledger, audit.as_ref(), command).await;
                }
                return;
            }
        }
    }
}

/// Executes one command on the blocking pool and replies.
async fn handle(ledger: &Arc<ClientLedger>, audit: &dyn LedgerAuditSink, command: Command) {
    let Command {
        request,
        policy,
        reply,
    } = command;
    let operation = request.label();
    let policy_version = policy.version;
    let worker = Arc::clone(ledger);
    let joined = tokio::task::spawn_blocking(move || worker.execute(&policy, &request)).await;

    let (response, error) = match joined {
        Ok(Ok(outcome)) => {
            if let Some(sweep) = outcome.sweep {
                audit.record_sweep(&SweepAuditEvent::new(
                    ledger.client_id().as_str(),
                    sweep.day,
                    sweep.deleted,
                    sweep.truncated,
                ));
            }
            (outcome.response, None)
        }
        Ok(Err(err)) => (LedgerResponse::internal(), Some(err.to_string())),
        Err(err) => (LedgerResponse::internal(), Some(err.to_string())),
    };

    audit.record(&OperationAuditEvent::new(OperationAuditEventParams {
        client_id: ledger.client_id().as_str().to_string(),
        operation,
        status: response.status,
        code: response.error_code().map(str::to_string),
        policy_version,
        error,
    }));
    let _ = reply.send(response);
}
