use core::time::Duration;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub game: GameConfig,
    /// How long a mines session accepts reveals.
    pub time_budget_secs: u64,
    /// How long a finished session keeps answering after its deadline, before a sweep drops it.
    pub retention_secs: u64,
}

impl RegistryConfig {
    pub const fn time_budget(&self) -> Duration {
        Duration::from_secs(self.time_budget_secs)
    }

    pub const fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::STANDARD,
            time_budget_secs: 600,
            retention_secs: 3600,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub expired: usize,
    pub evicted: usize,
}

type SessionSlot = Arc<Mutex<MinesSession>>;
type MatchSlot = Arc<Mutex<RpsMatch>>;

/// Process-wide store of every mines session and RPS match.
///
/// The id maps are only locked long enough to find, insert or remove a slot.
/// Each session or match has its own mutex, so a transition on one never
/// waits on another.
#[derive(Debug)]
pub struct SessionRegistry<C = MonotonicClock> {
    config: RegistryConfig,
    clock: C,
    sessions: RwLock<HashMap<SessionId, SessionSlot>>,
    matches: RwLock<HashMap<GroupId, MatchSlot>>,
}

impl SessionRegistry<MonotonicClock> {
    pub fn new(config: RegistryConfig) -> Result<Self> {
        Self::with_clock(config, MonotonicClock)
    }
}

impl Default for SessionRegistry<MonotonicClock> {
    fn default() -> Self {
        Self::build(RegistryConfig::default(), MonotonicClock)
    }
}

impl<C: Clock> SessionRegistry<C> {
    pub fn with_clock(config: RegistryConfig, clock: C) -> Result<Self> {
        config.game.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: RegistryConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            sessions: RwLock::default(),
            matches: RwLock::default(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn session_count(&self) -> usize {
        read(&self.sessions).len()
    }

    pub fn match_count(&self) -> usize {
        read(&self.matches).len()
    }

    /// Opens a mines session on a freshly generated layout.
    pub fn start_mines(&self) -> Result<(SessionId, GridSnapshot)> {
        let layout = RandomMineLayoutGenerator::from_entropy().generate(self.config.game)?;
        Ok(self.start_mines_with_layout(layout))
    }

    /// Opens a mines session on a caller-chosen layout.
    pub fn start_mines_with_layout(&self, layout: MineLayout) -> (SessionId, GridSnapshot) {
        let mut sessions = write(&self.sessions);

        let id = loop {
            let candidate = new_session_id();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
            log::debug!("session id {} taken, drawing another", candidate);
        };

        let session = MinesSession::new(
            id.clone(),
            layout,
            self.config.time_budget(),
            self.clock.now(),
        );
        let snapshot = GridSnapshot::from_session(&session);
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));

        log::debug!("[{}] opened, {} sessions live", id, sessions.len());
        (id, snapshot)
    }

    pub fn reveal(&self, id: &str, row: Coord, col: Coord, actor: &str) -> Result<RevealOutcome> {
        self.with_session(id, |session| {
            session.reveal((row, col), actor, self.clock.now())
        })?
    }

    /// Same as [`Self::reveal`], plus the board as it stood right after this reveal.
    pub fn reveal_with_grid(
        &self,
        id: &str,
        row: Coord,
        col: Coord,
        actor: &str,
    ) -> Result<(RevealOutcome, GridSnapshot)> {
        self.with_session(id, |session| {
            let outcome = session.reveal((row, col), actor, self.clock.now())?;
            Ok((outcome, GridSnapshot::from_session(session)))
        })?
    }

    pub fn snapshot(&self, id: &str) -> Result<GridSnapshot> {
        self.with_session(id, |session| GridSnapshot::from_session(session))
    }

    pub fn cancel_mines(&self, id: &str) -> bool {
        let removed = write(&self.sessions).remove(id).is_some();
        if removed {
            log::debug!("[{}] cancelled", id);
        }
        removed
    }

    pub fn start_rps(&self, group: GroupId) -> Result<()> {
        let mut matches = write(&self.matches);

        if let Some(existing) = matches.get(&group) {
            // a resolved match may linger until its picker removes it
            if !lock(existing).is_closed() {
                return Err(GameError::GroupBusy);
            }
        }

        matches.insert(group, Arc::new(Mutex::new(RpsMatch::new(group))));
        log::debug!("[group {}] rps opened", group);
        Ok(())
    }

    pub fn pick_move(
        &self,
        group: GroupId,
        participant: ParticipantId,
        name: &str,
        choice: Move,
    ) -> Result<MatchStatus> {
        let slot = read(&self.matches)
            .get(&group)
            .cloned()
            .ok_or(GameError::GroupStale)?;

        let status = lock(&slot).select_choice(participant, name, choice)?;

        if matches!(status, MatchStatus::Resolved { .. }) {
            let mut matches = write(&self.matches);
            if matches.get(&group).is_some_and(|current| Arc::ptr_eq(current, &slot)) {
                matches.remove(&group);
            }
        }
        Ok(status)
    }

    /// Drops the group's match, returns whether an unresolved one existed.
    pub fn cancel_rps(&self, group: GroupId) -> bool {
        let Some(slot) = write(&self.matches).remove(&group) else {
            return false;
        };

        let mut round = lock(&slot);
        if round.is_closed() {
            false
        } else {
            round.close();
            log::debug!("[group {}] rps cancelled", group);
            true
        }
    }

    /// Expires overdue sessions, then evicts finished ones past their retention.
    pub fn sweep(&self) -> SweepReport {
        let now = self.clock.now();
        let retention = self.config.retention();
        let slots: Vec<(SessionId, SessionSlot)> = read(&self.sessions)
            .iter()
            .map(|(id, slot)| (id.clone(), slot.clone()))
            .collect();

        let mut report = SweepReport::default();
        let mut stale = Vec::new();
        for (id, slot) in slots {
            let mut session = lock(&slot);
            if session.expire_if_due(now) {
                report.expired += 1;
            }
            if session.is_finished() && session.overdue_by(now) > retention {
                stale.push(id);
            }
        }

        if !stale.is_empty() {
            let mut sessions = write(&self.sessions);
            for id in &stale {
                if sessions.remove(id).is_some() {
                    report.evicted += 1;
                }
            }
        }

        if report != SweepReport::default() {
            log::info!(
                "sweep expired {} and evicted {} sessions",
                report.expired,
                report.evicted
            );
        }
        report
    }

    fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut MinesSession) -> T) -> Result<T> {
        let slot = read(&self.sessions).get(id).cloned().ok_or_else(|| {
            log::trace!("[{}] no such session", id);
            GameError::SessionNotFound
        })?;

        let mut session = lock(&slot);
        Ok(f(&mut session))
    }
}

/// Eight lowercase hex characters.
fn new_session_id() -> SessionId {
    format!("{:08x}", rand::random::<u32>())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        log::warn!("recovering poisoned entry lock");
        poisoned.into_inner()
    })
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| {
        log::warn!("recovering poisoned map lock");
        poisoned.into_inner()
    })
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| {
        log::warn!("recovering poisoned map lock");
        poisoned.into_inner()
    })
}
