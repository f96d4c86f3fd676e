//! Bot subprocess supervision.
//!
//! One bot process per call session. The registry spawns processes, derives
//! their status on demand, and kills everything on shutdown. There is no
//! queuing, no backpressure and no restart policy: a crashed bot simply
//! reports `exited`.

use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tokio::process::{Child, Command};
use tracing::{info, warn};

/// Maximum number of live bot instances allowed per room.
pub const MAX_BOTS_PER_ROOM: usize = 1;

/// How long after spawn a live bot reports `starting` rather than `running`.
/// The supervisor gets no readiness signal from the bot, so this is a fixed
/// grace window.
const STARTUP_GRACE: Duration = Duration::from_secs(2);

/// Observable status of a bot process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    Starting,
    Running,
    Exited,
}

#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("Failed to spawn bot process: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Spawned bot process has no pid")]
    NoPid,
}

/// One supervised bot subprocess serving one session.
struct BotProcess {
    child: Child,
    room_url: String,
    spawned_at: Instant,
}

/// In-memory registry of bot processes, keyed by pid.
///
/// No persistence across supervisor restarts: an orphaned bot from a crashed
/// supervisor is deliberately left alone.
#[derive(Default)]
pub struct BotRegistry {
    procs: Mutex<HashMap<u32, BotProcess>>,
}

impl BotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a bot for the given room and register it.
    pub fn spawn(&self, program: &Path, room_url: &str, token: &str) -> Result<u32, SpawnError> {
        let child = Command::new(program)
            .arg("--room-url")
            .arg(room_url)
            .arg("--token")
            .arg(token)
            .kill_on_drop(true)
            .spawn()?;
        let pid = child.id().ok_or(SpawnError::NoPid)?;

        info!(pid, room_url, "Started bot process");
        self.procs.lock().insert(
            pid,
            BotProcess {
                child,
                room_url: room_url.to_string(),
                spawned_at: Instant::now(),
            },
        );
        Ok(pid)
    }

    /// Status of a supervised process, or `None` for a pid this supervisor
    /// never issued.
    pub fn status(&self, pid: u32) -> Option<BotStatus> {
        let mut procs = self.procs.lock();
        let proc = procs.get_mut(&pid)?;
        Some(poll_status(proc))
    }

    /// Number of live bots currently serving a room.
    pub fn live_bots_in_room(&self, room_url: &str) -> usize {
        let mut procs = self.procs.lock();
        procs
            .values_mut()
            .filter(|proc| proc.room_url == room_url)
            .map(|proc| poll_status(proc))
            .filter(|status| *status != BotStatus::Exited)
            .count()
    }

    /// Kill and reap every registered bot. Called on supervisor shutdown.
    pub async fn shutdown(&self) {
        let procs: Vec<(u32, BotProcess)> = self.procs.lock().drain().collect();
        for (pid, mut proc) in procs {
            if let Err(e) = proc.child.kill().await {
                warn!(pid, "Failed to kill bot process: {}", e);
            }
        }
    }
}

fn poll_status(proc: &mut BotProcess) -> BotStatus {
    match proc.child.try_wait() {
        Ok(Some(_)) => BotStatus::Exited,
        Ok(None) if proc.spawned_at.elapsed() < STARTUP_GRACE => BotStatus::Starting,
        Ok(None) => BotStatus::Running,
        Err(e) => {
            warn!("Failed to poll bot process: {}", e);
            BotStatus::Exited
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // Bot stand-in that ignores its arguments and behaves as scripted.
    fn fake_bot(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fake-bot");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_spawned_bot_reports_starting_then_exited() {
        let dir = TempDir::new().unwrap();
        let program = fake_bot(&dir, "sleep 30");

        let registry = BotRegistry::new();
        let pid = registry
            .spawn(&program, "https://example.daily.co/room-a", "tok")
            .unwrap();

        // Immediately after spawn: alive, inside the grace window.
        assert_eq!(registry.status(pid), Some(BotStatus::Starting));
        assert_eq!(
            registry.live_bots_in_room("https://example.daily.co/room-a"),
            1
        );

        registry.shutdown().await;
    }

    #[tokio::test]
    async fn test_exited_bot_reports_exited() {
        let dir = TempDir::new().unwrap();
        let program = fake_bot(&dir, "exit 0");

        let registry = BotRegistry::new();
        let pid = registry
            .spawn(&program, "https://example.daily.co/room-b", "tok")
            .unwrap();

        // Poll until the child is reaped.
        let mut status = registry.status(pid).unwrap();
        for _ in 0..50 {
            if status == BotStatus::Exited {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            status = registry.status(pid).unwrap();
        }
        assert_eq!(status, BotStatus::Exited);
        assert_eq!(
            registry.live_bots_in_room("https://example.daily.co/room-b"),
            0
        );
    }

    #[tokio::test]
    async fn test_unknown_pid_has_no_status() {
        let registry = BotRegistry::new();
        assert_eq!(registry.status(424_242), None);
    }

    #[tokio::test]
    async fn test_spawn_missing_program_fails() {
        let registry = BotRegistry::new();
        let err = registry.spawn(
            Path::new("/nonexistent/frontdesk-bot"),
            "https://example.daily.co/room-c",
            "tok",
        );
        assert!(err.is_err());
    }
}
