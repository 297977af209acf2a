//! Signal delivery by PID, for instances we may not have a `Child` handle for.

use std::io;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::{self, Pid};

/// What happened to the signal target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    /// The signal was delivered.
    Signalled,
    /// No such process (or process group).
    AlreadyGone,
}

/// Send SIGKILL to the process group led by `pid`, falling back to `pid` alone.
///
/// Supervised children are spawned as group leaders, so this also takes down
/// anything they forked. A marker left by a crash may point at a PID that is
/// not a group leader, hence the fallback.
pub fn force_kill(pid: u32) -> io::Result<KillOutcome> {
    #[cfg(unix)]
    {
        signal_group(pid, Signal::SIGKILL)
    }

    #[cfg(not(unix))]
    {
        unsupported(pid)
    }
}

/// Send SIGTERM to the process group led by `pid`, falling back to `pid` alone.
pub fn terminate(pid: u32) -> io::Result<KillOutcome> {
    #[cfg(unix)]
    {
        signal_group(pid, Signal::SIGTERM)
    }

    #[cfg(not(unix))]
    {
        unsupported(pid)
    }
}

#[cfg(unix)]
fn signal_group(pid: u32, sig: Signal) -> io::Result<KillOutcome> {
    let raw = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("PID {pid} out of range")))?;
    if raw <= 0 || pid == std::process::id() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to signal PID {pid}"),
        ));
    }
    let target = Pid::from_raw(raw);

    if target != unistd::getpgrp() {
        match signal::killpg(target, sig) {
            Ok(()) => return Ok(KillOutcome::Signalled),
            Err(Errno::ESRCH) => {
                // Not a group leader (or gone) - try the PID itself
            }
            Err(e) => return Err(io::Error::other(e)),
        }
    }

    match signal::kill(target, sig) {
        Ok(()) => Ok(KillOutcome::Signalled),
        Err(Errno::ESRCH) => Ok(KillOutcome::AlreadyGone),
        Err(e) => Err(io::Error::other(e)),
    }
}

#[cfg(not(unix))]
fn unsupported(pid: u32) -> io::Result<KillOutcome> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("signalling PID {pid} is not supported on this platform"),
    ))
}
