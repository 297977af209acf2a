//! Liveness checks for recorded PIDs.

use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, System};

/// Check if a PID exists (zombies included).
///
/// Uses `kill` with the null signal, which checks for existence without
/// delivering anything.
#[cfg(unix)]
pub fn pid_exists(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal;
    use nix::unistd::Pid as NixPid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    match signal::kill(NixPid::from_raw(raw), None) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false, // No such process
        Err(_) => true,             // Process exists but we lack permission
    }
}

#[cfg(not(unix))]
pub fn pid_exists(pid: u32) -> bool {
    pid_running(pid)
}

/// Check if a PID belongs to a process that is actually running.
///
/// Zombies and dead table entries count as not running.
pub fn pid_running(pid: u32) -> bool {
    let pid = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

    system
        .process(pid)
        .is_some_and(|process| !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_is_running() {
        let self_pid = std::process::id();
        assert!(pid_exists(self_pid));
        assert!(pid_running(self_pid));
    }

    #[test]
    #[cfg(unix)]
    fn impossible_pid_is_absent() {
        // Above every platform's pid_max
        assert!(!pid_exists(2_000_000_000));
        assert!(!pid_running(2_000_000_000));
    }

    #[test]
    #[cfg(unix)]
    fn reaped_child_is_not_running() {
        let mut child = std::process::Command::new("true").spawn().expect("spawn true");
        let pid = child.id();
        child.wait().expect("wait");

        assert!(!pid_running(pid));
    }
}
