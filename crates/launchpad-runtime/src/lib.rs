//! OS-level half of launchpad: PID markers, signals, the launch lock and the
//! single-instance process supervisor.

#![deny(unsafe_code)]

pub mod pidfile;
pub mod process;

pub use pidfile::{PidMarker, PidRegistry, SweepReport, pid_exists, pid_running};
pub use process::{
    KillOutcome, LaunchLock, ProcessState, ProcessSupervisor, SupervisedProcess, TracingSink,
};
