//! CPU count detection for sizing parallel `make`.

/// Number of CPUs this process may run on.
///
/// Prefers the scheduler affinity mask (Linux), then the core count the
/// standard library reports. Returns `None` when neither is known.
pub fn cpu_count() -> Option<usize> {
  affinity_count().or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
}

#[cfg(target_os = "linux")]
fn affinity_count() -> Option<usize> {
  use nix::sched::{CpuSet, sched_getaffinity};
  use nix::unistd::Pid;

  let set = sched_getaffinity(Pid::from_raw(0)).ok()?;
  let count = (0..CpuSet::count())
    .filter(|&cpu| set.is_set(cpu).unwrap_or(false))
    .count();

  (count > 0).then_some(count)
}

#[cfg(not(target_os = "linux"))]
fn affinity_count() -> Option<usize> {
  None
}
