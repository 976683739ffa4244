//! The thin coordinator wrapping [`Decimator`] with abort/progress
//! plumbing and a mutex-shared mesh handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use meshcore::HalfEdgeMesh;
use tracing::{error, info};

use crate::config::{DecimateConfig, DecimateError};
use crate::decimator::{Decimator, StepOutcome};

/// A mesh shared between a decimation thread and a reader thread (spec:
/// the Mesh's own lock, acquired by the UI while reading geometry and by
/// the Decimator for the entire duration of a `start()` call).
pub type SharedMesh = Arc<Mutex<HalfEdgeMesh>>;

/// Cooperative abort signal. Cheap to clone and to flip from a foreign
/// thread; checked between iterations, never inside one.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The result of a completed (or aborted) decimation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOutcome {
    pub final_face_count: u32,
    pub aborted: bool,
}

/// Runs a `Decimator` to completion against one mesh.
pub struct Driver {
    abort_handle: AbortHandle,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            abort_handle: AbortHandle::new(),
        }
    }

    /// A clone of this driver's abort handle, for a foreign thread to call
    /// `abort()` on while `run` executes elsewhere.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort_handle.clone()
    }

    /// Request that the current (or next) `run` stop at its next
    /// iteration boundary. Cooperative: does not interrupt work in
    /// progress.
    pub fn abort(&self) {
        self.abort_handle.abort();
    }

    /// Run a full decimation pass against `mesh`.
    ///
    /// `on_progress` is called after every iteration with the current
    /// progress fraction; returning `true` requests abort, equivalent to
    /// calling [`Driver::abort`]. Regardless of how the loop exits
    /// (target reached, drained with no progress, or aborted),
    /// `cleanup_data` and `recompute_normals` are always run before
    /// returning.
    pub fn run(
        &self,
        mesh: &mut HalfEdgeMesh,
        config: DecimateConfig,
        mut on_progress: impl FnMut(f32) -> bool,
    ) -> Result<DriverOutcome, DecimateError> {
        self.abort_handle.0.store(false, Ordering::Relaxed);

        // cleanup/recompute run whenever the loop exits cleanly (finished
        // or aborted); a fatal mesh error skips them and propagates as-is,
        // since re-running fan-based operations against known-corrupted
        // topology could only compound the failure.
        let result = self.run_inner(mesh, config, &mut on_progress)?;

        mesh.cleanup_data();
        mesh.recompute_normals()?;

        Ok(result)
    }

    fn run_inner(
        &self,
        mesh: &mut HalfEdgeMesh,
        config: DecimateConfig,
        on_progress: &mut impl FnMut(f32) -> bool,
    ) -> Result<DriverOutcome, DecimateError> {
        let mut decimator = Decimator::new(mesh, config)?;
        let mut aborted = false;

        loop {
            if self.abort_handle.is_aborted() {
                aborted = true;
                break;
            }

            match decimator.iterate(mesh) {
                Ok(StepOutcome::Continue) => {}
                Ok(StepOutcome::Done) => break,
                Err(e) => {
                    error!(error = %e, "decimation aborted by mesh error");
                    return Err(e);
                }
            }

            if on_progress(decimator.progress()) {
                aborted = true;
                break;
            }
        }

        info!(
            final_face_count = decimator.current_face_count(),
            aborted, "decimation run finished"
        );

        Ok(DriverOutcome {
            final_face_count: decimator.current_face_count(),
            aborted,
        })
    }

    /// Runs `mesh`'s mutex-guarded counterpart: acquires the lock for the
    /// duration of the run, matching spec.md §5's concurrency model where
    /// "only one Decimator may run against a Mesh at a time".
    pub fn run_shared(
        &self,
        mesh: &SharedMesh,
        config: DecimateConfig,
        on_progress: impl FnMut(f32) -> bool,
    ) -> Result<DriverOutcome, DecimateError> {
        let mut guard = mesh.lock().expect("mesh mutex poisoned");
        self.run(&mut guard, config, on_progress)
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshcore::test_fixtures;

    #[test]
    fn run_reaches_target_on_planar_grid() {
        let (mut mesh, _, _) = test_fixtures::planar_grid(10, 10);
        let initial = mesh.face_count();
        let config = DecimateConfig::new((initial / 4) as u32);

        let driver = Driver::new();
        let outcome = driver.run(&mut mesh, config, |_p| false).unwrap();

        assert!(!outcome.aborted);
        assert!(outcome.final_face_count <= initial as u32);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn abort_stops_run_and_leaves_valid_mesh() {
        let (mut mesh, _, _) = test_fixtures::planar_grid(10, 10);
        let config = DecimateConfig::new(4);

        let driver = Driver::new();
        let mut calls = 0;
        let outcome = driver
            .run(&mut mesh, config, |_p| {
                calls += 1;
                calls >= 3
            })
            .unwrap();

        assert!(outcome.aborted);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn tetrahedron_run_is_a_no_op() {
        let mut mesh = test_fixtures::tetrahedron();
        let config = DecimateConfig::new(0);

        let driver = Driver::new();
        let outcome = driver.run(&mut mesh, config, |_p| false).unwrap();

        assert!(!outcome.aborted);
        assert_eq!(outcome.final_face_count, 4);
        assert_eq!(mesh.face_count(), 4);
    }
}
