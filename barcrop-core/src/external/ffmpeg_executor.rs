// ============================================================================
// barcrop-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. It defines traits and implementations for executing FFmpeg commands
// and handling their events and lifecycle.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
//
// A spawned SidecarProcess that is dropped before `wait` returned is killed
// and reaped, so a failing file never leaves an ffmpeg process behind.

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use crate::external::ffmpeg_builder::FfmpegInvocation;
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns ffmpeg with the given arguments.
    fn spawn(&self, invocation: &FfmpegInvocation) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess {
    child: SidecarChild,
    reaped: bool,
}

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.child.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error(
                "ffmpeg (sidecar - get iter)",
                ExitStatus::default(), // Placeholder status
                e.to_string(),
            )
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        let status = self
            .child
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for SidecarProcess {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        log::debug!("Terminating ffmpeg process that was not waited on");
        if let Err(e) = self.child.kill() {
            log::debug!("Failed to kill ffmpeg process: {}", e);
        }
        let _ = self.child.wait();
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, invocation: &FfmpegInvocation) -> CoreResult<Self::Process> {
        log::debug!("Running: {}", invocation);
        let mut cmd = FfmpegCommand::new();
        cmd.args(invocation.args());
        cmd.spawn()
            .map(|child| SidecarProcess {
                child,
                reaped: false,
            })
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}
