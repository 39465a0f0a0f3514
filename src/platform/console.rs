// AgentView - platform/console.rs
//
// Windows release builds use the GUI subsystem, so the process starts with
// no console and stdout goes nowhere. The headless modes attach to the
// console of the shell that launched them before printing anything.
// Everywhere else this is a no-op.

/// Windows-only FFI for the single kernel32 call we need.
#[cfg(target_os = "windows")]
mod ffi {
    /// AttachConsole argument meaning "the console of the parent process".
    pub const ATTACH_PARENT_PROCESS: u32 = u32::MAX;

    #[link(name = "kernel32")]
    unsafe extern "system" {
        /// Returns non-zero on success. Fails if the process already has a
        /// console (debug builds) or the parent has none.
        pub fn AttachConsole(dw_process_id: u32) -> i32;
    }
}

/// Route stdout/stderr to the parent process's console, if there is one.
///
/// When output is redirected to a file the inherited handle is used as-is
/// and attaching is harmless.
#[cfg(target_os = "windows")]
pub fn attach_parent_console() {
    // SAFETY: AttachConsole takes a process id by value and touches no
    // memory owned by this process.
    let attached = unsafe { ffi::AttachConsole(ffi::ATTACH_PARENT_PROCESS) } != 0;
    if !attached {
        tracing::debug!(
            error = %std::io::Error::last_os_error(),
            "No parent console attached"
        );
    }
}

/// Route stdout/stderr to the parent process's console, if there is one.
#[cfg(not(target_os = "windows"))]
pub fn attach_parent_console() {}
