//! Build script for framepool.
//!
//! Prints feature notes for users wiring framepool into their game loop.

use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_DEBUG");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_PARKING_LOT");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_LOG");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_DIAGNOSTICS");

    let debug_enabled = env::var("CARGO_FEATURE_DEBUG").is_ok();
    let log_enabled = env::var("CARGO_FEATURE_LOG").is_ok();
    let diagnostics_enabled = env::var("CARGO_FEATURE_DIAGNOSTICS").is_ok();

    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let is_release = profile == "release";

    // =========================================================================
    // Feature-specific diagnostics
    // =========================================================================

    if debug_enabled {
        emit_info("Debug features enabled");
        emit_note("Borrow sites are captured as backtraces and printed in");
        emit_note("leak reports when a provider is dropped with instances on loan.");

        if is_release {
            emit_warning("Debug features enabled in release build!");
            emit_note("Every borrow captures a backtrace. Disable for production.");
        }
    }

    if is_release && !diagnostics_enabled && !log_enabled {
        emit_note("Release build: runtime diagnostics are silent.");
        emit_note("Enable 'diagnostics' or 'log' to keep FPxxx messages:");
        emit_note("  framepool = { version = \"0.1\", features = [\"log\"] }");
    }
}

// =============================================================================
// Diagnostic emission helpers
// =============================================================================

fn emit_info(msg: &str) {
    println!("cargo:warning=[framepool] {}", msg);
}

fn emit_note(msg: &str) {
    println!("cargo:warning=[framepool]    {}", msg);
}

fn emit_warning(msg: &str) {
    println!("cargo:warning=[framepool] warning: {}", msg);
}
