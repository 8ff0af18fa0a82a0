/// Splash screen build script.
///
/// The Win32 layer is gated on `cfg(windows)` inside the crate; everything
/// else is platform-neutral, so other hosts can still build and test the core.
/// Nothing is generated here yet.
fn main() {
    // Only re-run the build script when it changes.
    println!("cargo:rerun-if-changed=build.rs");
}
