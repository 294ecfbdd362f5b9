//! Profiling support via Tracy.
//!
//! Interleaving is instrumented with the [Tracy profiler](https://github.com/wolfpld/tracy)
//! when the `profiling` Cargo feature is enabled:
//!
//! ```toml
//! [dependencies]
//! redlilium-meshtools = { version = "0.1", features = ["profiling"] }
//! ```
//!
//! The planner, materializer and index policy each open their own span, and
//! the size of every freshly allocated vertex buffer is plotted.
//!
//! ```ignore
//! use redlilium_meshtools::profiling::{profile_function, profile_scope};
//!
//! fn repack_all(meshes: Vec<CpuMesh>) {
//!     profile_function!();
//!     for mesh in meshes {
//!         profile_scope!("repack_one");
//!         // ...
//!     }
//! }
//! ```
//!
//! When profiling is disabled (the default), all macros compile to no-ops.

#[cfg(feature = "profiling")]
pub use tracy_client::{self, plot as tracy_plot, span};

/// Create a profiling span for the current scope.
///
/// The span automatically ends when the scope exits.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::span!($name);
    };
}

/// Create a profiling span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Create a profiling span for the entire function.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::profiling::span!();
    };
}

/// Create a profiling span for function (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

/// Plot a value over time in Tracy.
///
/// ```ignore
/// profile_plot!("interleave: vertex bytes", buffer.len());
/// ```
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        $crate::profiling::tracy_plot!($name, $value as f64)
    };
}

/// Plot a value (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        let _ = $value; // Avoid unused warnings
    };
}

// Re-export macros at module level
pub use profile_function;
pub use profile_plot;
pub use profile_scope;
