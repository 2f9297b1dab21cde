//! Stack safety for the recursive parts of the toolchain.
//!
//! The parser and the interpreter both recurse once per nesting level of the
//! program they process. Wrapping those recursive entry points in
//! [`ensure_sufficient_stack`] grows the native stack on demand, so nesting
//! depth is bounded by the interpreter's configured call depth rather than by
//! the thread's stack size.
//!
//! On native targets this uses `stacker`; on WASM the closure is called
//! directly.

/// Minimum stack space to keep available (100KB red zone).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
