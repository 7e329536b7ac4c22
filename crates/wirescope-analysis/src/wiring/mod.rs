//! Wire declaration files: injector functions and the root types they build.

mod discovery;

pub use discovery::{discover_roots, InjectorInfo, RootDiscoverer, RootTypeRef, WireFile};
