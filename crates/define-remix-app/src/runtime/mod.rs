//! Runtime handles shared between an app's coordinator and its consumers

pub mod handle;
pub mod hooks;
pub mod navigation;

pub use handle::SwapHandle;
pub use hooks::{HookRegistry, LifecycleEvent, ListenerId};
pub use navigation::{Navigation, NavigationTarget};
