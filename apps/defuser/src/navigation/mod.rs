//! Screen-level navigation: module focus, breadcrumbs and manual links.

pub mod coordinator;
pub mod manual;
pub mod route;

pub use coordinator::{enter_module, leave_module, ModuleContext};
pub use manual::{manual_url, ManualLinks};
pub use route::{breadcrumbs, Crumb, Route};
