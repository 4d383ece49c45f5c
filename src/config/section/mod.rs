//! Configuration section definitions.
//!
//! Each module corresponds to a section in `playsync.toml`:
//!
//! | Module     | TOML Section   | Purpose                              |
//! |------------|----------------|--------------------------------------|
//! | `service`  | `[service]`    | Compile service base URL, endpoint   |
//! | `share`    | `[share]`      | Shareable URL base, mirror file      |
//! | `store`    | `[store]`      | Remembered options file              |
//! | `branches` | `[branches]`   | Branch listing source                |
//! | `defaults` | `[defaults]`   | Default options and code templates   |

mod branches;
mod defaults;
mod service;
mod share;
mod store;

pub use branches::BranchesConfig;
pub use defaults::DefaultsConfig;
pub use service::ServiceConfig;
pub use share::ShareConfig;
pub use store::StoreConfig;
