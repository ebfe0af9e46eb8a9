//! Built-in command kinds.
//!
//! | type  | name      | fields                                            |
//! |-------|-----------|---------------------------------------------------|
//! | sync  | `exec`    | `cmd`, `args`                                     |
//! | sync  | `scp`     | `targetHost`, `credentials`, `source`, `destination` |
//! | sync  | `logger`  | `msg`                                             |
//! | both  | `fail`    | –                                                 |
//! | async | `sleep`   | `duration` (seconds)                              |
//! | sync  | `try`     | `cmd`, `onFail`                                   |
//! | sync  | `waitUrl` | `url`, `intervalSecs`, `timeoutSecs`              |

pub mod exec;
pub mod fail;
pub mod logger;
pub mod scp;
pub mod sleep;
pub mod try_command;
pub mod wait_url;

pub use exec::Exec;
pub use fail::Fail;
pub use logger::Logger;
pub use scp::{Credentials, Scp};
pub use sleep::Sleep;
pub use try_command::Try;
pub use wait_url::WaitUrl;

use crate::workflow::command::Category;
use crate::workflow::registry::CommandRegistry;

pub const EXEC: &str = "exec";
pub const SCP: &str = "scp";
pub const LOGGER: &str = "logger";
pub const FAIL: &str = "fail";
pub const SLEEP: &str = "sleep";
pub const TRY: &str = "try";
pub const WAIT_URL: &str = "waitUrl";

/// Register every built-in command kind.
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register(Category::Sync, EXEC, Exec::decode);
    registry.register(Category::Sync, SCP, Scp::decode);
    registry.register(Category::Sync, LOGGER, Logger::decode);
    registry.register(Category::Sync, FAIL, Fail::decode_sync);
    registry.register(Category::Async, FAIL, Fail::decode_async);
    registry.register(Category::Async, SLEEP, Sleep::decode);
    registry.register(Category::Sync, TRY, Try::decode);
    registry.register(Category::Sync, WAIT_URL, WaitUrl::decode);
}
