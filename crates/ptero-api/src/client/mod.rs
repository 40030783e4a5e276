// Client-API resource managers (`/api/client`).

mod account;
mod backups;
mod files;
mod power;
mod servers;

pub use account::AccountManager;
pub use backups::{BackupManager, BackupOptions};
pub use files::{FileManager, RenameOptions};
pub use power::PowerAction;
pub use servers::ServerManager;
